use eframe::egui::Color32;
use share_uploader::upload::UploadStatus;

pub const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
pub const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
pub const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
const IDLE: Color32 = Color32::from_rgb(150, 150, 150);

pub fn status_color(status: UploadStatus) -> Color32 {
    match status {
        UploadStatus::Queued | UploadStatus::Cancelled => IDLE,
        UploadStatus::Uploading => ACCENT,
        UploadStatus::Completed => SUCCESS,
        UploadStatus::Errored => ERROR,
    }
}
