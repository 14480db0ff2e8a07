mod app;

use app::UploaderApp;
use eframe::CreationContext;
use share_uploader::config::UploaderConfig;
use share_uploader::logging;
use share_uploader::utils::file_size::FileSizeUtils;
use tracing::{error, info};

fn main() {
    logging::init("info");

    let config_path = UploaderConfig::default_path();
    let config = match UploaderConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Ignoring {}: {}", config_path.display(), e);
            UploaderConfig::default()
        }
    };
    info!(
        "Max file size {}, previews up to {}",
        FileSizeUtils::format_size(config.max_file_size),
        FileSizeUtils::format_size(config.preview_max_bytes)
    );

    let app = match UploaderApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 780.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "File Upload",
        options,
        Box::new(|_cc: &CreationContext| Box::new(app)),
    ) {
        error!("UI exited with error: {}", e);
    }
}
