pub struct FileSizeUtils;

impl FileSizeUtils {
    /// `1536` -> `"1.5 KB"`. At most two decimals, trailing zeros dropped.
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
        let mut value = size as f64;
        let mut unit_index = 0;

        while value >= 1024.0 && unit_index < UNITS.len() - 1 {
            value /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            return format!("{} {}", size, UNITS[0]);
        }

        let rounded = format!("{:.2}", value);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::FileSizeUtils;

    #[test]
    fn formats_across_units() {
        assert_eq!(FileSizeUtils::format_size(0), "0 Bytes");
        assert_eq!(FileSizeUtils::format_size(1023), "1023 Bytes");
        assert_eq!(FileSizeUtils::format_size(1024), "1 KB");
        assert_eq!(FileSizeUtils::format_size(1536), "1.5 KB");
        assert_eq!(FileSizeUtils::format_size(5_000_000), "4.77 MB");
        assert_eq!(FileSizeUtils::format_size(100 * 1024 * 1024), "100 MB");
        assert_eq!(FileSizeUtils::format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
