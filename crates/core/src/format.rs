//! Display formatting for sizes and timestamps

use jiff::Timestamp;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human-readable size in binary units
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// UTC timestamp, empty when unknown
pub fn format_time(timestamp: Option<Timestamp>) -> String {
    timestamp
        .map(|ts| ts.strftime(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert!(format_size(1536).ends_with("KiB"));
        assert!(format_size(3 * 1024 * 1024).starts_with('3'));
        assert!(format_size(3 * 1024 * 1024).ends_with("MiB"));
    }

    #[test]
    fn test_format_time() {
        let ts: Timestamp = "2024-03-01T12:30:05Z".parse().unwrap();
        assert_eq!(format_time(Some(ts)), "2024-03-01 12:30:05");
        assert_eq!(format_time(None), "");
    }
}
