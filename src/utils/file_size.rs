pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Whole decimal megabytes, the way the drop zone labels a selection.
    pub fn format_megabytes(size: u64) -> String {
        format!("{} MB", (size as f64 / 1e6).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_whole_megabytes() {
        assert_eq!(FileSizeUtils::format_megabytes(0), "0 MB");
        assert_eq!(FileSizeUtils::format_megabytes(499_999), "0 MB");
        assert_eq!(FileSizeUtils::format_megabytes(1_500_000), "2 MB");
        assert_eq!(FileSizeUtils::format_megabytes(1 << 30), "1074 MB");
    }
}
