const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable file size, e.g. `1.5 KB`. Uses 1024-based units.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0 Bytes")]
    #[case(1, "1 Bytes")]
    #[case(1000, "1000 Bytes")]
    #[case(1024, "1 KB")]
    #[case(1536, "1.5 KB")]
    #[case(1_048_576, "1 MB")]
    #[case(5_368_709_120, "5 GB")]
    #[case(2_199_023_255_552, "2048 GB")]
    fn formats_sizes(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_file_size(bytes), expected);
    }
}
