//! Human-readable byte counts.

const UNIT_LABELS: [&str; 5] = ["", "k", "M", "G", "T"];

/// Format a byte count as a short human-readable string.
///
/// The value is divided by 1024 while it stays strictly above 1024, so an
/// exact `1024` is still printed in bytes.
///
/// ```
/// use h4r_common::format_bytes;
///
/// assert_eq!(format_bytes(512), "512.00 b");
/// assert_eq!(format_bytes(2048), "2.00 kb");
/// ```
pub fn format_bytes(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;
    while value > 1024.0 && unit < UNIT_LABELS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}b", value, UNIT_LABELS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(format_bytes(0), "0.00 b");
        assert_eq!(format_bytes(1024), "1024.00 b");
        assert_eq!(format_bytes(1025), "1.00 kb");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 Mb");
    }

    #[test]
    fn test_caps_at_terabytes() {
        assert_eq!(format_bytes(u64::MAX), "16777216.00 Tb");
    }
}
