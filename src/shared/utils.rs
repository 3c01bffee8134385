//! Utility functions and helpers

/// Round a value to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format amount with proper decimals
pub fn format_amount(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Generate unique request ID for tracing
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789, 6), 1.234568);
        assert_eq!(round_to(1.23456789, 2), 1.23);
        assert_eq!(round_to(0.0, 6), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3978.523, 2), "3978.52");
        assert_eq!(format_amount(0.5, 4), "0.5000");
    }
}
