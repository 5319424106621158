/// Renders a metric value the way the unit demands it. Money always gets two
/// decimals, everything else drops the fraction when it is whole and keeps
/// one decimal place otherwise.
pub fn format_value(value: f64, unit: &str) -> String {
    if unit == "$" {
        return format!("${value:.2}");
    }
    if value.fract() == 0.0 {
        format!("{value}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn test_money_always_has_two_decimals() {
        assert_eq!(format_value(7.0, "$"), "$7.00");
        assert_eq!(format_value(7.5, "$"), "$7.50");
    }

    #[test]
    fn test_whole_values_drop_the_fraction() {
        assert_eq!(format_value(7.0, "reps"), "7");
        assert_eq!(format_value(120.0, "min"), "120");
    }

    #[test]
    fn test_fractional_values_keep_one_decimal() {
        assert_eq!(format_value(7.5, "reps"), "7.5");
        assert_eq!(format_value(3.14, "hours"), "3.1");
    }
}
