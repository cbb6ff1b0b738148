//! Rupee formatting

/// Format an amount as whole rupees with Indian digit grouping.
///
/// `1200000.0` becomes `₹12,00,000`: the last three digits form one group
/// and the rest are grouped in pairs.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(1_000.0), "₹1,000");
        assert_eq!(format_inr(46_800.0), "₹46,800");
        assert_eq!(format_inr(150_000.0), "₹1,50,000");
        assert_eq!(format_inr(1_200_000.0), "₹12,00,000");
        assert_eq!(format_inr(123_456_789.0), "₹12,34,56,789");
    }

    #[test]
    fn test_format_inr_rounds_and_signs() {
        assert_eq!(format_inr(46_800.4), "₹46,800");
        assert_eq!(format_inr(1_999.6), "₹2,000");
        assert_eq!(format_inr(-25_000.0), "-₹25,000");
        assert_eq!(format_inr(-0.2), "₹0");
    }
}
