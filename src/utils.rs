//! Shared utility helpers.

/// Truncate a string to `max` chars, appending `…` if trimmed.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

/// Format a float without a trailing `.0` when it is a whole number.
///
/// Used when echoing extracted operands back in human-readable summaries
/// (`"15 + 27 = 42"` rather than `"15.0 + 27.0 = 42.0"`).
pub fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "héllo wörld";
        let t = truncate_str(s, 3);
        assert!(t.ends_with('…'));
        assert!(t.chars().count() <= 4);
    }

    #[test]
    fn fmt_num_drops_trailing_zero() {
        assert_eq!(fmt_num(42.0), "42");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(-7.0), "-7");
    }
}
