//! Phone number normalization.

/// Dial-string shape a gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialFormat {
    /// `+` followed by the digits.
    E164,
    /// Bare digits, no prefix.
    BareDigits,
}

/// Strip every character that is not an ASCII digit, then apply the
/// gateway's dial format. No length or country-code validation: input
/// without digits yields `+` or the empty string, which the dispatcher
/// rejects before any network activity.
pub fn format_number(raw: &str, format: DialFormat) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match format {
        DialFormat::E164 => format!("+{digits}"),
        DialFormat::BareDigits => digits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_non_digits() {
        assert_eq!(format_number("+48 (600) 700-800", DialFormat::E164), "+48600700800");
        assert_eq!(format_number("+48 (600) 700-800", DialFormat::BareDigits), "48600700800");
    }

    #[test]
    fn leaves_plain_digits_alone() {
        assert_eq!(format_number("15550001111", DialFormat::BareDigits), "15550001111");
        assert_eq!(format_number("15550001111", DialFormat::E164), "+15550001111");
    }

    #[test]
    fn digitless_input_yields_no_digits() {
        for raw in ["", "abc", "++--", "call me"] {
            let e164 = format_number(raw, DialFormat::E164);
            let bare = format_number(raw, DialFormat::BareDigits);
            assert!(!e164.chars().any(|c| c.is_ascii_digit()), "{raw:?} -> {e164:?}");
            assert!(bare.is_empty(), "{raw:?} -> {bare:?}");
        }
    }
}
