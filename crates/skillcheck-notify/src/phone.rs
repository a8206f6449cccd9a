//! Phone number normalisation.

/// Normalise a phone number to international format.
///
/// Non-digits are stripped. Kenyan local forms are expanded: `07...` and
/// bare nine-digit numbers get the `+254` prefix. Anything else just gets a
/// leading `+`.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.starts_with("254") {
        format!("+{digits}")
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+254{rest}")
    } else if digits.len() == 9 {
        format!("+254{digits}")
    } else {
        format!("+{digits}")
    }
}
