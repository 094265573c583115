//! Field rules shared by resource payloads.

use validator::{ValidationError, ValidationErrors};

/// Name rule: ASCII letters and spaces only.
///
/// # Errors
///
/// Returns a `name_charset` error for any other character.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        Ok(())
    } else {
        Err(ValidationError::new("name_charset"))
    }
}

/// Phone rule: exactly ten ASCII digits.
///
/// # Errors
///
/// Returns a `phone_format` error otherwise.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_format"))
    }
}

/// Flattens validation errors into client-facing messages, ordered by field.
#[must_use]
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect()
}

/// Trims a text field, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada Lovelace", true)]
    #[case("Al", true)]
    #[case("R2D2", false)]
    #[case("José", false)]
    #[case("o'brien", false)]
    fn test_name_charset(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_name(name).is_ok(), ok);
    }

    #[rstest]
    #[case("0123456789", true)]
    #[case("012345678", false)]
    #[case("01234567890", false)]
    #[case("01234-6789", false)]
    #[case("٠١٢٣٤٥٦٧٨٩", false)]
    fn test_phone_format(#[case] phone: &str, #[case] ok: bool) {
        assert_eq!(validate_phone(phone).is_ok(), ok);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ")), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
