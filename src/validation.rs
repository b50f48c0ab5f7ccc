//! Validation rules for the contact fields of the booking form.
//
// Only three fields are ever checked. Anything else on the page is treated as
// always valid by the form handlers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid mobile regex"));

// Browsers count U+FEFF as whitespace and U+0085 as not
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    let part = r"[[^\s\x{FEFF}@]\x{85}]+";
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("valid email regex")
});

/// Minimum length of a trimmed full name, in UTF-16 code units as a browser counts it
pub const MIN_NAME_LENGTH: usize = 3;

/// A contact field monitored by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldId {
    #[serde(rename = "fullName")]
    FullName,
    #[serde(rename = "mobile")]
    Mobile,
    #[serde(rename = "email")]
    Email,
}

/// A field value that failed its rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} is invalid: {reason}")]
pub struct FieldInvalid {
    pub field: FieldId,
    pub reason: &'static str,
}

impl FieldId {
    /// All monitored fields in page order
    pub const ALL: [FieldId; 3] = [FieldId::FullName, FieldId::Mobile, FieldId::Email];

    /// The element id this field is rendered with
    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::FullName => "fullName",
            FieldId::Mobile => "mobile",
            FieldId::Email => "email",
        }
    }

    /// Look up a monitored field by element id. Unmonitored ids yield `None`.
    pub fn from_element_id(id: &str) -> Option<Self> {
        FieldId::ALL.into_iter().find(|field| field.element_id() == id)
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FieldId::Email)
    }

    pub fn validate(self, value: &str) -> bool {
        match self {
            FieldId::FullName => validate_full_name(value),
            FieldId::Mobile => validate_mobile(value),
            FieldId::Email => validate_email(value),
        }
    }

    /// Like [`FieldId::validate`], but says why the value was rejected
    pub fn check(self, value: &str) -> Result<(), FieldInvalid> {
        if self.validate(value) {
            return Ok(());
        }
        let reason = match self {
            FieldId::FullName => "must be at least 3 characters",
            FieldId::Mobile => "must be 10 digits starting with 6, 7, 8 or 9",
            FieldId::Email => "must look like name@domain.tld",
        };
        Err(FieldInvalid { field: self, reason })
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

impl FromStr for FieldId {
    type Err = anyhow::Error;

    /// Accepts the element id as well as the kebab/snake spellings used on the command line
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(field) = FieldId::from_element_id(s) {
            return Ok(field);
        }
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "fullname" | "name" => Ok(FieldId::FullName),
            "mobile" | "phone" => Ok(FieldId::Mobile),
            "email" => Ok(FieldId::Email),
            _ => Err(anyhow::anyhow!(
                "Unknown field '{}'. Expected one of: fullName, mobile, email",
                s
            )),
        }
    }
}

fn is_form_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Strip leading and trailing whitespace the way a browser's `trim()` does
pub fn trim_value(value: &str) -> &str {
    value.trim_matches(is_form_whitespace)
}

/// Full name: at least three characters once surrounding whitespace is removed
pub fn validate_full_name(value: &str) -> bool {
    trim_value(value).encode_utf16().count() >= MIN_NAME_LENGTH
}

/// Mobile number: exactly ten digits, leading digit 6-9. No trimming.
pub fn validate_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value)
}

/// Email is optional; a blank value passes
pub fn validate_email(value: &str) -> bool {
    if trim_value(value).is_empty() {
        return true;
    }
    EMAIL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Al", false ; "two characters")]
    #[test_case("Ali", true ; "three characters")]
    #[test_case("  Ali  ", true ; "trimmed before counting")]
    #[test_case("   ", false ; "blank")]
    #[test_case(" A l ", true ; "inner space counts")]
    #[test_case("Zoë", true ; "counts characters not bytes")]
    #[test_case("😀😀", true ; "astral characters count twice")]
    #[test_case("😀", false ; "one astral character")]
    #[test_case("\u{FEFF}Al", false ; "byte order mark is trimmed")]
    #[test_case("\u{00A0}Al\u{3000}", false ; "unicode spaces are trimmed")]
    #[test_case("\u{0085}Al", true ; "next line is not whitespace")]
    fn test_validate_full_name(value: &str, expected: bool) {
        assert_eq!(validate_full_name(value), expected);
    }

    #[test_case("9876543210", true ; "valid")]
    #[test_case("6000000000", true ; "lowest leading digit")]
    #[test_case("5876543210", false ; "leading five")]
    #[test_case("98765432100", false ; "eleven digits")]
    #[test_case("987654321", false ; "nine digits")]
    #[test_case(" 9876543210", false ; "not trimmed")]
    #[test_case("98765-43210", false ; "separator")]
    #[test_case("", false ; "empty")]
    fn test_validate_mobile(value: &str, expected: bool) {
        assert_eq!(validate_mobile(value), expected);
    }

    #[test_case("", true ; "empty is optional")]
    #[test_case("   ", true ; "blank is optional")]
    #[test_case("\u{FEFF}", true ; "byte order mark alone is blank")]
    #[test_case("a\u{FEFF}b@c.com", false ; "byte order mark inside")]
    #[test_case("a\u{0085}b@c.com", true ; "next line is not whitespace")]
    #[test_case("a@b.com", true ; "basic")]
    #[test_case("first.last@mail.example.org", true ; "dotted parts")]
    #[test_case("a@b", false ; "no dot in domain")]
    #[test_case("a b@c.com", false ; "whitespace")]
    #[test_case("a@@b.com", false ; "double at")]
    #[test_case("@b.com", false ; "no local part")]
    #[test_case("a@b.", false ; "empty tld")]
    fn test_validate_email(value: &str, expected: bool) {
        assert_eq!(validate_email(value), expected);
    }

    #[test]
    fn test_trim_value() {
        assert_eq!(trim_value("\u{FEFF} Ali\t\n"), "Ali");
        assert_eq!(trim_value("\u{0085}Ali"), "\u{0085}Ali");
        assert_eq!(trim_value(" A l "), "A l");
    }

    #[test]
    fn test_field_lookup_by_element_id() {
        assert_eq!(FieldId::from_element_id("fullName"), Some(FieldId::FullName));
        assert_eq!(FieldId::from_element_id("mobile"), Some(FieldId::Mobile));
        assert_eq!(FieldId::from_element_id("email"), Some(FieldId::Email));
        assert_eq!(FieldId::from_element_id("appointmentDate"), None);
        assert_eq!(FieldId::from_element_id("FullName"), None);
    }

    #[test]
    fn test_field_from_str_aliases() {
        assert_eq!("full-name".parse::<FieldId>().unwrap(), FieldId::FullName);
        assert_eq!("full_name".parse::<FieldId>().unwrap(), FieldId::FullName);
        assert_eq!("EMAIL".parse::<FieldId>().unwrap(), FieldId::Email);
        assert!("address".parse::<FieldId>().is_err());
    }

    #[test]
    fn test_check_reports_reason() {
        assert!(FieldId::Email.check("").is_ok());
        let err = FieldId::Mobile.check("123").unwrap_err();
        assert_eq!(err.field, FieldId::Mobile);
        assert!(err.to_string().starts_with("mobile is invalid"));
    }

    #[test]
    fn test_only_email_is_optional() {
        assert!(FieldId::FullName.is_required());
        assert!(FieldId::Mobile.is_required());
        assert!(!FieldId::Email.is_required());
    }
}
