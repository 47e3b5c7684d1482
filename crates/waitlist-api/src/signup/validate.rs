//! Sign-up request validation.
//!
//! Field failures are aggregated into one response rather than failing on
//! the first bad field.

use serde::Deserialize;

use super::normalize_phone;
use crate::error::FieldError;

const MAX_EMAIL_LEN: usize = 320;
const MAX_LOCAL_LEN: usize = 64;
const MAX_NAME_LEN: usize = 50;
const MAX_SOURCE_LEN: usize = 100;

/// Mobile prefixes assigned to Nigerian carriers (first two digits of the
/// ten-digit national number).
const VALID_PREFIXES: [&str; 5] = ["70", "80", "81", "90", "91"];

/// Raw sign-up payload as received over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub source: Option<String>,
}

/// A validated, normalized sign-up ready for insertion.
#[derive(Debug, Clone)]
pub struct NewSignup {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub source: Option<String>,
}

/// Trim and lower-case an email address.
///
/// Pure and total; acceptability is the validator's call.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl NewSignup {
    /// Normalize and validate a raw request.
    pub fn parse(request: SignupRequest) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = normalize_email(&request.email);
        if let Err(message) = check_email(&email) {
            errors.push(FieldError::new("email", message));
        }

        let phone = normalize_phone(&request.phone);
        if let Err(message) = check_phone(&phone) {
            errors.push(FieldError::new("phone", message));
        }

        let first_name = clean_optional(request.first_name);
        if let Some(name) = &first_name {
            if let Err(message) = check_name(name) {
                errors.push(FieldError::new("first_name", message));
            }
        }

        let last_name = clean_optional(request.last_name);
        if let Some(name) = &last_name {
            if let Err(message) = check_name(name) {
                errors.push(FieldError::new("last_name", message));
            }
        }

        let source = clean_optional(request.source);
        if let Some(source) = &source {
            if source.chars().count() > MAX_SOURCE_LEN {
                errors.push(FieldError::new(
                    "source",
                    format!("must be at most {MAX_SOURCE_LEN} characters"),
                ));
            }
        }

        if errors.is_empty() {
            Ok(Self {
                first_name,
                last_name,
                email,
                phone,
                source,
            })
        } else {
            Err(errors)
        }
    }
}

/// Trim an optional field; empty becomes absent.
fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check an already-normalized email against a standard address grammar.
pub(crate) fn check_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("must not be empty".into());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("must be at most {MAX_EMAIL_LEN} characters"));
    }
    if email
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err("must not contain whitespace or control characters".into());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("must contain exactly one '@'".into());
    };
    if domain.contains('@') {
        return Err("must contain exactly one '@'".into());
    }
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return Err(format!(
            "local part must be 1 to {MAX_LOCAL_LEN} characters"
        ));
    }
    if !domain.contains('.') {
        return Err("domain must contain a dot".into());
    }
    let labels_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return Err("domain is not a valid hostname".into());
    }

    Ok(())
}

/// Check a canonical phone string against the accepted national pattern.
fn check_phone(phone: &str) -> Result<(), String> {
    let Some(national) = phone.strip_prefix("+234") else {
        return Err("must be a Nigerian number (+234...)".into());
    };
    if national.len() != 10 || !national.chars().all(|c| c.is_ascii_digit()) {
        return Err("must have a 10-digit national number".into());
    }
    if !VALID_PREFIXES
        .iter()
        .any(|prefix| national.starts_with(prefix))
    {
        return Err("does not match a known mobile prefix".into());
    }

    Ok(())
}

fn check_name(name: &str) -> Result<(), String> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("must be at most {MAX_NAME_LEN} characters"));
    }
    if name.chars().any(char::is_control) {
        return Err("must not contain control characters".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            first_name: Some("Ada".into()),
            last_name: Some("Obi".into()),
            email: email.into(),
            phone: phone.into(),
            source: Some("landing-page".into()),
        }
    }

    #[test]
    fn test_parse_valid_request() {
        let signup = NewSignup::parse(request("Ada@Example.COM", "08012345678")).unwrap();
        assert_eq!(signup.email, "ada@example.com");
        assert_eq!(signup.phone, "+2348012345678");
        assert_eq!(signup.first_name.as_deref(), Some("Ada"));
        assert_eq!(signup.source.as_deref(), Some("landing-page"));
    }

    #[test]
    fn test_email_is_trimmed_and_lowered() {
        let signup = NewSignup::parse(request("  A@B.com  ", "08012345678")).unwrap();
        assert_eq!(signup.email, "a@b.com");
    }

    #[test]
    fn test_malformed_email_rejected() {
        let errors = NewSignup::parse(request("not-an-email", "08012345678")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_bad_fields_are_aggregated() {
        let errors = NewSignup::parse(request("not-an-email", "12345")).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
    }

    #[test]
    fn test_phone_prefix_set() {
        assert!(NewSignup::parse(request("a@b.com", "08012345678")).is_ok());
        assert!(NewSignup::parse(request("a@b.com", "07012345678")).is_ok());
        assert!(NewSignup::parse(request("a@b.com", "09112345678")).is_ok());
        // 60 is not an assigned mobile prefix.
        let errors = NewSignup::parse(request("a@b.com", "06012345678")).unwrap_err();
        assert_eq!(errors[0].field, "phone");
    }

    #[test]
    fn test_phone_length_enforced() {
        let errors = NewSignup::parse(request("a@b.com", "0801234567")).unwrap_err();
        assert_eq!(errors[0].field, "phone");
        let errors = NewSignup::parse(request("a@b.com", "080123456789")).unwrap_err();
        assert_eq!(errors[0].field, "phone");
    }

    #[test]
    fn test_empty_optionals_become_absent() {
        let signup = NewSignup::parse(SignupRequest {
            first_name: Some("  ".into()),
            last_name: None,
            email: "a@b.com".into(),
            phone: "08012345678".into(),
            source: Some(String::new()),
        })
        .unwrap();
        assert!(signup.first_name.is_none());
        assert!(signup.last_name.is_none());
        assert!(signup.source.is_none());
    }

    #[test]
    fn test_name_bounds() {
        let long = "x".repeat(51);
        let errors = NewSignup::parse(SignupRequest {
            first_name: Some(long),
            last_name: Some("Obi\u{0007}".into()),
            email: "a@b.com".into(),
            phone: "08012345678".into(),
            source: None,
        })
        .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["first_name", "last_name"]);
    }

    #[test]
    fn test_source_bound() {
        let errors = NewSignup::parse(SignupRequest {
            first_name: None,
            last_name: None,
            email: "a@b.com".into(),
            phone: "08012345678".into(),
            source: Some("s".repeat(101)),
        })
        .unwrap_err();
        assert_eq!(errors[0].field, "source");
    }

    #[test]
    fn test_email_grammar_edges() {
        assert!(check_email("a@b.com").is_ok());
        assert!(check_email("first.last+tag@sub.example.org").is_ok());
        assert!(check_email("a@b@c.com").is_err());
        assert!(check_email("a@nodot").is_err());
        assert!(check_email("@example.com").is_err());
        assert!(check_email("a b@example.com").is_err());
        assert!(check_email("a@-bad.com").is_err());
        assert!(check_email(&format!("{}@example.com", "x".repeat(65))).is_err());
    }
}
