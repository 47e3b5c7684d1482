//! Administrative CSV export.

use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::signup::SignupRecord;

/// Fixed column header; rows follow in creation order.
pub const CSV_HEADER: &str = "id,first_name,last_name,email,phone,source,created_at";

/// Check the supplied admin key against the configured secret.
///
/// An unset secret disables the endpoint entirely (`NotFound`). Keys are
/// compared by SHA-256 digest, so a mismatch never reveals how far the
/// comparison got.
pub fn check_export_key(
    configured: Option<&str>,
    supplied: Option<&str>,
) -> Result<(), ApiError> {
    let Some(configured) = configured else {
        return Err(ApiError::NotFound);
    };
    let Some(supplied) = supplied else {
        return Err(ApiError::Unauthorized);
    };
    if digest(supplied) == digest(configured) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn digest(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Serialize records to CSV, header first.
///
/// Full-table serialization with no pagination; acceptable while the
/// corpus stays small.
pub fn to_csv(records: &[SignupRecord]) -> String {
    let mut out = String::with_capacity(64 * (records.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let row = [
            record.id.to_string(),
            record.first_name.clone().unwrap_or_default(),
            record.last_name.clone().unwrap_or_default(),
            record.email.clone(),
            record.phone.clone(),
            record.source.clone().unwrap_or_default(),
            record.created_at.to_rfc3339(),
        ];
        let encoded: Vec<String> = row.iter().map(|field| escape(field)).collect();
        out.push_str(&encoded.join(","));
        out.push('\n');
    }

    out
}

// RFC 4180 quoting.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(email: &str, source: Option<&str>) -> SignupRecord {
        SignupRecord {
            id: Uuid::nil(),
            first_name: Some("Ada".into()),
            last_name: None,
            email: email.into(),
            phone: "+2348012345678".into(),
            source: source.map(String::from),
            created_at: Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_unset_key_disables_export() {
        assert!(matches!(
            check_export_key(None, Some("anything")),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(check_export_key(None, None), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_wrong_or_missing_key_is_unauthorized() {
        assert!(matches!(
            check_export_key(Some("secret"), Some("wrong")),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            check_export_key(Some("secret"), None),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_correct_key_passes() {
        assert!(check_export_key(Some("secret"), Some("secret")).is_ok());
    }

    #[test]
    fn test_csv_header_and_rows() {
        let records = vec![record("a@b.com", Some("landing-page"))];
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("a@b.com"));
        assert!(lines[1].contains("+2348012345678"));
        assert!(lines[1].contains("2026-08-29T12:00:00+00:00"));
    }

    #[test]
    fn test_empty_corpus_is_header_only() {
        assert_eq!(to_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_escaped() {
        let records = vec![record("a@b.com", Some("ref: \"friends, family\""))];
        let csv = to_csv(&records);
        assert!(csv.contains("\"ref: \"\"friends, family\"\"\""));
    }

    #[test]
    fn test_absent_optionals_serialize_empty() {
        let records = vec![record("a@b.com", None)];
        let line = to_csv(&records).lines().nth(1).unwrap().to_string();
        // last_name and source columns are empty
        assert!(line.contains(",Ada,,a@b.com"));
        assert!(line.contains("+2348012345678,,2026"));
    }
}
