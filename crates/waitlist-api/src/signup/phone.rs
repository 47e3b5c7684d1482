//! Phone number canonicalization.
//!
//! Nigerian numbers arrive in several surface forms: local with a trunk
//! zero (`08012345678`), international with or without `+`
//! (`+2348012345678`, `2348012345678`), with a `00` dialing prefix, or with
//! separators (`080-1234-5678`). All of them must collapse to one canonical
//! `+234XXXXXXXXXX` string so the unique index catches semantic duplicates,
//! not just literal ones.

/// Country calling code for Nigeria.
const COUNTRY_CODE: &str = "234";

/// Normalize a raw phone string to canonical form.
///
/// Best-effort and total: malformed input comes back in a digits-only form
/// for the validator to reject. Never errors.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    // A `00` international dialing prefix means the same as `+`.
    let digits = digits.strip_prefix("00").unwrap_or(&digits);

    let national = if let Some(rest) = digits.strip_prefix(COUNTRY_CODE) {
        // Some entries double up: `23408012345678` carries a trunk zero
        // after the country code.
        rest.strip_prefix('0').unwrap_or(rest)
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits
    };

    format!("+{COUNTRY_CODE}{national}")
}
