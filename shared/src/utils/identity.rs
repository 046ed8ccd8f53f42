//! Mobile number and email address utilities
//!
//! The OTP core treats both identity fields as opaque strings. These helpers
//! are used at the edges: request validation in the gateway and masking
//! whenever an identity is written to a log.

use once_cell::sync::Lazy;
use regex::Regex;

// Characters a user may type in a mobile number field, at most 20 of them
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9 ()+\-]{1,20}$").unwrap()
});

/// Remove formatting characters, keeping digits and a leading '+'
pub fn normalize_mobile(mobile: &str) -> String {
    mobile
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a mobile number looks plausible (digits plus common separators)
pub fn is_valid_mobile(mobile: &str) -> bool {
    let mobile = mobile.trim();
    MOBILE_REGEX.is_match(mobile) && mobile.chars().any(|c| c.is_ascii_digit())
}

/// Mask a mobile number for logging, keeping the last 4 digits (e.g. ******0100)
pub fn mask_mobile(mobile: &str) -> String {
    let normalized = normalize_mobile(mobile);
    let visible = 4;
    if normalized.len() <= visible {
        return "*".repeat(normalized.len());
    }
    let (hidden, last) = normalized.split_at(normalized.len() - visible);
    if let Some(rest) = hidden.strip_prefix('+') {
        format!("+{}{}", "*".repeat(rest.len()), last)
    } else {
        format!("{}{}", "*".repeat(hidden.len()), last)
    }
}

/// Mask an email address for logging, keeping the first character and the domain
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => "***".to_string(),
    }
}
