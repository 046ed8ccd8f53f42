//! Unit tests for the OTP record entity

use chrono::{Duration, Timelike, Utc};

use crate::domain::entities::otp_record::{
    generate_code, OtpRecord, DEFAULT_CODE_LENGTH, DEFAULT_VALIDITY_SECONDS,
};

#[test]
fn test_issue_generates_fixed_length_digit_codes() {
    let record = OtpRecord::issue(DEFAULT_CODE_LENGTH, Duration::seconds(DEFAULT_VALIDITY_SECONDS));

    for code in [&record.mobile_code, &record.email_code] {
        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
    assert_eq!(
        record.expires_at - record.created_at,
        Duration::seconds(DEFAULT_VALIDITY_SECONDS)
    );
    assert!(!record.is_expired_at(record.created_at));
}

#[test]
fn test_issue_truncates_to_milliseconds() {
    let record = OtpRecord::issue(6, Duration::seconds(60));
    assert_eq!(record.created_at.nanosecond() % 1_000_000, 0);
    assert_eq!(record.expires_at.nanosecond() % 1_000_000, 0);
}

#[test]
fn test_generate_code_respects_length() {
    assert_eq!(generate_code(0), "");
    assert_eq!(generate_code(1).len(), 1);
    assert_eq!(generate_code(12).len(), 12);
}

#[test]
fn test_generate_code_covers_every_digit() {
    // 2000 independent draws leave a negligible chance of a digit never appearing.
    let digits: String = (0..200).map(|_| generate_code(10)).collect();
    for d in '0'..='9' {
        assert!(digits.contains(d), "digit {} never generated", d);
    }
}

#[test]
fn test_codes_are_not_constant() {
    let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code(6)).collect();
    assert!(codes.len() > 1);
}

#[test]
fn test_expiry_is_strictly_after_expires_at() {
    let now = Utc::now();
    let record = OtpRecord::new("123456", "654321", now - Duration::seconds(300), now);

    assert!(!record.is_expired_at(now));
    assert!(record.is_expired_at(now + Duration::milliseconds(1)));
    assert!(!record.is_expired_at(now - Duration::seconds(1)));
}

#[test]
fn test_matches_requires_both_codes() {
    let now = Utc::now();
    let record = OtpRecord::new("111111", "222222", now, now + Duration::seconds(300));

    assert!(record.matches("111111", "222222"));
    assert!(!record.matches("111111", "000000"));
    assert!(!record.matches("000000", "222222"));
    assert!(!record.matches("222222", "111111"));
    assert!(!record.matches("11111", "222222"));
    assert!(!record.matches("", ""));
}
