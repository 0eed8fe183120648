use rand::Rng;
use time::{Duration, OffsetDateTime};

/// Reset codes stay valid for 24 hours from issuance.
pub const RESET_CODE_TTL: Duration = Duration::hours(24);

/// Draws a 6-digit verification/reset code uniformly from 100000..=999999.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Codes are compared as trimmed strings, never numerically, so values that
/// come back from storage with stray whitespace or as non-string types still
/// match what the user typed.
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.trim() == submitted.trim()
}

pub fn reset_expiry_from(now: OffsetDateTime) -> OffsetDateTime {
    now + RESET_CODE_TTL
}

pub fn is_expired(expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    expires_at < now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_decimal_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn comparison_ignores_surrounding_whitespace() {
        assert!(codes_match("123456", " 123456 "));
        assert!(codes_match(" 123456", "123456"));
    }

    #[test]
    fn comparison_is_value_exact() {
        assert!(!codes_match("123456", "123457"));
        assert!(!codes_match("123456", "12345"));
        // Leading zeros matter as characters, not as numbers.
        assert!(!codes_match("012345", "12345"));
    }

    #[test]
    fn reset_code_expires_after_24_hours() {
        let issued = OffsetDateTime::now_utc();
        let expiry = reset_expiry_from(issued);
        assert!(!is_expired(expiry, issued + Duration::hours(23)));
        assert!(is_expired(expiry, issued + Duration::hours(25)));
    }

    #[test]
    fn boundary_is_not_expired() {
        let issued = OffsetDateTime::now_utc();
        let expiry = reset_expiry_from(issued);
        assert!(!is_expired(expiry, expiry));
    }
}
