//! Input shape checks applied before a request is built.
//!
//! These mirror what the backend enforces so obviously bad input never
//! reaches the network. None of them verify correctness, only shape.

/// Verification codes are fixed-width numeric.
pub const OTP_LENGTH: usize = 6;

/// Minimum password length accepted at registration.
pub const REGISTER_PASSWORD_MIN: usize = 8;

/// Minimum length accepted when rotating an existing password.
/// Weaker than the registration minimum; the backend accepts both.
pub const CHANGE_PASSWORD_MIN: usize = 6;

/// Minimal email shape check: something@something.something, no whitespace.
pub fn is_valid_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some(at) = s.find('@') else {
        return false;
    };
    let local = &s[..at];
    let domain = &s[at + 1..];
    let Some(dot) = domain.rfind('.') else {
        return false;
    };
    !local.is_empty() && !domain[..dot].is_empty() && !domain[dot + 1..].is_empty()
}

/// A code is submittable when it is exactly six ASCII digits.
pub fn is_valid_otp(s: &str) -> bool {
    s.len() == OTP_LENGTH && s.chars().all(|c| c.is_ascii_digit())
}
