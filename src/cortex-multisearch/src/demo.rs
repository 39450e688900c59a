//! Playground provider and validator.

/// Label of the demo prompt.
pub const USERS_LABEL: &str = "Which user should receive the email?";

/// Message returned by [`reject_user_zero`].
pub const USER_ZERO_MESSAGE: &str = "User 0 is not allowed to receive emails.";

/// Fake user search keyed on query length.
///
/// Returns `User {min}..=User {max}` with `min = min(len, 10)` and
/// `max = max(10, 20 - len)`; nothing for an empty query or when the range
/// collapses to a single user.
pub fn users_provider(query: &str) -> Vec<String> {
    let len = query.len();
    if len == 0 {
        return Vec::new();
    }

    let min = len.min(10);
    let max = 10usize.max(20usize.saturating_sub(len));
    if max == min {
        return Vec::new();
    }

    (min..=max).map(|id| format!("User {id}")).collect()
}

/// Rejects any selection containing the identifier `"0"`.
pub fn reject_user_zero(value: &[String]) -> Option<String> {
    value
        .iter()
        .any(|id| id == "0")
        .then(|| USER_ZERO_MESSAGE.to_string())
}
