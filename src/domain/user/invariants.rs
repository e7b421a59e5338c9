use super::entity::User;
use crate::domain::{DomainError, DomainResult};

/// Validates all User invariants
pub fn validate_user(user: &User) -> DomainResult<()> {
    if user.username.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Username cannot be empty".to_string(),
        ));
    }
    if user.username.chars().any(char::is_whitespace) {
        return Err(DomainError::InvariantViolation(format!(
            "Username '{}' cannot contain whitespace",
            user.username
        )));
    }
    Ok(())
}

/// Critical User Invariants:
///
/// 1. Usernames are unique, compared lowercased
/// 2. A watched movie is counted once in time spent watching
/// 3. Time spent never decreases
