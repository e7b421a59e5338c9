use super::entity::Actor;
use crate::domain::{DomainError, DomainResult};

/// Validates all Actor invariants
pub fn validate_actor(actor: &Actor) -> DomainResult<()> {
    if actor.full_name.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Actor name cannot be empty".to_string(),
        ));
    }
    if actor.colleagues.contains(&actor.id) {
        return Err(DomainError::InvariantViolation(format!(
            "Actor {} cannot be their own colleague",
            actor.full_name
        )));
    }
    Ok(())
}

/// Colleague invariants:
///
/// 1. The relation is symmetric: it is only ever written through
///    `pair_colleagues`, which visits both sides
/// 2. An actor is never their own colleague
/// 3. Colleagues are computed once, when a movie's cast is stored
