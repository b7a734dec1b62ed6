//! # API Module
//!
//! Shop operations. Each one runs its local checks (form validation, status
//! transitions, pairing rules) first and only then calls the backend through
//! the injected [`repo::ImplAppRepo`](crate::repo::ImplAppRepo).
//!
//! ## Modules
//!
//! - [`bird`] - Bird records, list and detail views, status changes
//! - [`breeding`] - Mate search, pairing and incubation start
//! - [`incubation`] - Incubation records and their outcome
//! - [`photo`] - Bird photo and video gallery
//! - [`sale`] - Selling, returns and post-sale follow-ups
//! - [`share`] - Time-limited public share links
//! - [`stats`] - Sales and return statistics

pub mod bird;
pub mod breeding;
pub mod incubation;
pub mod photo;
pub mod sale;
pub mod share;
pub mod stats;

use crate::{front::errors::UserError, models};

/// Rejects a status change the lifecycle does not allow.
pub(crate) fn check_transition(
    bird: &models::bird::Bird,
    to: models::bird::BirdStatus,
) -> Result<(), UserError> {
    if bird.status.can_transition_to(&to) {
        return Ok(());
    }

    Err(UserError::InvalidTransition {
        from: bird.status,
        to,
    })
}
