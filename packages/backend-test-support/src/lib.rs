//! Test support for the sheepshead backend: logging setup, reproducible
//! randomness, unique ids and problem-details assertions.
//!
//! Nothing here depends on backend types, so unit and integration tests can
//! both use it.

pub mod logging;
pub mod problem_details;
pub mod rng;
pub mod unique_helpers;

pub use rng::{seed_from_env, SeededRng};
pub use unique_helpers::{unique_user_id, unique_user_ids};
