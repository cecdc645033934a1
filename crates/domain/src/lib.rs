//! Domain layer for the Clubhouse backend.
//!
//! This crate contains:
//! - Domain models (Club, Membership, MembershipRequest, Invite)
//! - The role hierarchy and permission evaluation
//! - The categorical membership error type

pub mod errors;
pub mod models;
pub mod services;

pub use errors::{ErrorClass, MembershipError};
