//! HTTP route handlers.

pub mod clubs;
pub mod health;
pub mod invites;
pub mod members;
pub mod requests;
