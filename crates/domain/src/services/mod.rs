//! Domain services for Clubhouse.
//!
//! Services contain business logic that operates on domain models.

pub mod permission;

pub use permission::{evaluate_permission, PermissionEvaluator};
