//! Membership services.
//!
//! Each service owns the ordering of checks for its operations and maps
//! repository outcomes onto categorical `MembershipError`s.

pub mod clubs;
pub mod invites;
pub mod join_requests;
pub mod membership;
pub mod permission;

pub use clubs::ClubService;
pub use invites::InviteService;
pub use join_requests::JoinRequestService;
pub use membership::MembershipService;
pub use permission::StorePermissionEvaluator;
