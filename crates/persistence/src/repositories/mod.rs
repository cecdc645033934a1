//! Repository implementations for database operations.

pub mod club;
pub mod invite;
pub mod membership;
pub mod membership_request;

pub use club::{ClubChanges, ClubRepository, CreatedClub, NewClub, SeedInvite};
pub use invite::{InviteRepository, RedeemOutcome};
pub use membership::{JoinOutcome, LeaveOutcome, MembershipRepository, TargetOutcome};
pub use membership_request::{ApproveOutcome, MembershipRequestRepository, RejectOutcome};
