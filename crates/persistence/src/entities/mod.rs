//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod club;
pub mod invite;
pub mod membership;
pub mod membership_request;

pub use club::{ClubEntity, ClubVisibilityDb, ClubWithCountEntity, RoomEntity};
pub use invite::{InviteEntity, InviteWithClubEntity};
pub use membership::{MemberRoleDb, MembershipEntity, MembershipStatusDb};
pub use membership_request::{MembershipRequestEntity, RequestStatusDb};
