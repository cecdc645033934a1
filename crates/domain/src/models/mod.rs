//! Domain models for Clubhouse.

pub mod club;
pub mod invite;
pub mod membership;
pub mod membership_request;

pub use club::{
    Club, ClubDetail, ClubSummary, ClubVisibility, CreateClubRequest, CreateClubResponse,
    ListClubsQuery, ListClubsResponse, Room, UpdateClubRequest,
};
pub use invite::{
    CreateInviteRequest, Invite, InviteResponse, ListInvitesResponse, PublicClubInfo,
    PublicInviteInfo, RedeemInviteResponse,
};
pub use membership::{
    ListMembersQuery, ListMembersResponse, MemberResponse, MemberRole, Membership,
    MembershipStatus, Pagination, PermissionQuery, PermissionResponse, UpdateRoleRequest,
    UpdateRoleResponse,
};
pub use membership_request::{
    CreateJoinRequest, ListRequestsResponse, MembershipRequest, ReviewRequestResponse,
    RequestStatus,
};
