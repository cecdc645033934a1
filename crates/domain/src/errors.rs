//! Categorical outcomes of membership operations.
//!
//! Every expected failure is a named variant with a stable code that callers
//! match on. Storage failures are folded into `Internal`.

use thiserror::Error;

/// Error class used to pick a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Authorization,
    Conflict,
    PolicyMismatch,
    Validation,
    Internal,
}

#[derive(Debug, Error)]
pub enum MembershipError {
    // Not found
    #[error("Club not found")]
    ClubNotFound,

    #[error("Membership request not found")]
    RequestNotFound,

    #[error("Invite not found")]
    InviteNotFound,

    #[error("Invite code is not valid")]
    InvalidInvite,

    // Authorization
    #[error("Insufficient permissions for this action")]
    InsufficientPermissions,

    #[error("Access denied")]
    AccessDenied,

    #[error("You are banned from this club")]
    BannedFromClub,

    // Conflict / state
    #[error("Already a member of this club")]
    AlreadyMember,

    #[error("A request to join this club is already pending")]
    RequestAlreadyPending,

    #[error("This request has already been reviewed")]
    RequestAlreadyReviewed,

    #[error("Invite has expired")]
    InviteExpired,

    #[error("Invite has reached its maximum number of uses")]
    InviteMaxUsesReached,

    #[error("The club owner cannot be removed")]
    CannotRemoveOwner,

    #[error("The owner role cannot be assigned or changed")]
    CannotChangeOwnerRole,

    #[error("The owner must transfer ownership before leaving")]
    OwnerMustTransferOwnership,

    #[error("Not a member of this club")]
    NotAMember,

    #[error("User is not banned from this club")]
    NotBanned,

    #[error("The owner has left this club; it no longer accepts members")]
    ClubRetired,

    // Policy mismatch
    #[error("This club requires approval to join; send a join request instead")]
    RequiresApproval,

    #[error("This club is public; join it directly")]
    PublicClubNoRequestNeeded,

    #[error("This club can only be joined with an invite")]
    InviteOnlyClub,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MembershipError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            MembershipError::ClubNotFound => "CLUB_NOT_FOUND",
            MembershipError::RequestNotFound => "REQUEST_NOT_FOUND",
            MembershipError::InviteNotFound => "INVITE_NOT_FOUND",
            MembershipError::InvalidInvite => "INVALID_INVITE",
            MembershipError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            MembershipError::AccessDenied => "ACCESS_DENIED",
            MembershipError::BannedFromClub => "BANNED_FROM_CLUB",
            MembershipError::AlreadyMember => "ALREADY_MEMBER",
            MembershipError::RequestAlreadyPending => "REQUEST_ALREADY_PENDING",
            MembershipError::RequestAlreadyReviewed => "REQUEST_ALREADY_REVIEWED",
            MembershipError::InviteExpired => "INVITE_EXPIRED",
            MembershipError::InviteMaxUsesReached => "INVITE_MAX_USES_REACHED",
            MembershipError::CannotRemoveOwner => "CANNOT_REMOVE_OWNER",
            MembershipError::CannotChangeOwnerRole => "CANNOT_CHANGE_OWNER_ROLE",
            MembershipError::OwnerMustTransferOwnership => "OWNER_MUST_TRANSFER_OWNERSHIP",
            MembershipError::NotAMember => "NOT_A_MEMBER",
            MembershipError::NotBanned => "NOT_BANNED",
            MembershipError::ClubRetired => "CLUB_RETIRED",
            MembershipError::RequiresApproval => "REQUIRES_APPROVAL",
            MembershipError::PublicClubNoRequestNeeded => "PUBLIC_CLUB_NO_REQUEST_NEEDED",
            MembershipError::InviteOnlyClub => "INVITE_ONLY_CLUB",
            MembershipError::Validation(_) => "VALIDATION_ERROR",
            MembershipError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            MembershipError::ClubNotFound
            | MembershipError::RequestNotFound
            | MembershipError::InviteNotFound
            | MembershipError::InvalidInvite => ErrorClass::NotFound,

            MembershipError::InsufficientPermissions
            | MembershipError::AccessDenied
            | MembershipError::BannedFromClub => ErrorClass::Authorization,

            MembershipError::AlreadyMember
            | MembershipError::RequestAlreadyPending
            | MembershipError::RequestAlreadyReviewed
            | MembershipError::InviteExpired
            | MembershipError::InviteMaxUsesReached
            | MembershipError::CannotRemoveOwner
            | MembershipError::CannotChangeOwnerRole
            | MembershipError::OwnerMustTransferOwnership
            | MembershipError::NotAMember
            | MembershipError::NotBanned
            | MembershipError::ClubRetired => ErrorClass::Conflict,

            MembershipError::RequiresApproval
            | MembershipError::PublicClubNoRequestNeeded
            | MembershipError::InviteOnlyClub => ErrorClass::PolicyMismatch,

            MembershipError::Validation(_) => ErrorClass::Validation,
            MembershipError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Conflicts that describe a duplicate of existing state rather than a rule violation.
    pub fn is_duplicate_state(&self) -> bool {
        matches!(
            self,
            MembershipError::AlreadyMember
                | MembershipError::RequestAlreadyPending
                | MembershipError::RequestAlreadyReviewed
        )
    }
}

impl From<sqlx::Error> for MembershipError {
    fn from(err: sqlx::Error) -> Self {
        MembershipError::Internal(format!("Database error: {}", err))
    }
}

impl From<validator::ValidationErrors> for MembershipError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        MembershipError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_codes_are_screaming_snake() {
        let errors = [
            MembershipError::ClubNotFound,
            MembershipError::InviteMaxUsesReached,
            MembershipError::OwnerMustTransferOwnership,
            MembershipError::PublicClubNoRequestNeeded,
            MembershipError::Validation("x".into()),
        ];
        for e in errors {
            assert!(e
                .code()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_classes() {
        assert_eq!(MembershipError::InvalidInvite.class(), ErrorClass::NotFound);
        assert_eq!(
            MembershipError::BannedFromClub.class(),
            ErrorClass::Authorization
        );
        assert_eq!(MembershipError::AccessDenied.class(), ErrorClass::Authorization);
        assert_eq!(MembershipError::InviteExpired.class(), ErrorClass::Conflict);
        assert_eq!(MembershipError::ClubRetired.class(), ErrorClass::Conflict);
        assert_eq!(
            MembershipError::InviteOnlyClub.class(),
            ErrorClass::PolicyMismatch
        );
        assert_eq!(
            MembershipError::Internal("boom".into()).class(),
            ErrorClass::Internal
        );
    }

    #[test]
    fn test_duplicate_state() {
        assert!(MembershipError::AlreadyMember.is_duplicate_state());
        assert!(MembershipError::RequestAlreadyPending.is_duplicate_state());
        assert!(!MembershipError::CannotRemoveOwner.is_duplicate_state());
        assert!(!MembershipError::ClubRetired.is_duplicate_state());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: MembershipError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_from_validation_errors() {
        let err: MembershipError = Named {
            name: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();
        match err {
            MembershipError::Validation(msg) => assert_eq!(msg, "Name is required"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }
}
