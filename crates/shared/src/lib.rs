//! Shared utilities for the Clubhouse backend.
//!
//! This crate provides functionality used across the other crates:
//! - Invite code generation
//! - Bearer token verification against the identity provider's public key

pub mod invite_code;
pub mod jwt;
