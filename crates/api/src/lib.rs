//! Clubhouse membership service.
//!
//! HTTP surface, configuration and services over the `domain` and
//! `persistence` crates.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod services;
