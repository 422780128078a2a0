//! Shared utilities and error types for the Sarcophagus contract suite.
//!
//! This crate provides:
//! - [`CommonError`]: standardised error codes raised by the shared helpers.
//! - [`pausable`]: global emergency stop.
//! - [`roles`]: admin / oracle role registry.
//! - [`whitelist`]: collection allow-list with per-collection and global
//!   value ceilings.
//! - [`rate_limit`]: rolling-window cumulative value limiter.
//! - [`reentrancy_guard`]: per-identity call-in-progress lock.
//!
//! Contract-specific errors map these codes into their own enums; the shared
//! set stays below **100** so that mapped codes never collide.

#![no_std]
#![allow(clippy::arithmetic_side_effects)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod pausable;
pub mod rate_limit;
pub mod reentrancy_guard;
pub mod roles;
pub mod whitelist;

pub use pausable::*;
pub use rate_limit::*;
pub use reentrancy_guard::*;
pub use roles::*;
pub use whitelist::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Standardised error codes shared by every Sarcophagus contract.
///
/// # Code ranges
/// | Range   | Purpose                       |
/// |---------|-------------------------------|
/// | 1 – 9   | Lifecycle / initialisation    |
/// | 10 – 19 | Authentication & authorisation|
/// | 30 – 39 | Validation / input            |
/// | 40 – 49 | Contract state                |
/// | 60 – 69 | Resource limits               |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    AccessDenied = 10,
    InvalidInput = 30,
    /// The contract is currently paused and cannot process requests.
    Paused = 40,
    /// A mutating call is already in progress for the same identity.
    ReentrantCall = 41,
    /// The rolling-window ceiling would be exceeded by this call.
    RateLimitExceeded = 60,
}
