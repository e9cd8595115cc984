//! Test utilities for unit and route tests.
//!
//! This module provides:
//! - Test data factories for identities and registrations
//! - An in-memory registration gateway that records every call
//! - An in-memory session provider with scriptable sign-in/sign-out
//! - Application state wired to those fakes, plus session cookies

mod app_state_builder;
mod factories;
mod gateway_mocks;
mod session_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use gateway_mocks::*;
pub use session_mocks::*;
