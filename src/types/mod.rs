//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod amount;
pub mod call;
pub mod panel;

pub use amount::*;
pub use call::*;
pub use panel::*;
