//! `DataElf` Authorization
//!
//! Resolves what an administrator may do on the `DataElf` content platform
//! and answers point queries against that set.

pub mod config;
pub mod observability;
pub mod permissions;

pub use dataelf_common::{AdminType, User, UserRole};
