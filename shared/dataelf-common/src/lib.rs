//! `DataElf` Common Library
//!
//! Account types shared by the authorization core and its callers.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
