//! # Roster Core
//!
//! Core types, traits, and error definitions for Roster.
//! This crate provides the foundational abstractions shared by the
//! repository, service, and REST layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
