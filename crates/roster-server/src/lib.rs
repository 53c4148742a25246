//! # Roster Server Library
//!
//! Startup wiring for the Roster binary: building the component graph from
//! configuration, logging setup, and shutdown handling.

pub mod app;
pub mod di;
pub mod startup;
