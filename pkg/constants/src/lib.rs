//! Centralized constants for the k3rs client.
//!
//! All project-wide constant values live here.
//! Change a value in one place and it applies everywhere.

pub mod api;
pub mod network;
pub mod paths;
