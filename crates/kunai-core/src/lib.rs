//! Shared configuration, errors and constants for the kunai workspace.

pub mod config;
pub mod constants;
pub mod error;
