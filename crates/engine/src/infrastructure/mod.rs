//! Infrastructure implementations.
//!
//! Contains port traits, their adapters, and environment configuration.

pub mod config;
pub mod persistence;
pub mod ports;
