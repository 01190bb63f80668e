//! Shared library surface for the carbon server and its tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod security;
pub mod state;
