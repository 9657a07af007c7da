//! OSWatch Library
//!
//! This module exposes the cache, scraper and HTTP server for use in the
//! binary and in integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod server;
