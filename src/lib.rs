//! vymova-sw library interface for testing
//!
//! Exposes the alignment engine, acquisition seams, and worker pipeline
//! for integration tests.

pub mod alignment;
pub mod broker;
pub mod config;
pub mod error;
pub mod g2p;
pub mod phonemes;
pub mod publisher;
pub mod recognizer;
pub mod types;
pub mod worker;

pub use crate::error::{Error, Result};
