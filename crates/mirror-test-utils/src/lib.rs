//! Shared test utilities for the folder-mirror workspace.
//!
//! This crate provides standardised tree fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for source and replica directories

pub mod tree;

pub use tree::TestTree;
