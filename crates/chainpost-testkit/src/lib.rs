//! # Chainpost Testkit
//!
//! Shared testing utilities for the chainpost crates.
//!
//! ## Contents
//!
//! - [`FlakyMedium`] - wraps any medium and cuts it off after a call
//!   budget, for exercising mid-append failures
//! - [`generators`] - proptest strategies for payload lines and text
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainpost_medium::MemoryMedium;
//! use chainpost_testkit::FlakyMedium;
//!
//! let inner = Arc::new(MemoryMedium::with_containers(&[1]));
//! // Three calls succeed, everything after fails.
//! let flaky = FlakyMedium::failing_after(inner, 3);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::FlakyMedium;
