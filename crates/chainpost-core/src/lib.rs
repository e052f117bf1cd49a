//! # Chainpost Core
//!
//! Core primitives for chainpost: chains of fixed-capacity records inside a
//! size-limited messaging medium.
//!
//! ## Overview
//!
//! A logical dataset is stored as a singly linked chain of records. Every
//! record body is text: the first line names the next record in the chain
//! (`"0 0"` is the terminal sentinel) and the remaining lines are payload
//! fragments produced by a codec. This crate owns the pieces that need no
//! I/O at all:
//!
//! - [`RecordPointer`] - immutable location handle for one record
//! - [`wire`] - header and body format, plus the size ceilings
//! - [`pack`] - the pure packing planner that turns payload lines into
//!   record-sized sections
//! - [`CoreError`] - errors for malformed headers and oversize payloads
//!
//! Keeping packing pure means the append algorithm can be unit-tested
//! without a medium; the engine feeds the plan to the medium in a separate
//! mutation phase.

pub mod error;
pub mod pack;
pub mod pointer;
pub mod wire;

pub use error::CoreError;
pub use pointer::RecordPointer;
pub use wire::{units, MAX_HEADER_UNITS, MAX_LINE_UNITS, MAX_RECORD_UNITS};
