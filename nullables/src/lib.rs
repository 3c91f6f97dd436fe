//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the verification pipeline (record storage,
//! the text-extraction collaborator, telemetry) are abstracted behind traits.
//! This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or spawn processes
//!
//! Usage: swap real implementations for nullables in tests.

pub mod observer;
pub mod store;
pub mod text_source;

pub use observer::{ObservedEvent, RecordingObserver};
pub use store::NullRecordStore;
pub use text_source::NullTextSource;
