//! Core types shared across the Strata compiler pipeline.
//!
//! This crate provides the fundamental values that every other Strata crate
//! passes around: source files, byte spans and cancellation tokens.

mod cancel;
mod source;
mod span;

pub use cancel::{CancelToken, Interrupt};
pub use source::{LineCol, SourceError, SourceFile};
pub use span::Span;
