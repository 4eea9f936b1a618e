//! mdel-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the foundation types shared by every phase of the
//! machine-description elaboration pipeline:
//!
//! 1. SOURCE LOCATIONS (Span)
//!    Byte ranges with the line/column of their start, attached to tokens
//!    and carried into error values so failures can point at the input.
//!
//! 2. DIAGNOSTICS (Diagnostic, Level, Handler)
//!    Non-fatal findings are collected in a `Handler` instead of aborting
//!    the run. Fatal conditions travel as `Result` values through the
//!    phase crates; the handler exists for the recoverable ones -
//!    malformed iterator definitions, attribute lookups that fall back to
//!    identity - so partial output stays inspectable.
//!
//! 3. COLLECTIONS
//!    Re-exports of the hash types used across the workspace. Ordered
//!    maps (`indexmap`) appear wherever insertion order is part of the
//!    semantics, such as registry tables and the expansion odometer.

mod diagnostic;
mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::Span;

// Re-export commonly used types
pub use indexmap::IndexMap;
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
