//! # callmap-error
//!
//! Unified error handling for callmap.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., FocusInvalid, IoFailed)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use callmap_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::FileNotFound, "cannot open output")
//!         .with_operation("writer::run")
//!         .with_context("path", "graph.dot"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible functions return `Result<T, callmap_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using callmap Error
pub type Result<T> = std::result::Result<T, Error>;
