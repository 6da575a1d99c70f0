//! Utility Functions
//!
//! ## Error Formatting
//!
//! The [`errors`] module renders errors for people rather than logs:
//!
//! ```rust,ignore
//! use gaze_pointer::utils::format_user_error;
//!
//! if let Err(e) = run(args) {
//!     eprintln!("{}", format_user_error(&e));
//! }
//! ```
//!
//! Error categories with context-aware help:
//! - Config errors → file location, TOML syntax, invalid values
//! - Frame recording errors → JSON-lines layout, timestamps
//! - Actuation errors → the actuation thread stopped

pub mod errors;

pub use errors::format_user_error;
