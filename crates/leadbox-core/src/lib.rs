//! Core types for leadbox
//!
//! This crate holds the pieces every other leadbox crate depends on:
//!
//! - [`exception`]: the request-level error taxonomy and its HTTP status mapping
//! - [`validators`]: field validators used by the intake forms
//! - [`lead`]: the lead data model (submission variants, new and stored records)

pub mod exception;
pub mod lead;
pub mod validators;

pub use exception::{Error, Result};
pub use lead::{LeadVariant, NewLead, PreferredTime, StoredLead, UnknownChoice};
pub use validators::{ValidationError, ValidationResult, Validator};
