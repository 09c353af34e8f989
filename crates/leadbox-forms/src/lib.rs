//! Form processing and validation for lead submissions
//!
//! Submissions arrive as untyped key/value payloads. A [`Form`] binds such a
//! payload to a list of typed fields, cleans every field and collects all
//! field errors at once. [`LeadForm`] builds the closed schema for each
//! [`LeadVariant`](leadbox_core::LeadVariant) and turns a valid payload into a
//! [`NewLead`](leadbox_core::NewLead).

pub mod field;
pub mod fields;
pub mod form;
pub mod lead_form;

pub use field::{FieldError, FieldResult, FormField};
pub use fields::{BooleanField, CharField, ChoiceField, EmailField};
pub use form::Form;
pub use lead_form::{FieldErrors, LeadForm};
