//! Field validators for lead submissions.

pub mod choice;
pub mod email;
pub mod errors;
pub mod string;

pub use choice::ChoiceValidator;
pub use email::EmailValidator;
pub use errors::{ValidationError, ValidationResult};
pub use string::{MaxLengthValidator, MinLengthValidator};

/// Trait for validators
pub trait Validator<T: ?Sized> {
	fn validate(&self, value: &T) -> ValidationResult<()>;
}
