//! Email address validator.

use super::{ValidationError, ValidationResult, Validator};
use validator::ValidateEmail;

/// Validates email-address syntax.
///
/// Syntax checking is delegated to the `validator` crate (HTML5 grammar).
/// On top of that the domain must contain at least one dot, so intranet-style
/// addresses such as `admin@localhost` are rejected for public forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator {
	allow_dotless_domain: bool,
}

impl EmailValidator {
	/// # Examples
	///
	/// ```
	/// use leadbox_core::validators::{EmailValidator, Validator};
	///
	/// let validator = EmailValidator::new();
	/// assert!(validator.validate("jo@example.com").is_ok());
	/// assert!(validator.validate("not-an-email").is_err());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Accept domains without a dot (`user@localhost`).
	pub fn allow_dotless_domain(mut self) -> Self {
		self.allow_dotless_domain = true;
		self
	}
}

impl Validator<str> for EmailValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if !value.validate_email() {
			return Err(ValidationError::InvalidEmail(value.to_string()));
		}

		if !self.allow_dotless_domain {
			let domain = value.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
			let dotted = domain
				.split('.')
				.filter(|label| !label.is_empty())
				.count() >= 2;
			if !dotted {
				return Err(ValidationError::InvalidEmail(value.to_string()));
			}
		}

		Ok(())
	}
}

impl Validator<String> for EmailValidator {
	fn validate(&self, value: &String) -> ValidationResult<()> {
		Validator::<str>::validate(self, value.as_str())
	}
}
