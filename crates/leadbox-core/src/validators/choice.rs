//! Closed-set validator.

use super::{ValidationError, ValidationResult, Validator};

/// Accepts only values from a fixed set. Matching is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
	choices: Vec<String>,
}

impl ChoiceValidator {
	/// # Examples
	///
	/// ```
	/// use leadbox_core::validators::{ChoiceValidator, Validator};
	///
	/// let validator = ChoiceValidator::new(["Morning", "Evening"]);
	/// assert!(validator.validate("Morning").is_ok());
	/// assert!(validator.validate("morning").is_err());
	/// ```
	pub fn new<I, S>(choices: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			choices: choices.into_iter().map(Into::into).collect(),
		}
	}

	pub fn choices(&self) -> &[String] {
		&self.choices
	}
}

impl Validator<str> for ChoiceValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if self.choices.iter().any(|c| c == value) {
			Ok(())
		} else {
			Err(ValidationError::InvalidChoice {
				value: value.to_string(),
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_choice_rejects_unknown_value() {
		let validator = ChoiceValidator::new(["Morning", "Afternoon"]);

		let err = validator.validate("Midnight").unwrap_err();

		assert_eq!(
			err.to_string(),
			"Select a valid choice. Midnight is not one of the available choices."
		);
	}

	#[test]
	fn test_choice_is_case_sensitive() {
		let validator = ChoiceValidator::new(["Morning"]);
		assert!(validator.validate("Morning").is_ok());
		assert!(validator.validate("MORNING").is_err());
	}
}
