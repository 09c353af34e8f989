//! String length validators
//!
//! Lengths are counted in characters, not bytes, so "Jö" has length 2.

use super::{ValidationError, ValidationResult, Validator};

/// Minimum length validator
#[derive(Debug, Clone, Copy)]
pub struct MinLengthValidator {
	min: usize,
}

impl MinLengthValidator {
	/// Creates a new MinLengthValidator with the specified minimum length.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_core::validators::{MinLengthValidator, Validator};
	///
	/// let validator = MinLengthValidator::new(2);
	/// assert!(validator.validate("Jo").is_ok());
	/// assert!(validator.validate("J").is_err());
	/// ```
	pub fn new(min: usize) -> Self {
		Self { min }
	}

	pub fn min(&self) -> usize {
		self.min
	}
}

impl Validator<str> for MinLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let length = value.chars().count();
		if length >= self.min {
			Ok(())
		} else {
			Err(ValidationError::TooShort {
				length,
				min: self.min,
			})
		}
	}
}

impl Validator<String> for MinLengthValidator {
	fn validate(&self, value: &String) -> ValidationResult<()> {
		Validator::<str>::validate(self, value.as_str())
	}
}

/// Maximum length validator
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthValidator {
	max: usize,
}

impl MaxLengthValidator {
	/// Creates a new MaxLengthValidator with the specified maximum length.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_core::validators::{MaxLengthValidator, Validator};
	///
	/// let validator = MaxLengthValidator::new(5);
	/// assert!(validator.validate("hello").is_ok());
	/// assert!(validator.validate("hello!").is_err());
	/// ```
	pub fn new(max: usize) -> Self {
		Self { max }
	}

	pub fn max(&self) -> usize {
		self.max
	}
}

impl Validator<str> for MaxLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let length = value.chars().count();
		if length <= self.max {
			Ok(())
		} else {
			Err(ValidationError::TooLong {
				length,
				max: self.max,
			})
		}
	}
}

impl Validator<String> for MaxLengthValidator {
	fn validate(&self, value: &String) -> ValidationResult<()> {
		Validator::<str>::validate(self, value.as_str())
	}
}
