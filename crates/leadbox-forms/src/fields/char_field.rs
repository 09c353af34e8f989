//! Character field for text input

use crate::field::{FieldError, FieldResult, FormField, raw_str};
use leadbox_core::validators::{MaxLengthValidator, MinLengthValidator, Validator};

/// Character field with length validation
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
	pub strip: bool,
}

impl CharField {
	/// Create a new CharField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::CharField;
	///
	/// let field = CharField::new("company");
	/// assert_eq!(field.name, "company");
	/// assert!(!field.required);
	/// assert!(field.strip);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			max_length: None,
			min_length: None,
			strip: true,
		}
	}
	/// Set the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	/// Set the maximum length for the field
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}
	/// Set the minimum length for the field
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::CharField;
	///
	/// let field = CharField::new("name").with_min_length(2);
	/// assert_eq!(field.min_length, Some(2));
	/// ```
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
	/// Disable whitespace stripping for the field
	pub fn no_strip(mut self) -> Self {
		self.strip = false;
		self
	}
}

impl FormField for CharField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value> {
		let raw = raw_str(value)?.unwrap_or_default();
		let processed = if self.strip { raw.trim() } else { raw.as_str() };

		if processed.is_empty() {
			if self.required {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Ok(serde_json::Value::Null);
		}

		if let Some(max_length) = self.max_length {
			MaxLengthValidator::new(max_length).validate(processed)?;
		}
		if let Some(min_length) = self.min_length {
			MinLengthValidator::new(min_length).validate(processed)?;
		}

		Ok(serde_json::Value::String(processed.to_string()))
	}
}
