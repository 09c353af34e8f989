//! Email field

use crate::field::{FieldError, FieldResult, FormField, raw_str};
use leadbox_core::validators::{EmailValidator, MaxLengthValidator, Validator};

/// Longest address accepted, per RFC 5321 path limits.
const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Clone)]
pub struct EmailField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
}

impl EmailField {
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::{EmailField, FormField};
	/// use serde_json::json;
	///
	/// let field = EmailField::new("email").required();
	/// assert_eq!(field.clean(Some(&json!(" jo@example.com "))).unwrap(), json!("jo@example.com"));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
		}
	}
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

impl FormField for EmailField {
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
		let email = raw.trim();

		if email.is_empty() {
			if self.required {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Ok(serde_json::Value::Null);
		}

		MaxLengthValidator::new(MAX_EMAIL_LENGTH).validate(email)?;
		EmailValidator::new().validate(email)?;

		Ok(serde_json::Value::String(email.to_string()))
	}
}
