//! Choice field backed by a closed set of values

use crate::field::{FieldError, FieldResult, FormField, raw_str};
use leadbox_core::validators::{ChoiceValidator, Validator};

#[derive(Debug, Clone)]
pub struct ChoiceField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	validator: ChoiceValidator,
}

impl ChoiceField {
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::{ChoiceField, FormField};
	/// use serde_json::json;
	///
	/// let field = ChoiceField::new("preferredTime", ["Morning", "Evening"]).required();
	/// assert!(field.clean(Some(&json!("Morning"))).is_ok());
	/// assert!(field.clean(Some(&json!("Noon"))).is_err());
	/// ```
	pub fn new<I, S>(name: impl Into<String>, choices: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			label: None,
			required: false,
			validator: ChoiceValidator::new(choices),
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
	pub fn choices(&self) -> &[String] {
		self.validator.choices()
	}
}

impl FormField for ChoiceField {
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
		let choice = raw.trim();

		if choice.is_empty() {
			if self.required {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Ok(serde_json::Value::Null);
		}

		self.validator.validate(choice)?;
		Ok(serde_json::Value::String(choice.to_string()))
	}
}
