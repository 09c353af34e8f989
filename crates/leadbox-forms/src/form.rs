use crate::field::FormField;
use indexmap::IndexMap;
use std::collections::HashMap;

/// A set of fields bound to one submitted payload.
///
/// Validation visits every field, so the error map names all failing fields
/// rather than only the first one. Errors keep field declaration order.
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	data: HashMap<String, serde_json::Value>,
	cleaned: IndexMap<String, serde_json::Value>,
	errors: IndexMap<String, Vec<String>>,
	is_bound: bool,
}

impl Form {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::Form;
	///
	/// let form = Form::new();
	/// assert!(!form.is_bound());
	/// assert!(form.fields().is_empty());
	/// ```
	pub fn new() -> Self {
		Self {
			fields: vec![],
			data: HashMap::new(),
			cleaned: IndexMap::new(),
			errors: IndexMap::new(),
			is_bound: false,
		}
	}
	/// Add a field to the form
	pub fn add_field(&mut self, field: Box<dyn FormField>) {
		self.fields.push(field);
	}
	/// Builder-style [`Form::add_field`].
	pub fn with_field(mut self, field: impl FormField + 'static) -> Self {
		self.add_field(Box::new(field));
		self
	}
	pub fn fields(&self) -> &[Box<dyn FormField>] {
		&self.fields
	}
	/// Bind form data for validation. Rebinding discards earlier results.
	pub fn bind(&mut self, data: HashMap<String, serde_json::Value>) {
		self.data = data;
		self.cleaned.clear();
		self.errors.clear();
		self.is_bound = true;
	}
	pub fn is_bound(&self) -> bool {
		self.is_bound
	}
	/// Validate the form and return true if all fields are valid
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::{CharField, EmailField, Form};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut form = Form::new()
	///     .with_field(CharField::new("name").required().with_min_length(2))
	///     .with_field(EmailField::new("email").required());
	///
	/// let mut data = HashMap::new();
	/// data.insert("name".to_string(), json!("J"));
	/// data.insert("email".to_string(), json!("not-an-email"));
	/// form.bind(data);
	///
	/// assert!(!form.is_valid());
	/// assert_eq!(form.errors().len(), 2);
	/// ```
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}

		self.cleaned.clear();
		self.errors.clear();

		for field in &self.fields {
			let value = self.data.get(field.name());

			match field.clean(value) {
				Ok(cleaned) => {
					self.cleaned.insert(field.name().to_string(), cleaned);
				}
				Err(e) => {
					self.errors
						.entry(field.name().to_string())
						.or_default()
						.push(e.to_string());
				}
			}
		}

		self.errors.is_empty()
	}
	/// Cleaned values of the fields that passed validation.
	pub fn cleaned_data(&self) -> &IndexMap<String, serde_json::Value> {
		&self.cleaned
	}
	pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
		&self.errors
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}
