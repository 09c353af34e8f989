use leadbox_core::ValidationError;

/// Error produced while cleaning a single field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("This field is required.")]
	Required(String),
	#[error("{0}")]
	Validation(String),
}

impl From<ValidationError> for FieldError {
	fn from(err: ValidationError) -> Self {
		FieldError::Validation(err.to_string())
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// A typed form field.
///
/// `clean` receives the raw value for the field's key (or `None` when the key
/// is absent) and returns the normalized value. Blank optional values clean to
/// `Value::Null`.
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;
	fn label(&self) -> Option<&str>;
	fn required(&self) -> bool;
	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value>;
}

/// Extracts a string from a raw payload value.
///
/// Absent and `null` values are `None`. Numbers are accepted and rendered as
/// text since JSON clients sometimes send phone numbers unquoted.
pub(crate) fn raw_str(value: Option<&serde_json::Value>) -> FieldResult<Option<String>> {
	match value {
		None | Some(serde_json::Value::Null) => Ok(None),
		Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
		Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
		Some(_) => Err(FieldError::Validation(
			"Value must be a string".to_string(),
		)),
	}
}
