//! Boolean field with lenient coercion of checkbox-style inputs

use crate::field::{FieldError, FieldResult, FormField};
use serde_json::Value;

const TRUE_VALUES: [&str; 4] = ["true", "on", "1", "yes"];
const FALSE_VALUES: [&str; 4] = ["false", "off", "0", "no"];

/// Boolean field.
///
/// Accepts JSON booleans, the numbers 0 and 1, and the strings
/// `true/false`, `on/off`, `1/0` and `yes/no` (case-insensitive). An absent,
/// null or blank value cleans to the field's default.
#[derive(Debug, Clone)]
pub struct BooleanField {
	pub name: String,
	pub label: Option<String>,
	pub default: bool,
}

impl BooleanField {
	/// # Examples
	///
	/// ```
	/// use leadbox_forms::{BooleanField, FormField};
	/// use serde_json::json;
	///
	/// let field = BooleanField::new("notify").with_default(true);
	/// assert_eq!(field.clean(None).unwrap(), json!(true));
	/// assert_eq!(field.clean(Some(&json!("off"))).unwrap(), json!(false));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			default: false,
		}
	}
	pub fn with_default(mut self, default: bool) -> Self {
		self.default = default;
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

impl FormField for BooleanField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		false
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let coerced = match value {
			None | Some(Value::Null) => self.default,
			Some(Value::Bool(b)) => *b,
			Some(Value::Number(n)) => match n.as_i64() {
				Some(0) => false,
				Some(1) => true,
				_ => return Err(invalid(&n.to_string())),
			},
			Some(Value::String(s)) => {
				let s = s.trim().to_ascii_lowercase();
				if s.is_empty() {
					self.default
				} else if TRUE_VALUES.contains(&s.as_str()) {
					true
				} else if FALSE_VALUES.contains(&s.as_str()) {
					false
				} else {
					return Err(invalid(&s));
				}
			}
			Some(other) => return Err(invalid(&other.to_string())),
		};

		Ok(Value::Bool(coerced))
	}
}

fn invalid(value: &str) -> FieldError {
	FieldError::Validation(format!("'{}' is not a valid boolean value.", value))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(true), true)]
	#[case(json!(false), false)]
	#[case(json!("on"), true)]
	#[case(json!("YES"), true)]
	#[case(json!("0"), false)]
	#[case(json!(1), true)]
	#[case(json!(""), false)]
	fn test_boolean_coercion(#[case] input: Value, #[case] expected: bool) {
		let field = BooleanField::new("wantsUpdates");
		assert_eq!(field.clean(Some(&input)), Ok(Value::Bool(expected)));
	}

	#[rstest]
	fn test_absent_uses_default() {
		assert_eq!(BooleanField::new("a").clean(None), Ok(json!(false)));
		assert_eq!(
			BooleanField::new("a").with_default(true).clean(None),
			Ok(json!(true))
		);
	}

	#[rstest]
	#[case(json!("maybe"))]
	#[case(json!(2))]
	#[case(json!([true]))]
	fn test_garbage_rejected(#[case] input: Value) {
		assert!(BooleanField::new("a").clean(Some(&input)).is_err());
	}
}
