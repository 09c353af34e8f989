//! Per-variant lead schemas.

use crate::fields::{BooleanField, CharField, ChoiceField, EmailField};
use crate::form::Form;
use indexmap::IndexMap;
use leadbox_core::{LeadVariant, NewLead, PreferredTime};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const NAME_MIN_LENGTH: usize = 2;
const SHORT_TEXT_MAX_LENGTH: usize = 200;
const PHONE_MAX_LENGTH: usize = 40;
const MESSAGE_MAX_LENGTH: usize = 5000;

/// Field errors keyed by the client's field name, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
	pub fn contains(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.0.get(field).map(Vec::as_slice)
	}

	pub fn fields(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<IndexMap<String, Vec<String>>> for FieldErrors {
	fn from(errors: IndexMap<String, Vec<String>>) -> Self {
		Self(errors)
	}
}

/// The closed schema for one [`LeadVariant`].
///
/// # Examples
///
/// ```
/// use leadbox_core::{LeadVariant, PreferredTime};
/// use leadbox_forms::LeadForm;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let payload = HashMap::from([
///     ("name".to_string(), json!("Jo")),
///     ("email".to_string(), json!("jo@example.com")),
///     ("preferredTime".to_string(), json!("Morning")),
/// ]);
///
/// let lead = LeadForm::for_variant(LeadVariant::Waitlist).clean(payload).unwrap();
/// assert_eq!(lead.service, "Waitlist");
/// assert_eq!(lead.preferred_time, Some(PreferredTime::Morning));
/// assert!(lead.wants_updates);
/// ```
pub struct LeadForm {
	variant: LeadVariant,
	form: Form,
}

impl LeadForm {
	pub fn for_variant(variant: LeadVariant) -> Self {
		let mut form = Form::new()
			.with_field(
				CharField::new("name")
					.required()
					.with_min_length(NAME_MIN_LENGTH)
					.with_label("Name"),
			)
			.with_field(EmailField::new("email").required().with_label("Email"));

		match variant {
			LeadVariant::Contact => {
				form = form
					.with_field(company())
					.with_field(phone())
					.with_field(message())
					.with_field(
						CharField::new("service")
							.with_max_length(SHORT_TEXT_MAX_LENGTH)
							.with_label("Service"),
					)
					.with_field(wants_updates(variant));
			}
			LeadVariant::Waitlist => {
				form = form
					.with_field(
						CharField::new("courseType")
							.with_max_length(SHORT_TEXT_MAX_LENGTH)
							.with_label("Course"),
					)
					.with_field(
						CharField::new("sessionId")
							.with_max_length(SHORT_TEXT_MAX_LENGTH)
							.with_label("Session"),
					)
					.with_field(
						ChoiceField::new("preferredTime", PreferredTime::ALL.map(|t| t.as_str()))
							.required()
							.with_label("Preferred time"),
					)
					.with_field(
						BooleanField::new("notify")
							.with_default(variant.default_wants_updates())
							.with_label("Notify me"),
					);
			}
			LeadVariant::ToolkitDownload | LeadVariant::GuideRequest => {
				form = form
					.with_field(company())
					.with_field(
						CharField::new("resource")
							.with_max_length(SHORT_TEXT_MAX_LENGTH)
							.with_label("Resource"),
					)
					.with_field(wants_updates(variant));
			}
			LeadVariant::AffiliateSignup => {
				form = form
					.with_field(company())
					.with_field(phone())
					.with_field(message())
					.with_field(wants_updates(variant));
			}
		}

		Self { variant, form }
	}

	pub fn variant(&self) -> LeadVariant {
		self.variant
	}

	/// Names of the fields accepted by this schema.
	pub fn field_names(&self) -> Vec<&str> {
		self.form.fields().iter().map(|f| f.name()).collect()
	}

	/// Validate a raw payload into a [`NewLead`].
	///
	/// Keys may be camelCase or snake_case. Unknown keys are ignored.
	pub fn clean(mut self, payload: HashMap<String, Value>) -> Result<NewLead, FieldErrors> {
		self.form.bind(normalize_keys(payload));
		if !self.form.is_valid() {
			return Err(FieldErrors(self.form.errors().clone()));
		}

		let data = self.form.cleaned_data();
		let name = text(data, "name").unwrap_or_default();
		let email = text(data, "email").unwrap_or_default();
		let service = text(data, "service")
			.unwrap_or_else(|| self.variant.default_service().to_string());

		let mut lead = NewLead::new(name, email, service);
		lead.company = text(data, "company");
		lead.phone = text(data, "phone");
		lead.message = text(data, "message");
		lead.resource = text(data, "resource");
		lead.course_type = text(data, "courseType");
		lead.session_id = text(data, "sessionId");
		lead.preferred_time = text(data, "preferredTime").and_then(|t| t.parse().ok());
		lead.wants_updates = flag(data, "wantsUpdates")
			.or_else(|| flag(data, "notify"))
			.unwrap_or(self.variant.default_wants_updates());

		Ok(lead)
	}
}

fn company() -> CharField {
	CharField::new("company")
		.with_max_length(SHORT_TEXT_MAX_LENGTH)
		.with_label("Company")
}

fn phone() -> CharField {
	CharField::new("phone")
		.with_max_length(PHONE_MAX_LENGTH)
		.with_label("Phone")
}

fn message() -> CharField {
	CharField::new("message")
		.with_max_length(MESSAGE_MAX_LENGTH)
		.with_label("Message")
}

fn wants_updates(variant: LeadVariant) -> BooleanField {
	BooleanField::new("wantsUpdates")
		.with_default(variant.default_wants_updates())
		.with_label("Send me updates")
}

fn text(data: &IndexMap<String, Value>, key: &str) -> Option<String> {
	data.get(key).and_then(Value::as_str).map(str::to_string)
}

fn flag(data: &IndexMap<String, Value>, key: &str) -> Option<bool> {
	data.get(key).and_then(Value::as_bool)
}

/// Adds camelCase copies of snake_case keys unless the camelCase key is present.
fn normalize_keys(payload: HashMap<String, Value>) -> HashMap<String, Value> {
	let mut normalized = HashMap::with_capacity(payload.len());
	let mut snake = Vec::new();

	for (key, value) in payload {
		if key.contains('_') {
			snake.push((key, value));
		} else {
			normalized.insert(key, value);
		}
	}

	for (key, value) in snake {
		normalized.entry(to_camel_case(&key)).or_insert(value);
	}

	normalized
}

fn to_camel_case(key: &str) -> String {
	let mut out = String::with_capacity(key.len());
	let mut upper = false;
	for c in key.chars() {
		if c == '_' {
			upper = !out.is_empty();
		} else if upper {
			out.extend(c.to_uppercase());
			upper = false;
		} else {
			out.push(c);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn payload(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	#[rstest]
	fn test_waitlist_end_to_end_payload() {
		// Arrange
		let form = LeadForm::for_variant(LeadVariant::Waitlist);
		let data = payload(&[
			("name", json!(" Jo ")),
			("email", json!(" jo@example.com")),
			("preferredTime", json!("Morning")),
			("courseType", json!("AI Foundations")),
			("sessionId", json!("2026-11-03")),
			("notify", json!("off")),
		]);

		// Act
		let lead = form.clean(data).unwrap();

		// Assert
		assert_eq!(lead.name, "Jo");
		assert_eq!(lead.email, "jo@example.com");
		assert_eq!(lead.service, "Waitlist");
		assert_eq!(lead.preferred_time, Some(PreferredTime::Morning));
		assert_eq!(lead.course_type.as_deref(), Some("AI Foundations"));
		assert_eq!(lead.session_id.as_deref(), Some("2026-11-03"));
		assert!(!lead.wants_updates);
	}

	#[rstest]
	fn test_invalid_name_and_email_both_reported() {
		let form = LeadForm::for_variant(LeadVariant::Contact);

		let errors = form
			.clean(payload(&[("name", json!("J")), ("email", json!("not-an-email"))]))
			.unwrap_err();

		assert!(errors.contains("name"));
		assert!(errors.contains("email"));
		assert_eq!(errors.len(), 2);
	}

	#[rstest]
	#[case(101)]
	#[case(1000)]
	fn test_long_names_are_accepted(#[case] length: usize) {
		// Arrange
		let name = "A".repeat(length);
		let form = LeadForm::for_variant(LeadVariant::Contact);

		// Act
		let lead = form
			.clean(payload(&[("name", json!(name)), ("email", json!("jo@example.com"))]))
			.unwrap();

		// Assert
		assert_eq!(lead.name.chars().count(), length);
	}

	#[rstest]
	fn test_waitlist_requires_preferred_time() {
		let form = LeadForm::for_variant(LeadVariant::Waitlist);

		let errors = form
			.clean(payload(&[
				("name", json!("Jo")),
				("email", json!("jo@example.com")),
				("preferredTime", json!("Midnight")),
			]))
			.unwrap_err();

		assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["preferredTime"]);
	}

	#[rstest]
	#[case(LeadVariant::Contact, "Consultation Request", false)]
	#[case(LeadVariant::ToolkitDownload, "Toolkit Download", true)]
	#[case(LeadVariant::GuideRequest, "Guide Request", true)]
	#[case(LeadVariant::AffiliateSignup, "Affiliate Signup", false)]
	fn test_variant_defaults(
		#[case] variant: LeadVariant,
		#[case] service: &str,
		#[case] wants_updates: bool,
	) {
		let lead = LeadForm::for_variant(variant)
			.clean(payload(&[("name", json!("Jo")), ("email", json!("jo@example.com"))]))
			.unwrap();

		assert_eq!(lead.service, service);
		assert_eq!(lead.wants_updates, wants_updates);
	}

	#[rstest]
	fn test_contact_service_override_and_optional_blanks() {
		let lead = LeadForm::for_variant(LeadVariant::Contact)
			.clean(payload(&[
				("name", json!("Jo")),
				("email", json!("jo@example.com")),
				("service", json!("AI Strategy")),
				("company", json!("")),
				("phone", json!("  ")),
				("message", json!("Hello there")),
			]))
			.unwrap();

		assert_eq!(lead.service, "AI Strategy");
		assert_eq!(lead.company, None);
		assert_eq!(lead.phone, None);
		assert_eq!(lead.message.as_deref(), Some("Hello there"));
	}

	#[rstest]
	fn test_snake_case_keys_are_accepted() {
		let lead = LeadForm::for_variant(LeadVariant::Waitlist)
			.clean(payload(&[
				("name", json!("Jo")),
				("email", json!("jo@example.com")),
				("preferred_time", json!("Evening")),
				("course_type", json!("Workshop")),
			]))
			.unwrap();

		assert_eq!(lead.preferred_time, Some(PreferredTime::Evening));
		assert_eq!(lead.course_type.as_deref(), Some("Workshop"));
	}

	#[rstest]
	fn test_camel_case_key_wins_over_snake_case() {
		let lead = LeadForm::for_variant(LeadVariant::Contact)
			.clean(payload(&[
				("name", json!("Jo")),
				("email", json!("jo@example.com")),
				("wantsUpdates", json!(true)),
				("wants_updates", json!(false)),
			]))
			.unwrap();

		assert!(lead.wants_updates);
	}

	#[rstest]
	#[case("preferred_time", "preferredTime")]
	#[case("wants_updates", "wantsUpdates")]
	#[case("_private", "private")]
	#[case("name", "name")]
	fn test_to_camel_case(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(to_camel_case(input), expected);
	}

	#[rstest]
	fn test_field_names_per_variant() {
		let form = LeadForm::for_variant(LeadVariant::ToolkitDownload);
		let names = form.field_names();
		assert_eq!(names, vec!["name", "email", "company", "resource", "wantsUpdates"]);
	}
}
