//! Lead data model.
//!
//! A lead starts life as a [`NewLead`] produced by a validated form and
//! becomes a [`StoredLead`] once storage has assigned it an id and a
//! creation timestamp. Stored leads are never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing a closed-set tag fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownChoice {
	pub kind: &'static str,
	pub value: String,
}

/// The kind of form that produced a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadVariant {
	Contact,
	Waitlist,
	#[serde(rename = "toolkit")]
	ToolkitDownload,
	#[serde(rename = "guide")]
	GuideRequest,
	#[serde(rename = "affiliate")]
	AffiliateSignup,
}

impl LeadVariant {
	pub const ALL: [LeadVariant; 5] = [
		LeadVariant::Contact,
		LeadVariant::Waitlist,
		LeadVariant::ToolkitDownload,
		LeadVariant::GuideRequest,
		LeadVariant::AffiliateSignup,
	];

	/// Tag used in intake URLs (`/api/leads/{tag}`).
	pub fn tag(&self) -> &'static str {
		match self {
			LeadVariant::Contact => "contact",
			LeadVariant::Waitlist => "waitlist",
			LeadVariant::ToolkitDownload => "toolkit",
			LeadVariant::GuideRequest => "guide",
			LeadVariant::AffiliateSignup => "affiliate",
		}
	}

	/// Service-interest tag stored on leads from this variant.
	///
	/// Contact submissions may override this with a visitor-selected service.
	pub fn default_service(&self) -> &'static str {
		match self {
			LeadVariant::Contact => "Consultation Request",
			LeadVariant::Waitlist => "Waitlist",
			LeadVariant::ToolkitDownload => "Toolkit Download",
			LeadVariant::GuideRequest => "Guide Request",
			LeadVariant::AffiliateSignup => "Affiliate Signup",
		}
	}

	/// Value of `wants_updates` when the payload does not say.
	pub fn default_wants_updates(&self) -> bool {
		matches!(
			self,
			LeadVariant::Waitlist | LeadVariant::ToolkitDownload | LeadVariant::GuideRequest
		)
	}
}

impl fmt::Display for LeadVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

impl FromStr for LeadVariant {
	type Err = UnknownChoice;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		LeadVariant::ALL
			.into_iter()
			.find(|v| v.tag() == s)
			.ok_or_else(|| UnknownChoice {
				kind: "lead variant",
				value: s.to_string(),
			})
	}
}

/// Preferred session time offered on the waitlist form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredTime {
	Morning,
	Afternoon,
	Evening,
}

impl PreferredTime {
	pub const ALL: [PreferredTime; 3] = [
		PreferredTime::Morning,
		PreferredTime::Afternoon,
		PreferredTime::Evening,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			PreferredTime::Morning => "Morning",
			PreferredTime::Afternoon => "Afternoon",
			PreferredTime::Evening => "Evening",
		}
	}
}

impl fmt::Display for PreferredTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PreferredTime {
	type Err = UnknownChoice;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		PreferredTime::ALL
			.into_iter()
			.find(|t| t.as_str() == s)
			.ok_or_else(|| UnknownChoice {
				kind: "preferred time",
				value: s.to_string(),
			})
	}
}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
	pub name: String,
	pub email: String,
	pub company: Option<String>,
	pub phone: Option<String>,
	pub message: Option<String>,
	pub service: String,
	pub wants_updates: bool,
	pub resource: Option<String>,
	pub course_type: Option<String>,
	pub session_id: Option<String>,
	pub preferred_time: Option<PreferredTime>,
}

impl NewLead {
	/// Creates a lead with only the required fields set.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_core::NewLead;
	///
	/// let lead = NewLead::new("Jo", "jo@example.com", "Waitlist");
	/// assert_eq!(lead.service, "Waitlist");
	/// assert!(lead.company.is_none());
	/// ```
	pub fn new(
		name: impl Into<String>,
		email: impl Into<String>,
		service: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			email: email.into(),
			company: None,
			phone: None,
			message: None,
			service: service.into(),
			wants_updates: false,
			resource: None,
			course_type: None,
			session_id: None,
			preferred_time: None,
		}
	}

	pub fn with_company(mut self, company: impl Into<String>) -> Self {
		self.company = Some(company.into());
		self
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn with_wants_updates(mut self, wants_updates: bool) -> Self {
		self.wants_updates = wants_updates;
		self
	}

	pub fn with_preferred_time(mut self, preferred_time: PreferredTime) -> Self {
		self.preferred_time = Some(preferred_time);
		self
	}
}

/// A lead as persisted, with its storage-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLead {
	pub id: i64,
	pub name: String,
	pub email: String,
	pub company: Option<String>,
	pub phone: Option<String>,
	pub message: Option<String>,
	pub service: String,
	pub wants_updates: bool,
	pub resource: Option<String>,
	pub course_type: Option<String>,
	pub session_id: Option<String>,
	pub preferred_time: Option<PreferredTime>,
	pub created_at: DateTime<Utc>,
}

impl StoredLead {
	/// Attaches storage identity to a new lead.
	pub fn from_new(id: i64, created_at: DateTime<Utc>, lead: NewLead) -> Self {
		Self {
			id,
			name: lead.name,
			email: lead.email,
			company: lead.company,
			phone: lead.phone,
			message: lead.message,
			service: lead.service,
			wants_updates: lead.wants_updates,
			resource: lead.resource,
			course_type: lead.course_type,
			session_id: lead.session_id,
			preferred_time: lead.preferred_time,
			created_at,
		}
	}
}
