//! Admin bearer tokens
//!
//! Tokens are stateless: `{issued_at}.{hex(hmac)}`, where the HMAC-SHA256 is
//! keyed with the service secret and covers the issue time plus a digest of
//! the admin password. Rotating either the secret or the password therefore
//! invalidates every outstanding token.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use leadbox_core::Error;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(12);

/// Tolerated clock skew for tokens issued "in the future".
const MAX_CLOCK_SKEW: Duration = Duration::seconds(60);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
	#[error("Authentication credentials were not provided")]
	MissingCredential,
	#[error("Invalid credentials")]
	InvalidCredential,
	#[error("Token has expired")]
	Expired,
	#[error("Admin access is not configured")]
	Disabled,
}

impl From<AuthError> for Error {
	fn from(error: AuthError) -> Self {
		Error::Authentication(error.to_string())
	}
}

/// Issues and verifies admin tokens.
///
/// ```
/// use leadbox_admin::AdminGate;
///
/// let gate = AdminGate::new("a-secret-key-of-at-least-32-characters", Some("hunter22".into()));
/// let token = gate.login("hunter22").unwrap();
///
/// assert!(gate.verify(Some(&token)).is_ok());
/// assert!(gate.login("wrong").is_err());
/// ```
#[derive(Clone)]
pub struct AdminGate {
	secret_key: Vec<u8>,
	password_digest: Option<[u8; 32]>,
	ttl: Duration,
}

impl std::fmt::Debug for AdminGate {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdminGate")
			.field("enabled", &self.password_digest.is_some())
			.field("ttl", &self.ttl)
			.finish()
	}
}

impl AdminGate {
	/// Without a password every login and every token is rejected.
	pub fn new(secret_key: impl AsRef<[u8]>, admin_password: Option<String>) -> Self {
		Self {
			secret_key: secret_key.as_ref().to_vec(),
			password_digest: admin_password
				.filter(|p| !p.is_empty())
				.map(|p| digest(p.as_bytes())),
			ttl: DEFAULT_TOKEN_TTL,
		}
	}

	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.password_digest.is_some()
	}

	/// Exchange the admin password for a token.
	pub fn login(&self, password: &str) -> Result<String, AuthError> {
		self.login_at(password, Utc::now())
	}

	pub fn login_at(&self, password: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
		let expected = self.password_digest.as_ref().ok_or(AuthError::Disabled)?;
		let supplied = digest(password.as_bytes());
		if !bool::from(supplied.ct_eq(expected)) {
			tracing::warn!("Rejected admin login");
			return Err(AuthError::InvalidCredential);
		}

		let issued_at = now.timestamp();
		let signature = self.sign(issued_at, expected);
		tracing::info!("Admin token issued");
		Ok(format!("{}.{}", issued_at, hex::encode(signature)))
	}

	/// Check a bearer token taken from the request.
	pub fn verify(&self, token: Option<&str>) -> Result<(), AuthError> {
		self.verify_at(token, Utc::now())
	}

	pub fn verify_at(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<(), AuthError> {
		let password_digest = self.password_digest.as_ref().ok_or(AuthError::Disabled)?;
		let token = token.ok_or(AuthError::MissingCredential)?;

		let (issued, signature) = token.split_once('.').ok_or(AuthError::InvalidCredential)?;
		let issued_at: i64 = issued.parse().map_err(|_| AuthError::InvalidCredential)?;
		let signature = hex::decode(signature).map_err(|_| AuthError::InvalidCredential)?;

		self.mac(issued_at, password_digest)
			.verify_slice(&signature)
			.map_err(|_| AuthError::InvalidCredential)?;

		let issued = DateTime::from_timestamp(issued_at, 0).ok_or(AuthError::InvalidCredential)?;
		if issued > now + MAX_CLOCK_SKEW {
			return Err(AuthError::InvalidCredential);
		}
		if now - issued > self.ttl {
			return Err(AuthError::Expired);
		}
		Ok(())
	}

	fn mac(&self, issued_at: i64, password_digest: &[u8; 32]) -> HmacSha256 {
		let mut mac =
			HmacSha256::new_from_slice(&self.secret_key).expect("HMAC accepts any key length");
		mac.update(issued_at.to_string().as_bytes());
		mac.update(b":");
		mac.update(password_digest);
		mac
	}

	fn sign(&self, issued_at: i64, password_digest: &[u8; 32]) -> Vec<u8> {
		self.mac(issued_at, password_digest).finalize().into_bytes().to_vec()
	}
}

fn digest(bytes: &[u8]) -> [u8; 32] {
	Sha256::digest(bytes).into()
}
