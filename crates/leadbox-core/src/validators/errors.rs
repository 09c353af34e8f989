/// Validation failure for a single value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Ensure this value has at least {min} characters (it has {length})")]
	TooShort { length: usize, min: usize },

	#[error("Ensure this value has at most {max} characters (it has {length})")]
	TooLong { length: usize, max: usize },

	#[error("Enter a valid email address.")]
	InvalidEmail(String),

	#[error("Select a valid choice. {value} is not one of the available choices.")]
	InvalidChoice { value: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
