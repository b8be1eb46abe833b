use std::fmt;
use std::path::PathBuf;

use crate::schema::ScalarType;

/// A field that could not be coerced to its declared column type.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("row {row}: expected {expected} fields, found {found}")]
	FieldCount {
		row: usize,
		expected: usize,
		found: usize,
	},

	#[error("row {row}, column `{column}`: cannot parse {raw:?} as {ty}")]
	InvalidValue {
		row: usize,
		column: &'static str,
		raw: String,
		ty: ScalarType,
	},

	#[error("column `{0}` is not part of the table")]
	MissingColumn(String),

	#[error("column `{0}` is not numeric")]
	NotNumeric(String),

	#[error("column `{column}` has {found} values for {expected} rows")]
	ColumnLength {
		column: &'static str,
		expected: usize,
		found: usize,
	},
}

/// Where a payload came from, so a failed decode can be traced back upstream.
#[derive(Debug, Clone)]
pub enum PayloadOrigin {
	File(PathBuf),
	Transport { row: usize },
}

impl fmt::Display for PayloadOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PayloadOrigin::File(path) => write!(f, "model file {}", path.display()),
			PayloadOrigin::Transport { row } => write!(f, "payload field of row {}", row),
		}
	}
}

/// A payload that could not be turned back into a model.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("{origin}: invalid base64")]
	Base64 {
		origin: PayloadOrigin,
		#[source]
		error: base64::DecodeError,
	},

	#[error("{origin}: not a serialized model")]
	Model {
		origin: PayloadOrigin,
		#[source]
		error: std::io::Error,
	},

	#[error("{origin}: {remaining} unexpected bytes after the model")]
	TrailingBytes {
		origin: PayloadOrigin,
		remaining: usize,
	},

	#[error("{origin}: model expects {found} features, layout provides {expected}")]
	Incompatible {
		origin: PayloadOrigin,
		expected: usize,
		found: usize,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error(transparent)]
	Decode(#[from] DecodeError),

	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
