use base64::prelude::*;

use crate::classifier::Classifier;
use crate::error::{DecodeError, PayloadOrigin};

/// Serializes `model` and wraps it in standard base64, so it fits in a single delimited field.
pub fn encode<C: Classifier>(model: &C) -> std::io::Result<String> {
	let mut bytes = Vec::new();
	model.serialize(&mut bytes)?;

	Ok(BASE64_STANDARD.encode(bytes))
}

pub fn decode<C: Classifier>(text: &str, origin: PayloadOrigin) -> Result<C, DecodeError> {
	let bytes = match BASE64_STANDARD.decode(text.as_bytes()) {
		Ok(bytes) => bytes,
		Err(error) => return Err(DecodeError::Base64 { origin, error }),
	};

	let mut reader = bytes.as_slice();
	let model = match C::deserialize(&mut reader) {
		Ok(model) => model,
		Err(error) => return Err(DecodeError::Model { origin, error }),
	};

	if !reader.is_empty() {
		return Err(DecodeError::TrailingBytes {
			origin,
			remaining: reader.len(),
		});
	}

	Ok(model)
}

/// Undoes the upstream producer's byte-literal wrapping (`b'...'`) of a payload field.
///
/// Everything up to and including the first `'` goes, then one trailing `'`.
/// A field without a quote is returned trimmed but otherwise untouched.
pub fn strip_transport_quote(field: &str) -> &str {
	let field = field.trim();

	match field.split_once('\'') {
		Some((_, rest)) => rest.strip_suffix('\'').unwrap_or(rest),
		None => field,
	}
}

/// Model files may be line-wrapped.
pub fn strip_file_whitespace(text: &str) -> String {
	text.chars().filter(|c| !c.is_whitespace()).collect()
}
