use std::io::{Read, Write};

use crate::dataset::Dataset;
use crate::functions::argmax;

/// What the codec and the scoring paths need from a trained model.
pub trait Classifier: Sized {
	/// Sorted labels seen during training.
	fn classes(&self) -> &[f64];

	fn features_len(&self) -> usize;

	/// Class membership probabilities, aligned with [`Classifier::classes`].
	fn predict_proba(&self, x: &[f64]) -> Vec<f64>;

	/// Probabilities of the requested labels, in request order; a label the
	/// model never saw gets 0. The row is evaluated once.
	fn probabilities_of(&self, x: &[f64], labels: &[f64]) -> Vec<f64> {
		let proba = self.predict_proba(x);
		labels
			.iter()
			.map(|&label| {
				self.classes()
					.iter()
					.position(|&c| c == label)
					.map_or(0.0, |i| proba[i])
			})
			.collect()
	}

	fn predict(&self, x: &[f64]) -> f64 {
		let proba = self.predict_proba(x);
		argmax(&proba).map_or(f64::NAN, |i| self.classes()[i])
	}

	fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
	fn deserialize<R: Read>(reader: &mut R) -> std::io::Result<Self>;
}

pub trait Fit {
	type Model: Classifier;

	fn fit(&self, dataset: Dataset) -> Self::Model;
}
