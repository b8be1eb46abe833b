//! The three table-operator entry points: read, coerce, fit or score, write.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::classifier::{Classifier, Fit};
use crate::codec;
use crate::dataset::Builder;
use crate::error::{DecodeError, ParseError, PayloadOrigin, Result};
use crate::reader::{read_bulk, read_transport};
use crate::schema::{Layout, PROB_CLASS_0, PROB_CLASS_1};
use crate::table::Table;
use crate::writer::{write_partition_model, write_rows};

/// Fits one model on the whole partition and writes `<partition key><delim><payload>`.
pub fn fit<R, W, F>(input: R, output: &mut W, layout: &Layout, estimator: &F, delimiter: char) -> Result<usize>
where
	R: BufRead,
	W: Write,
	F: Fit,
	F::Model: Sync,
{
	let records = read_bulk(input, delimiter)?;
	if records.is_empty() {
		info!("no input rows, nothing to fit");
		return Ok(0);
	}

	let table = Table::coerce(layout.schema, &records)?;
	drop(records);

	let key = match layout.partition {
		Some(partition) => {
			let keys = (0..table.rows_len())
				.map(|row| table.text(partition, row))
				.collect::<std::result::Result<BTreeSet<_>, _>>()?;
			if keys.len() > 1 {
				warn!(?keys, "partition holds more than one key, labelling the model with the first row's");
			}
			table.text(partition, 0)?
		},
		None => String::new(),
	};

	let features = table.features(layout.predictors)?;
	let targets = table.numeric(layout.target)?;

	let mut builder = Builder::new(layout.predictors.len());
	for (x, &y) in features.iter().zip(&targets) {
		builder.add(x, y);
	}

	let dataset = builder.build();
	let model = estimator.fit(dataset.clone());
	info!(
		partition = %key,
		rows = dataset.rows_len(),
		accuracy = dataset.evaluate(&model),
		"model fitted"
	);

	let payload = codec::encode(&model)?;
	debug!(bytes = payload.len(), "model encoded");

	write_partition_model(output, &key, &payload, delimiter)
}

/// Scores every row with a model read from `model_path`.
pub fn score<C, R, W>(input: R, output: &mut W, layout: &Layout, model_path: &Path, delimiter: char) -> Result<usize>
where
	C: Classifier,
	R: BufRead,
	W: Write,
{
	let records = read_bulk(input, delimiter)?;
	if records.is_empty() {
		info!("no input rows, nothing to score");
		return Ok(0);
	}

	let mut table = Table::coerce(layout.schema, &records)?;
	drop(records);

	let text = fs::read_to_string(model_path)?;
	let model = load::<C>(&codec::strip_file_whitespace(&text), PayloadOrigin::File(model_path.to_owned()), layout)?;

	append_probabilities(&mut table, &model, layout)?;
	write_rows(output, &table, &layout.score_columns(), delimiter)
}

/// Scores a partition whose model travels in the last field of the first input line.
pub fn score_partitioned<C, R, W>(input: R, output: &mut W, layout: &Layout, delimiter: char) -> Result<usize>
where
	C: Classifier,
	R: BufRead,
	W: Write,
{
	let transport = match read_transport(input, delimiter, layout.trailing)? {
		Some(transport) => transport,
		None => {
			info!("no input rows, nothing to score");
			return Ok(0);
		},
	};

	let mut table = Table::coerce(layout.schema, &transport.records)?;

	let payload = codec::strip_transport_quote(&transport.payload);
	let model = load::<C>(payload, PayloadOrigin::Transport { row: 0 }, layout)?;

	append_probabilities(&mut table, &model, layout)?;
	write_rows(output, &table, &layout.score_columns(), delimiter)
}

fn load<C: Classifier>(payload: &str, origin: PayloadOrigin, layout: &Layout) -> std::result::Result<C, DecodeError> {
	let model: C = codec::decode(payload, origin.clone())?;

	if model.features_len() != layout.predictors.len() {
		return Err(DecodeError::Incompatible {
			origin,
			expected: layout.predictors.len(),
			found: model.features_len(),
		});
	}

	debug!(%origin, classes = ?model.classes(), "model decoded");
	Ok(model)
}

fn append_probabilities<C: Classifier>(table: &mut Table, model: &C, layout: &Layout) -> std::result::Result<(), ParseError> {
	let features = table.features(layout.predictors)?;

	let (prob0, prob1): (Vec<f64>, Vec<f64>) = features
		.iter()
		.map(|x| {
			let proba = model.probabilities_of(x, &[0.0, 1.0]);
			(proba[0], proba[1])
		})
		.unzip();

	table.push_float(PROB_CLASS_0, prob0)?;
	table.push_float(PROB_CLASS_1, prob1)?;

	Ok(())
}
