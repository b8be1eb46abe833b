use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use config::{Cli, Command};
use random_forest::{RandomForestBuilder, RandomForestClassifier};

mod adapter;
mod classifier;
mod codec;
mod config;
mod dataset;
mod decision_tree;
mod error;
mod functions;
mod logging;
mod node;
mod random_forest;
mod reader;
mod schema;
mod table;
mod writer;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init(&cli.log_level)?;

	let stdin = io::stdin();
	let input = stdin.lock();
	let stdout = io::stdout();
	let mut output = io::BufWriter::new(stdout.lock());

	let written = match &cli.command {
		Command::Fit(args) => {
			let estimator = RandomForestBuilder::from(args);
			adapter::fit(input, &mut output, &schema::FIT_LAYOUT, &estimator, cli.delimiter)
				.context("fitting partition")?
		},
		Command::Score { model } => {
			adapter::score::<RandomForestClassifier, _, _>(input, &mut output, &schema::SCORE_SINGLE_LAYOUT, model, cli.delimiter)
				.with_context(|| format!("scoring with {}", model.display()))?
		},
		Command::ScorePartitioned => {
			adapter::score_partitioned::<RandomForestClassifier, _, _>(input, &mut output, &schema::SCORE_PARTITIONED_LAYOUT, cli.delimiter)
				.context("scoring partition")?
		},
	};

	output.flush().context("flushing stdout")?;
	info!(lines = written, "done");

	Ok(())
}
