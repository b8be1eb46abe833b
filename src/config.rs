use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::node::MAX_DEPTH;
use crate::random_forest::RandomForestBuilder;

#[derive(Parser, Debug)]
#[command(about = "Fit and score random forests over delimited rows on stdin/stdout")]
pub struct Cli {
	/// Field delimiter of both input and output lines.
	#[arg(long, global = true, default_value_t = '\t')]
	pub delimiter: char,

	/// Log filter used when RUST_LOG is unset (e.g. "info", "forest_operator=debug").
	#[arg(long, global = true, default_value = "warn")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Fit one model per partition and print `<partition key> <payload>`.
	Fit(ForestArgs),

	/// Score rows with a model stored in a file.
	Score {
		/// Base64 model file previously installed next to the script.
		#[arg(long)]
		model: PathBuf,
	},

	/// Score rows whose model arrives in the last field of the first line.
	ScorePartitioned,
}

#[derive(Args, Debug)]
pub struct ForestArgs {
	/// At most 65535, the most trees a model payload can hold.
	#[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u16).range(1..))]
	pub trees: u16,

	/// Columns tried per split; 0 uses the square root of the feature count.
	#[arg(long, default_value_t = 5)]
	pub max_features: usize,

	/// Leaves sit one level below this, so it stays under the payload's depth limit.
	#[arg(long, default_value_t = 32, value_parser = parse_max_depth)]
	pub max_depth: usize,

	/// Bootstrap sample size as a fraction of the partition's rows.
	#[arg(long, default_value_t = 1.0)]
	pub bag_amount: f64,

	/// RNG seed; the same seed and input give the same model.
	#[arg(long, default_value_t = 0)]
	pub seed: u64,

	/// Ignore --seed and draw a fresh one.
	#[arg(long)]
	pub random_seed: bool,
}

fn parse_max_depth(arg: &str) -> Result<usize, String> {
	let depth: usize = arg.parse().map_err(|e| format!("{}", e))?;
	if (1..MAX_DEPTH).contains(&depth) {
		Ok(depth)
	} else {
		Err(format!("must be between 1 and {}", MAX_DEPTH - 1))
	}
}

impl From<&ForestArgs> for RandomForestBuilder {
	fn from(args: &ForestArgs) -> Self {
		Self {
			n_trees: usize::from(args.trees),
			max_features: Some(args.max_features).filter(|&n| n > 0),
			max_depth: args.max_depth,
			bag_amount: args.bag_amount,
			seed: Some(args.seed).filter(|_| !args.random_seed),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_builder() {
		let cli = Cli::try_parse_from(["forest-operator", "fit"]).unwrap();
		assert_eq!(cli.delimiter, '\t');

		let Command::Fit(args) = cli.command else {
			panic!("expected fit");
		};
		let builder = RandomForestBuilder::from(&args);
		let default = RandomForestBuilder::default();

		assert_eq!(builder.n_trees, default.n_trees);
		assert_eq!(builder.max_features, default.max_features);
		assert_eq!(builder.max_depth, default.max_depth);
		assert_eq!(builder.bag_amount, default.bag_amount);
		assert_eq!(builder.seed, default.seed);
	}

	#[test]
	fn forest_options() {
		let cli = Cli::try_parse_from([
			"forest-operator", "fit", "--trees", "10", "--max-features", "0", "--random-seed",
		])
		.unwrap();

		let Command::Fit(args) = cli.command else {
			panic!("expected fit");
		};
		let builder = RandomForestBuilder::from(&args);

		assert_eq!(builder.n_trees, 10);
		assert_eq!(builder.max_features, None);
		assert_eq!(builder.seed, None);
	}

	#[test]
	fn limits_follow_model_format() {
		let parse = |flag: &str, value: &str| Cli::try_parse_from(["forest-operator", "fit", flag, value]);

		assert!(parse("--trees", "65535").is_ok());
		assert!(parse("--trees", "65536").is_err());
		assert!(parse("--trees", "0").is_err());

		let max = (MAX_DEPTH - 1).to_string();
		assert!(parse("--max-depth", &max).is_ok());
		assert!(parse("--max-depth", &MAX_DEPTH.to_string()).is_err());
		assert!(parse("--max-depth", "0").is_err());
	}

	#[test]
	fn score_requires_model() {
		assert!(Cli::try_parse_from(["forest-operator", "score"]).is_err());

		let cli = Cli::try_parse_from(["forest-operator", "--delimiter", ",", "score", "--model", "m.out"]).unwrap();
		assert_eq!(cli.delimiter, ',');
		assert!(matches!(cli.command, Command::Score { model } if model == PathBuf::from("m.out")));
	}

	#[test]
	fn partitioned_subcommand_name() {
		let cli = Cli::try_parse_from(["forest-operator", "score-partitioned"]).unwrap();
		assert!(matches!(cli.command, Command::ScorePartitioned));
	}
}
