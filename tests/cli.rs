use std::io::Write;
use std::process::{Command, Output, Stdio};

use anyhow::Result;

fn run(args: &[&str], stdin: &str) -> Result<Output> {
	let mut child = Command::new(env!("CARGO_BIN_EXE_forest-operator"))
		.args(args)
		.env_remove("RUST_LOG")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()?;

	child.stdin.take().unwrap().write_all(stdin.as_bytes())?;
	Ok(child.wait_with_output()?)
}

/// A partitioned data row; `cc_acct_ind` follows `tot_income`.
fn row(i: usize, state: &str) -> String {
	let cc = (i % 3 == 0) as usize;
	let income = if cc == 1 { 9 + i % 5 } else { 1 + i % 5 };

	format!(
		"{}\t{}.000E 004\t{}\t{}\t{}\t{}\t1\t0\t0\t\"{}\"\t1\t{}\t{}\t{}.000E 003\t0.000E 000\t1.500E 002\t{}.000E 001\t2.000E-001\t0.000E 000\t{}\t{}\t{}\t{}\t1",
		1000 + i,
		income,
		20 + i % 40,
		i % 12,
		i % 4,
		i % 2,
		state,
		(i / 2) % 2,
		cc,
		i % 7 + 1,
		i % 9 + 1,
		i % 10,
		i % 11,
		i % 6,
		i % 8,
	)
}

fn rows(n: usize, state: &str) -> String {
	(0..n).map(|i| row(i, state) + "\n").collect()
}

#[test]
fn empty_input_succeeds_silently() -> Result<()> {
	for args in [&["fit"][..], &["score-partitioned"][..]] {
		let output = run(args, "")?;
		assert!(output.status.success(), "{:?}", args);
		assert!(output.stdout.is_empty(), "{:?}", args);
	}

	Ok(())
}

#[test]
fn fit_then_score_partitioned() -> Result<()> {
	let output = run(&["fit", "--trees", "5"], &rows(30, "CA"))?;
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

	let fitted = String::from_utf8(output.stdout)?;
	assert_eq!(fitted.lines().count(), 1);

	let fields = fitted.trim_end().split('\t').collect::<Vec<_>>();
	assert_eq!(fields.len(), 2);
	assert_eq!(fields[0], "CA");

	let mut input = format!("{}\t0\t{}\n", row(0, "CA"), fields[1]);
	for i in 1..4 {
		input.push_str(&format!("{}\t{}\t\n", row(i, "CA"), i));
	}
	input.push('\n');

	let output = run(&["score-partitioned"], &input)?;
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

	let scored = String::from_utf8(output.stdout)?;
	assert_eq!(scored.lines().count(), 4);
	for line in scored.lines() {
		let fields = line.split('\t').collect::<Vec<_>>();
		assert_eq!(fields.len(), 5);
		assert_eq!(fields[1], "CA");
	}

	Ok(())
}

#[test]
fn bad_input_fails_with_message() -> Result<()> {
	let input = rows(3, "NY").replacen("\t\"NY\"\t1\t", "\t\"NY\"\tyes\t", 1);
	let output = run(&["fit"], &input)?;

	assert!(!output.status.success());
	assert!(output.stdout.is_empty());
	assert!(String::from_utf8_lossy(&output.stderr).contains("ck_acct_ind"));

	Ok(())
}

#[test]
fn rejects_out_of_range_options() -> Result<()> {
	let output = run(&["fit", "--trees", "65536"], "")?;
	assert!(!output.status.success());

	let output = run(&["fit", "--max-depth", "1024"], "")?;
	assert!(!output.status.success());

	Ok(())
}
