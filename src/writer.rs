use std::io::Write;

use crate::error::Result;
use crate::table::Table;

/// Writes `columns` of every row, in the given order. Returns the number of lines.
pub fn write_rows<W: Write>(output: &mut W, table: &Table, columns: &[&str], delimiter: char) -> Result<usize> {
	let columns = columns
		.iter()
		.map(|name| table.column(name))
		.collect::<std::result::Result<Vec<_>, _>>()?;

	let mut line = String::new();
	for row in 0..table.rows_len() {
		line.clear();

		for (i, column) in columns.iter().enumerate() {
			if i > 0 {
				line.push(delimiter);
			}
			line.push_str(&column.render(row));
		}

		writeln!(output, "{}", line)?;
	}

	Ok(table.rows_len())
}

pub fn write_partition_model<W: Write>(output: &mut W, key: &str, payload: &str, delimiter: char) -> Result<usize> {
	writeln!(output, "{}{}{}", key, delimiter, payload)?;
	Ok(1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reader::read_bulk;
	use crate::schema::{Column, ScalarType, Schema};

	static SMALL: Schema = Schema {
		columns: &[
			Column { name: "id", ty: ScalarType::Integer },
			Column { name: "code", ty: ScalarType::Text },
			Column { name: "amount", ty: ScalarType::Float },
		],
	};

	#[test]
	fn rows_keep_requested_order() -> Result<()> {
		let records = read_bulk(&b"7\t\"NY\"\t1.000E 001\n8\tTX\t2.5E-001\n"[..], '\t')?;
		let mut table = Table::coerce(&SMALL, &records)?;
		table.push_float("Prob1", vec![0.75, 0.0])?;

		let mut out = Vec::new();
		let written = write_rows(&mut out, &table, &["id", "Prob1", "code", "amount"], '\t')?;

		assert_eq!(written, 2);
		assert_eq!(String::from_utf8_lossy(&out), "7\t0.75\tNY\t10.0\n8\t0.0\tTX\t0.25\n");

		Ok(())
	}

	#[test]
	fn unknown_output_column_fails() -> Result<()> {
		let records = read_bulk(&b"7\tNY\t1.0\n"[..], '\t')?;
		let table = Table::coerce(&SMALL, &records)?;

		assert!(write_rows(&mut Vec::new(), &table, &["missing"], '\t').is_err());

		Ok(())
	}

	#[test]
	fn partition_line() -> Result<()> {
		let mut out = Vec::new();
		write_partition_model(&mut out, "CA", "QUJD", '\t')?;
		assert_eq!(out, b"CA\tQUJD\n");
		Ok(())
	}
}
