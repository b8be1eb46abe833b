use std::io::{self, BufRead};

/// Raw fields of one input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	pub row: usize,
	pub fields: Vec<String>,
}

impl Record {
	fn parse(row: usize, line: &str, delimiter: char) -> Self {
		Self {
			row,
			fields: line.split(delimiter).map(str::to_owned).collect(),
		}
	}
}

/// First line of a partitioned scoring stream carries the model after its data fields.
#[derive(Debug)]
pub struct Transport {
	pub payload: String,
	pub records: Vec<Record>,
}

fn trim_line_end(line: &str) -> &str {
	line.trim_end_matches(|c| c == '\n' || c == '\r')
}

/// Drains the whole stream, one record per non-empty line.
pub fn read_bulk<R: BufRead>(input: R, delimiter: char) -> io::Result<Vec<Record>> {
	let mut records = Vec::new();

	for line in input.lines() {
		let line = line?;
		let line = trim_line_end(&line);

		if line.is_empty() {
			continue;
		}

		records.push(Record::parse(records.len(), line, delimiter));
	}

	Ok(records)
}

/// Reads until a blank line or end of stream.
///
/// Every line has `trailing` transport fields after its data fields; they are
/// cut off. The last field of the first line is kept as the payload. Returns
/// `None` when not a single row arrived.
pub fn read_transport<R: BufRead>(mut input: R, delimiter: char, trailing: usize) -> io::Result<Option<Transport>> {
	let mut payload = None;
	let mut records = Vec::new();
	let mut buffer = String::new();

	loop {
		buffer.clear();
		if input.read_line(&mut buffer)? == 0 {
			break;
		}

		let line = trim_line_end(&buffer);
		if line.is_empty() {
			break;
		}

		let mut record = Record::parse(records.len(), line, delimiter);
		if payload.is_none() {
			payload = record.fields.last().cloned();
		}

		let keep = record.fields.len().saturating_sub(trailing);
		record.fields.truncate(keep);
		records.push(record);
	}

	Ok(payload.map(|payload| Transport { payload, records }))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bulk_skips_blank_lines() -> io::Result<()> {
		let input = "1\ta\r\n\n2\tb\n3\tc";
		let records = read_bulk(input.as_bytes(), '\t')?;

		assert_eq!(records.len(), 3);
		assert_eq!(records[0].fields, ["1", "a"]);
		assert_eq!(records[2], Record { row: 2, fields: vec!["3".into(), "c".into()] });

		Ok(())
	}

	#[test]
	fn bulk_empty_input() -> io::Result<()> {
		assert!(read_bulk(&b""[..], '\t')?.is_empty());
		Ok(())
	}

	#[test]
	fn transport_splits_payload_from_first_line() -> io::Result<()> {
		let input = "1\tx\t0\tb'QUJD'\n2\ty\t1\t\n\n3\tz\t2\t\n";
		let transport = read_transport(input.as_bytes(), '\t', 2)?.unwrap();

		assert_eq!(transport.payload, "b'QUJD'");
		assert_eq!(transport.records.len(), 2);
		assert_eq!(transport.records[0].fields, ["1", "x"]);
		assert_eq!(transport.records[1].fields, ["2", "y"]);

		Ok(())
	}

	#[test]
	fn transport_stops_on_blank_first_line() -> io::Result<()> {
		assert!(read_transport(&b"\n1\tx\t0\tp\n"[..], '\t', 2)?.is_none());
		assert!(read_transport(&b""[..], '\t', 2)?.is_none());
		Ok(())
	}
}
