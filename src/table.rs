use crate::error::ParseError;
use crate::reader::Record;
use crate::schema::{Column, ScalarType, Schema};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
	Integer(Vec<i64>),
	Float(Vec<f64>),
	Text(Vec<String>),
}

impl ColumnData {
	fn with_capacity(ty: ScalarType, capacity: usize) -> Self {
		match ty {
			ScalarType::Integer => ColumnData::Integer(Vec::with_capacity(capacity)),
			ScalarType::Float => ColumnData::Float(Vec::with_capacity(capacity)),
			ScalarType::Text => ColumnData::Text(Vec::with_capacity(capacity)),
		}
	}

	/// Field text as it goes back onto the wire.
	pub fn render(&self, row: usize) -> String {
		match self {
			ColumnData::Integer(values) => values[row].to_string(),
			ColumnData::Float(values) => format!("{:?}", values[row]),
			ColumnData::Text(values) => values[row].clone(),
		}
	}
}

/// The database sends positive exponents with a blank instead of a sign, e.g. `1.000E 000`.
pub fn strip_whitespace(raw: &str) -> String {
	raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn strip_quotes(raw: &str) -> &str {
	raw.trim_matches('"')
}

/// Column-wise, typed view of the input rows.
#[derive(Debug)]
pub struct Table {
	names: Vec<&'static str>,
	columns: Vec<ColumnData>,
	rows: usize,
}

impl Table {
	/// Coerces every record against `schema`. Fails on the first malformed field.
	pub fn coerce(schema: &Schema, records: &[Record]) -> Result<Self, ParseError> {
		let mut columns = schema
			.columns
			.iter()
			.map(|c| ColumnData::with_capacity(c.ty, records.len()))
			.collect::<Vec<_>>();

		for record in records {
			if record.fields.len() != schema.len() {
				return Err(ParseError::FieldCount {
					row: record.row,
					expected: schema.len(),
					found: record.fields.len(),
				});
			}

			for ((column, data), raw) in schema.columns.iter().zip(&mut columns).zip(&record.fields) {
				coerce_field(column, data, record.row, raw)?;
			}
		}

		Ok(Self {
			names: schema.columns.iter().map(|c| c.name).collect(),
			columns,
			rows: records.len(),
		})
	}

	pub fn rows_len(&self) -> usize {
		self.rows
	}

	pub fn column(&self, name: &str) -> Result<&ColumnData, ParseError> {
		self.names
			.iter()
			.position(|&n| n == name)
			.map(|i| &self.columns[i])
			.ok_or_else(|| ParseError::MissingColumn(name.to_owned()))
	}

	pub fn numeric(&self, name: &str) -> Result<Vec<f64>, ParseError> {
		match self.column(name)? {
			ColumnData::Integer(values) => Ok(values.iter().map(|&v| v as f64).collect()),
			ColumnData::Float(values) => Ok(values.clone()),
			ColumnData::Text(_) => Err(ParseError::NotNumeric(name.to_owned())),
		}
	}

	pub fn text(&self, name: &str, row: usize) -> Result<String, ParseError> {
		Ok(self.column(name)?.render(row))
	}

	/// Row-major feature matrix over `names`, in that order.
	pub fn features(&self, names: &[&str]) -> Result<Vec<Vec<f64>>, ParseError> {
		let columns = names
			.iter()
			.map(|name| self.numeric(name))
			.collect::<Result<Vec<_>, _>>()?;

		Ok((0..self.rows)
			.map(|i| columns.iter().map(|c| c[i]).collect())
			.collect())
	}

	/// Appends a computed column. Its length must match the table.
	pub fn push_float(&mut self, name: &'static str, values: Vec<f64>) -> Result<(), ParseError> {
		if values.len() != self.rows {
			return Err(ParseError::ColumnLength {
				column: name,
				expected: self.rows,
				found: values.len(),
			});
		}

		self.names.push(name);
		self.columns.push(ColumnData::Float(values));
		Ok(())
	}
}

fn coerce_field(column: &Column, data: &mut ColumnData, row: usize, raw: &str) -> Result<(), ParseError> {
	let invalid = || ParseError::InvalidValue {
		row,
		column: column.name,
		raw: raw.to_owned(),
		ty: column.ty,
	};

	match data {
		ColumnData::Integer(values) => values.push(strip_whitespace(raw).parse().map_err(|_| invalid())?),
		ColumnData::Float(values) => values.push(strip_whitespace(raw).parse().map_err(|_| invalid())?),
		ColumnData::Text(values) => values.push(strip_quotes(raw).to_owned()),
	}

	Ok(())
}
