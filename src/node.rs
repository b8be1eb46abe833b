use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::io::{Read, Write};

#[derive(Debug, Copy, Clone, PartialEq, FromPrimitive)]
enum NodeKind {
	Leaf = 0,
	Children = 1,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
	pub value: f64,
	pub column: usize,
}

impl Split {
	pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		writer.write_f64::<BigEndian>(self.value)?;
		writer.write_u16::<BigEndian>(self.column as u16)?;

		Ok(())
	}

	pub fn deserialize<R: Read>(reader: &mut R, features: usize) -> std::io::Result<Self> {
		let value = reader.read_f64::<BigEndian>()?;
		let column = reader.read_u16::<BigEndian>()? as usize;

		if column >= features {
			return Err(invalid(format!("split on column {} of {}", column, features)));
		}

		Ok(Self { value, column })
	}
}

/// Leaves hold the class distribution of the rows that reached them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Leaf(Vec<f64>),
	Children {
		left: Box<Node>,
		right: Box<Node>,
		split: Split,
	},
}

/// Deepest node the binary form carries, counting the root as depth 1.
pub const MAX_DEPTH: usize = 1024;

fn invalid(message: String) -> std::io::Error {
	std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}

impl Node {
	pub fn predict_proba(&self, x: &[f64]) -> &[f64] {
		match self {
			Node::Leaf(proba) => proba.as_slice(),
			Node::Children { left, right, split } => {
				if x[split.column] < split.value {
					left.predict_proba(x)
				} else {
					right.predict_proba(x)
				}
			},
		}
	}

	pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		self.serialize_at(writer, 1)
	}

	fn serialize_at<W: Write>(&self, writer: &mut W, depth: usize) -> std::io::Result<()> {
		if depth > MAX_DEPTH {
			return Err(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				format!("tree deeper than {} levels", MAX_DEPTH),
			));
		}

		match self {
			Node::Leaf(proba) => {
				writer.write_u16::<BigEndian>(NodeKind::Leaf as u16)?;
				for &p in proba {
					writer.write_f64::<BigEndian>(p)?;
				}
			},
			Node::Children { left, right, split } => {
				writer.write_u16::<BigEndian>(NodeKind::Children as u16)?;
				split.serialize(writer)?;
				left.serialize_at(writer, depth + 1)?;
				right.serialize_at(writer, depth + 1)?;
			}
		}

		Ok(())
	}

	/// `classes` and `features` come from the enclosing forest header.
	pub fn deserialize<R: Read>(reader: &mut R, classes: usize, features: usize) -> std::io::Result<Self> {
		Node::deserialize_at(reader, classes, features, 1)
	}

	fn deserialize_at<R: Read>(reader: &mut R, classes: usize, features: usize, depth: usize) -> std::io::Result<Self> {
		if depth > MAX_DEPTH {
			return Err(invalid(format!("tree deeper than {} levels", MAX_DEPTH)));
		}

		let tag = reader.read_u16::<BigEndian>()?;

		match NodeKind::from_u16(tag) {
			Some(NodeKind::Leaf) => {
				let proba = (0..classes)
					.map(|_| reader.read_f64::<BigEndian>())
					.collect::<std::io::Result<Vec<f64>>>()?;

				Ok(Node::Leaf(proba))
			},
			Some(NodeKind::Children) => {
				let split = Split::deserialize(reader, features)?;
				let left = Box::new(Node::deserialize_at(reader, classes, features, depth + 1)?);
				let right = Box::new(Node::deserialize_at(reader, classes, features, depth + 1)?);

				Ok(Node::Children { split, left, right })
			},
			None => Err(invalid(format!("unknown node type {:?}", tag))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stump() -> Node {
		Node::Children {
			split: Split { value: 2.5, column: 1 },
			left: Box::new(Node::Leaf(vec![1.0, 0.0])),
			right: Box::new(Node::Leaf(vec![0.25, 0.75])),
		}
	}

	#[test]
	fn routes_on_threshold() {
		let node = stump();
		assert_eq!(node.predict_proba(&[9.0, 2.0]), &[1.0, 0.0]);
		assert_eq!(node.predict_proba(&[9.0, 2.5]), &[0.25, 0.75]);
	}

	#[test]
	fn survives_serialization() -> std::io::Result<()> {
		let mut bytes = Vec::new();
		stump().serialize(&mut bytes)?;

		let node = Node::deserialize(&mut bytes.as_slice(), 2, 2)?;
		assert_eq!(node, stump());

		Ok(())
	}

	#[test]
	fn rejects_unknown_tag_and_column() -> std::io::Result<()> {
		assert!(Node::deserialize(&mut &[0u8, 7][..], 2, 2).is_err());

		let mut bytes = Vec::new();
		stump().serialize(&mut bytes)?;
		assert!(Node::deserialize(&mut bytes.as_slice(), 2, 1).is_err());

		Ok(())
	}

	fn chain(depth: usize) -> Node {
		(1..depth).fold(Node::Leaf(vec![1.0, 0.0]), |node, _| Node::Children {
			split: Split { value: 0.5, column: 0 },
			left: Box::new(node),
			right: Box::new(Node::Leaf(vec![0.0, 1.0])),
		})
	}

	#[test]
	fn rejects_nesting_beyond_max_depth() {
		let mut bytes = Vec::new();
		for _ in 0..MAX_DEPTH + 100 {
			bytes.extend_from_slice(&(NodeKind::Children as u16).to_be_bytes());
			bytes.extend_from_slice(&0.5f64.to_be_bytes());
			bytes.extend_from_slice(&0u16.to_be_bytes());
		}

		let err = Node::deserialize(&mut bytes.as_slice(), 2, 1).unwrap_err();
		assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
	}

	#[test]
	fn depth_limit_is_shared_by_both_directions() -> std::io::Result<()> {
		let mut bytes = Vec::new();
		chain(MAX_DEPTH).serialize(&mut bytes)?;
		assert_eq!(Node::deserialize(&mut bytes.as_slice(), 2, 1)?, chain(MAX_DEPTH));

		let err = chain(MAX_DEPTH + 1).serialize(&mut Vec::new()).unwrap_err();
		assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

		Ok(())
	}
}
