use std::io::{Read, Write};
use std::collections::HashMap;
use rand::Rng;
use rand::seq::SliceRandom as _;
use ordered_float::OrderedFloat;

use crate::dataset::Dataset;
use crate::node::{Node, Split};
use crate::functions::{self, frequencies, gini, gini_val};

// Sliding window of gini
// https://arxiv.org/pdf/1403.6348.pdf
struct SlidingGini {
	n: usize,
	ni: HashMap<OrderedFloat<f64>, usize>,
	g: f64
}

impl SlidingGini {
	pub fn new(targets: impl Iterator<Item = f64>) -> Self {
		let (histogram, len) = functions::histogram(targets);

		Self {
			n: len,
			g: gini_val(&histogram, len),
			ni: histogram,
		}
	}

	pub fn inc(&mut self, typ: OrderedFloat<f64>) {
		let entry = self.ni.entry(typ).or_insert(0);
		*entry += 1;
		self.n += 1;
		self.g = 1.0 - 1.0 / (self.n as f64).powi(2) * (((self.n - 1) as f64).powi(2) * (1.0 - self.g) + 2.0 * *entry as f64 - 1.0);
	}

	pub fn dec(&mut self, typ: OrderedFloat<f64>) {
		let entry = self.ni.entry(typ).or_insert(0);
		*entry -= 1;
		self.n -= 1;
		self.g = 1.0 - 1.0 / (self.n as f64).powi(2) * (((self.n + 1) as f64).powi(2) * (1.0 - self.g) - 2.0 * *entry as f64 - 1.0);
	}

	pub fn gini(&self) -> f64 {
		self.g
	}
}

struct NodeBuilder<'c, R> {
	classes: &'c [f64],
	max_features: usize,
	max_depth: usize,
	rng: R
}

impl<'c, R: Rng> NodeBuilder<'c, R> {
	fn leaf(&self, dataset: &Dataset) -> Node {
		Node::Leaf(frequencies(dataset.targets(), self.classes))
	}

	fn build(&mut self, dataset: &mut Dataset, depth: usize) -> Node {
		if depth > self.max_depth || dataset.rows_len() < 2 {
			return self.leaf(dataset);
		}

		let impurity = gini(dataset.targets());
		if impurity <= 0.0 {
			return self.leaf(dataset);
		}

		let mut best_split: Option<Split> = None;
		let mut best_gain = f64::MIN;
		let columns = (0..dataset.features_len()).collect::<Vec<usize>>();
		let max_features = std::cmp::min(columns.len(), self.max_features);

		for &column in columns.choose_multiple(&mut self.rng, max_features) {
			dataset.sort(column);

			let mut left_window: Option<SlidingGini> = None;
			let mut right_window: Option<SlidingGini> = None;

			let mut prev_range = 0..0;
			let mut targets = dataset.targets();

			for (left, value) in dataset.get_splits(column) {
				// The first split seeds both windows; later splits move the
				// rows between them while keeping `targets` in step.
				let mut do_inc = true;
				for _ in prev_range.end..left.end {
					let cls = match targets.next() {
						Some(cls) => OrderedFloat(cls),
						None => break,
					};

					if do_inc {
						if let Some(window) = &mut left_window {
							window.inc(cls);

							if let Some(window) = &mut right_window {
								window.dec(cls);
							}
						} else {
							left_window = Some(SlidingGini::new(dataset.targets().take(left.end).skip(left.start)));
							right_window = Some(SlidingGini::new(dataset.targets().skip(left.end)));
							do_inc = false;
						}
					}
				}

				let impurity_l = left_window.as_ref().map_or(0.0, SlidingGini::gini);
				let impurity_r = right_window.as_ref().map_or(0.0, SlidingGini::gini);

				let ratio_l = (left.end - left.start) as f64 / dataset.rows_len() as f64;
				let ratio_r = 1.0 - ratio_l;

				let gain = impurity - (ratio_l * impurity_l + ratio_r * impurity_r);

				if best_gain < gain {
					best_split = Some(Split { column, value });
					best_gain = gain;
				}

				prev_range = left;
			}
		}

		if let Some(split) = best_split {
			self.build_children(dataset, split, depth)
		} else {
			self.leaf(dataset)
		}
	}

	fn build_children(&mut self, dataset: &mut Dataset, split: Split, depth: usize) -> Node {
		dataset.sort(split.column);

		let split_row = dataset
			.column(split.column)
			.take_while(|&f| f <= split.value)
			.count();

		let (left, right) = dataset.split(split_row, |x| Box::new(self.build(x, depth + 1)));

		Node::Children {
			left, right, split
		}
	}
}

/// One CART tree. Leaf distributions are aligned with the forest's classes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
	root: Node,
}

impl DecisionTree {
	pub fn predict_proba(&self, x: &[f64]) -> &[f64] {
		self.root.predict_proba(x)
	}

	pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		self.root.serialize(writer)
	}

	pub fn deserialize<R: Read>(reader: &mut R, classes: usize, features: usize) -> std::io::Result<Self> {
		let root = Node::deserialize(reader, classes, features)?;

		Ok(Self {
			root
		})
	}
}

pub struct DecisionTreeBuilder {
	pub max_features: Option<usize>,
	pub max_depth: usize,
}

impl Default for DecisionTreeBuilder {
	fn default() -> Self {
		Self {
			max_features: None,
			max_depth: 32,
		}
	}
}

impl DecisionTreeBuilder {
	pub fn fit<R: Rng + ?Sized>(&self, rng: &mut R, classes: &[f64], mut dataset: Dataset) -> DecisionTree {
		let max_features = self.max_features.unwrap_or(dataset.features_len());
		let root = (NodeBuilder {
			classes,
			max_features,
			max_depth: self.max_depth,
			rng
		}).build(&mut dataset, 1);

		DecisionTree { root }
	}
}
