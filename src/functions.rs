use std::collections::HashMap;
use ordered_float::OrderedFloat;

pub fn histogram(values: impl Iterator<Item = f64>) -> (HashMap<OrderedFloat<f64>, usize>, usize) {
	let mut histogram = HashMap::new();
	let mut len = 0;

	for value in values {
		*histogram.entry(OrderedFloat(value)).or_default() += 1;
		len += 1;
	}

	(histogram, len)
}

pub fn gini_val(histogram: &HashMap<OrderedFloat<f64>, usize>, len: usize) -> f64 {
	1.0 - histogram
		.iter()
		.map(|(_, &n)| (n as f64 / len as f64).powi(2))
		.sum::<f64>()
}

pub fn gini(values: impl Iterator<Item = f64>) -> f64 {
	let (histogram, len) = histogram(values);
	gini_val(&histogram, len)
}

/// Sorted, distinct class labels.
pub fn classes(values: impl Iterator<Item = f64>) -> Vec<f64> {
	let (histogram, _) = histogram(values);
	let mut classes = histogram.into_iter().map(|(k, _)| k).collect::<Vec<_>>();
	classes.sort();

	classes.into_iter().map(OrderedFloat::into_inner).collect()
}

/// Share of each class in `values`, aligned with `classes`.
pub fn frequencies(values: impl Iterator<Item = f64>, classes: &[f64]) -> Vec<f64> {
	let (histogram, len) = histogram(values);

	classes
		.iter()
		.map(|&class| match (histogram.get(&OrderedFloat(class)), len) {
			(Some(&n), len) if len > 0 => n as f64 / len as f64,
			_ => 0.0,
		})
		.collect()
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &[f64]) -> Option<usize> {
	values
		.iter()
		.enumerate()
		.fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
			Some((_, b)) if b >= v => best,
			_ => Some((i, v)),
		})
		.map(|(i, _)| i)
}
