use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use crate::dataset::Dataset;
use crate::classifier::{Classifier, Fit};
use crate::decision_tree::{DecisionTreeBuilder, DecisionTree};
use crate::functions;

/// Leading bytes of every serialized forest.
const MAGIC: &[u8; 4] = b"RFC1";

pub struct RandomForestBuilder {
    pub n_trees: usize,
    /// Columns tried per split; `None` means the square root of the feature count.
    pub max_features: Option<usize>,
    pub max_depth: usize,
    /// Bootstrap sample size as a fraction of the rows.
    pub bag_amount: f64,
    /// Fixed seed for reproducible forests; `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for RandomForestBuilder {
    fn default() -> Self {
        Self {
            n_trees: 500,
            max_features: Some(5),
            max_depth: 32,
            bag_amount: 1.0,
            seed: Some(0),
        }
    }
}

impl Fit for RandomForestBuilder {
    type Model = RandomForestClassifier;

    fn fit(&self, dataset: Dataset) -> RandomForestClassifier {
        let features = dataset.features_len();
        let max_features = self.max_features
            .unwrap_or_else(|| (features as f64).sqrt().ceil() as usize)
            .max(1);
        let classes = functions::classes(dataset.targets());

        let started = Instant::now();
        let done = AtomicUsize::new(0);

        let forest = self.get_rngs()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|mut rng| {
                let tree = self.fit_tree(&mut rng, &classes, &dataset, max_features);

                let i = done.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(tree = i, of = self.n_trees, elapsed_ms = started.elapsed().as_millis() as u64, "tree fitted");

                tree
            })
            .collect::<Vec<_>>();

        debug!(trees = forest.len(), elapsed_ms = started.elapsed().as_millis() as u64, "forest fitted");

        RandomForestClassifier {
            features,
            classes,
            forest,
        }
    }
}

impl RandomForestBuilder {
    fn fit_tree<R: Rng + ?Sized>(&self, rng: &mut R, classes: &[f64], dataset: &Dataset, max_features: usize) -> DecisionTree {
        let builder = DecisionTreeBuilder {
            max_features: Some(max_features),
            max_depth: self.max_depth,
        };

        let max_samples = (dataset.rows_len() as f64 * self.bag_amount) as usize;
        let bootstrapped = dataset.bootstrap(rng, max_samples);

        builder.fit(rng, classes, bootstrapped)
    }

    /// One independent RNG per tree, drawn in order so a seeded fit is
    /// reproducible however rayon schedules the trees.
    fn get_rngs(&self) -> impl Iterator<Item = StdRng> {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        (0..self.n_trees).map(move |_| {
            let mut seed = [0u8; 32];
            rng.fill(&mut seed);
            StdRng::from_seed(seed)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    features: usize,
    classes: Vec<f64>,
    forest: Vec<DecisionTree>,
}

fn invalid(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}

/// Header counts are u16 on the wire; anything larger cannot be read back.
fn count(len: usize, what: &str) -> std::io::Result<u16> {
    u16::try_from(len).map_err(|_| std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("{} {} exceed the model format limit of {}", len, what, u16::MAX),
    ))
}

impl Classifier for RandomForestClassifier {
    fn classes(&self) -> &[f64] {
        &self.classes
    }

    fn features_len(&self) -> usize {
        self.features
    }

    /// Mean of the trees' leaf distributions.
    fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.classes.len()];
        if self.forest.is_empty() {
            return proba;
        }

        for tree in &self.forest {
            for (sum, p) in proba.iter_mut().zip(tree.predict_proba(x)) {
                *sum += p;
            }
        }

        let n = self.forest.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }

    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let features = count(self.features, "features")?;
        let classes = count(self.classes.len(), "classes")?;
        let trees = count(self.forest.len(), "trees")?;

        writer.write_all(MAGIC)?;
        writer.write_u16::<BigEndian>(features)?;
        writer.write_u16::<BigEndian>(classes)?;
        for &class in &self.classes {
            writer.write_f64::<BigEndian>(class)?;
        }

        writer.write_u16::<BigEndian>(trees)?;
        for tree in &self.forest {
            tree.serialize(writer)?;
        }

        Ok(())
    }

    fn deserialize<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(invalid(format!("unknown model tag {:?}", magic)));
        }

        let features = reader.read_u16::<BigEndian>()? as usize;
        let classes = (0..reader.read_u16::<BigEndian>()?)
            .map(|_| reader.read_f64::<BigEndian>())
            .collect::<std::io::Result<Vec<f64>>>()?;

        let len = reader.read_u16::<BigEndian>()?;
        let forest = (0..len)
            .map(|_| DecisionTree::deserialize(reader, classes.len(), features))
            .collect::<std::io::Result<Vec<DecisionTree>>>()?;

        Ok(Self {
            features,
            classes,
            forest,
        })
    }
}
