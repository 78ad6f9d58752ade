//! One-dimensional isolation forest.
//!
//! # Algorithm
//!
//! Each tree is grown on a random subsample of `psi` points. An internal node picks a split
//! uniformly between its min and max and sends `x <= split` left. Growth stops when a node
//! holds a single point, all its points are equal, or depth reaches `ceil(log2(psi))`.
//!
//! The path length of `x` in a tree is the depth of the external node it lands in plus
//! `c(size)`, the expected path length of an unbuilt subtree of `size` points:
//!
//! ```text
//! c(n) = 2 H(n - 1) - 2 (n - 1) / n,   H(i) ≈ ln(i) + γ,   c(1) = 0,   c(2) = 1
//! s(x) = 2 ^ (-E[h(x)] / c(psi))
//! ```
//!
//! Scores close to 1 are anomalies; scores well below 0.5 are normal.
//!
//! # Reference
//!
//! Liu, F.T., Ting, K.M., Zhou, Z.-H. (2008). "Isolation Forest", *ICDM '08*, pp. 413-422.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{AnalysisError, AnalysisResult};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Construction parameters for [`IsolationForest::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_samples: usize,
    pub seed: Option<u64>,
}

impl ForestParams {
    pub(crate) fn validate(&self) -> AnalysisResult<()> {
        if self.n_trees == 0 {
            return Err(AnalysisError::InvalidDetectorOptions {
                message: "n_trees must be > 0".to_string(),
            });
        }
        if self.max_samples < 2 {
            return Err(AnalysisError::InvalidDetectorOptions {
                message: format!("max_samples must be >= 2 (got {})", self.max_samples),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Node {
    Internal {
        split: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    External {
        size: usize,
    },
}

#[derive(Debug)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow(points: &[f64], limit: usize, rng: &mut StdRng) -> Self {
        Self {
            root: grow_node(points, 0, limit, rng),
        }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                Node::Internal { split, left, right } => {
                    node = if x <= *split { left } else { right };
                    depth += 1;
                }
                Node::External { size } => return depth as f64 + average_path_length(*size),
            }
        }
    }
}

fn grow_node(points: &[f64], depth: usize, limit: usize, rng: &mut StdRng) -> Node {
    let size = points.len();
    if size <= 1 || depth >= limit {
        return Node::External { size };
    }

    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    if lo >= hi {
        return Node::External { size };
    }

    let split = lo + rng.random::<f64>() * (hi - lo);
    let (left, right): (Vec<f64>, Vec<f64>) = points.iter().partition(|&&x| x <= split);
    if left.is_empty() || right.is_empty() {
        // split rounded onto `hi`
        return Node::External { size };
    }

    Node::Internal {
        split,
        left: Box::new(grow_node(&left, depth + 1, limit, rng)),
        right: Box::new(grow_node(&right, depth + 1, limit, rng)),
    }
}

/// Expected path length of an unsuccessful BST search over `n` points.
pub(crate) fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// An ensemble of isolation trees fitted on one numeric sample.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit a forest on `values`.
    ///
    /// Every tree draws its own subsample with an RNG seeded from a master RNG, so a pinned
    /// `seed` reproduces the same forest regardless of how rayon schedules the trees.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidDetectorOptions`] when `n_trees == 0`, `max_samples < 2` or
    /// `values` holds fewer than two points.
    pub fn fit(values: &[f64], params: &ForestParams) -> AnalysisResult<Self> {
        params.validate()?;
        if values.len() < 2 {
            return Err(AnalysisError::InvalidDetectorOptions {
                message: format!("need at least 2 values to fit (got {})", values.len()),
            });
        }

        let sample_size = params.max_samples.min(values.len());
        let limit = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut master = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };
        let tree_seeds: Vec<u64> = (0..params.n_trees).map(|_| master.random()).collect();

        let trees = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let sample: Vec<f64> = index::sample(&mut rng, values.len(), sample_size)
                    .into_iter()
                    .map(|i| values[i])
                    .collect();
                IsolationTree::grow(&sample, limit, &mut rng)
            })
            .collect::<Vec<_>>();

        tracing::trace!(
            trees = trees.len(),
            sample_size,
            depth_limit = limit,
            "isolation forest fitted"
        );

        Ok(Self { trees, sample_size })
    }

    /// Anomaly score in `(0, 1]`; higher means easier to isolate.
    pub fn score(&self, x: f64) -> f64 {
        let mean_path = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>()
            / self.trees.len() as f64;
        let norm = average_path_length(self.sample_size);
        if norm <= 0.0 {
            return 0.5;
        }
        2f64.powf(-mean_path / norm)
    }

    /// Scores for many points, computed in parallel and returned in input order.
    pub fn score_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.par_iter().map(|&x| self.score(x)).collect()
    }

    /// Number of fitted trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Subsample size each tree was grown on.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}
