//! Random radial basis function generator.
//!
//! A model seed places a fixed set of weighted Gaussian centroids in the unit
//! hypercube. Samples pick a centroid by weight and are displaced from its
//! centre in a uniformly random direction by a normally distributed distance
//! scaled with the centroid's spread. Changing the model seed moves every
//! centroid, which is what makes two concepts differ.

use super::ConceptGenerator;
use crate::config::{DEFAULT_RBF_CENTROIDS, DEFAULT_RBF_DIMS};
use crate::data::Matrix;
use crate::error::{DriftError, Result};
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

#[derive(Debug, Clone)]
struct Centroid {
    centre: Vec<f64>,
    std_dev: f64,
}

/// Random RBF generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomRbfGenerator {
    dims: usize,
    n_centroids: usize,
    sample_seed: u64,
}

impl Default for RandomRbfGenerator {
    fn default() -> Self {
        Self {
            dims: DEFAULT_RBF_DIMS,
            n_centroids: DEFAULT_RBF_CENTROIDS,
            sample_seed: 0,
        }
    }
}

impl RandomRbfGenerator {
    /// Creates a generator. The sample seed defaults to 0.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::Configuration` if `dims` or `n_centroids` is 0.
    pub fn new(dims: usize, n_centroids: usize) -> Result<Self> {
        if dims == 0 || n_centroids == 0 {
            return Err(DriftError::config(format!(
                "random RBF needs dims > 0 and n_centroids > 0, got {dims} and {n_centroids}"
            )));
        }
        Ok(Self {
            dims,
            n_centroids,
            sample_seed: 0,
        })
    }

    /// Seed of the per-sample draws (centroid choice, direction, distance).
    pub fn with_sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = seed;
        self
    }

    fn centroids(&self, model_seed: u64) -> (Vec<Centroid>, Vec<f64>) {
        let mut rng = StdRng::seed_from_u64(model_seed);
        let mut centroids = Vec::with_capacity(self.n_centroids);
        let mut weights = Vec::with_capacity(self.n_centroids);
        for _ in 0..self.n_centroids {
            let centre = (0..self.dims).map(|_| rng.gen::<f64>()).collect();
            let std_dev = rng.gen::<f64>();
            centroids.push(Centroid { centre, std_dev });
            weights.push(rng.gen::<f64>());
        }
        (centroids, weights)
    }
}

impl ConceptGenerator for RandomRbfGenerator {
    fn dims(&self) -> usize {
        self.dims
    }

    /// Generates `n` samples from the model placed by `seed`.
    fn generate(&self, seed: u64, n: usize) -> Result<Matrix> {
        let (centroids, weights) = self.centroids(seed);
        let chooser = WeightedIndex::new(&weights)
            .map_err(|e| DriftError::config(format!("invalid centroid weights: {e}")))?;

        let mut rng = StdRng::seed_from_u64(self.sample_seed);
        let mut data = Vec::with_capacity(n * self.dims);
        let mut direction = vec![0.0; self.dims];
        for _ in 0..n {
            let centroid = &centroids[chooser.sample(&mut rng)];
            for d in direction.iter_mut() {
                *d = rng.gen::<f64>() * 2.0 - 1.0;
            }
            let magnitude = direction.iter().map(|d| d * d).sum::<f64>().sqrt();
            let z: f64 = StandardNormal.sample(&mut rng);
            let scale = if magnitude > 0.0 {
                z * centroid.std_dev / magnitude
            } else {
                0.0
            };
            data.extend(
                centroid
                    .centre
                    .iter()
                    .zip(&direction)
                    .map(|(c, d)| c + d * scale),
            );
        }
        Matrix::from_vec(n, self.dims, data)
    }
}
