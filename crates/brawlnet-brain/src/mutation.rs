//! In-place weight mutation.
//!
//! Mutation is the only source of genetic variation in a lineage: there is no crossover.
//! Every weight is visited independently; with probability `rate` it receives a random
//! perturbation, otherwise it is left untouched.
//!
//! # Perturbations
//!
//! - [`Perturbation::Uniform`] adds `U(-1, 1) · scale`. This is the default and what
//!   [`FixedTopologyNetwork::mutate`] uses with [`DEFAULT_PERTURBATION_SCALE`].
//! - [`Perturbation::Gaussian`] adds a sample from `N(0, scale)`, making small nudges more
//!   likely than large jumps.
//!
//! Weights are not clamped after perturbation; `tanh` keeps the network outputs bounded
//! regardless of weight magnitude.

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::network::FixedTopologyNetwork;

/// Perturbation scale used by [`FixedTopologyNetwork::mutate`].
pub const DEFAULT_PERTURBATION_SCALE: f32 = 0.5;

/// Distribution the perturbation of a mutated weight is drawn from.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Perturbation {
    #[default]
    Uniform,
    Gaussian,
}

/// Parameters of one mutation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Probability of mutating each weight, clamped to `[0, 1]`
    pub rate: f32,
    /// Magnitude of the perturbation (half-width for uniform, σ for Gaussian)
    pub scale: f32,
    pub perturbation: Perturbation,
}

impl Mutation {
    #[must_use]
    pub const fn uniform(rate: f32) -> Self {
        Self {
            rate,
            scale: DEFAULT_PERTURBATION_SCALE,
            perturbation: Perturbation::Uniform,
        }
    }
}

impl FixedTopologyNetwork {
    /// Mutates the weights in place with uniform perturbations of scale
    /// [`DEFAULT_PERTURBATION_SCALE`].
    ///
    /// `mutate(0.0)` leaves the network unchanged; `mutate(1.0)` perturbs every weight.
    pub fn mutate<R>(&mut self, rate: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.mutate_with(&Mutation::uniform(rate), rng);
    }

    /// Mutates the weights in place according to `mutation`.
    pub fn mutate_with<R>(&mut self, mutation: &Mutation, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let rate = f64::from(mutation.rate.clamp(0.0, 1.0));
        let scale = mutation.scale.abs();
        match mutation.perturbation {
            Perturbation::Uniform => {
                for w in self.weights_mut() {
                    if rng.random_bool(rate) {
                        *w += rng.random_range(-1.0_f32..=1.0) * scale;
                    }
                }
            }
            Perturbation::Gaussian => {
                let Ok(normal) = Normal::new(0.0, scale) else {
                    return;
                };
                for w in self.weights_mut() {
                    if rng.random_bool(rate) {
                        *w += rng.sample(normal);
                    }
                }
            }
        }
    }
}
