//! Two-layer feed-forward network with a fixed topology.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{CorruptChampion, DimensionMismatch};

// tanh saturates to exactly ±1.0 in f32 for moderate sums; keep outputs strictly inside.
const OUTPUT_BOUND: f32 = 1.0 - f32::EPSILON;

/// Layer sizes of a [`FixedTopologyNetwork`].
///
/// Every network of a population shares one topology; it never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{input_count}-{hidden_count}-{output_count}")]
pub struct Topology {
    pub input_count: usize,
    pub hidden_count: usize,
    pub output_count: usize,
}

impl Topology {
    #[must_use]
    pub const fn new(input_count: usize, hidden_count: usize, output_count: usize) -> Self {
        Self {
            input_count,
            hidden_count,
            output_count,
        }
    }

    /// Number of weights between the input and hidden layers.
    #[must_use]
    pub const fn input_to_hidden_len(&self) -> usize {
        self.input_count * self.hidden_count
    }

    /// Number of weights between the hidden and output layers.
    #[must_use]
    pub const fn hidden_to_output_len(&self) -> usize {
        self.hidden_count * self.output_count
    }

    #[must_use]
    pub const fn weight_count(&self) -> usize {
        self.input_to_hidden_len() + self.hidden_to_output_len()
    }
}

/// Raw weights of a network, in the shape they are persisted.
///
/// `input_to_hidden` is stored row-major by hidden neuron (`hidden × input`), and
/// `hidden_to_output` row-major by output neuron (`output × hidden`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub topology: Topology,
    pub input_to_hidden: Vec<f32>,
    pub hidden_to_output: Vec<f32>,
}

impl NetworkParameters {
    /// Checks that both matrices match the declared topology and hold finite values.
    pub fn validate(&self) -> Result<(), CorruptChampion> {
        let expected = self.topology.input_to_hidden_len();
        if self.input_to_hidden.len() != expected {
            return Err(CorruptChampion::WeightCount {
                layer: "input-to-hidden",
                expected,
                actual: self.input_to_hidden.len(),
            });
        }
        let expected = self.topology.hidden_to_output_len();
        if self.hidden_to_output.len() != expected {
            return Err(CorruptChampion::WeightCount {
                layer: "hidden-to-output",
                expected,
                actual: self.hidden_to_output.len(),
            });
        }
        if !self
            .input_to_hidden
            .iter()
            .chain(&self.hidden_to_output)
            .all(|w| w.is_finite())
        {
            return Err(CorruptChampion::NonFinite);
        }
        Ok(())
    }
}

/// A feed-forward network whose layer sizes are fixed for its whole lifetime.
///
/// The network owns its weight buffers; [`Clone`] produces a deep, independent copy, so
/// mutating a clone never affects the original.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTopologyNetwork {
    params: NetworkParameters,
}

impl FixedTopologyNetwork {
    /// Creates a network with every weight drawn uniformly from `[-1, 1]`.
    pub fn random<R>(rng: &mut R, topology: Topology) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut uniform = |len: usize| {
            (0..len)
                .map(|_| rng.random_range(-1.0..=1.0))
                .collect::<Vec<f32>>()
        };
        let input_to_hidden = uniform(topology.input_to_hidden_len());
        let hidden_to_output = uniform(topology.hidden_to_output_len());
        Self {
            params: NetworkParameters {
                topology,
                input_to_hidden,
                hidden_to_output,
            },
        }
    }

    /// Rebuilds a network from persisted parameters.
    pub fn from_parameters(params: NetworkParameters) -> Result<Self, CorruptChampion> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.params.topology
    }

    #[must_use]
    pub fn parameters(&self) -> &NetworkParameters {
        &self.params
    }

    #[must_use]
    pub fn into_parameters(self) -> NetworkParameters {
        self.params
    }

    /// Iterates every weight positionally: input-to-hidden first, then hidden-to-output.
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.params
            .input_to_hidden
            .iter()
            .chain(&self.params.hidden_to_output)
            .copied()
    }

    pub(crate) fn weights_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        self.params
            .input_to_hidden
            .iter_mut()
            .chain(&mut self.params.hidden_to_output)
    }

    /// Runs one forward pass.
    ///
    /// This is a pure function of the weights and `inputs`. Every output lies strictly
    /// inside `(-1, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionMismatch`] when `inputs.len()` differs from the topology's input
    /// count.
    pub fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>, DimensionMismatch> {
        let Topology {
            input_count,
            hidden_count,
            output_count,
        } = self.params.topology;
        if inputs.len() != input_count {
            return Err(DimensionMismatch {
                expected: input_count,
                actual: inputs.len(),
            });
        }
        let hidden = layer(inputs, &self.params.input_to_hidden, hidden_count);
        let outputs = layer(&hidden, &self.params.hidden_to_output, output_count);
        Ok(outputs)
    }
}

fn layer(inputs: &[f32], weights: &[f32], neurons: usize) -> Vec<f32> {
    debug_assert_eq!(weights.len(), inputs.len() * neurons);
    if inputs.is_empty() {
        return vec![0.0; neurons];
    }
    weights
        .chunks_exact(inputs.len())
        .map(|row| {
            let sum = row.iter().zip(inputs).map(|(w, x)| w * x).sum::<f32>();
            sum.tanh().clamp(-OUTPUT_BOUND, OUTPUT_BOUND)
        })
        .collect()
}
