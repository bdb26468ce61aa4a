//! Fixed-topology neural network used to pilot arena agents.
//!
//! This crate is the leaf of the workspace: it knows nothing about the arena, only about
//! turning a fixed-length observation into a fixed-length decision vector and about the
//! genetic operators the training loop applies to the weights.
//!
//! - [`network`] - [`FixedTopologyNetwork`](network::FixedTopologyNetwork), its
//!   [`Topology`](network::Topology) and serializable
//!   [`NetworkParameters`](network::NetworkParameters)
//! - [`mutation`] - in-place weight perturbation (the only source of genetic variation)
//!
//! # Network Shape
//!
//! ```text
//! inputs (input_count)
//!     ↓ tanh(Σ input·w1)
//! hidden (hidden_count)
//!     ↓ tanh(Σ hidden·w2)
//! outputs (output_count), each strictly inside (-1, 1)
//! ```
//!
//! There are no biases and no structural mutation: the weight vector of a lineage keeps the
//! same length forever, so inheritance and mutation can work positionally.
//!
//! # Example
//!
//! ```
//! use brawlnet_brain::network::{FixedTopologyNetwork, Topology};
//!
//! let mut rng = rand::rng();
//! let topology = Topology::new(3, 4, 2);
//! let network = FixedTopologyNetwork::random(&mut rng, topology);
//!
//! let outputs = network.predict(&[0.5, -0.25, 1.0]).unwrap();
//! assert_eq!(outputs.len(), 2);
//! assert!(outputs.iter().all(|v| v.abs() < 1.0));
//!
//! let mut child = network.clone();
//! child.mutate(0.15, &mut rng);
//! ```

pub mod mutation;
pub mod network;

/// Observation length does not match the network's input count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("observation has {actual} values but the network expects {expected}")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Persisted network parameters do not fit the topology they claim.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CorruptChampion {
    #[display("{layer} weights have {actual} values, topology requires {expected}")]
    WeightCount {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },
    #[display("network topology {actual} differs from the expected {expected}")]
    TopologyMismatch {
        expected: network::Topology,
        actual: network::Topology,
    },
    #[display("network contains non-finite weights")]
    NonFinite,
    #[display("champion generation {generation} leaves no room for another generation")]
    GenerationExhausted { generation: u32 },
}
