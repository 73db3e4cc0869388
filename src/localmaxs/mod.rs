//! LocalMaxs extraction
//!
//! Three steps run strictly in order over a fully built n-gram table:
//! - [`propagator`]: glue plus shorter/longer neighbour glue and their maxima
//! - [`classifier`]: the local-maximum decision per n-gram
//! - [`sampler`]: a bounded random sample of the relevant expressions

pub mod classifier;
pub mod propagator;
pub mod sampler;

pub use classifier::LocalMaxsClassifier;
pub use propagator::{GluePropagator, PropagationStats};
pub use sampler::ExpressionSampler;
