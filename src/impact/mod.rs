//! Downstream impact of changed modules
//!
//! Propagation follows the direct downstream edges of the build graph. Each
//! edge is classified by how the downstream module consumes its upstream:
//! main consumption propagates fully, test-scoped consumption propagates as
//! test-only, and a test-only upstream reaches only consumers of its test-jar.
//! Bill-of-materials modules additionally impact every module importing them.

mod bom;
mod downstream;
mod edge;

pub use bom::importers_of;
pub use downstream::DownstreamCalculator;
pub use edge::{classify, EdgeKind};
