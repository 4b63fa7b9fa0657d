pub mod graph;
pub mod config;

pub use graph::{BondOrder, GraphError, MolGraph};
pub use config::{EncoderConfig, GraphRnnConfig};
