pub mod error;
pub mod maps;
pub mod bfs;
pub mod encoder;

pub use encoder::{DecodedGraph, DecodedLabel, GraphEncoder, SequenceSample, SequenceStep};
pub use error::EncoderError;
pub use maps::LabelMaps;
