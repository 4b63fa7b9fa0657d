use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("graph has {nodes} nodes, exceeding the limit of {max_num_nodes}")]
    GraphTooLarge { nodes: usize, max_num_nodes: usize },

    #[error("no node carries the start label {label}")]
    NoStartNode { label: u32 },

    #[error("step {step}: window slot {slot} is nonzero but precedes the sequence start")]
    MalformedWindow { step: usize, slot: usize },
}

pub type Result<T> = std::result::Result<T, EncoderError>;
