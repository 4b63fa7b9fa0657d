use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::BondOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Window size: how many immediately preceding nodes each step's edge
    /// vector covers.
    pub max_prev_nodes: usize,
    /// Atomic number the BFS must start from (6 = carbon).
    pub start_node_label: u32,
    /// Randomize BFS root choice and neighbor expansion (seeded, so still
    /// reproducible) instead of the lowest-index rule.
    pub random_order: bool,
    /// Seed for the randomized ordering and for batch sampling.
    pub seed: u64,
    /// Hard cap on encodable graph size. `None` means "derive from the
    /// corpus maximum" when building a dataset.
    pub max_num_nodes: Option<usize>,
    /// Explicit node label -> class override. `None` derives classes from
    /// observed labels in ascending label order.
    pub node_relabel_map: Option<BTreeMap<u32, u32>>,
    /// Explicit bond order -> class override. `None` derives classes from
    /// observed orders, with `NoBond` as class 0.
    pub edge_relabel_map: Option<BTreeMap<BondOrder, u32>>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        // Binarized bonds: every real bond order collapses to class 1. The
        // inverse of this map does not exist, so decode reports classes.
        let mut edge_relabel_map = BTreeMap::new();
        edge_relabel_map.insert(BondOrder::NoBond, 0);
        edge_relabel_map.insert(BondOrder::Single, 1);
        edge_relabel_map.insert(BondOrder::Aromatic, 1);
        edge_relabel_map.insert(BondOrder::Double, 1);
        edge_relabel_map.insert(BondOrder::Triple, 1);

        Self {
            max_prev_nodes: 12,
            start_node_label: 6,
            random_order: true,
            seed: 5,
            max_num_nodes: None,
            node_relabel_map: None,
            edge_relabel_map: Some(edge_relabel_map),
        }
    }
}

/// Sizing for the recurrent graph generator. Only the arithmetic lives here;
/// the layers themselves belong to the model consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRnnConfig {
    pub edge_embedding_dim: i64,
    pub node_embedding_dim: i64,
    pub node_rnn_hidden_size: i64,
    pub node_rnn_embedding_size: i64,
    pub node_rnn_output_size: i64,
    pub node_rnn_layers: i64,
    pub edge_rnn_hidden_size: i64,
    pub edge_rnn_embedding_size: i64,
    pub edge_rnn_layers: i64,
}

impl Default for GraphRnnConfig {
    fn default() -> Self {
        Self {
            edge_embedding_dim: 128,
            node_embedding_dim: 128,
            node_rnn_hidden_size: 128,
            node_rnn_embedding_size: 64,
            node_rnn_output_size: 16,
            node_rnn_layers: 4,
            edge_rnn_hidden_size: 16,
            edge_rnn_embedding_size: 8,
            edge_rnn_layers: 4,
        }
    }
}

impl GraphRnnConfig {
    /// Input width of the node-level RNN. With only two edge classes the raw
    /// window is fed directly; with more, each window slot is embedded. A
    /// multiclass node vocabulary appends the node embedding.
    pub fn node_rnn_input_size(
        &self,
        num_node_classes: usize,
        num_edge_classes: usize,
        max_prev_nodes: usize,
    ) -> i64 {
        let (mut input_size, node_embedding_dim) = if num_edge_classes > 2 {
            (self.edge_embedding_dim * max_prev_nodes as i64, self.node_embedding_dim)
        } else {
            (max_prev_nodes as i64, max_prev_nodes as i64)
        };
        if num_node_classes > 2 {
            input_size += node_embedding_dim;
        }
        input_size
    }

    /// Output width of the edge-level RNN: one logit per class, or a single
    /// Bernoulli logit when the edge vocabulary is binary.
    pub fn edge_rnn_output_size(&self, num_edge_classes: usize) -> i64 {
        if num_edge_classes > 2 {
            num_edge_classes as i64
        } else {
            1
        }
    }
}
