use serde::{Deserialize, Serialize};

use rand::rngs::StdRng;
use rand::SeedableRng;

use graph_core::{BondOrder, EncoderConfig, MolGraph};

use crate::bfs::bfs_order;
use crate::error::{EncoderError, Result};
use crate::maps::LabelMaps;

/// One autoregressive generation step: the node's class and the edge classes
/// against the `max_prev_nodes` immediately preceding positions. The window
/// is left-padded with class 0 ("no edge") where it reaches before the start
/// of the ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub node_class: u32,
    pub edge_window: Vec<u32>,
}

/// A graph encoded under one BFS ordering. `order[i]` is the original node
/// index placed at position i; steps are self-contained for the model, the
/// order is kept for interpreting samples back against the source graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSample {
    pub steps: Vec<SequenceStep>,
    pub order: Vec<usize>,
}

impl SequenceSample {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A decoded label. `Exact` carries the original value; `Class` is all the
/// lossy many-to-one maps can give back. Collapsed classes are never dressed
/// up as real labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedLabel<T> {
    Exact(T),
    Class(u32),
}

/// Graph reconstructed from a sequence. Node/edge positions are in BFS index
/// space (0..n of the ordering), not original node indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedGraph {
    pub node_labels: Vec<DecodedLabel<u32>>,
    pub edges: Vec<(usize, usize, DecodedLabel<BondOrder>)>,
}

/// Converts molecular graphs to the fixed-protocol step sequences an
/// autoregressive generator consumes, and back. Holds the finalized label
/// maps; a single instance serves any number of graphs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEncoder {
    maps: LabelMaps,
    max_prev_nodes: usize,
    max_num_nodes: usize,
    start_node_label: u32,
    random_order: bool,
}

impl GraphEncoder {
    pub fn new(maps: LabelMaps, config: &EncoderConfig, max_num_nodes: usize) -> Self {
        Self {
            maps,
            max_prev_nodes: config.max_prev_nodes,
            max_num_nodes,
            start_node_label: config.start_node_label,
            random_order: config.random_order,
        }
    }

    /// Builds the label maps from the corpus and resolves `max_num_nodes`
    /// (configured cap, or the corpus maximum when unset).
    pub fn from_corpus(graphs: &[MolGraph], config: &EncoderConfig) -> Result<Self> {
        let maps = LabelMaps::build(graphs, config)?;
        let max_num_nodes = match config.max_num_nodes {
            Some(max) => max,
            None => graphs.iter().map(|g| g.node_count()).max().unwrap_or(0),
        };
        Ok(Self::new(maps, config, max_num_nodes))
    }

    pub fn maps(&self) -> &LabelMaps {
        &self.maps
    }

    pub fn max_prev_nodes(&self) -> usize {
        self.max_prev_nodes
    }

    pub fn max_num_nodes(&self) -> usize {
        self.max_num_nodes
    }

    pub fn num_node_classes(&self) -> usize {
        self.maps.num_node_classes
    }

    pub fn num_edge_classes(&self) -> usize {
        self.maps.num_edge_classes
    }

    pub fn start_node_class(&self) -> u32 {
        self.maps.start_node_class
    }

    /// Encodes one graph. Deterministic for a given seed: the same graph and
    /// seed reproduce an identical sample, whether or not `random_order` is
    /// set.
    pub fn encode(&self, graph: &MolGraph, seed: u64) -> Result<SequenceSample> {
        let n = graph.node_count();
        if n > self.max_num_nodes {
            return Err(EncoderError::GraphTooLarge {
                nodes: n,
                max_num_nodes: self.max_num_nodes,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let order = bfs_order(graph, self.start_node_label, self.random_order, &mut rng)?;

        let mut steps = Vec::with_capacity(n);
        for (i, &node) in order.iter().enumerate() {
            let node_class = self.maps.node_class(graph.node_label(node))?;

            let mut edge_window = Vec::with_capacity(self.max_prev_nodes);
            for j in 0..self.max_prev_nodes {
                let prev = i as i64 - self.max_prev_nodes as i64 + j as i64;
                let class = if prev < 0 {
                    0
                } else {
                    self.maps.edge_class(graph.bond(order[prev as usize], node))?
                };
                edge_window.push(class);
            }

            steps.push(SequenceStep {
                node_class,
                edge_window,
            });
        }

        Ok(SequenceSample { steps, order })
    }

    /// Inverse direction, used to interpret generated samples. Exact labels
    /// come back only where the forward map was injective; collapsed classes
    /// stay classes. A nonzero window slot that points before the start of
    /// the ordering is malformed model output and is rejected, not dropped.
    pub fn decode(&self, sample: &SequenceSample) -> Result<DecodedGraph> {
        let node_labels = sample
            .steps
            .iter()
            .map(|step| match &self.maps.node_inverse {
                Some(inverse) => inverse
                    .get(&step.node_class)
                    .map(|&label| DecodedLabel::Exact(label))
                    .unwrap_or(DecodedLabel::Class(step.node_class)),
                None => DecodedLabel::Class(step.node_class),
            })
            .collect();

        let mut edges = Vec::new();
        for (i, step) in sample.steps.iter().enumerate() {
            for (j, &class) in step.edge_window.iter().enumerate() {
                if class == 0 {
                    continue;
                }
                let prev = i as i64 - self.max_prev_nodes as i64 + j as i64;
                if prev < 0 {
                    return Err(EncoderError::MalformedWindow { step: i, slot: j });
                }
                let label = match &self.maps.edge_inverse {
                    Some(inverse) => inverse
                        .get(&class)
                        .map(|&order| DecodedLabel::Exact(order))
                        .unwrap_or(DecodedLabel::Class(class)),
                    None => DecodedLabel::Class(class),
                };
                edges.push((prev as usize, i, label));
            }
        }

        Ok(DecodedGraph { node_labels, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ethanol_like() -> MolGraph {
        // C - C - O
        let mut g = MolGraph::new(vec![6, 6, 8]);
        g.add_edge(0, 1, BondOrder::Single).unwrap();
        g.add_edge(1, 2, BondOrder::Single).unwrap();
        g
    }

    fn deterministic_config() -> EncoderConfig {
        EncoderConfig {
            random_order: false,
            max_prev_nodes: 4,
            edge_relabel_map: None,
            ..EncoderConfig::default()
        }
    }

    #[test]
    fn windows_are_left_padded() {
        let corpus = vec![ethanol_like()];
        let encoder = GraphEncoder::from_corpus(&corpus, &deterministic_config()).unwrap();
        let sample = encoder.encode(&corpus[0], 0).unwrap();

        assert_eq!(sample.len(), 3);
        // Step 0 has no predecessors at all.
        assert_eq!(sample.steps[0].edge_window, vec![0, 0, 0, 0]);
        // Step i keeps the first max_prev_nodes - i slots padded.
        assert_eq!(&sample.steps[1].edge_window[..3], &[0, 0, 0]);
        assert_eq!(&sample.steps[2].edge_window[..2], &[0, 0]);
    }

    #[test]
    fn sequence_length_matches_node_count() {
        let corpus = vec![ethanol_like()];
        let encoder = GraphEncoder::from_corpus(&corpus, &deterministic_config()).unwrap();
        let sample = encoder.encode(&corpus[0], 7).unwrap();
        assert_eq!(sample.len(), corpus[0].node_count());
        assert!(sample.len() <= encoder.max_num_nodes());
    }

    #[test]
    fn oversized_graph_is_rejected() {
        let corpus = vec![ethanol_like()];
        let config = EncoderConfig {
            max_num_nodes: Some(2),
            ..deterministic_config()
        };
        let encoder = GraphEncoder::from_corpus(&corpus, &config).unwrap();
        let err = encoder.encode(&corpus[0], 0).unwrap_err();
        assert!(matches!(
            err,
            EncoderError::GraphTooLarge {
                nodes: 3,
                max_num_nodes: 2
            }
        ));
    }

    #[test]
    fn encode_is_deterministic_per_seed() {
        let corpus = vec![ethanol_like()];
        let config = EncoderConfig {
            random_order: true,
            ..deterministic_config()
        };
        let encoder = GraphEncoder::from_corpus(&corpus, &config).unwrap();
        let a = encoder.encode(&corpus[0], 11).unwrap();
        let b = encoder.encode(&corpus[0], 11).unwrap();
        assert_eq!(a, b);
    }
}
