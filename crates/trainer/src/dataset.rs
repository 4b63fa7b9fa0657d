use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tch::{Device, Kind, Tensor};

use graph_core::{EncoderConfig, MolGraph};
use sequencer::error::Result;
use sequencer::{EncoderError, GraphEncoder};

/// BFS-ordered graph dataset. Owns the corpus and a finalized encoder, and
/// packs encoded samples into the padded tensors the sequence model consumes.
///
/// With `random_order` enabled every draw re-encodes under a fresh BFS
/// ordering (data augmentation); the dataset-level RNG is seeded, so a run
/// with the same seed sees the same batches.
pub struct BfsGraphDataset {
    graphs: Vec<MolGraph>,
    encoder: GraphEncoder,
    device: Device,
    rng: StdRng,
}

impl BfsGraphDataset {
    /// Runs the one-time label-map pass over `graphs` and resolves the
    /// effective `max_num_nodes`.
    pub fn new(graphs: Vec<MolGraph>, config: &EncoderConfig, device: Device) -> Result<Self> {
        if graphs.is_empty() {
            // An explicit node map would otherwise let an empty corpus
            // through and panic on the first draw.
            return Err(EncoderError::Configuration(
                "corpus is empty, nothing to sample".to_string(),
            ));
        }
        let encoder = GraphEncoder::from_corpus(&graphs, config)?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            graphs,
            encoder,
            device,
            rng,
        })
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn encoder(&self) -> &GraphEncoder {
        &self.encoder
    }

    pub fn num_node_classes(&self) -> usize {
        self.encoder.num_node_classes()
    }

    pub fn num_edge_classes(&self) -> usize {
        self.encoder.num_edge_classes()
    }

    pub fn max_num_nodes(&self) -> usize {
        self.encoder.max_num_nodes()
    }

    /// Returns a batch of size `batch_size`:
    /// node classes: [batch_size, max_num_nodes] (zero-padded past each
    /// graph's length), edge windows: [batch_size, max_num_nodes,
    /// max_prev_nodes], lengths: [batch_size] true node counts.
    pub fn sample_batch(&mut self, batch_size: usize) -> Result<(Tensor, Tensor, Tensor)> {
        let max_n = self.encoder.max_num_nodes();
        let max_prev = self.encoder.max_prev_nodes();

        let mut nodes = vec![0i64; batch_size * max_n];
        let mut edges = vec![0i64; batch_size * max_n * max_prev];
        let mut lengths = Vec::with_capacity(batch_size);

        for b in 0..batch_size {
            let idx = self.rng.gen_range(0..self.graphs.len());
            let seed = self.rng.gen::<u64>();
            let sample = self.encoder.encode(&self.graphs[idx], seed)?;

            lengths.push(sample.len() as i64);
            for (i, step) in sample.steps.iter().enumerate() {
                nodes[b * max_n + i] = step.node_class as i64;
                for (j, &class) in step.edge_window.iter().enumerate() {
                    edges[(b * max_n + i) * max_prev + j] = class as i64;
                }
            }
        }

        let node_tensor = Tensor::from_slice(&nodes)
            .view([batch_size as i64, max_n as i64])
            .to_kind(Kind::Int64)
            .to(self.device);
        let edge_tensor = Tensor::from_slice(&edges)
            .view([batch_size as i64, max_n as i64, max_prev as i64])
            .to_kind(Kind::Int64)
            .to(self.device);
        let length_tensor = Tensor::from_slice(&lengths).to(self.device);

        Ok((node_tensor, edge_tensor, length_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_core::BondOrder;

    fn corpus() -> Vec<MolGraph> {
        let mut a = MolGraph::new(vec![6, 6, 8]);
        a.add_edge(0, 1, BondOrder::Single).unwrap();
        a.add_edge(1, 2, BondOrder::Single).unwrap();
        let mut b = MolGraph::new(vec![6, 7]);
        b.add_edge(0, 1, BondOrder::Triple).unwrap();
        vec![a, b]
    }

    #[test]
    fn batch_tensor_shapes() {
        let config = EncoderConfig {
            max_prev_nodes: 4,
            ..EncoderConfig::default()
        };
        let mut dataset = BfsGraphDataset::new(corpus(), &config, Device::Cpu).unwrap();
        assert_eq!(dataset.max_num_nodes(), 3);

        let (nodes, edges, lengths) = dataset.sample_batch(8).unwrap();
        assert_eq!(nodes.size(), vec![8, 3]);
        assert_eq!(edges.size(), vec![8, 3, 4]);
        assert_eq!(lengths.size(), vec![8]);
    }

    #[test]
    fn empty_corpus_fails_at_construction() {
        // Even an explicit node map covering the start label must not
        // produce a dataset with nothing to draw from.
        let mut node_map = std::collections::BTreeMap::new();
        node_map.insert(6u32, 0u32);
        let config = EncoderConfig {
            node_relabel_map: Some(node_map),
            ..EncoderConfig::default()
        };
        let err = BfsGraphDataset::new(Vec::new(), &config, Device::Cpu).unwrap_err();
        assert!(matches!(err, EncoderError::Configuration(_)));
    }

    #[test]
    fn batches_are_reproducible_for_a_seed() {
        let config = EncoderConfig {
            max_prev_nodes: 4,
            seed: 17,
            ..EncoderConfig::default()
        };
        let mut a = BfsGraphDataset::new(corpus(), &config, Device::Cpu).unwrap();
        let mut b = BfsGraphDataset::new(corpus(), &config, Device::Cpu).unwrap();

        let (nodes_a, edges_a, _) = a.sample_batch(4).unwrap();
        let (nodes_b, edges_b, _) = b.sample_batch(4).unwrap();
        assert_eq!(nodes_a, nodes_b);
        assert_eq!(edges_a, edges_b);
    }
}
