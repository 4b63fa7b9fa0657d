use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use graph_core::{BondOrder, EncoderConfig, MolGraph};

use crate::error::{EncoderError, Result};

/// Immutable relabeling tables shared by every encode/decode call. Built once
/// from the corpus (or explicit overrides) and never mutated afterward.
///
/// An inverse table is present only when the forward map is injective. The
/// binarized edge map collapses all real bond orders to one class, so its
/// inverse is absent and decode reports classes instead of bond orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelMaps {
    pub node_forward: BTreeMap<u32, u32>,
    pub node_inverse: Option<BTreeMap<u32, u32>>,
    pub edge_forward: BTreeMap<BondOrder, u32>,
    pub edge_inverse: Option<BTreeMap<u32, BondOrder>>,
    pub num_node_classes: usize,
    pub num_edge_classes: usize,
    pub start_node_label: u32,
    pub start_node_class: u32,
}

impl LabelMaps {
    /// One-time preprocessing pass over the whole corpus.
    ///
    /// Without an explicit node map, distinct labels are assigned classes in
    /// ascending label order, which keeps class ids stable across corpus
    /// shuffles. Explicit maps are applied as given after validation.
    pub fn build(graphs: &[MolGraph], config: &EncoderConfig) -> Result<Self> {
        let node_forward = match &config.node_relabel_map {
            Some(map) => map.clone(),
            None => {
                let labels: BTreeSet<u32> = graphs
                    .iter()
                    .flat_map(|g| g.node_labels().iter().copied())
                    .collect();
                labels
                    .into_iter()
                    .enumerate()
                    .map(|(class, label)| (label, class as u32))
                    .collect()
            }
        };
        let num_node_classes = validate_classes(node_forward.values().copied(), "node")?;
        let node_inverse = invert(&node_forward);

        let edge_forward = match &config.edge_relabel_map {
            Some(map) => map.clone(),
            None => {
                let orders: BTreeSet<BondOrder> = graphs
                    .iter()
                    .flat_map(|g| {
                        (0..g.node_count())
                            .flat_map(move |u| g.neighbors(u).iter().map(|(_, order)| *order))
                    })
                    .collect();
                let mut map = BTreeMap::new();
                map.insert(BondOrder::NoBond, 0);
                for (i, order) in orders.into_iter().enumerate() {
                    map.insert(order, i as u32 + 1);
                }
                map
            }
        };
        let num_edge_classes = validate_classes(edge_forward.values().copied(), "edge")?;
        if edge_forward.get(&BondOrder::NoBond) != Some(&0) {
            return Err(EncoderError::Configuration(
                "edge relabel map must send NoBond to class 0 (the pad value)".to_string(),
            ));
        }
        let edge_inverse = invert(&edge_forward);

        let start_node_class = *node_forward.get(&config.start_node_label).ok_or_else(|| {
            EncoderError::Configuration(format!(
                "start node label {} has no class in the node relabel map",
                config.start_node_label
            ))
        })?;

        Ok(Self {
            node_forward,
            node_inverse,
            edge_forward,
            edge_inverse,
            num_node_classes,
            num_edge_classes,
            start_node_label: config.start_node_label,
            start_node_class,
        })
    }

    pub fn node_class(&self, label: u32) -> Result<u32> {
        self.node_forward.get(&label).copied().ok_or_else(|| {
            EncoderError::Configuration(format!(
                "node label {} has no class in the node relabel map",
                label
            ))
        })
    }

    pub fn edge_class(&self, order: BondOrder) -> Result<u32> {
        self.edge_forward.get(&order).copied().ok_or_else(|| {
            EncoderError::Configuration(format!(
                "bond order {:?} has no class in the edge relabel map",
                order
            ))
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let maps: LabelMaps = serde_json::from_reader(reader)?;
        Ok(maps)
    }
}

/// Class ids must be contiguous from 0: they index embedding tables
/// downstream. Returns the class count.
fn validate_classes(values: impl Iterator<Item = u32>, kind: &str) -> Result<usize> {
    let classes: BTreeSet<u32> = values.collect();
    let expected: BTreeSet<u32> = (0..classes.len() as u32).collect();
    if classes != expected {
        return Err(EncoderError::Configuration(format!(
            "{} relabel map classes must be contiguous from 0, got {:?}",
            kind, classes
        )));
    }
    Ok(classes.len())
}

fn invert<K: Copy + Ord>(forward: &BTreeMap<K, u32>) -> Option<BTreeMap<u32, K>> {
    let mut inverse = BTreeMap::new();
    for (key, class) in forward {
        if inverse.insert(*class, *key).is_some() {
            // Many-to-one: no well-defined inverse.
            return None;
        }
    }
    Some(inverse)
}
