use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("edge ({0}, {1}) references a node outside 0..{2}")]
    NodeOutOfBounds(usize, usize, usize),

    #[error("self-loop on node {0}")]
    SelfLoop(usize),

    #[error("nodes {0} and {1} are already bonded")]
    DuplicateEdge(usize, usize),

    #[error("NoBond is the absence of an edge and cannot be stored on one")]
    NoBondEdge,

    #[error("unknown bond order: {0}")]
    UnknownBondOrder(f64),

    #[error("malformed graph string: {0}")]
    Parse(String),
}

/// Bond order of a molecular edge. `NoBond` is the pad/absence value used in
/// edge windows and relabel maps; actual graph edges never carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    NoBond,
    Single,
    Aromatic,
    Double,
    Triple,
}

impl BondOrder {
    pub fn from_f64(order: f64) -> Result<Self, GraphError> {
        match order {
            x if x == 0.0 => Ok(BondOrder::NoBond),
            x if x == 1.0 => Ok(BondOrder::Single),
            x if x == 1.5 => Ok(BondOrder::Aromatic),
            x if x == 2.0 => Ok(BondOrder::Double),
            x if x == 3.0 => Ok(BondOrder::Triple),
            other => Err(GraphError::UnknownBondOrder(other)),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            BondOrder::NoBond => 0.0,
            BondOrder::Single => 1.0,
            BondOrder::Aromatic => 1.5,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
        }
    }
}

/// Undirected labeled molecular graph. Node labels are atomic numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MolGraph {
    node_labels: Vec<u32>,
    adjacency: Vec<Vec<(usize, BondOrder)>>,
}

impl MolGraph {
    pub fn new(node_labels: Vec<u32>) -> Self {
        let adjacency = vec![Vec::new(); node_labels.len()];
        Self {
            node_labels,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_labels.len()
    }

    pub fn node_label(&self, node: usize) -> u32 {
        self.node_labels[node]
    }

    pub fn node_labels(&self) -> &[u32] {
        &self.node_labels
    }

    pub fn add_edge(&mut self, u: usize, v: usize, order: BondOrder) -> Result<(), GraphError> {
        let n = self.node_count();
        if u >= n || v >= n {
            return Err(GraphError::NodeOutOfBounds(u, v, n));
        }
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        if order == BondOrder::NoBond {
            return Err(GraphError::NoBondEdge);
        }
        if self.bond(u, v) != BondOrder::NoBond {
            return Err(GraphError::DuplicateEdge(u, v));
        }
        self.adjacency[u].push((v, order));
        self.adjacency[v].push((u, order));
        Ok(())
    }

    /// Bond order between two nodes, `NoBond` if they are not adjacent.
    pub fn bond(&self, u: usize, v: usize) -> BondOrder {
        self.adjacency[u]
            .iter()
            .find(|(w, _)| *w == v)
            .map(|(_, order)| *order)
            .unwrap_or(BondOrder::NoBond)
    }

    pub fn neighbors(&self, node: usize) -> &[(usize, BondOrder)] {
        &self.adjacency[node]
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|adj| adj.len()).sum::<usize>() / 2
    }

    /// Parses the compact corpus encoding: `atoms|bonds`, where atoms are
    /// comma-separated atomic numbers and bonds are semicolon-separated
    /// `u-v:order` entries, e.g. `6,6,8|0-1:1;1-2:2`.
    pub fn parse_compact(s: &str) -> Result<Self, GraphError> {
        let s = s.trim();
        let (atoms_part, bonds_part) = match s.split_once('|') {
            Some((a, b)) => (a, b),
            None => (s, ""),
        };

        let node_labels = atoms_part
            .split(',')
            .map(|a| {
                a.trim()
                    .parse::<u32>()
                    .map_err(|_| GraphError::Parse(format!("bad atom '{}'", a)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut graph = MolGraph::new(node_labels);

        for bond in bonds_part.split(';').filter(|b| !b.trim().is_empty()) {
            let (pair, order) = bond
                .split_once(':')
                .ok_or_else(|| GraphError::Parse(format!("bad bond '{}'", bond)))?;
            let (u, v) = pair
                .split_once('-')
                .ok_or_else(|| GraphError::Parse(format!("bad bond '{}'", bond)))?;
            let u = u
                .trim()
                .parse::<usize>()
                .map_err(|_| GraphError::Parse(format!("bad node index '{}'", u)))?;
            let v = v
                .trim()
                .parse::<usize>()
                .map_err(|_| GraphError::Parse(format!("bad node index '{}'", v)))?;
            let order = order
                .trim()
                .parse::<f64>()
                .map_err(|_| GraphError::Parse(format!("bad bond order '{}'", order)))?;
            graph.add_edge(u, v, BondOrder::from_f64(order)?)?;
        }

        Ok(graph)
    }
}
