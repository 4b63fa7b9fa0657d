use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use graph_core::MolGraph;

use crate::error::{EncoderError, Result};

/// Breadth-first node ordering rooted at a node carrying `start_label`.
///
/// Deterministic policy: lowest-index candidate root, neighbors expanded in
/// ascending index order. With `random_order` the root is drawn uniformly
/// from the candidates and same-depth neighbor expansion is shuffled; the
/// caller's seeded RNG keeps that reproducible.
///
/// Disconnected graphs are still totally ordered: traversal restarts from the
/// remaining unvisited nodes until every node is placed.
pub fn bfs_order(
    graph: &MolGraph,
    start_label: u32,
    random_order: bool,
    rng: &mut StdRng,
) -> Result<Vec<usize>> {
    let n = graph.node_count();
    let candidates: Vec<usize> = (0..n)
        .filter(|&node| graph.node_label(node) == start_label)
        .collect();
    if candidates.is_empty() {
        return Err(EncoderError::NoStartNode { label: start_label });
    }

    let root = if random_order {
        candidates[rng.gen_range(0..candidates.len())]
    } else {
        candidates[0]
    };

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    visited[root] = true;
    queue.push_back(root);

    while order.len() < n {
        let u = match queue.pop_front() {
            Some(u) => u,
            None => {
                // Disconnected remainder: restart from an unvisited node.
                let remaining: Vec<usize> = (0..n).filter(|&v| !visited[v]).collect();
                let next = if random_order {
                    remaining[rng.gen_range(0..remaining.len())]
                } else {
                    remaining[0]
                };
                visited[next] = true;
                next
            }
        };
        order.push(u);

        let mut frontier: Vec<usize> = graph
            .neighbors(u)
            .iter()
            .map(|(v, _)| *v)
            .filter(|&v| !visited[v])
            .collect();
        frontier.sort_unstable();
        if random_order {
            frontier.shuffle(rng);
        }
        for v in frontier {
            visited[v] = true;
            queue.push_back(v);
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_core::BondOrder;
    use rand::SeedableRng;

    fn path_graph() -> MolGraph {
        // 8 - 6 - 6 - 7, carbon at indices 1 and 2
        let mut g = MolGraph::new(vec![8, 6, 6, 7]);
        g.add_edge(0, 1, BondOrder::Single).unwrap();
        g.add_edge(1, 2, BondOrder::Single).unwrap();
        g.add_edge(2, 3, BondOrder::Single).unwrap();
        g
    }

    #[test]
    fn deterministic_order_starts_at_lowest_carbon() {
        let g = path_graph();
        let mut rng = StdRng::seed_from_u64(0);
        let order = bfs_order(&g, 6, false, &mut rng).unwrap();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn no_start_candidate_fails() {
        let g = MolGraph::new(vec![8, 7]);
        let mut rng = StdRng::seed_from_u64(0);
        let err = bfs_order(&g, 6, false, &mut rng).unwrap_err();
        assert!(matches!(err, EncoderError::NoStartNode { label: 6 }));
    }

    #[test]
    fn disconnected_graph_is_fully_ordered() {
        let mut g = MolGraph::new(vec![6, 7, 6, 8]);
        g.add_edge(0, 1, BondOrder::Single).unwrap();
        // Nodes 2 and 3 form a separate component.
        g.add_edge(2, 3, BondOrder::Double).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let order = bfs_order(&g, 6, false, &mut rng).unwrap();
        assert_eq!(order.len(), 4);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(order[0], 0);
    }

    #[test]
    fn random_order_is_reproducible_per_seed() {
        let g = path_graph();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = bfs_order(&g, 6, true, &mut rng_a).unwrap();
        let b = bfs_order(&g, 6, true, &mut rng_b).unwrap();
        assert_eq!(a, b);
        assert!(g.node_label(a[0]) == 6);
    }
}
