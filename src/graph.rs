//! Graph Preprocessor: converts a partial symmetric adjacency table into
//! an all-pairs shortest-distance matrix and a successor matrix for path
//! reconstruction (Floyd-Warshall).

use crate::types::{EdgeTable, Tour, UNREACHABLE};

const NONE_SUCCESSOR: isize = -1;

/// Dense all-pairs shortest distances plus successor pointers, built
/// once from a partial adjacency table.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    n: usize,
    dist: Vec<Vec<f64>>,
    next: Vec<Vec<isize>>,
}

impl ShortestPaths {
    /// Run Floyd-Warshall over `edges`. `dist[i][i] = 0`; `dist[i][j]`
    /// is the input weight when a direct edge exists, `+inf` otherwise
    /// until relaxed; remaining `+inf` entries are replaced by the
    /// [`UNREACHABLE`] sentinel on completion.
    pub fn build(edges: &EdgeTable) -> Self {
        let n = edges.n;
        let mut dist = vec![vec![f64::INFINITY; n]; n];
        let mut next = vec![vec![NONE_SUCCESSOR; n]; n];

        for i in 0..n {
            dist[i][i] = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                if let Some(w) = edges.get(i, j) {
                    dist[i][j] = w;
                    next[i][j] = j as isize;
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                if dist[i][k].is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let via = dist[i][k] + dist[k][j];
                    if via < dist[i][j] {
                        dist[i][j] = via;
                        next[i][j] = next[i][k];
                    }
                }
            }
        }

        for row in dist.iter_mut() {
            for d in row.iter_mut() {
                if d.is_infinite() {
                    *d = UNREACHABLE;
                }
            }
        }

        ShortestPaths { n, dist, next }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn distance(&self, u: usize, v: usize) -> f64 {
        self.dist[u][v]
    }

    #[inline]
    pub fn is_reachable(&self, u: usize, v: usize) -> bool {
        self.dist[u][v] < UNREACHABLE
    }

    /// Reconstruct the inclusive shortest-path node sequence from `u` to
    /// `v`. When no successor is recorded (no relaxation touched the
    /// pair, i.e. it is either a direct edge or unreachable) the raw
    /// pair `[u, v]` is returned, matching the source's fallback.
    pub fn expand(&self, u: usize, v: usize) -> Tour {
        if self.next[u][v] == NONE_SUCCESSOR {
            return vec![u, v];
        }

        let mut path = vec![u];
        let mut curr = u;
        while curr != v {
            let nxt = self.next[curr][v];
            if nxt == NONE_SUCCESSOR {
                break;
            }
            curr = nxt as usize;
            path.push(curr);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_edges() -> EdgeTable {
        // 0 - 1 - 2, plus a long direct 0-2 edge, like Scenario A.
        let mut e = EdgeTable::new(3);
        e.add_edge(0, 1, 10.0);
        e.add_edge(1, 2, 10.0);
        e.add_edge(0, 2, 30.0);
        e
    }

    #[test]
    fn shortest_path_prefers_the_two_hop_route() {
        let sp = ShortestPaths::build(&chain_edges());
        assert_eq!(sp.distance(0, 2), 20.0);
        assert_eq!(sp.expand(0, 2), vec![0, 1, 2]);
    }

    #[test]
    fn self_distance_is_zero() {
        let sp = ShortestPaths::build(&chain_edges());
        for i in 0..3 {
            assert_eq!(sp.distance(i, i), 0.0);
        }
    }

    #[test]
    fn symmetry_is_preserved() {
        let sp = ShortestPaths::build(&chain_edges());
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(sp.distance(i, j), sp.distance(j, i));
            }
        }
    }

    #[test]
    fn triangle_inequality_holds() {
        let mut e = EdgeTable::new(4);
        e.add_edge(0, 1, 5.0);
        e.add_edge(1, 2, 5.0);
        e.add_edge(2, 3, 5.0);
        e.add_edge(0, 3, 100.0);
        let sp = ShortestPaths::build(&e);
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    assert!(sp.distance(i, j) <= sp.distance(i, k) + sp.distance(k, j) + 1e-9);
                }
            }
        }
    }

    #[test]
    fn unreachable_pair_gets_sentinel() {
        let mut e = EdgeTable::new(4);
        e.add_edge(0, 1, 1.0);
        e.add_edge(2, 3, 1.0);
        let sp = ShortestPaths::build(&e);
        assert!(!sp.is_reachable(0, 2));
        assert_eq!(sp.distance(0, 2), UNREACHABLE);
    }

    #[test]
    fn expand_roundtrip_matches_summed_distance() {
        let sp = ShortestPaths::build(&chain_edges());
        for u in 0..3 {
            for v in 0..3 {
                if !sp.is_reachable(u, v) {
                    continue;
                }
                let path = sp.expand(u, v);
                let mut total = 0.0;
                for w in path.windows(2) {
                    // direct edges only exist where the table says so; since
                    // this graph is fully connected we can look them up via
                    // distance() on adjacent hops, which for a direct edge
                    // equals the input weight.
                    total += sp.distance(w[0], w[1]);
                }
                assert!((total - sp.distance(u, v)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn direct_edge_respects_input_weight_bound() {
        let sp = ShortestPaths::build(&chain_edges());
        assert!(sp.distance(0, 1) <= 10.0 + 1e-9);
    }
}
