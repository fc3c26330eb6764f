//! Disjoint-set clustering over record indices.
//!
//! Records are pre-registered as singleton sets, then merged by the edges
//! the comparator emitted. Union by rank with iterative path compression;
//! no recursion, so arbitrarily large id sets are safe. The resulting
//! partition is independent of edge order (the chosen root per cluster is
//! not, so callers must depend on membership only).

use std::collections::BTreeMap;

use crate::models::SimilarityEdge;

/// Union-find over a dense index arena `0..n`.
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Root representative of `x`, compressing the path behind it.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != cur {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`, by rank.
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }

    /// Read out the partition: members grouped by root, singletons included.
    ///
    /// Clusters are ordered by their smallest member index and members in
    /// index order, so the readout is deterministic for a given edge set.
    pub fn clusters(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..n {
            let root = self.find(i);
            by_root.entry(root).or_default().push(i);
        }
        let mut clusters: Vec<Vec<usize>> = by_root.into_values().collect();
        clusters.sort_by_key(|members| members[0]);
        clusters
    }
}

/// Apply all edges over `n` pre-registered singletons and read out clusters.
pub fn cluster_edges(n: usize, edges: &[SimilarityEdge]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(n);
    for edge in edges {
        uf.union(edge.a, edge.b);
    }
    uf.clusters()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize) -> SimilarityEdge {
        SimilarityEdge { a, b, score: 1.0 }
    }

    #[test]
    fn no_edges_all_singletons() {
        let clusters = cluster_edges(4, &[]);
        assert_eq!(clusters, vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn transitive_chain_merges() {
        // A-B and B-C merge {A, B, C} even though A-C was never compared.
        let clusters = cluster_edges(4, &[edge(0, 1), edge(1, 2)]);
        assert_eq!(clusters, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn partition_invariant() {
        let edges = [edge(0, 3), edge(1, 4), edge(3, 5)];
        let clusters = cluster_edges(6, &edges);

        let mut seen = vec![false; 6];
        for cluster in &clusters {
            for &i in cluster {
                assert!(!seen[i], "index {} in more than one cluster", i);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "some index missing from partition");
    }

    #[test]
    fn edge_order_does_not_change_partition() {
        let forward = [edge(0, 1), edge(1, 2), edge(4, 5)];
        let reversed = [edge(4, 5), edge(1, 2), edge(0, 1)];
        assert_eq!(cluster_edges(6, &forward), cluster_edges(6, &reversed));
    }

    #[test]
    fn self_union_is_noop() {
        let mut uf = UnionFind::new(3);
        uf.union(1, 1);
        assert_eq!(uf.clusters(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn deep_chain_compresses_without_recursion() {
        let n = 10_000;
        let mut uf = UnionFind::new(n);
        for i in 1..n {
            uf.union(i - 1, i);
        }
        let clusters = uf.clusters();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), n);
    }
}
