//! The claims document and its citation graph.
//!
//! A [`ClaimDocument`] owns the ordered claim list and a directed graph of
//! citations (edges point from citing claim to cited claim). The graph must
//! be treated as potentially cyclic: malformed documents can contain
//! self-citations or citation loops, so every traversal carries a visited
//! set.

use std::collections::{HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;

use super::claim::Claim;

/// An ordered, immutable snapshot of a claims document.
#[derive(Debug, Default)]
pub struct ClaimDocument {
    claims: Vec<Claim>,
    by_id: HashMap<u32, usize>,
    /// Citation graph. Edges point from child (citing) to parent (cited).
    /// Cited ids that have no corresponding claim still appear as nodes.
    graph: DiGraphMap<u32, ()>,
}

impl ClaimDocument {
    /// Builds a document from segmented claims, preserving their order.
    ///
    /// If the input contains duplicate claim ids (itself a drafting error),
    /// id lookup resolves to the first occurrence; the full list keeps every
    /// claim so the numbering checker still sees them all.
    #[must_use]
    pub fn new(claims: Vec<Claim>) -> Self {
        let mut by_id = HashMap::with_capacity(claims.len());
        let mut graph = DiGraphMap::with_capacity(claims.len(), claims.len() * 2);

        for (idx, claim) in claims.iter().enumerate() {
            by_id.entry(claim.id()).or_insert(idx);
            graph.add_node(claim.id());
            for &parent in claim.parent_ids() {
                graph.add_edge(claim.id(), parent, ());
            }
        }

        Self {
            claims,
            by_id,
            graph,
        }
    }

    /// The claims in document order.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Looks up a claim by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Claim> {
        self.by_id.get(&id).map(|&idx| &self.claims[idx])
    }

    /// Returns `true` if a claim with this id exists.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// The number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns `true` if the document holds no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// All claims reachable from `id` by following citations transitively.
    ///
    /// The starting claim is not included. Cited ids without a corresponding
    /// claim are skipped. The walk is an explicit stack traversal with a
    /// visited set, so citation cycles terminate.
    #[must_use]
    pub fn ancestors(&self, id: u32) -> Vec<&Claim> {
        let mut visited: HashSet<u32> = HashSet::new();
        visited.insert(id);

        let mut stack: Vec<u32> = self
            .graph
            .neighbors_directed(id, petgraph::Direction::Outgoing)
            .collect();
        let mut ancestors = Vec::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(claim) = self.get(current) {
                ancestors.push(claim);
            }
            stack.extend(
                self.graph
                    .neighbors_directed(current, petgraph::Direction::Outgoing),
            );
        }

        ancestors
    }
}
