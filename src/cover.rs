//! Reachability covers
//!
//! Given a directed graph, finds a set of roots from which every vertex is
//! reachable. The indicator structure only generates relations for the
//! roots, since the values of every other function symbol are forced by the
//! identities along some path from a root.
//!
//! The algorithm follows the first half of Kosaraju's strongly connected
//! components algorithm: a depth-first pass records finishing order, then
//! vertices are taken by decreasing finishing time and everything reachable
//! from a taken vertex is claimed. Each root ends up in a different source
//! component of the condensation, so the cover is as small as possible.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, DfsPostOrder, VisitMap};
use rustc_hash::FxHashMap;

use crate::structure::Element;

/// Returns a subset of `vertices` from which all of `vertices` are reachable
///
/// Repeated vertices are considered once. Edges mentioning a vertex outside
/// `vertices` are ignored, so the cover never contains anything new.
pub fn reachability_cover<V, I>(vertices: &[V], edges: I) -> Vec<V>
where
    V: Element,
    I: IntoIterator<Item = (V, V)>,
{
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(vertices.len(), 0);
    let mut nodes: FxHashMap<&V, NodeIndex> = FxHashMap::default();
    let mut labels = Vec::with_capacity(vertices.len());
    for v in vertices {
        nodes.entry(v).or_insert_with(|| {
            labels.push(v);
            graph.add_node(())
        });
    }
    for (u, v) in edges {
        if let (Some(&a), Some(&b)) = (nodes.get(&u), nodes.get(&v)) {
            graph.add_edge(a, b, ());
        }
    }

    let mut finishing = Vec::with_capacity(graph.node_count());
    let mut post_order = DfsPostOrder::empty(&graph);
    for start in graph.node_indices() {
        post_order.move_to(start);
        while let Some(node) = post_order.next(&graph) {
            finishing.push(node);
        }
    }

    let mut roots = Vec::new();
    let mut claim = Dfs::empty(&graph);
    while let Some(candidate) = finishing.pop() {
        if claim.discovered.is_visited(&candidate) {
            continue;
        }
        roots.push(labels[candidate.index()].clone());
        claim.move_to(candidate);
        while claim.next(&graph).is_some() {}
    }

    log::trace!("cover of {} vertices has {} roots", labels.len(), roots.len());
    roots
}
