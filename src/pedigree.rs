//! Whole-database parent graph.
//!
//! [`Relations`](crate::query::Relations) answers questions one individual at a time by
//! re-scanning families. A [`Pedigree`] resolves every `INDI` record's parents once into a
//! directed child → parent graph, after which reachability questions are plain graph walks and
//! terminate on any input, cyclic or not.

use petgraph::{
    algo::has_path_connecting,
    graphmap::DiGraphMap,
    visit::{depth_first_search, DfsEvent, Reversed},
    Direction,
};
use std::collections::BTreeSet;

use crate::{database::Database, error::GedcomError, query::ParentType, record::RecordId};

pub type ParentGraph = DiGraphMap<RecordId, ()>;

#[derive(Debug, Clone, Default)]
pub struct Pedigree {
    graph: ParentGraph,
    parent_type: ParentType,
}

impl Pedigree {
    /// Resolve the parents of every individual in `db` under `parent_type`.
    pub fn build(db: &Database, parent_type: ParentType) -> Result<Pedigree, GedcomError> {
        let relations = db.relations();
        let mut graph = ParentGraph::new();
        for id in db.records() {
            if !db.node(*id).is_individual() {
                continue;
            }
            graph.add_node(*id);
            for parent in relations.parents(*id, parent_type)? {
                if db.node(parent).is_individual() {
                    graph.add_edge(*id, parent, ());
                }
            }
        }
        tracing::debug!(
            "Built {parent_type} pedigree: {} individuals, {} parent links",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Pedigree { graph, parent_type })
    }

    pub fn parent_type(&self) -> ParentType {
        self.parent_type
    }

    pub fn as_graph(&self) -> &ParentGraph {
        &self.graph
    }

    pub fn contains(&self, individual: RecordId) -> bool {
        self.graph.contains_node(individual)
    }

    pub fn parents(&self, individual: RecordId) -> Vec<RecordId> {
        if !self.contains(individual) {
            return Vec::new();
        }
        self.graph
            .neighbors_directed(individual, Direction::Outgoing)
            .collect()
    }

    pub fn children(&self, individual: RecordId) -> Vec<RecordId> {
        if !self.contains(individual) {
            return Vec::new();
        }
        self.graph
            .neighbors_directed(individual, Direction::Incoming)
            .collect()
    }

    /// Every individual reachable by parent links, in discovery order.
    pub fn ancestors(&self, individual: RecordId) -> Vec<RecordId> {
        let mut found = Vec::new();
        if self.contains(individual) {
            depth_first_search(&self.graph, Some(individual), |event| {
                if let DfsEvent::Discover(id, _) = event {
                    if id != individual {
                        found.push(id);
                    }
                }
            });
        }
        found
    }

    /// Every individual reachable by child links, in discovery order.
    pub fn descendants(&self, individual: RecordId) -> Vec<RecordId> {
        let mut found = Vec::new();
        if self.contains(individual) {
            depth_first_search(Reversed(&self.graph), Some(individual), |event| {
                if let DfsEvent::Discover(id, _) = event {
                    if id != individual {
                        found.push(id);
                    }
                }
            });
        }
        found
    }

    pub fn is_ancestor(&self, descendant: RecordId, ancestor: RecordId) -> bool {
        descendant != ancestor
            && self.contains(descendant)
            && self.contains(ancestor)
            && has_path_connecting(&self.graph, descendant, ancestor, None)
    }

    pub fn common_ancestors(&self, a: RecordId, b: RecordId) -> BTreeSet<RecordId> {
        let of_a: BTreeSet<RecordId> = self.ancestors(a).into_iter().collect();
        self.ancestors(b)
            .into_iter()
            .filter(|id| of_a.contains(id))
            .collect()
    }
}
