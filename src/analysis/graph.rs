// Topology graph assembled from scanner facts

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Node grouping by fact source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Compose,
    K8s,
    External,
}

impl NodeGroup {
    /// Group name as used in diagram class directives
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeGroup::Compose => "compose",
            NodeGroup::K8s => "k8s",
            NodeGroup::External => "external",
        }
    }

    /// Namespace prefix for node ids
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeGroup::Compose => "compose",
            NodeGroup::K8s => "k8s",
            NodeGroup::External => "ext",
        }
    }
}

/// Build a namespaced node id from a raw name
///
/// Characters outside `[A-Za-z0-9:_\-/.]` are replaced with `_` so the id is
/// safe to embed in diagram syntax.
pub fn node_id(group: NodeGroup, name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ":_-/.".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}:{}", group.prefix(), safe)
}

/// A topology entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Namespaced id, unique within the graph
    pub id: String,
    /// Display text; fixed by the first insertion
    pub label: String,
    /// Source grouping; fixed at creation
    pub group: NodeGroup,
    /// Markers (`public`, `db`, `svc`, `workload`, `ingress`), add-only
    pub tags: BTreeSet<String>,
    /// Port strings, add-only
    pub ports: BTreeSet<String>,
    /// Auxiliary annotations; later writes win per key
    pub meta: BTreeMap<String, String>,
}

impl Node {
    fn new(id: String, label: &str, group: NodeGroup) -> Self {
        Self {
            id,
            label: label.to_string(),
            group,
            tags: BTreeSet::new(),
            ports: BTreeSet::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Add a tag marker
    pub fn tag(&mut self, tag: &str) -> &mut Self {
        self.tags.insert(tag.to_string());
        self
    }

    /// Check for a tag marker
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Add a port string
    pub fn add_port(&mut self, port: impl Into<String>) -> &mut Self {
        self.ports.insert(port.into());
        self
    }

    /// Set a metadata annotation
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Kind of relation between two topology nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Compose startup dependency
    DependsOn,
    /// Service selects a workload (naming convention)
    Selects,
    /// Ingress routes to a service (naming convention)
    Routes,
    /// Entity talks to an external database/broker
    Uses,
    /// Internet reachability; rendered without a label
    Exposes,
}

impl EdgeKind {
    /// Label as rendered on the edge; empty for exposure edges
    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::DependsOn => "depends_on",
            EdgeKind::Selects => "selects",
            EdgeKind::Routes => "routes",
            EdgeKind::Uses => "uses",
            EdgeKind::Exposes => "",
        }
    }
}

/// A directed edge between two node ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            kind,
        }
    }
}

/// The deployment topology graph
///
/// Nodes keep first-insertion order and edges keep append order; the renderer
/// depends on both for byte-identical output across runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TopologyGraph {
    /// Nodes by id
    pub nodes: IndexMap<String, Node>,
    /// All edges; duplicates are preserved
    pub edges: Vec<Edge>,
    /// One-line description of what was found
    pub summary: String,
}

impl TopologyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or merge into an existing one
    ///
    /// The first insertion fixes `label` and `group`; later calls for the
    /// same id return the existing node so tags/ports/meta accumulate.
    pub fn upsert(&mut self, id: &str, label: &str, group: NodeGroup) -> &mut Node {
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| Node::new(id.to_string(), label, group))
    }

    /// Append an edge
    pub fn link(&mut self, src: impl Into<String>, dst: impl Into<String>, kind: EdgeKind) {
        self.edges.push(Edge::new(src, dst, kind));
    }

    /// Get a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterate nodes in insertion order
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate nodes of one group, preserving insertion order
    pub fn group_nodes(&self, group: NodeGroup) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.group == group)
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            compose: self.group_nodes(NodeGroup::Compose).count(),
            k8s: self.group_nodes(NodeGroup::K8s).count(),
            external: self.group_nodes(NodeGroup::External).count(),
            public: self.iter_nodes().filter(|n| n.has_tag("public")).count(),
        }
    }
}

/// Statistics about the topology graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub compose: usize,
    pub k8s: usize,
    pub external: usize,
    pub public: usize,
}
