//! Graph data types and the simulation's node arena
//!
//! Input records ([`NodeRecord`], [`EdgeRecord`], [`GraphData`]) are plain
//! serde types. [`GraphModel`] copies them into dense parallel arrays indexed
//! by a node's position in the input, so force passes work on indices and
//! never alias caller-owned data.

use std::collections::HashMap;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A 2D vector used for positions, velocities and anchors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// A node as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier (e.g., "Lilongwe")
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }
}

/// An unordered pair of node identifiers
///
/// Deserializes from either `["a", "b"]` or `{"from": "a", "to": "b"}` and
/// always serializes as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EdgeRepr", into = "(String, String)")]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
}

impl EdgeRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeRepr {
    Pair(String, String),
    Object { from: String, to: String },
}

impl From<EdgeRepr> for EdgeRecord {
    fn from(repr: EdgeRepr) -> Self {
        match repr {
            EdgeRepr::Pair(from, to) | EdgeRepr::Object { from, to } => Self { from, to },
        }
    }
}

impl From<EdgeRecord> for (String, String) {
    fn from(edge: EdgeRecord) -> Self {
        (edge.from, edge.to)
    }
}

/// Complete input graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Input graphs the simulation cannot start from
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A node coordinate is NaN or infinite
    #[error("node '{id}' has a non-finite position ({x}, {y})")]
    NonFiniteCoordinate { id: String, x: f64, y: f64 },
}

impl GraphData {
    /// Reject nodes whose starting position is NaN or infinite
    ///
    /// One such node would poison every other node through the repulsion
    /// pass, and clamping does not remove NaN.
    pub fn validate(&self) -> Result<(), GraphError> {
        match self
            .nodes
            .iter()
            .find(|n| !(n.x.is_finite() && n.y.is_finite()))
        {
            Some(n) => Err(GraphError::NonFiniteCoordinate {
                id: n.id.clone(),
                x: n.x,
                y: n.y,
            }),
            None => Ok(()),
        }
    }
}

/// A node's final position, the only output of a layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Read-only view of one node in a [`GraphModel`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView<'a> {
    pub index: usize,
    pub id: &'a str,
    pub position: Point,
    pub velocity: Point,
}

/// Mutable access to the arena, handed to the force and integration passes
pub(crate) struct StateMut<'a> {
    pub positions: &'a mut [Point],
    pub velocities: &'a mut [Point],
    pub anchors: &'a [Point],
    pub links: &'a [(usize, usize)],
}

/// Owned, index-addressed state of one simulation run
///
/// Node `i` is the `i`-th input record. Positions, velocities and anchors are
/// parallel arrays; the identifier lookup is built once and never changes.
#[derive(Debug, Clone)]
pub struct GraphModel {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    positions: Vec<Point>,
    velocities: Vec<Point>,
    anchors: Vec<Point>,
    edges: Vec<EdgeRecord>,
    /// Edges whose endpoints both resolved, as index pairs
    links: Vec<(usize, usize)>,
}

impl GraphModel {
    /// Build a model from node and edge records
    ///
    /// Velocities start at zero and anchors are a snapshot of the initial
    /// positions. Duplicate identifiers each get their own slot; the lookup
    /// resolves to the last one.
    pub fn new(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Self {
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let positions: Vec<Point> = nodes.iter().map(|n| Point::new(n.x, n.y)).collect();
        let anchors = positions.clone();
        let velocities = vec![Point::ZERO; nodes.len()];

        let index: HashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let links: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|e| {
                let resolved = index.get(&e.from).zip(index.get(&e.to));
                if resolved.is_none() {
                    debug!(from = %e.from, to = %e.to, "edge references unknown node, ignoring");
                }
                resolved.map(|(&a, &b)| (a, b))
            })
            .collect();

        Self {
            ids,
            index,
            positions,
            velocities,
            anchors,
            edges: edges.to_vec(),
            links,
        }
    }

    pub fn from_graph_data(graph: &GraphData) -> Self {
        Self::new(&graph.nodes, &graph.edges)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index of the node with this identifier, if any
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Look up a node by identifier
    pub fn node(&self, id: &str) -> Option<NodeView<'_>> {
        self.index_of(id).map(|i| self.view(i))
    }

    /// All nodes in input order
    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        (0..self.len()).map(|i| self.view(i))
    }

    /// All edges as supplied, including ones that did not resolve
    pub fn edges(&self) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.edges.iter()
    }

    /// Resolved edges as index pairs
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Anchor (initial position) of the node with this identifier
    pub fn anchor(&self, id: &str) -> Option<Point> {
        self.index_of(id).map(|i| self.anchors[i])
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Point] {
        &self.velocities
    }

    pub(crate) fn state_mut(&mut self) -> StateMut<'_> {
        StateMut {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
            anchors: &self.anchors,
            links: &self.links,
        }
    }

    /// Final `{id, x, y}` for every node, in input order
    pub fn to_positions(&self) -> Vec<NodePosition> {
        self.ids
            .iter()
            .zip(&self.positions)
            .map(|(id, p)| NodePosition {
                id: id.clone(),
                x: p.x,
                y: p.y,
            })
            .collect()
    }

    fn view(&self, index: usize) -> NodeView<'_> {
        NodeView {
            index,
            id: &self.ids[index],
            position: self.positions[index],
            velocity: self.velocities[index],
        }
    }
}

impl From<&GraphData> for GraphModel {
    fn from(graph: &GraphData) -> Self {
        Self::from_graph_data(graph)
    }
}
