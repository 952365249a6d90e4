//! springlayout - Anchored force-directed layout for graphs.
//!
//! Nodes repel each other, edges act as linear springs, and every node is
//! pulled back toward the position it started at. Each step integrates with
//! velocity damping and clamps positions to the unit square.

pub mod bounds;
pub mod config;
pub mod forces;
pub mod integrator;
pub mod io;
pub mod model;
pub mod simulation;

pub use config::{ConfigError, LayoutConfig};
pub use forces::ForceParameters;
pub use io::{FormatRegistry, IoError, Reader, Writer};
pub use model::{
    EdgeRecord, GraphData, GraphError, GraphModel, NodePosition, NodeRecord, Point,
};
pub use simulation::{NoProgress, ProgressObserver, SimulationDriver, TracingProgress, step};
