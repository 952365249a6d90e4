//! Simulation driver
//!
//! A run owns one [`GraphModel`] and applies [`step`] to it a fixed number of
//! times. There is no convergence check and no early exit. Progress is
//! reported through an optional [`ProgressObserver`] that never influences
//! the result.
//!
//! # Example
//!
//! ```rust
//! use springlayout::{EdgeRecord, GraphData, LayoutConfig, NodeRecord, SimulationDriver};
//!
//! let graph = GraphData {
//!     nodes: vec![NodeRecord::new("a", 0.2, 0.2), NodeRecord::new("b", 0.8, 0.8)],
//!     edges: vec![EdgeRecord::new("a", "b")],
//! };
//!
//! let driver = SimulationDriver::new(LayoutConfig::default()).unwrap();
//! let positions = driver.run(&graph);
//!
//! assert_eq!(positions.len(), 2);
//! assert!(positions.iter().all(|p| (0.0..=1.0).contains(&p.x)));
//! ```

use tracing::info;

use crate::bounds::{self, Bounds};
use crate::config::{ConfigResult, LayoutConfig};
use crate::forces::{self, ForceParameters};
use crate::integrator;
use crate::model::{GraphData, GraphModel, NodePosition};

/// Receives progress notifications during a run
pub trait ProgressObserver {
    /// Called after step `iteration` (1-based) of `total` completes
    fn on_progress(&mut self, iteration: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, iteration: usize, total: usize) {
        self(iteration, total)
    }
}

/// Observer that discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _iteration: usize, _total: usize) {}
}

/// Observer that logs progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_progress(&mut self, iteration: usize, total: usize) {
        info!(iteration, total, "iteration {iteration}/{total} complete");
    }
}

/// One full step: forces, then integration, then clamping to the unit square
pub fn step(model: &mut GraphModel, params: &ForceParameters) {
    forces::apply_forces(model, params);
    integrator::integrate(model, params.damping);
    bounds::clamp(model, Bounds::UNIT);
}

/// Runs validated layout configurations against graphs
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    config: LayoutConfig,
}

impl SimulationDriver {
    /// Create a driver, rejecting invalid coefficients up front
    pub fn new(config: LayoutConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `graph` and return final positions in input order
    pub fn run(&self, graph: &GraphData) -> Vec<NodePosition> {
        self.run_with_observer(graph, &mut NoProgress)
    }

    /// Like [`run`](Self::run), reporting progress to `observer`
    pub fn run_with_observer(
        &self,
        graph: &GraphData,
        observer: &mut dyn ProgressObserver,
    ) -> Vec<NodePosition> {
        let mut model = GraphModel::from_graph_data(graph);
        self.run_model(&mut model, observer);
        model.to_positions()
    }

    /// Run every configured step on an existing model
    pub fn run_model(&self, model: &mut GraphModel, observer: &mut dyn ProgressObserver) {
        let LayoutConfig {
            iterations,
            params,
            progress_interval,
        } = self.config;

        info!(
            nodes = model.len(),
            edges = model.links().len(),
            iterations,
            attraction = params.attraction,
            repulsion = params.repulsion,
            gravity = params.gravity,
            damping = params.damping,
            "starting layout"
        );

        for i in 0..iterations {
            step(model, &params);

            let done = i + 1;
            if progress_interval > 0 && done % progress_interval == 0 {
                observer.on_progress(done, iterations);
            }
        }

        info!(iterations, "layout finished");
    }
}
