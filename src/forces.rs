//! Force accumulation for one simulation step
//!
//! Three independent passes add velocity deltas into every node:
//!
//! - **Repulsion**: every unordered pair pushes apart with magnitude
//!   `repulsion / d²` (O(n²))
//! - **Attraction**: every resolved edge pulls its endpoints together with
//!   `attraction × Δ` (linear spring)
//! - **Gravity**: every node is pulled back to its anchor with `gravity × Δ`
//!
//! Contributions accumulate onto the existing velocity. Damping happens later
//! in the integrator.

use serde::{Deserialize, Serialize};

use crate::model::{GraphModel, Point};

/// Default edge attraction coefficient
pub const DEFAULT_ATTRACTION: f64 = 0.005;

/// Default pairwise repulsion coefficient
pub const DEFAULT_REPULSION: f64 = 0.05;

/// Default anchor gravity coefficient
pub const DEFAULT_GRAVITY: f64 = 0.01;

/// Default velocity damping factor (0-1, applied each step)
pub const DEFAULT_DAMPING: f64 = 0.95;

/// Floor applied to pair distances so coincident nodes stay finite
pub const MIN_DISTANCE: f64 = 1e-6;

/// Coefficients for the three forces plus damping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceParameters {
    pub attraction: f64,
    pub repulsion: f64,
    pub gravity: f64,
    pub damping: f64,
}

impl Default for ForceParameters {
    fn default() -> Self {
        Self {
            attraction: DEFAULT_ATTRACTION,
            repulsion: DEFAULT_REPULSION,
            gravity: DEFAULT_GRAVITY,
            damping: DEFAULT_DAMPING,
        }
    }
}

impl ForceParameters {
    /// All forces off; damping left at 1 so nothing decays either
    pub fn zero() -> Self {
        Self {
            attraction: 0.0,
            repulsion: 0.0,
            gravity: 0.0,
            damping: 1.0,
        }
    }

    pub fn with_attraction(mut self, attraction: f64) -> Self {
        self.attraction = attraction;
        self
    }

    pub fn with_repulsion(mut self, repulsion: f64) -> Self {
        self.repulsion = repulsion;
        self
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

/// Accumulate all three forces into every node's velocity
pub fn apply_forces(model: &mut GraphModel, params: &ForceParameters) {
    apply_repulsion(model, params.repulsion);
    apply_attraction(model, params.attraction);
    apply_gravity(model, params.gravity);
}

/// Push every pair of distinct nodes apart, equal and opposite
pub fn apply_repulsion(model: &mut GraphModel, repulsion: f64) {
    let state = model.state_mut();
    let n = state.positions.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let delta = state.positions[j] - state.positions[i];
            let dist = delta.length().max(MIN_DISTANCE);

            // Coincident nodes have delta == 0 and get no push
            let force = repulsion / (dist * dist);
            let push = delta * (force / dist);

            state.velocities[i] -= push;
            state.velocities[j] += push;
        }
    }
}

/// Pull the endpoints of every resolved edge toward each other
pub fn apply_attraction(model: &mut GraphModel, attraction: f64) {
    let state = model.state_mut();

    for &(a, b) in state.links {
        let pull = (state.positions[b] - state.positions[a]) * attraction;
        state.velocities[a] += pull;
        state.velocities[b] -= pull;
    }
}

/// Pull every node back toward its anchor
pub fn apply_gravity(model: &mut GraphModel, gravity: f64) {
    let state = model.state_mut();

    for ((velocity, position), anchor) in state
        .velocities
        .iter_mut()
        .zip(state.positions.iter())
        .zip(state.anchors)
    {
        *velocity += (*anchor - *position) * gravity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeRecord, NodeRecord};

    const EPS: f64 = 1e-12;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn pair(a: (f64, f64), b: (f64, f64), edges: &[EdgeRecord]) -> GraphModel {
        let nodes = vec![NodeRecord::new("a", a.0, a.1), NodeRecord::new("b", b.0, b.1)];
        GraphModel::new(&nodes, edges)
    }

    #[test]
    fn defaults_match_documented_values() {
        let params = ForceParameters::default();
        assert_eq!(params.attraction, 0.005);
        assert_eq!(params.repulsion, 0.05);
        assert_eq!(params.gravity, 0.01);
        assert_eq!(params.damping, 0.95);
    }

    #[test]
    fn repulsion_is_equal_and_opposite() {
        let mut model = pair((0.4, 0.5), (0.6, 0.5), &[]);
        apply_repulsion(&mut model, 0.001);

        // d = 0.2, magnitude = 0.001 / 0.04
        let v = model.velocities();
        assert!(approx(v[0], Point::new(-0.025, 0.0)));
        assert!(approx(v[1], Point::new(0.025, 0.0)));
    }

    #[test]
    fn repulsion_falls_off_with_square_of_distance() {
        let mut near = pair((0.0, 0.0), (0.1, 0.0), &[]);
        let mut far = pair((0.0, 0.0), (0.2, 0.0), &[]);
        apply_repulsion(&mut near, 1.0);
        apply_repulsion(&mut far, 1.0);

        let ratio = near.velocities()[1].x / far.velocities()[1].x;
        assert!((ratio - 4.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_nodes_get_no_push() {
        let mut model = pair((0.5, 0.5), (0.5, 0.5), &[]);
        apply_repulsion(&mut model, 1.0);

        for v in model.velocities() {
            assert!(v.x.is_finite() && v.y.is_finite());
            assert_eq!(*v, Point::ZERO);
        }
    }

    #[test]
    fn near_coincident_pair_uses_floored_distance() {
        let mut model = pair((0.5, 0.5), (0.5 + 4e-7, 0.5), &[]);
        let dx = model.positions()[1].x - model.positions()[0].x;
        assert!(dx > 0.0 && dx < MIN_DISTANCE);

        let repulsion = 1e-12;
        apply_repulsion(&mut model, repulsion);

        // magnitude repulsion / MIN_DISTANCE², direction dx / MIN_DISTANCE
        let expected = repulsion / (MIN_DISTANCE * MIN_DISTANCE) * (dx / MIN_DISTANCE);
        let v = model.velocities();
        assert!((v[1].x - expected).abs() <= expected * 1e-9);
        assert!((v[0].x + expected).abs() <= expected * 1e-9);
        assert_eq!((v[0].y, v[1].y), (0.0, 0.0));

        // unfloored, the push would be repulsion / dx²
        assert!(v[1].x < repulsion / (dx * dx));
    }

    #[test]
    fn attraction_is_linear_in_displacement() {
        let mut model = pair((0.2, 0.2), (0.8, 0.6), &[EdgeRecord::new("a", "b")]);
        apply_attraction(&mut model, 0.1);

        let v = model.velocities();
        assert!(approx(v[0], Point::new(0.06, 0.04)));
        assert!(approx(v[1], Point::new(-0.06, -0.04)));
    }

    #[test]
    fn attraction_skips_edges_to_unknown_nodes() {
        let mut model = pair(
            (0.2, 0.2),
            (0.8, 0.6),
            &[EdgeRecord::new("a", "ghost"), EdgeRecord::new("ghost", "b")],
        );
        apply_attraction(&mut model, 1.0);

        assert!(model.velocities().iter().all(|v| *v == Point::ZERO));
    }

    #[test]
    fn gravity_pulls_toward_anchor() {
        let mut model = pair((0.5, 0.5), (0.1, 0.1), &[]);
        model.state_mut().positions[0] = Point::new(0.9, 0.7);
        apply_gravity(&mut model, 0.5);

        let v = model.velocities();
        assert!(approx(v[0], Point::new(-0.2, -0.1)));
        assert_eq!(v[1], Point::ZERO);
    }

    #[test]
    fn forces_accumulate_onto_existing_velocity() {
        let mut model = pair((0.2, 0.2), (0.8, 0.6), &[EdgeRecord::new("a", "b")]);
        model.state_mut().velocities[0] = Point::new(1.0, 1.0);
        apply_forces(&mut model, &ForceParameters::zero().with_attraction(0.1));

        assert!(approx(model.velocities()[0], Point::new(1.06, 1.04)));
    }

    #[test]
    fn zero_parameters_leave_velocity_untouched() {
        let mut model = pair((0.5, 0.5), (0.5, 0.5), &[EdgeRecord::new("a", "b")]);
        apply_forces(&mut model, &ForceParameters::zero());

        assert!(model.velocities().iter().all(|v| *v == Point::ZERO));
    }

    #[test]
    fn parameters_deserialize_with_defaults() {
        let params: ForceParameters = serde_json::from_str(r#"{"gravity": 0.2}"#).unwrap();
        assert_eq!(params, ForceParameters::default().with_gravity(0.2));
    }
}
