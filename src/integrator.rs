//! Velocity integration
//!
//! Runs after every force pass has finished for the step.

use crate::model::GraphModel;

/// Damp every velocity, then advance each position by it
pub fn integrate(model: &mut GraphModel, damping: f64) {
    let state = model.state_mut();

    for (position, velocity) in state.positions.iter_mut().zip(state.velocities.iter_mut()) {
        *velocity = *velocity * damping;
        *position += *velocity;
    }
}
