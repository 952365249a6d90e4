//! Boundary clamping applied after every integration step

use crate::model::GraphModel;

/// Closed coordinate range applied independently to x and y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// The unit square, [0, 1] on both axes
    pub const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Clamp every node's x and y into `bounds`
///
/// Velocity is left as is.
pub fn clamp(model: &mut GraphModel, bounds: Bounds) {
    let state = model.state_mut();

    for position in state.positions.iter_mut() {
        position.x = position.x.clamp(bounds.min, bounds.max);
        position.y = position.y.clamp(bounds.min, bounds.max);
    }
}
