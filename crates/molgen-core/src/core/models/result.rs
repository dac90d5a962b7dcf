use super::composite::Composite;
use serde::Serialize;

/// One composite whose mass lies inside the requested window, together with its
/// signed deviation from the target (`mass - target`).
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    composite: Composite,
    deviation: f64,
}

impl GenerationResult {
    pub(crate) fn new(composite: Composite, target_mass: f64) -> Self {
        let deviation = composite.mass() - target_mass;
        Self {
            composite,
            deviation,
        }
    }

    pub fn composite(&self) -> &Composite {
        &self.composite
    }

    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    pub fn mass(&self) -> f64 {
        self.composite.mass()
    }
}
