use super::budget::SearchBudget;
use crate::core::models::unit::QuantityMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Everything a generation run needs besides the units themselves.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub target_mass: f64,
    pub max_deviation: f64,
    pub min_quantities: QuantityMap,
    pub max_quantities: QuantityMap,
    pub budget: SearchBudget,
    /// Split the search across the rayon thread pool. Ignored when the crate is
    /// built without the `parallel` feature.
    pub parallel: bool,
}

#[derive(Default)]
pub struct GenerationConfigBuilder {
    target_mass: Option<f64>,
    max_deviation: Option<f64>,
    min_quantities: Option<QuantityMap>,
    max_quantities: Option<QuantityMap>,
    budget: Option<SearchBudget>,
    parallel: Option<bool>,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_mass(mut self, mass: f64) -> Self {
        self.target_mass = Some(mass);
        self
    }
    pub fn max_deviation(mut self, deviation: f64) -> Self {
        self.max_deviation = Some(deviation);
        self
    }
    pub fn min_quantities(mut self, quantities: QuantityMap) -> Self {
        self.min_quantities = Some(quantities);
        self
    }
    pub fn max_quantities(mut self, quantities: QuantityMap) -> Self {
        self.max_quantities = Some(quantities);
        self
    }
    pub fn budget(mut self, budget: SearchBudget) -> Self {
        self.budget = Some(budget);
        self
    }
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = Some(enabled);
        self
    }

    /// Target mass and deviation are required; quantity maps default to empty,
    /// the budget to unlimited and parallelism to off.
    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        Ok(GenerationConfig {
            target_mass: self
                .target_mass
                .ok_or(ConfigError::MissingParameter("target-mass"))?,
            max_deviation: self
                .max_deviation
                .ok_or(ConfigError::MissingParameter("max-deviation"))?,
            min_quantities: self.min_quantities.unwrap_or_default(),
            max_quantities: self.max_quantities.unwrap_or_default(),
            budget: self.budget.unwrap_or_default(),
            parallel: self.parallel.unwrap_or(false),
        })
    }
}
