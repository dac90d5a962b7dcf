pub struct DefaultsConfig {
    pub max_deviation: f64,
    pub max_leaves: Option<u64>,
    pub max_steps: Option<u64>,
    pub timeout_secs: f64,
    pub parallel: bool,
    pub display_limit: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_deviation: 0.0,
            max_leaves: None,
            max_steps: Some(50_000_000),
            timeout_secs: 60.0,
            parallel: false,
            display_limit: 50,
        }
    }
}
