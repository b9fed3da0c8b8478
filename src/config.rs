//! Configuration for voting-bloc detection

/// Tuning knobs for the Louvain optimizer
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum local-moving iterations within one phase
    pub max_iterations: usize,

    /// Maximum optimization phases (local moving plus aggregation)
    pub max_phases: usize,

    /// Seed for the node visitation shuffle; None draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_phases: 10,
            seed: None,
        }
    }
}

impl Config {
    /// Create a configuration with a fixed shuffle seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
