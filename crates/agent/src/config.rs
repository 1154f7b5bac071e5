//! Loop configuration — explicit, passed into constructors.

/// Settings shared by both agent loops.
///
/// Constructed by the front end from the application config; the loops
/// never read ambient process state.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier sent with every request.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Upper bound on model calls within a single turn. The loops treat
    /// exceeding it as a reported failure, not an endless recursion.
    pub max_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_iterations: 12,
        }
    }
}
