//! Options controlling a single checking session.

/// Knobs for `TypeChecker::with_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Accept `{1, 2.5}` as `real[]` instead of rejecting mixed
    /// int/real array elements.
    pub allow_array_literal_promotion: bool,
    /// Report a warning when a sampled expression may be a non-linear
    /// transform of parameters.
    pub warn_on_jacobian: bool,
    /// Registered as the model-name pseudo variable so no declaration can
    /// shadow it.
    pub model_name: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            allow_array_literal_promotion: false,
            warn_on_jacobian: true,
            model_name: String::from("model"),
        }
    }
}

impl CheckerConfig {
    pub fn with_model_name(mut self, model_name: &str) -> Self {
        self.model_name = model_name.to_string();
        self
    }

    pub fn with_array_literal_promotion(mut self, allow: bool) -> Self {
        self.allow_array_literal_promotion = allow;
        self
    }

    pub fn with_jacobian_warning(mut self, warn: bool) -> Self {
        self.warn_on_jacobian = warn;
        self
    }
}
