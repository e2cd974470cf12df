//! Application labels attached to every exported series.
//!
//! The telemetry resource itself is assembled by the metrics pipeline; this
//! type only carries what the process says about itself.

/// Application labels supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationResource {
    pub service_name: String,
    pub version: String,
    pub environment: String,
}

impl ApplicationResource {
    pub fn new(
        service_name: impl Into<String>,
        version: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            version: version.into(),
            environment: environment.into(),
        }
    }

    /// Labels without a semantic-convention key, as `(key, value)` pairs.
    pub fn custom_labels(&self) -> [(&'static str, &str); 2] {
        [
            ("environment", self.environment.as_str()),
            ("application", self.service_name.as_str()),
        ]
    }
}
