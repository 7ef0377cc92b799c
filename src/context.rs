//! Deployment context
//!
//! The record an orchestrator hands to the generator: user-supplied
//! `properties` plus the `env` describing the current deployment.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Input context for one generator invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Template properties (`project`, `config_file`, `projectId`, ...)
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Deployment environment (`project`, `name`, ...)
    #[serde(default)]
    pub env: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a context document. JSON is accepted too since it parses as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Context(format!("{}: {}", path.display(), e)))?;
        let context: Context = serde_yaml::from_str(&content)
            .map_err(|e| Error::Context(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            "Loaded context from {:?}: {} properties, {} env keys",
            path,
            context.properties.len(),
            context.env.len()
        );
        Ok(context)
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn with_env(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_env(key, value);
        self
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), value.into());
    }

    pub fn set_env(&mut self, key: &str, value: impl Into<Value>) {
        self.env.insert(key.to_string(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn env_value(&self, key: &str) -> Option<&Value> {
        self.env.get(key)
    }

    /// Get a property or fail with its dotted path
    pub fn require_property(&self, key: &str) -> Result<&Value> {
        self.property(key)
            .ok_or_else(|| Error::MissingField(format!("properties.{}", key)))
    }

    /// Get an env value or fail with its dotted path
    pub fn require_env(&self, key: &str) -> Result<&Value> {
        self.env_value(key)
            .ok_or_else(|| Error::MissingField(format!("env.{}", key)))
    }

    /// Project the deployment targets: `properties.project`, else `env.project`
    pub fn project_id(&self) -> Result<String> {
        match self.property("project") {
            Some(project) => Ok(plain_string(project)),
            None => self.require_env("project").map(plain_string),
        }
    }
}

/// Render a value the way it reads inside a resource name.
/// Strings lose their quotes, everything else is its JSON text.
pub fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
