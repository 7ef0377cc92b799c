//! Deployment resources
//!
//! Turns a deployment [`Context`] into the resource list Deployment Manager
//! consumes: a `create` action that builds the dashboard, a `delete` action
//! that tears down the same dashboard, and a `project_id` output.
//!
//! # Architecture
//!
//! - [`merge`] - Overlays the dashboard file onto the seeded request fields
//! - [`crate::dashboard`] - Reads and repairs the dashboard JSON
//! - [`crate::gcp::names`] - Builds resource names and action strings
//!
//! # Example
//!
//! ```ignore
//! use dm_dashboard::{generate_config, Context};
//!
//! let context = Context::new()
//!     .with_property("project", "my-proj")
//!     .with_property("projectId", "my-proj")
//!     .with_property("config_file", "dashboards/latency.json")
//!     .with_env("name", "latency");
//! let config = generate_config(&context)?;
//! assert_eq!(config.resources[0].name, "latency-create");
//! ```

pub mod merge;

use crate::context::{plain_string, Context};
use crate::dashboard;
use crate::error::{Error, Result};
use crate::gcp::names;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use uuid::Uuid;

/// Which side of the dashboard lifecycle a resource drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Create,
    Delete,
}

impl ResourceKind {
    /// Method name on the dashboards collection
    pub fn method(self) -> &'static str {
        match self {
            ResourceKind::Create => "create",
            ResourceKind::Delete => "delete",
        }
    }

    /// Deployment Manager runtime policy that triggers this action
    pub fn runtime_policy(self) -> &'static str {
        match self {
            ResourceKind::Create => "CREATE",
            ResourceKind::Delete => "DELETE",
        }
    }
}

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "runtimePolicy")]
    pub runtime_policy: Vec<String>,
}

/// One action resource in the generated config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub action: String,
    pub metadata: Metadata,
    pub name: String,
    pub properties: Map<String, Value>,
}

impl ResourceDescriptor {
    pub fn new(
        kind: ResourceKind,
        project_id: &str,
        deployment: &str,
        properties: Map<String, Value>,
    ) -> Self {
        Self {
            action: names::dashboard_action(project_id, kind.method()),
            metadata: Metadata {
                runtime_policy: vec![kind.runtime_policy().to_string()],
            },
            name: format!("{}-{}", deployment, kind.method()),
            properties,
        }
    }

    /// Recover the kind from the runtime policy
    pub fn kind(&self) -> Option<ResourceKind> {
        match self.metadata.runtime_policy.first().map(|s| s.as_str()) {
            Some("CREATE") => Some(ResourceKind::Create),
            Some("DELETE") => Some(ResourceKind::Delete),
            _ => None,
        }
    }
}

/// Named output value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub value: Value,
}

/// Generator result: what the orchestrator deploys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub resources: Vec<ResourceDescriptor>,
    pub outputs: Vec<Output>,
}

impl DeploymentConfig {
    pub fn find(&self, kind: ResourceKind) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|r| r.kind() == Some(kind))
    }

    /// Full name of the dashboard this config creates
    pub fn dashboard_name(&self) -> Option<&str> {
        self.find(ResourceKind::Delete)?
            .properties
            .get("name")
            .and_then(|v| v.as_str())
    }
}

/// Generate resources with a freshly generated dashboard id
pub fn generate_config(context: &Context) -> Result<DeploymentConfig> {
    generate_config_with_id(context, Uuid::new_v4())
}

/// Generate resources for a fixed dashboard id
pub fn generate_config_with_id(context: &Context, dashboard_id: Uuid) -> Result<DeploymentConfig> {
    let project_id = context.project_id()?;
    let dash_name = names::dashboard_name(&project_id, &dashboard_id);
    let parent = names::parent_name(&project_id);
    tracing::info!("Generating dashboard {} in {}", dash_name, parent);

    let config_file = context
        .property("config_file")
        .map(|v| PathBuf::from(plain_string(v)))
        .ok_or_else(Error::config_file_unset)?;
    let layout = dashboard::load_dashboard(&config_file)?;

    let mut seeded = Map::new();
    seeded.insert("parent".to_string(), Value::String(parent));
    seeded.insert("name".to_string(), Value::String(dash_name.clone()));
    let create_props = merge::overlay(seeded, layout);

    let mut delete_props = Map::new();
    delete_props.insert("name".to_string(), Value::String(dash_name));

    let deployment = plain_string(context.require_env("name")?);
    let resources = vec![
        ResourceDescriptor::new(ResourceKind::Create, &project_id, &deployment, create_props),
        ResourceDescriptor::new(ResourceKind::Delete, &project_id, &deployment, delete_props),
    ];

    let outputs = vec![Output {
        name: "project_id".to_string(),
        value: context.require_property("projectId")?.clone(),
    }];

    tracing::debug!(
        "Generated {} resources and {} outputs for deployment {}",
        resources.len(),
        outputs.len(),
        deployment
    );

    Ok(DeploymentConfig { resources, outputs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn dashboard_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn context_for(file: &tempfile::NamedTempFile) -> Context {
        Context::new()
            .with_property("project", "p1")
            .with_property("config_file", file.path().to_string_lossy().to_string())
            .with_property("projectId", "proj-123")
            .with_env("name", "dash1")
    }

    fn fixed_id() -> Uuid {
        Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    }

    #[test]
    fn test_create_and_delete_resources() {
        let file = dashboard_file(r#"{"displayName": "X", "gridLayout": {}}"#);
        let config = generate_config_with_id(&context_for(&file), fixed_id()).unwrap();

        assert_eq!(config.resources.len(), 2);
        let create = &config.resources[0];
        assert_eq!(create.name, "dash1-create");
        assert_eq!(
            create.action,
            "p1/monitoring-dashboardv1type:monitoring.projects.dashboards.create"
        );
        assert_eq!(create.metadata.runtime_policy, vec!["CREATE"]);
        assert_eq!(
            Value::Object(create.properties.clone()),
            json!({
                "parent": "projects/p1",
                "name": "projects/p1/dashboards/67e55044-10b1-426f-9247-bb680e5fe0c8",
                "displayName": "X",
                "gridLayout": {}
            })
        );

        let delete = &config.resources[1];
        assert_eq!(delete.name, "dash1-delete");
        assert_eq!(
            delete.action,
            "p1/monitoring-dashboardv1type:monitoring.projects.dashboards.delete"
        );
        assert_eq!(delete.metadata.runtime_policy, vec!["DELETE"]);
        assert_eq!(
            Value::Object(delete.properties.clone()),
            json!({"name": "projects/p1/dashboards/67e55044-10b1-426f-9247-bb680e5fe0c8"})
        );
    }

    #[test]
    fn test_outputs_use_project_id_property() {
        let file = dashboard_file("{}");
        let config = generate_config(&context_for(&file)).unwrap();
        assert_eq!(
            config.outputs,
            vec![Output {
                name: "project_id".to_string(),
                value: json!("proj-123"),
            }]
        );
    }

    #[test]
    fn test_spec_overrides_seeded_keys() {
        let file = dashboard_file(r#"{"name": "custom", "parent": "projects/other"}"#);
        let config = generate_config_with_id(&context_for(&file), fixed_id()).unwrap();

        let create = config.find(ResourceKind::Create).unwrap();
        assert_eq!(create.properties["name"], json!("custom"));
        assert_eq!(create.properties["parent"], json!("projects/other"));
        // The delete side still targets the generated dashboard
        assert_eq!(
            config.dashboard_name(),
            Some("projects/p1/dashboards/67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
    }

    #[test]
    fn test_env_project_fallback() {
        let file = dashboard_file("{}");
        let ctx = Context::new()
            .with_property("config_file", file.path().to_string_lossy().to_string())
            .with_property("projectId", "x")
            .with_env("project", "env-proj")
            .with_env("name", "d");
        let config = generate_config(&ctx).unwrap();
        assert!(config.resources[0].action.starts_with("env-proj/"));
        assert_eq!(config.resources[0].properties["parent"], json!("projects/env-proj"));
    }

    #[test]
    fn test_missing_config_file_is_file_access() {
        let ctx = Context::new()
            .with_property("project", "p1")
            .with_property("projectId", "x")
            .with_env("name", "d");
        let err = generate_config(&ctx).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_missing_project_id_is_missing_field() {
        let file = dashboard_file("{}");
        let mut ctx = context_for(&file);
        ctx.properties.remove("projectId");
        let err = generate_config(&ctx).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "properties.projectId"));
    }

    #[test]
    fn test_missing_env_name_is_missing_field() {
        let file = dashboard_file("{}");
        let mut ctx = context_for(&file);
        ctx.env.remove("name");
        let err = generate_config(&ctx).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "env.name"));
    }

    #[test]
    fn test_kind_round_trips_through_metadata() {
        let r = ResourceDescriptor::new(ResourceKind::Delete, "p", "d", Map::new());
        assert_eq!(r.kind(), Some(ResourceKind::Delete));
    }

    #[test]
    fn test_serialized_field_names() {
        let r = ResourceDescriptor::new(ResourceKind::Create, "p", "d", Map::new());
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["metadata"], json!({"runtimePolicy": ["CREATE"]}));
        assert_eq!(value["name"], json!("d-create"));
    }
}
