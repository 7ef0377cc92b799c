//! Deployment Manager resources for Cloud Monitoring dashboards.
//!
//! Given a deployment [`Context`], [`generate_config`] reads a local dashboard
//! JSON file and returns a `create`/`delete` action pair against the
//! `monitoring-dashboardv1type` type provider, plus a `project_id` output.
//! The API calls themselves are made by Deployment Manager.

pub mod context;
pub mod dashboard;
pub mod error;
pub mod gcp;
pub mod resource;

pub use context::Context;
pub use error::{Error, Result};
pub use resource::{
    generate_config, generate_config_with_id, DeploymentConfig, Output, ResourceDescriptor,
    ResourceKind,
};
