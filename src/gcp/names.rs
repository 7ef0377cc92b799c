//! Resource names and type provider actions
//!
//! Helpers that build the identifiers Deployment Manager and the Cloud
//! Monitoring v1 API expect.

use uuid::Uuid;

/// Type provider for the Monitoring dashboards API.
/// Must already exist in the target project
/// (discovery: https://monitoring.googleapis.com/$discovery/rest?version=v1).
pub const DASHBOARD_TYPE_PROVIDER: &str = "monitoring-dashboardv1type";

/// Collection path of dashboard methods on the type provider
const DASHBOARD_COLLECTION: &str = "monitoring.projects.dashboards";

/// `projects/{project}`
pub fn parent_name(project_id: &str) -> String {
    format!("projects/{}", project_id)
}

/// `projects/{project}/dashboards/{id}`
pub fn dashboard_name(project_id: &str, id: &Uuid) -> String {
    format!("{}/dashboards/{}", parent_name(project_id), id.hyphenated())
}

/// Fully qualified action on the dashboard type provider,
/// e.g. `my-proj/monitoring-dashboardv1type:monitoring.projects.dashboards.create`
pub fn dashboard_action(project_id: &str, method: &str) -> String {
    format!(
        "{}/{}:{}.{}",
        project_id, DASHBOARD_TYPE_PROVIDER, DASHBOARD_COLLECTION, method
    )
}
