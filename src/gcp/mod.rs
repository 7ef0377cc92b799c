//! GCP conventions
//!
//! Naming rules for Cloud Monitoring dashboards and the Deployment Manager
//! type provider.
//!
//! # Module Structure
//!
//! - [`names`] - Parent, dashboard and action names
//!
//! # Example
//!
//! ```ignore
//! use dm_dashboard::gcp::names;
//!
//! let action = names::dashboard_action("my-proj", "create");
//! assert_eq!(action, "my-proj/monitoring-dashboardv1type:monitoring.projects.dashboards.create");
//! ```

pub mod names;
