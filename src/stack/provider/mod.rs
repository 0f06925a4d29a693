//! Built-in providers
//!
//! Each provider recognizes one kind of project and derives its default plan from
//! the project's own declaration files. Providers are pure functions of the
//! snapshot: they never write, never look at each other's output and keep no
//! state, so the registry may evaluate them in any order or concurrently.

use crate::fs::Project;
use crate::plan::Plan;

/// Recognizer for one ecosystem
pub trait Provider: Send + Sync {
    /// Stable identifier, used in logs and registry listings
    fn name(&self) -> &'static str;

    /// Whether this provider applies to the project
    fn matches(&self, project: &Project<'_>) -> bool;

    /// Default plan for a project this provider matched
    fn plan(&self, project: &Project<'_>) -> Plan;
}

pub mod frontend;
pub mod go;
pub mod nextjs;
pub mod node;
pub mod node_common;
pub mod python;
pub mod rust;
pub mod static_site;

pub use frontend::FrontendProvider;
pub use go::GoProvider;
pub use nextjs::NextJsProvider;
pub use node::NodeProvider;
pub use python::PythonProvider;
pub use rust::RustProvider;
pub use static_site::StaticSiteProvider;
