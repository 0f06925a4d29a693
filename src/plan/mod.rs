//! The build plan: what to install, build and run for an application.
//!
//! A [`Plan`] is produced by detection or loaded from a plan file, refined by
//! override layers, validated, and finally rendered into a Dockerfile. It is plain
//! data; every stage takes it by value and hands it on.

#[macro_use]
pub mod id_enum_macro;

pub mod file;
pub mod language;
pub mod metadata;
pub mod schema;
pub mod validation;
pub mod version;

pub use file::{
    find_plan_file, load_plan_file, parse_plan, PlanFileError, PlanFormat, DEFAULT_PLAN_FILE,
};
pub use language::Language;
pub use metadata::{dedup_packages, Metadata, StaticServer, UnknownStaticServer};
pub use schema::Plan;
pub use validation::{PlanValidationError, ValidationRule, Validator};
pub use version::{VersionConstraint, VersionLines, GO_LINES, NODE_LINES, PYTHON_LINES};
