//! dockplan - zero-config build planner for container images
//!
//! Given a source tree, dockplan works out how to install, build and run the
//! application and renders that as a multi-stage Dockerfile.
//!
//! # Core Concepts
//!
//! - **Plan**: the install/build/start commands plus typed metadata for one
//!   application. It is plain data moved from stage to stage.
//! - **Providers**: recognizers for one ecosystem each, held in a registry whose
//!   order is the detection priority. The first provider that matches wins.
//! - **Overrides**: environment and command-line layers applied on top of the
//!   detected (or hand-written) plan with fixed priority rules.
//! - **Generator**: a pure function from a validated plan to Dockerfile text.
//!
//! # Example Usage
//!
//! ```no_run
//! use dockplan::fs::{Project, RealFileSystem};
//! use dockplan::overlay::{EnvOverrides, LayerKind, OverlayResolver};
//! use dockplan::pipeline::Pipeline;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fs = RealFileSystem::new();
//! let project = Project::new(&fs, Path::new("./my-app"));
//!
//! let overrides = OverlayResolver::new()
//!     .with_layer(LayerKind::Environment, EnvOverrides::from_env()?);
//! let prepared = Pipeline::default().run(&project, None, &overrides)?;
//!
//! println!("{}", prepared.dockerfile);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`fs`]: read-only filesystem snapshot (real and in-memory)
//! - [`plan`]: the plan model, plan files and validation
//! - [`stack`]: providers, registry and detector
//! - [`overlay`]: override layers and their priority rules
//! - [`generator`]: Dockerfile rendering
//! - [`pipeline`]: detection through generation in one call

pub mod cli;
pub mod config;
pub mod fs;
pub mod generator;
pub mod overlay;
pub mod pipeline;
pub mod plan;
pub mod stack;
pub mod util;

pub use config::{ConfigError, DockplanConfig};
pub use generator::{GenerationError, Generator};
pub use overlay::{OverlayResolver, Overrides};
pub use pipeline::{Pipeline, PipelineError, Prepared};
pub use plan::{Language, Metadata, Plan, StaticServer};
pub use stack::{DetectionError, Detector, Provider, ProviderRegistry};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
