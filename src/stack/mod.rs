//! Ecosystem detection.
//!
//! A [`Provider`] recognizes one kind of project (a framework, a language, a plain
//! static site) and knows the default [`Plan`](crate::plan::Plan) for it. Providers
//! are collected in a [`ProviderRegistry`] whose order is the detection priority,
//! and the [`Detector`] picks the first provider that matches.
//!
//! # Example
//!
//! ```no_run
//! use dockplan::fs::{Project, RealFileSystem};
//! use dockplan::stack::{Detector, ProviderRegistry};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fs = RealFileSystem::new();
//! let project = Project::new(&fs, Path::new("."));
//! let plan = Detector::new(ProviderRegistry::with_defaults()).detect(&project)?;
//! println!("{}", plan);
//! # Ok(())
//! # }
//! ```

pub mod detection;
pub mod provider;
pub mod registry;

pub use detection::{DetectionError, Detector};
pub use provider::Provider;
pub use registry::ProviderRegistry;
