//! End-to-end flow from a source tree to Dockerfile text.
//!
//! ```text
//! plan file ─┐
//!            ├─▶ base plan ─▶ env layer ─▶ CLI layer ─▶ validate ─▶ generate
//! detection ─┘
//! ```
//!
//! A supplied plan file replaces detection entirely. Every step fails fast; no
//! partial output is produced.

use crate::config::{ConfigError, DockplanConfig};
use crate::fs::Project;
use crate::generator::{GenerationError, Generator};
use crate::overlay::OverlayResolver;
use crate::plan::{Plan, PlanFileError, PlanValidationError, Validator};
use crate::stack::{DetectionError, Detector, ProviderRegistry};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    PlanFile(#[from] PlanFileError),

    #[error("Invalid plan: {0}")]
    Validation(#[from] PlanValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Output of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub plan: Plan,
    pub dockerfile: String,
}

pub struct Pipeline {
    detector: Detector,
    validator: Validator,
    generator: Generator,
    parallel_detection: bool,
}

impl Pipeline {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            detector: Detector::new(registry),
            validator: Validator::new(),
            generator: Generator::new(),
            parallel_detection: false,
        }
    }

    pub fn from_config(config: &DockplanConfig) -> Self {
        Self::new(ProviderRegistry::with_defaults()).with_parallel_detection(config.parallel_detection)
    }

    pub fn with_parallel_detection(mut self, enabled: bool) -> Self {
        self.parallel_detection = enabled;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// The loaded plan when one was supplied, otherwise the detected one.
    pub fn base_plan(&self, project: &Project<'_>, loaded: Option<Plan>) -> Result<Plan, PipelineError> {
        if let Some(plan) = loaded {
            info!(root = %project.root().display(), "Using plan file, skipping detection");
            return Ok(plan);
        }

        let plan = if self.parallel_detection {
            self.detector.detect_parallel(project)?
        } else {
            self.detector.detect(project)?
        };
        Ok(plan)
    }

    /// Base plan with every override layer applied, validated.
    pub fn resolve(
        &self,
        project: &Project<'_>,
        loaded: Option<Plan>,
        overrides: &OverlayResolver,
    ) -> Result<Plan, PipelineError> {
        let base = self.base_plan(project, loaded)?;
        debug!(layers = overrides.layers().len(), "Applying override layers");
        let plan = overrides.resolve(base);
        self.validator.validate(&plan)?;
        Ok(plan)
    }

    pub fn run(
        &self,
        project: &Project<'_>,
        loaded: Option<Plan>,
        overrides: &OverlayResolver,
    ) -> Result<Prepared, PipelineError> {
        let plan = self.resolve(project, loaded, overrides)?;
        let dockerfile = self.generator.generate(&plan)?;
        Ok(Prepared { plan, dockerfile })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ProviderRegistry::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::overlay::{LayerKind, Overrides};
    use crate::plan::Language;

    #[test]
    fn test_loaded_plan_skips_detection() {
        // Nothing on disk would be detected
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);

        let loaded = Plan::new(Language::Go).with_start("./server");
        let prepared = Pipeline::default()
            .run(&project, Some(loaded.clone()), &OverlayResolver::new())
            .unwrap();

        assert_eq!(prepared.plan, loaded);
        assert!(prepared.dockerfile.contains("FROM golang:1.23 AS base"));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let fs = MockFileSystem::new().with_file("index.html", "");
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);

        let cli = Overrides {
            output_dir: Some("../secrets".to_string()),
            ..Default::default()
        };
        let err = Pipeline::default()
            .run(&project, None, &OverlayResolver::new().with_layer(LayerKind::Cli, cli))
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Validation(PlanValidationError::ConflictingMetadata { .. })
        ));
    }

    #[test]
    fn test_empty_plan_rejected() {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);

        let err = Pipeline::default()
            .run(&project, Some(Plan::default()), &OverlayResolver::new())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(PlanValidationError::MissingRequiredField(_))
        ));
    }

    #[test]
    fn test_parallel_detection_matches_sequential() {
        let fs = MockFileSystem::new()
            .with_file("go.mod", "module x\n\ngo 1.22\n")
            .with_file("main.go", "package main")
            .with_file("index.html", "");
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);

        let sequential = Pipeline::default().resolve(&project, None, &OverlayResolver::new()).unwrap();
        let parallel = Pipeline::default()
            .with_parallel_detection(true)
            .resolve(&project, None, &OverlayResolver::new())
            .unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.language, Some(Language::Go));
    }
}
