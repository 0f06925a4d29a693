use super::registry::ProviderRegistry;
use crate::fs::Project;
use crate::plan::Plan;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("No application detected in {}", root.display())]
    NoApplicationDetected { root: PathBuf },
}

/// First-match provider selection over a [`ProviderRegistry`]
pub struct Detector {
    registry: ProviderRegistry,
}

impl Detector {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Evaluate providers in registry order and return the plan of the first match.
    pub fn detect(&self, project: &Project<'_>) -> Result<Plan, DetectionError> {
        for provider in self.registry.iter() {
            let matched = provider.matches(project);
            debug!(provider = provider.name(), matched, "Evaluated provider");
            if matched {
                return Ok(self.plan_with(provider.name(), project, provider.plan(project)));
            }
        }
        Err(DetectionError::NoApplicationDetected {
            root: project.root().to_path_buf(),
        })
    }

    /// Same outcome as [`detect`](Self::detect), but every provider's `matches`
    /// runs on its own scoped thread.
    pub fn detect_parallel(&self, project: &Project<'_>) -> Result<Plan, DetectionError> {
        let matched: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .registry
                .iter()
                .map(|provider| scope.spawn(move || provider.matches(project)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });

        for (index, provider) in self.registry.iter().enumerate() {
            debug!(provider = provider.name(), matched = matched[index], "Evaluated provider");
        }

        match matched.iter().position(|&m| m) {
            Some(index) => {
                let provider = self.registry.get(index).ok_or_else(|| {
                    DetectionError::NoApplicationDetected {
                        root: project.root().to_path_buf(),
                    }
                })?;
                Ok(self.plan_with(provider.name(), project, provider.plan(project)))
            }
            None => Err(DetectionError::NoApplicationDetected {
                root: project.root().to_path_buf(),
            }),
        }
    }

    fn plan_with(&self, name: &str, project: &Project<'_>, plan: Plan) -> Plan {
        info!(
            provider = name,
            root = %project.root().display(),
            language = plan.language.as_ref().map(|l| l.as_str()).unwrap_or("unknown"),
            "Detected application"
        );
        plan
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(ProviderRegistry::with_defaults())
    }
}
