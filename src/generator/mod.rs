//! Dockerfile rendering
//!
//! A resolved [`Plan`] becomes a multi-stage Dockerfile. Stages are emitted in a
//! fixed order and only when the plan needs them:
//!
//! ```text
//! base      FROM <language image>, WORKDIR /app
//! packages  apt-get install of metadata.custom_packages
//!           (apk add in the runtime stage when nothing is built)
//! install   COPY . . && RUN <installCommand>
//! build     ENV <buildEnv>, RUN <buildCommand>
//! runtime   CMD <startCommand>, or a caddy/nginx stage serving the output dir
//! ```
//!
//! Build variables are declared in the build stage only. The runtime stage never
//! starts from the build stage; it copies `/app` out of it.

pub mod image;
pub mod serve;

use crate::plan::{Plan, StaticServer};
use std::fmt::{self, Write};
use thiserror::Error;
use tracing::{debug, info};

const WORKDIR: &str = "/app";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Unsupported {language} version: {version}")]
    UnsupportedRuntimeVersion { language: String, version: String },

    #[error("Plan has neither a start command nor static output to serve")]
    NoRuntimeStrategy,

    #[error("Failed to render Dockerfile: {0}")]
    TemplateFailure(#[from] fmt::Error),

    #[error("No base image known for language '{language}', set metadata.base_image")]
    MissingBaseImage { language: String },
}

/// How the final image runs the application
#[derive(Debug, Clone, PartialEq, Eq)]
enum Runtime<'a> {
    Command(&'a str),
    Static {
        server: StaticServer,
        spa: bool,
        output_dir: String,
    },
}

impl<'a> Runtime<'a> {
    fn select(plan: &'a Plan) -> Result<Self, GenerationError> {
        let start = plan.start_command.trim();
        if !start.is_empty() {
            return Ok(Runtime::Command(start));
        }

        let metadata = &plan.metadata;
        if plan.is_static() || metadata.is_spa || metadata.output_dir_override.is_some() {
            return Ok(Runtime::Static {
                server: metadata.static_server(),
                spa: metadata.is_spa,
                output_dir: output_dir(plan),
            });
        }

        Err(GenerationError::NoRuntimeStrategy)
    }
}

/// Directory holding the files to serve: the override, else the project root for
/// plain static sites, else `dist`.
pub fn output_dir(plan: &Plan) -> String {
    let dir = match plan.metadata.output_dir_override.as_deref() {
        Some(dir) => dir.trim(),
        None if plan.is_static() => ".",
        None => "dist",
    };
    let dir = dir.trim_start_matches("./").trim_end_matches('/');
    if dir.is_empty() {
        ".".to_string()
    } else {
        dir.to_string()
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// `COPY` arguments, in the JSON array form when a path would not survive
/// whitespace splitting.
fn copy_args(source: &str, dest: &str) -> String {
    let needs_json = |path: &str| {
        path.starts_with('[') || path.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\')
    };
    if needs_json(source) || needs_json(dest) {
        format!("[{}, {}]", quote(source), quote(dest))
    } else {
        format!("{} {}", source, dest)
    }
}

fn write_run(out: &mut String, command: &str) -> fmt::Result {
    let command = command.trim();
    if command.contains('\n') {
        writeln!(out, "RUN <<'EOF'\n{}\nEOF", command)
    } else {
        writeln!(out, "RUN {}", command)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, plan: &Plan) -> Result<String, GenerationError> {
        let runtime = Runtime::select(plan)?;
        let install = plan.install_command.trim();
        let build = plan.build_command.trim();
        let packages = &plan.metadata.custom_packages;

        let mut out = String::new();
        self.write_header(&mut out, plan)?;

        let has_builder =
            !install.is_empty() || !build.is_empty() || matches!(runtime, Runtime::Command(_));

        let builder_base = if has_builder {
            let image = image::base_image(plan)?;
            writeln!(out, "\nFROM {} AS base", image)?;
            writeln!(out, "WORKDIR {}", WORKDIR)?;

            if packages.is_empty() {
                "base"
            } else {
                writeln!(out, "\nFROM base AS packages")?;
                writeln!(
                    out,
                    "RUN apt-get update && apt-get install -y --no-install-recommends {} && rm -rf /var/lib/apt/lists/*",
                    packages.join(" ")
                )?;
                "packages"
            }
        } else {
            "base"
        };

        let install_stage = if !install.is_empty() {
            writeln!(out, "\nFROM {} AS install", builder_base)?;
            writeln!(out, "COPY . .")?;
            write_run(&mut out, install)?;
            Some("install")
        } else {
            None
        };

        let build_stage = if !build.is_empty() {
            writeln!(out, "\nFROM {} AS build", install_stage.unwrap_or(builder_base))?;
            if install_stage.is_none() {
                writeln!(out, "COPY . .")?;
            }
            for (key, value) in &plan.build_env {
                writeln!(out, "ENV {}={}", key, quote(value).replace('$', "\\$"))?;
            }
            write_run(&mut out, build)?;
            Some("build")
        } else {
            None
        };

        let app_stage = build_stage.or(install_stage);

        match runtime {
            Runtime::Command(start) => {
                writeln!(out, "\nFROM {} AS runtime", install_stage.unwrap_or(builder_base))?;
                match (build_stage, install_stage) {
                    (Some(stage), _) => writeln!(out, "COPY --from={} {} {}", stage, WORKDIR, WORKDIR)?,
                    (None, Some(_)) => {}
                    (None, None) => writeln!(out, "COPY . .")?,
                }
                writeln!(out, "CMD [\"sh\", \"-c\", {}]", quote(start))?;
            }
            Runtime::Static {
                server,
                spa,
                output_dir,
            } => {
                let layout = serve::layout(server);
                writeln!(out, "\nFROM {} AS runtime", layout.image)?;
                // Server images are alpine; with no builder this is the only
                // stage the packages can land in.
                if !has_builder && !packages.is_empty() {
                    writeln!(out, "RUN apk add --no-cache {}", packages.join(" "))?;
                    debug!(packages = ?packages, "System packages installed in runtime stage");
                }
                writeln!(out, "COPY <<'EOF' {}", layout.config_path)?;
                writeln!(out, "{}", serve::config(server, spa))?;
                writeln!(out, "EOF")?;

                match app_stage {
                    Some(stage) => {
                        let source = if output_dir == "." {
                            WORKDIR.to_string()
                        } else {
                            format!("{}/{}", WORKDIR, output_dir)
                        };
                        writeln!(out, "COPY --from={} {}", stage, copy_args(&source, layout.web_root))?;
                    }
                    None => writeln!(out, "COPY {}", copy_args(&output_dir, layout.web_root))?,
                }
                writeln!(out, "EXPOSE 80")?;
                debug!(server = %server, spa, output_dir = %output_dir, "Static runtime");
            }
        }

        info!(
            language = plan.language.as_ref().map(|l| l.as_str()).unwrap_or("unknown"),
            bytes = out.len(),
            "Generated Dockerfile"
        );
        Ok(out)
    }

    fn write_header(&self, out: &mut String, plan: &Plan) -> fmt::Result {
        writeln!(out, "# syntax=docker/dockerfile:1")?;
        let language = plan.language.as_ref().map(|l| l.as_str()).unwrap_or("unknown");
        match plan.metadata.framework.as_deref() {
            Some(framework) => writeln!(
                out,
                "# Generated by dockplan for {} ({}). Edit the plan, not this file.",
                language, framework
            ),
            None => writeln!(
                out,
                "# Generated by dockplan for {}. Edit the plan, not this file.",
                language
            ),
        }
    }
}

/// Shorthand for [`Generator::generate`].
pub fn generate(plan: &Plan) -> Result<String, GenerationError> {
    Generator::new().generate(plan)
}
