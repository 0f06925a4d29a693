//! Base image selection

use super::GenerationError;
use crate::plan::version::{numeric_parts, VersionLines, GO_LINES, NODE_LINES, PYTHON_LINES};
use crate::plan::{Language, Plan};

const MIN_RUST_MINOR: u32 = 70;
const DEFAULT_RUST: &str = "1";

fn unsupported(language: &str, version: &str) -> GenerationError {
    GenerationError::UnsupportedRuntimeVersion {
        language: language.to_string(),
        version: version.to_string(),
    }
}

/// `<prefix>:<version><suffix>` for a version on one of the published lines
fn line_image(
    lines: &VersionLines,
    version: Option<&str>,
    prefix: &str,
    suffix: &str,
) -> Result<String, GenerationError> {
    let version = version.unwrap_or(lines.default);
    if lines.supports(version) {
        Ok(format!("{}:{}{}", prefix, version, suffix))
    } else {
        Err(unsupported(lines.language, version))
    }
}

fn rust_image(version: Option<&str>) -> Result<String, GenerationError> {
    let version = version.unwrap_or(DEFAULT_RUST);
    match numeric_parts(version).as_deref() {
        Some([1]) => Ok(format!("rust:{}-slim", version)),
        Some([1, minor, ..]) if *minor >= MIN_RUST_MINOR => Ok(format!("rust:{}-slim", version)),
        _ => Err(unsupported("rust", version)),
    }
}

/// Image the builder and runtime stages start from.
///
/// An explicit `base_image` wins. Otherwise the language decides, with
/// `runtime_version` picking the tag. Static sites build with node.
pub fn base_image(plan: &Plan) -> Result<String, GenerationError> {
    let metadata = &plan.metadata;
    if let Some(image) = metadata.base_image.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        return Ok(image.to_string());
    }

    let version = metadata
        .runtime_version
        .as_deref()
        .map(|v| v.trim().trim_start_matches('v'))
        .filter(|v| !v.is_empty());

    match &plan.language {
        Some(Language::Node) | Some(Language::Static) => {
            line_image(&NODE_LINES, version, "node", "-slim")
        }
        Some(Language::Python) => line_image(&PYTHON_LINES, version, "python", "-slim"),
        Some(Language::Go) => line_image(&GO_LINES, version, "golang", ""),
        Some(Language::Rust) => rust_image(version),
        Some(Language::Custom(tag)) => Err(GenerationError::MissingBaseImage {
            language: tag.clone(),
        }),
        None => Err(GenerationError::MissingBaseImage {
            language: "unknown".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_for(language: Language, version: Option<&str>) -> Result<String, GenerationError> {
        base_image(&Plan::new(language).with_runtime_version(version.map(str::to_string)))
    }

    #[test]
    fn test_defaults() {
        assert_eq!(image_for(Language::Node, None).unwrap(), "node:22-slim");
        assert_eq!(image_for(Language::Python, None).unwrap(), "python:3.12-slim");
        assert_eq!(image_for(Language::Go, None).unwrap(), "golang:1.23");
        assert_eq!(image_for(Language::Rust, None).unwrap(), "rust:1-slim");
        assert_eq!(image_for(Language::Static, None).unwrap(), "node:22-slim");
    }

    #[test]
    fn test_supported_versions() {
        assert_eq!(image_for(Language::Node, Some("20")).unwrap(), "node:20-slim");
        assert_eq!(image_for(Language::Node, Some("v18.19.0")).unwrap(), "node:18.19.0-slim");
        assert_eq!(image_for(Language::Python, Some("3.9")).unwrap(), "python:3.9-slim");
        assert_eq!(image_for(Language::Go, Some("1.22.3")).unwrap(), "golang:1.22.3");
        assert_eq!(image_for(Language::Rust, Some("1.78")).unwrap(), "rust:1.78-slim");
    }

    #[test]
    fn test_unsupported_versions() {
        for (language, version) in [
            (Language::Node, "16"),
            (Language::Node, "lts"),
            (Language::Node, "^16"),
            (Language::Python, "2.7"),
            (Language::Python, "3.14"),
            (Language::Go, "1.19"),
            (Language::Go, ">=1.25"),
            (Language::Rust, "1.65"),
            (Language::Rust, "nightly"),
        ] {
            let err = image_for(language, Some(version)).unwrap_err();
            assert!(
                matches!(err, GenerationError::UnsupportedRuntimeVersion { version: ref v, .. } if v == version),
                "{version} should be rejected"
            );
        }
    }

    #[test]
    fn test_explicit_base_image() {
        let mut plan = Plan::new(Language::Custom("elixir".to_string()));
        assert!(matches!(
            base_image(&plan),
            Err(GenerationError::MissingBaseImage { ref language }) if language == "elixir"
        ));

        plan.metadata.base_image = Some("elixir:1.16-slim".to_string());
        assert_eq!(base_image(&plan).unwrap(), "elixir:1.16-slim");

        // Takes precedence over an unsupported version
        let mut plan = Plan::new(Language::Node).with_runtime_version(Some("12".to_string()));
        plan.metadata.base_image = Some("node:12-bullseye".to_string());
        assert_eq!(base_image(&plan).unwrap(), "node:12-bullseye");
    }

    #[test]
    fn test_missing_language() {
        assert!(matches!(
            base_image(&Plan::default()),
            Err(GenerationError::MissingBaseImage { .. })
        ));
    }
}
