//! Rendering plans for the terminal

use crate::plan::Plan;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_plan(&self, plan: &Plan) -> Result<String> {
        match self.format {
            OutputFormat::Json => plan.to_json(),
            OutputFormat::Yaml => plan.to_yaml(),
        }
    }
}
