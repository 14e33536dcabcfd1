use anyhow::Context;
use chrono::NaiveDate;
use ionocore::prelude::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_skip_names() -> Vec<String> {
    vec!["no_name".to_string()]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Parent of the `<YYYY>/<MM>/<DD>` day directories.
    pub root: PathBuf,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Transmitted chirp used as the correlation template.
    pub reference: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub workers: Option<usize>,
    /// File names inside day directories that are never echoes.
    #[serde(default = "default_skip_names")]
    pub skip_names: Vec<String>,
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        root: PathBuf,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reference: PathBuf,
    ) -> Self {
        Self {
            root,
            start_date,
            end_date,
            reference,
            output: None,
            workers: None,
            skip_names: default_skip_names(),
            pipeline: PipelineConfig::default(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start_date > self.end_date {
            anyhow::bail!(
                "start date {} is after end date {}",
                self.start_date,
                self.end_date
            );
        }
        if self.workers == Some(0) {
            anyhow::bail!("workers must be at least 1");
        }
        self.pipeline
            .validate()
            .context("validating pipeline parameters")?;
        Ok(())
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        self.pipeline.clone()
    }
}
