use crate::catalog;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use ionocore::processing::{default_workers, BatchProcessor, CancellationToken, Pipeline};
use ionocore::sounding::{ProcessedFile, ResultTable};
use ionocore::telemetry::MetricsSnapshot;
use log::info;
use std::sync::Arc;

pub struct WorkflowResult {
    pub processed: Vec<ProcessedFile>,
    pub table: ResultTable,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, cancel: CancellationToken) -> anyhow::Result<WorkflowResult> {
        self.config.validate()?;

        let pipeline = Pipeline::from_reference_file(
            self.config.to_pipeline_config(),
            &self.config.reference,
        )
        .with_context(|| {
            format!(
                "loading reference chirp {}",
                self.config.reference.display()
            )
        })?;
        info!("reference chirp has {} samples", pipeline.reference_len());

        let files = catalog::enumerate(&self.config).context("enumerating recordings")?;
        info!(
            "{} recordings between {} and {}",
            files.len(),
            self.config.start_date,
            self.config.end_date
        );

        let workers = self.config.workers.unwrap_or_else(default_workers);
        let batch = BatchProcessor::new(Arc::new(pipeline), workers);
        let processed = batch
            .run(files, cancel)
            .await
            .context("processing recordings")?;

        let table = processed.iter().collect();
        Ok(WorkflowResult {
            table,
            metrics: batch.metrics().snapshot(),
            processed,
        })
    }
}
