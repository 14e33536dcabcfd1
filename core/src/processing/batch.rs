use crate::prelude::{StageError, StageResult};
use crate::processing::cancel::CancellationToken;
use crate::processing::pipeline::Pipeline;
use crate::sounding::{ProcessedFile, SoundingFile};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use std::sync::Arc;
use tokio::runtime::Builder;
use tokio::sync::Semaphore;

/// Worker count matching the available cores.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}

/// Fans a file list out over a bounded pool of blocking workers.
pub struct BatchProcessor {
    pipeline: Arc<Pipeline>,
    workers: usize,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl BatchProcessor {
    pub fn new(pipeline: Arc<Pipeline>, workers: usize) -> Self {
        Self {
            pipeline,
            workers: workers.max(1),
            metrics: Arc::new(MetricsRecorder::new()),
            logger: LogManager::new("ionocore::batch"),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    /// Processes every file, returning results in input order.
    ///
    /// Metrics cover the most recent call only.
    /// At most `workers` files are in flight at once. Once `cancel` fires no
    /// further files are dispatched and the whole batch yields
    /// [`StageError::Cancelled`].
    pub async fn run(
        &self,
        files: Vec<SoundingFile>,
        cancel: CancellationToken,
    ) -> StageResult<Vec<ProcessedFile>> {
        let total = files.len();
        self.metrics.reset();
        self.logger.record(&format!(
            "processing {} files on {} workers",
            total, self.workers
        ));

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(total);
        for file in files {
            if cancel.is_cancelled() {
                break;
            }
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|err| StageError::Internal(err.to_string()))?;
            let pipeline = self.pipeline.clone();
            let token = cancel.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                pipeline.process(&file, &token)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut outcome = Ok(());
        for handle in handles {
            match handle.await {
                Ok(Ok(processed)) => {
                    self.metrics.record(processed.verdict);
                    results.push(processed);
                }
                Ok(Err(err)) => {
                    if outcome.is_ok() {
                        outcome = Err(err);
                    }
                }
                Err(join) => {
                    if outcome.is_ok() {
                        outcome = Err(StageError::Internal(format!("worker failed: {}", join)));
                    }
                }
            }
        }
        outcome?;

        if results.len() < total {
            return Err(StageError::Cancelled);
        }
        let snapshot = self.metrics.snapshot();
        self.logger.record(&format!(
            "batch complete: {} processed, {} echoes detected",
            snapshot.processed, snapshot.accepted
        ));
        Ok(results)
    }

    /// Runs [`BatchProcessor::run`] on a dedicated multi-thread runtime.
    pub fn run_blocking(
        &self,
        files: Vec<SoundingFile>,
        cancel: CancellationToken,
    ) -> StageResult<Vec<ProcessedFile>> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(self.workers)
            .max_blocking_threads(self.workers)
            .build()
            .map_err(|err| StageError::Internal(format!("creating runtime: {}", err)))?;
        runtime.block_on(self.run(files, cancel))
    }
}
