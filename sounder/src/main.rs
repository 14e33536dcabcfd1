use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use generator::profile::{synthesize, GeneratorConfig};
use ionocore::processing::cancellation;
use ionocore::telemetry::MetricsSnapshot;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod catalog;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Ionospheric virtual height from chirp-sounder recordings")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Parent directory of the <YYYY>/<MM>/<DD> recording tree
    #[arg(long)]
    root: Option<PathBuf>,
    /// First day to process (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day to process, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Reference chirp recording
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Write the result table here (.json or .csv) instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    sample_rate: Option<f64>,
    #[arg(long)]
    max_quality: Option<f64>,
    #[arg(long)]
    min_delay: Option<f64>,
    #[arg(long)]
    max_delay: Option<f64>,
    #[arg(long)]
    peak_spacing: Option<usize>,
    #[arg(long)]
    window_halfwidth: Option<usize>,
    /// Write a synthetic one-day dataset under this directory and exit
    #[arg(long)]
    synthesize: Option<PathBuf>,
}

impl Args {
    fn workflow_config(&self) -> anyhow::Result<WorkflowConfig> {
        let mut config = if let Some(path) = &self.workflow {
            WorkflowConfig::load(path)?
        } else {
            match (&self.root, self.start, self.end, &self.reference) {
                (Some(root), Some(start), Some(end), Some(reference)) => {
                    WorkflowConfig::from_args(root.clone(), start, end, reference.clone())
                }
                _ => anyhow::bail!(
                    "either --workflow or all of --root, --start, --end and --reference are required"
                ),
            }
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(start) = self.start {
            config.start_date = start;
        }
        if let Some(end) = self.end {
            config.end_date = end;
        }
        if let Some(reference) = &self.reference {
            config.reference = reference.clone();
        }
        if self.output.is_some() {
            config.output = self.output.clone();
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }

        let pipeline = &mut config.pipeline;
        if let Some(value) = self.sample_rate {
            pipeline.sample_rate = value;
        }
        if let Some(value) = self.max_quality {
            pipeline.max_quality = value;
        }
        if let Some(value) = self.min_delay {
            pipeline.min_delay_s = value;
        }
        if let Some(value) = self.max_delay {
            pipeline.max_delay_s = value;
        }
        if let Some(value) = self.peak_spacing {
            pipeline.peak_min_spacing = value;
        }
        if let Some(value) = self.window_halfwidth {
            pipeline.quality_window_halfwidth = value;
        }

        Ok(config)
    }
}

fn write_table(result: &workflow::runner::WorkflowResult, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let written = if is_json {
        result.table.write_json(writer)
    } else {
        result.table.write_csv(writer)
    };
    written.with_context(|| format!("writing {}", path.display()))
}

fn summary(metrics: &MetricsSnapshot) -> String {
    format!(
        "processed {} -> echoes {}, rejected {} (quality {}, plausibility {}, peaks {}, empty {}, failed {})",
        metrics.processed,
        metrics.accepted,
        metrics.rejected(),
        metrics.quality_rejected,
        metrics.plausibility_rejected,
        metrics.insufficient_peaks,
        metrics.empty,
        metrics.failed
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(root) = &args.synthesize {
        let date = args.start.unwrap_or_else(|| Utc::now().date_naive());
        let dataset = synthesize(root, date, &GeneratorConfig::default())?;
        println!(
            "Synthetic dataset -> reference {}, {} recordings in {}",
            dataset.reference.display(),
            dataset.recordings.len(),
            dataset.day_directory.display()
        );
        return Ok(());
    }

    let workflow_config = args.workflow_config()?;
    let runner = Runner::new(workflow_config.clone());

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating processing runtime")?;
    let result = runtime.block_on(async {
        let (handle, token) = cancellation();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling");
                handle.cancel();
            }
        });
        runner.execute(token).await
    })?;

    if result.table.is_empty() {
        warn!(
            "no recordings found between {} and {}",
            workflow_config.start_date, workflow_config.end_date
        );
    }
    for processed in &result.processed {
        debug!(
            "{} {:.3} MHz -> {} (delay {:.6} s, quality {:.2})",
            processed.record.timestamp,
            processed.record.frequency_mhz,
            processed.verdict,
            processed.estimate.delay_s,
            processed.estimate.quality
        );
    }

    match &workflow_config.output {
        Some(path) => {
            write_table(&result, path)?;
            println!("Results written to {}", path.display());
        }
        None => print!("{}", result.table.render()),
    }
    println!("Run summary -> {}", summary(&result.metrics));

    Ok(())
}
