// file: src/pipeline/cleaner.rs
// description: runs the download, filter, normalize, persist and publish sequence
// reference: single-pass cleaning job over one versioned input artifact

use crate::cleaning::{
    NYC_BOUNDING_BOX, PriceRange, filter_bounding_box, filter_price, normalize_dates,
};
use crate::config::Config;
use crate::error::Result;
use crate::models::{ArtifactRecord, ArtifactRef, CleaningParams, NewArtifact, RunRecord, RunStatus};
use crate::pipeline::progress::{CleaningStats, StepTracker};
use crate::store::ArtifactStore;
use crate::table::{CsvTableReader, CsvTableWriter, REQUIRED_COLUMNS, require_columns};
use crate::utils::{StepTimer, Validator};
use arrow_array::Array;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const STEPS: usize = 7;

#[derive(Debug, Clone)]
pub struct CleaningReport {
    pub run_id: String,
    pub artifact: ArtifactRecord,
    pub output_path: PathBuf,
    pub stats: CleaningStats,
}

pub struct Cleaner {
    store: Box<dyn ArtifactStore>,
    output_dir: PathBuf,
    job_type: String,
    show_progress: bool,
}

impl Cleaner {
    pub fn new(store: Box<dyn ArtifactStore>, config: &Config) -> Self {
        Self {
            store,
            output_dir: config.output.dir.clone(),
            job_type: config.run.job_type.clone(),
            show_progress: config.run.show_progress,
        }
    }

    /// Runs the whole job. Nothing is published unless every step succeeds.
    pub async fn run(&self, params: &CleaningParams) -> Result<CleaningReport> {
        params.validate()?;
        if params.has_inverted_price_range() {
            warn!(
                "min_price {} is greater than max_price {}; every row will be dropped",
                params.min_price, params.max_price
            );
        }

        let started = Instant::now();
        let mut run = self
            .store
            .start_run(&self.job_type, params.to_json())
            .await?;
        info!("Started run {} ({})", run.id, run.job_type);

        let mut steps = StepTracker::new(STEPS, self.show_progress);
        match self.execute(&mut run, params, &mut steps).await {
            Ok(mut report) => {
                steps.finish();
                run.close(RunStatus::Finished);
                // the artifact is already registered at this point
                if let Err(close_err) = self.store.finish_run(&run).await {
                    warn!("Could not record completion of run {}: {}", run.id, close_err);
                }

                report.stats.duration = started.elapsed();
                self.log_final_stats(&report);
                Ok(report)
            }
            Err(err) => {
                steps.abandon();
                error!(
                    "Run {} failed at step {}/{}: {}",
                    run.id,
                    steps.current(),
                    STEPS,
                    err
                );

                run.close(RunStatus::Failed);
                if let Err(close_err) = self.store.finish_run(&run).await {
                    warn!("Could not record failure of run {}: {}", run.id, close_err);
                }
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        run: &mut RunRecord,
        params: &CleaningParams,
        steps: &mut StepTracker,
    ) -> Result<CleaningReport> {
        let mut stats = CleaningStats::new();

        info!("{}", steps.begin("Downloading input artifact"));
        let reference = ArtifactRef::parse(&params.input_artifact)?;
        let input_path = self.store.fetch(run, &reference).await?;
        debug!("Input artifact {} at {}", reference, input_path.display());

        info!("{}", steps.begin("Reading input table"));
        let timer = StepTimer::new("parse");
        let table = CsvTableReader::new().read(&input_path)?;
        require_columns(&table, &REQUIRED_COLUMNS)?;
        stats.rows_read = table.num_rows();
        timer.finish_with_rows(stats.rows_read);

        info!("{}", steps.begin("Dropping outliers"));
        let range = PriceRange::new(params.min_price, params.max_price);
        let table = filter_price(&table, range)?;
        stats.rows_after_price_filter = table.num_rows();
        debug!(
            "Price filter [{}, {}] kept {} of {} rows",
            range.min,
            range.max,
            stats.rows_after_price_filter,
            stats.rows_read
        );

        info!("{}", steps.begin("Converting 'last_review' column to datetime"));
        let normalized = normalize_dates(&table, "last_review")?;
        if normalized.unparsed > 0 {
            warn!(
                "{} last_review value(s) could not be read as dates and were set to null",
                normalized.unparsed
            );
        }
        stats.unparsed_dates = normalized.unparsed;
        debug!(
            "{} of {} last_review values are null after conversion",
            normalized.nulls,
            normalized.batch.num_rows()
        );
        let table = normalized.batch;

        info!("{}", steps.begin("Dropping rows outside the NYC bounding box"));
        let table = filter_bounding_box(&table, NYC_BOUNDING_BOX)?;
        stats.rows_after_geo_filter = table.num_rows();
        stats.null_dates = table
            .column_by_name("last_review")
            .map(|c| c.null_count())
            .unwrap_or(0);

        let output_path = self.output_dir.join(&params.output_artifact);
        info!(
            "{}",
            steps.begin(&format!("Saving cleaned table to {}", output_path.display()))
        );
        let written = CsvTableWriter::new().write(&table, &output_path)?;
        stats.bytes_written = written.bytes;
        debug!("Wrote {} rows ({} bytes)", written.rows, written.bytes);

        info!(
            "{}",
            steps.begin(&format!(
                "Logging artifact {} ({}: {})",
                params.output_artifact,
                params.output_type,
                Validator::truncate_text(&params.output_description, 60)
            ))
        );
        let artifact = self
            .store
            .publish(
                run,
                NewArtifact {
                    name: params.output_artifact.clone(),
                    artifact_type: params.output_type.clone(),
                    description: params.output_description.clone(),
                    path: output_path.clone(),
                },
            )
            .await?;

        Ok(CleaningReport {
            run_id: run.id.clone(),
            artifact,
            output_path,
            stats,
        })
    }

    fn log_final_stats(&self, report: &CleaningReport) {
        let stats = &report.stats;
        info!("=== Cleaning Summary ===");
        info!("Run: {}", report.run_id);
        info!("Artifact: {}", report.artifact.qualified_name());
        info!("Output file: {}", report.output_path.display());
        info!("Rows read: {}", stats.rows_read);
        info!("Price outliers dropped: {}", stats.price_outliers());
        info!("Outside bounding box: {}", stats.outside_bounding_box());
        info!("Rows written: {}", stats.rows_after_geo_filter);
        info!("Retention: {:.2}%", stats.retention_rate());
        info!("Null last_review: {}", stats.null_dates);
        info!("Bytes written: {}", stats.bytes_written);
        info!("Duration: {:.2}s", stats.duration.as_secs_f64());
        info!("========================");
    }
}
