//! End-to-end collection run.

use crate::annotate::{AnnotatedTable, PriceAnnotator};
use crate::config::SdamConfig;
use crate::error::Result;
use crate::registry::CompanyRegistry;
use crate::schema::{FINANCE_TABLE, NCAV_TABLE, PRICE_ANNOTATED_TABLE, RUN_REPORT};
use crate::table::{CollectedTable, TableBuilder};
use indicatif::ProgressBar;
use polars::prelude::*;
use sdam_data::FetchTally;
use sdam_data::dart::{DartClient, DocType, FiscalPeriod};
use sdam_data::naver::NaverPriceScraper;
use sdam_data::translation::Translation;
use sdam_indicators::build_indicator;
use sdam_output::{ExportFormat, Exporter, RunReport, StageSummary, export_table};
use tracing::info;

fn stage(name: &str, tally: FetchTally) -> StageSummary {
    StageSummary::new(name, tally.found, tally.no_data, tally.failed)
}

/// Clients and reference data shared by all stages of a run.
#[derive(Debug)]
pub struct Pipeline {
    config: SdamConfig,
    client: DartClient,
    scraper: NaverPriceScraper,
    translation: Translation,
}

impl Pipeline {
    /// Validate the configuration and set up clients and the translation.
    pub fn new(config: SdamConfig) -> Result<Self> {
        config.validate()?;
        let client = config.dart_client()?;
        let scraper = config.price_scraper()?;
        let translation = Translation::from_path(&config.files.translation)?;
        Ok(Self {
            config,
            client,
            scraper,
            translation,
        })
    }

    /// Active configuration.
    pub const fn config(&self) -> &SdamConfig {
        &self.config
    }

    /// DART client in use.
    pub const fn client(&self) -> &DartClient {
        &self.client
    }

    /// Resolve the company registry.
    pub async fn registry(&self) -> Result<CompanyRegistry> {
        CompanyRegistry::load(&self.client, &self.config).await
    }

    /// Collect the finance table of `registry` for one period.
    pub async fn collect(
        &self,
        registry: &CompanyRegistry,
        period: FiscalPeriod,
        doc_type: DocType,
        progress: Option<&ProgressBar>,
    ) -> Result<CollectedTable> {
        let mut builder = TableBuilder::new(&self.client, &self.translation, self.config.accounts.clone())
            .with_doc_type(doc_type)
            .with_concurrency(self.config.concurrency);
        if let Some(pb) = progress {
            builder = builder.with_progress(pb);
        }
        builder.build(registry, period).await
    }

    /// Append current prices.
    pub async fn annotate(
        &self,
        table: DataFrame,
        progress: Option<&ProgressBar>,
    ) -> Result<AnnotatedTable> {
        let mut annotator = PriceAnnotator::new(&self.scraper).with_concurrency(self.config.concurrency);
        if let Some(pb) = progress {
            annotator = annotator.with_progress(pb);
        }
        annotator.annotate(table).await
    }

    /// Apply the named indicators in order.
    pub fn indicate<S: AsRef<str>>(&self, mut table: DataFrame, indicators: &[S]) -> Result<DataFrame> {
        for name in indicators {
            let indicator =
                build_indicator(name.as_ref(), self.config.indicators.enterprise_value)?;
            table = indicator.apply(table)?;
            info!(indicator = indicator.name(), "indicator applied");
        }
        Ok(table)
    }

    /// Run every stage for one period and write all outputs.
    ///
    /// Writes the finance, price-annotated and NCAV tables plus the run
    /// report into the output directory.
    pub async fn run(&self, period: FiscalPeriod, doc_type: DocType) -> Result<RunReport> {
        let registry = self.registry().await?;
        let mut report = RunReport::new(period.to_string(), doc_type.to_string())
            .with_companies(registry.len());

        let collected = self.collect(&registry, period, doc_type, None).await?;
        report.push_stage(stage("statements", collected.statements));
        report.push_stage(stage("shares", collected.shares));
        let mut table = collected.table;
        let path = self.config.output_path(FINANCE_TABLE);
        export_table(&mut table, &path)?;
        report.push_output(path);

        let annotated = self.annotate(table, None).await?;
        report.push_stage(stage("prices", annotated.prices));
        let mut table = annotated.table;
        let path = self.config.output_path(PRICE_ANNOTATED_TABLE);
        export_table(&mut table, &path)?;
        report.push_output(path);

        let mut table = self.indicate(table, &["ncav"])?;
        let path = self.config.output_path(NCAV_TABLE);
        export_table(&mut table, &path)?;
        report.push_output(path);

        report.finish(table.height());
        let path = self.config.output_path(RUN_REPORT);
        report.push_output(path.clone());
        report.export_to_file(&path, ExportFormat::PrettyJson)?;
        info!(%period, rows = report.rows, "run complete");
        Ok(report)
    }
}
