//! Price annotation.

use crate::error::{Result, SdamError};
use crate::schema::{KRX_CODE, STOCK_PRICE};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use polars::prelude::*;
use sdam_data::listing::normalize_stock_code;
use sdam_data::naver::NaverPriceScraper;
use sdam_data::{Collected, FetchTally};
use tracing::info;

/// Output of the annotate stage.
#[derive(Debug, Clone)]
pub struct AnnotatedTable {
    /// Input table with `STOCK_PRICE` appended.
    pub table: DataFrame,
    /// Price fetch outcomes.
    pub prices: FetchTally,
}

/// Exchange codes of a table, in row order.
///
/// A code column read back as integers lost its leading zeros; numeric
/// codes are padded again. Null codes become empty strings.
pub fn stock_codes(table: &DataFrame) -> Result<Vec<String>> {
    let column = table
        .column(KRX_CODE)
        .map_err(|_| SdamError::MissingColumn(KRX_CODE.to_string()))?
        .cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|code| code.map(normalize_stock_code).unwrap_or_default())
        .collect())
}

/// Appends the current price of every row.
#[derive(Debug)]
pub struct PriceAnnotator<'a> {
    scraper: &'a NaverPriceScraper,
    concurrency: usize,
    progress: Option<&'a ProgressBar>,
}

impl<'a> PriceAnnotator<'a> {
    /// Create an annotator.
    pub const fn new(scraper: &'a NaverPriceScraper) -> Self {
        Self {
            scraper,
            concurrency: 4,
            progress: None,
        }
    }

    /// Pages fetched at the same time (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Advance this bar once per row.
    pub const fn with_progress(mut self, progress: &'a ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetch a price per row and append `STOCK_PRICE`.
    ///
    /// A row whose price cannot be read gets 0; the batch continues.
    /// An existing `STOCK_PRICE` column is replaced.
    pub async fn annotate(&self, mut table: DataFrame) -> Result<AnnotatedTable> {
        let codes = stock_codes(&table)?;
        info!(rows = codes.len(), "annotating prices");

        let collected: Vec<Collected<i64>> = stream::iter(codes.iter())
            .map(|code| self.scraper.price_or_zero(code))
            .buffered(self.concurrency)
            .inspect(|_| {
                if let Some(pb) = self.progress {
                    pb.inc(1);
                }
            })
            .collect()
            .await;

        let prices: FetchTally = collected.iter().map(|c| c.outcome).collect();
        let values: Vec<i64> = collected.into_iter().map(|c| c.value).collect();
        table.with_column(Column::new(STOCK_PRICE.into(), values))?;

        info!(
            found = prices.found,
            not_found = prices.no_data,
            failed = prices.failed,
            "prices annotated"
        );
        Ok(AnnotatedTable { table, prices })
    }
}
