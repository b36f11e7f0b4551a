//! Company table assembly.
//!
//! One row per registry company for one fiscal period: the requested
//! accounts of its statement plus its issued-share count. Companies are
//! fetched with bounded concurrency and the rows are keyed by exchange
//! code, so the table does not depend on the order replies arrive in.

use crate::error::Result;
use crate::registry::{CompanyRecord, CompanyRegistry};
use crate::schema::{CORP_NAME, DART_CODE, ISSUED_STOCK, KRX_CODE};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use polars::prelude::*;
use sdam_data::dart::{AssetMap, DartClient, DocType, FiscalPeriod, extract_accounts};
use sdam_data::translation::Translation;
use sdam_data::{FetchOutcome, FetchTally};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Values collected for one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRow {
    /// The company.
    pub record: CompanyRecord,
    /// Requested accounts found in the statement.
    pub assets: AssetMap,
    /// Issued-share count, 0 when unavailable.
    pub issued_stock: i64,
    /// How the statement fetch ended.
    pub statement: FetchOutcome,
    /// How the share-count fetch ended.
    pub shares: FetchOutcome,
}

/// Output of the collect stage.
#[derive(Debug, Clone)]
pub struct CollectedTable {
    /// One row per company, sorted by exchange code.
    pub table: DataFrame,
    /// Statement fetch outcomes.
    pub statements: FetchTally,
    /// Share-count fetch outcomes.
    pub shares: FetchTally,
}

/// Build the per-company table.
///
/// Account columns are named by their rendering in `translation`; an
/// untranslated account keeps its Korean name. Missing accounts are 0.
pub fn assemble_table<'a>(
    rows: impl IntoIterator<Item = &'a CompanyRow>,
    accounts: &[String],
    translation: &Translation,
) -> Result<DataFrame> {
    let mut names = Vec::new();
    let mut krx_codes = Vec::new();
    let mut dart_codes = Vec::new();
    let mut amounts: Vec<Vec<i64>> = vec![Vec::new(); accounts.len()];
    let mut issued = Vec::new();

    for row in rows {
        names.push(row.record.corp_name.clone());
        krx_codes.push(row.record.stock_code.clone());
        dart_codes.push(row.record.corp_code.clone());
        for (column, account) in amounts.iter_mut().zip(accounts) {
            column.push(row.assets.get(account).copied().unwrap_or(0));
        }
        issued.push(row.issued_stock);
    }

    let mut columns = vec![
        Column::new(CORP_NAME.into(), names),
        Column::new(KRX_CODE.into(), krx_codes),
        Column::new(DART_CODE.into(), dart_codes),
    ];
    for (account, values) in accounts.iter().zip(amounts) {
        columns.push(Column::new(translation.column_name(account).into(), values));
    }
    columns.push(Column::new(ISSUED_STOCK.into(), issued));

    Ok(DataFrame::new(columns)?)
}

/// Collects statements and share counts for every registry company.
#[derive(Debug)]
pub struct TableBuilder<'a> {
    client: &'a DartClient,
    translation: &'a Translation,
    accounts: Vec<String>,
    doc_type: DocType,
    concurrency: usize,
    progress: Option<&'a ProgressBar>,
}

impl<'a> TableBuilder<'a> {
    /// Create a builder collecting `accounts`.
    pub fn new(client: &'a DartClient, translation: &'a Translation, accounts: Vec<String>) -> Self {
        Self {
            client,
            translation,
            accounts,
            doc_type: DocType::default(),
            concurrency: 8,
            progress: None,
        }
    }

    /// Statement document to query.
    pub const fn with_doc_type(mut self, doc_type: DocType) -> Self {
        self.doc_type = doc_type;
        self
    }

    /// Companies fetched at the same time (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Advance this bar once per company.
    pub const fn with_progress(mut self, progress: &'a ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    async fn collect_row(
        &self,
        record: &CompanyRecord,
        period: FiscalPeriod,
        wanted: &HashSet<String>,
    ) -> Result<CompanyRow> {
        let (statement, shares) = futures::join!(
            self.client
                .statement_or_empty(&record.corp_code, period, self.doc_type),
            self.client.issued_shares_or_zero(&record.corp_code, period),
        );
        let (statement, shares) = (statement?, shares?);

        let assets = extract_accounts(&statement.value, wanted);
        debug!(
            corp_name = %record.corp_name,
            accounts = assets.len(),
            issued = shares.value,
            "company collected"
        );

        Ok(CompanyRow {
            record: record.clone(),
            assets,
            issued_stock: shares.value,
            statement: statement.outcome,
            shares: shares.outcome,
        })
    }

    /// Fetch every company of `registry` for `period`.
    ///
    /// Per-company failures become zero rows and are counted in the
    /// returned tallies. Only a period without a report code fails.
    pub async fn build(
        &self,
        registry: &CompanyRegistry,
        period: FiscalPeriod,
    ) -> Result<CollectedTable> {
        self.client.report_codes().code_for(period.quarter)?;
        let wanted: HashSet<String> = self.accounts.iter().cloned().collect();

        info!(
            companies = registry.len(),
            %period,
            doc_type = %self.doc_type,
            concurrency = self.concurrency,
            "collecting statements"
        );

        let results: Vec<Result<CompanyRow>> = stream::iter(registry.iter())
            .map(|record| self.collect_row(record, period, &wanted))
            .buffer_unordered(self.concurrency)
            .inspect(|_| {
                if let Some(pb) = self.progress {
                    pb.inc(1);
                }
            })
            .collect()
            .await;

        let mut statements = FetchTally::default();
        let mut shares = FetchTally::default();
        let mut rows = BTreeMap::new();
        for row in results {
            let row = row?;
            statements.record(row.statement);
            shares.record(row.shares);
            rows.insert(row.record.stock_code.clone(), row);
        }

        let table = assemble_table(rows.values(), &self.accounts, self.translation)?;
        info!(
            rows = table.height(),
            statements_found = statements.found,
            statements_no_data = statements.no_data,
            statements_failed = statements.failed,
            "statements collected"
        );

        Ok(CollectedTable {
            table,
            statements,
            shares,
        })
    }
}
