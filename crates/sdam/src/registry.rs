//! Registry of listed companies.
//!
//! Joins the KRX listing (which companies trade on the selected markets)
//! with the DART company directory (which DART id each company has).

use crate::config::SdamConfig;
use crate::error::Result;
use sdam_data::dart::{CorpDirectory, DartClient};
use sdam_data::listing::{ListedSecurities, normalize_stock_code};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One listed company.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyRecord {
    /// Display name.
    pub corp_name: String,
    /// DART company id.
    pub corp_code: String,
    /// Exchange code, zero-padded when numeric.
    pub stock_code: String,
}

/// Companies keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct CompanyRegistry {
    companies: BTreeMap<String, CompanyRecord>,
}

impl CompanyRegistry {
    /// Build from explicit records. A repeated name keeps its first record.
    pub fn new(records: impl IntoIterator<Item = CompanyRecord>) -> Self {
        let mut companies = BTreeMap::new();
        for record in records {
            companies.entry(record.corp_name.clone()).or_insert(record);
        }
        Self { companies }
    }

    /// Keep the directory entries whose exchange code is listed.
    ///
    /// Entries with a blank exchange code are unlisted and never match.
    pub fn resolve(listing: &ListedSecurities, directory: &CorpDirectory) -> Self {
        let mut companies = BTreeMap::new();
        for entry in directory.listed() {
            let stock_code = normalize_stock_code(&entry.stock_code);
            if !listing.contains(&stock_code) {
                continue;
            }
            if companies.contains_key(&entry.corp_name) {
                debug!(corp_name = %entry.corp_name, "duplicate company name; keeping first entry");
                continue;
            }
            companies.insert(
                entry.corp_name.clone(),
                CompanyRecord {
                    corp_name: entry.corp_name.clone(),
                    corp_code: entry.corp_code.clone(),
                    stock_code,
                },
            );
        }
        Self { companies }
    }

    /// Read the listing file and download the directory, then resolve.
    ///
    /// A failed directory download is fatal: no company could be resolved
    /// without it.
    pub async fn load(client: &DartClient, config: &SdamConfig) -> Result<Self> {
        let listing = ListedSecurities::from_path(&config.files.listing, &config.markets)?;
        let directory = client.fetch_corp_directory().await?;
        let registry = Self::resolve(&listing, &directory);
        info!(
            listed = listing.len(),
            directory = directory.len(),
            resolved = registry.len(),
            "company registry resolved"
        );
        Ok(registry)
    }

    /// Record for a display name.
    pub fn get(&self, corp_name: &str) -> Option<&CompanyRecord> {
        self.companies.get(corp_name)
    }

    /// Record for an exchange code.
    pub fn find_by_stock_code(&self, stock_code: &str) -> Option<&CompanyRecord> {
        let stock_code = normalize_stock_code(stock_code);
        self.companies.values().find(|r| r.stock_code == stock_code)
    }

    /// Records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.companies.values()
    }

    /// Number of companies.
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    /// Returns true if no company was resolved.
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
