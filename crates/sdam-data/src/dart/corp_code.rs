//! DART company directory (`corpCode.xml`).
//!
//! DART publishes one directory of every registered company, listed or
//! not, as a ZIP archive holding a single XML file:
//!
//! ```xml
//! <result>
//!   <list>
//!     <corp_code>00126380</corp_code>
//!     <corp_name>삼성전자</corp_name>
//!     <stock_code>005930</stock_code>
//!     <modify_date>20230110</modify_date>
//!   </list>
//!   ...
//! </result>
//! ```
//!
//! Unlisted companies carry a blank `stock_code`.

use crate::dart::client::DartClient;
use crate::error::{DataError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use tracing::{debug, info};

/// One company in the DART directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpEntry {
    /// DART unique company id (8 digits).
    pub corp_code: String,
    /// Company display name.
    pub corp_name: String,
    /// Exchange code; empty for unlisted companies.
    pub stock_code: String,
    /// Last modification date (YYYYMMDD).
    pub modify_date: String,
}

impl CorpEntry {
    /// Returns true if the company carries an exchange code.
    pub fn is_listed(&self) -> bool {
        !self.stock_code.is_empty()
    }
}

/// The full DART company directory.
#[derive(Debug, Clone, Default)]
pub struct CorpDirectory {
    entries: Vec<CorpEntry>,
}

impl CorpDirectory {
    /// Build a directory from entries.
    pub const fn new(entries: Vec<CorpEntry>) -> Self {
        Self { entries }
    }

    /// All entries in upstream order.
    pub fn entries(&self) -> &[CorpEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that carry an exchange code.
    pub fn listed(&self) -> impl Iterator<Item = &CorpEntry> {
        self.entries.iter().filter(|e| e.is_listed())
    }

    /// Look up a company by its exact display name.
    pub fn find_by_name(&self, corp_name: &str) -> Option<&CorpEntry> {
        self.entries.iter().find(|e| e.corp_name == corp_name)
    }

    /// Like [`Self::find_by_name`], failing with `CompanyNotFound`.
    pub fn require_by_name(&self, corp_name: &str) -> Result<&CorpEntry> {
        self.find_by_name(corp_name)
            .ok_or_else(|| DataError::CompanyNotFound(corp_name.to_string()))
    }

    /// Unpack the ZIP payload served by `corpCode.xml` and parse its first file.
    pub fn from_zip(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        if archive.len() == 0 {
            return Err(DataError::DartApi(
                "Company directory archive is empty".to_string(),
            ));
        }

        let mut file = archive.by_index(0)?;
        debug!(file = file.name(), size = file.size(), "unpacking company directory");
        let mut xml = String::new();
        file.read_to_string(&mut xml)?;

        Self::parse_xml(&xml)
    }

    /// Parse the directory XML.
    pub fn parse_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut current: Option<CorpEntry> = None;
        let mut field: Option<Vec<u8>> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    if name == b"list" {
                        current = Some(CorpEntry::default());
                    } else if current.is_some() {
                        field = Some(name);
                    }
                }
                Event::Text(t) => {
                    if let (Some(entry), Some(name)) = (current.as_mut(), field.as_deref()) {
                        let text = t
                            .unescape()
                            .map_err(|e| DataError::XmlParse(e.to_string()))?;
                        let text = text.trim().to_string();
                        match name {
                            b"corp_code" => entry.corp_code = text,
                            b"corp_name" => entry.corp_name = text,
                            b"stock_code" => entry.stock_code = text,
                            b"modify_date" => entry.modify_date = text,
                            _ => {}
                        }
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"list" {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    } else {
                        field = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self::new(entries))
    }
}

impl DartClient {
    /// Download and parse the DART company directory.
    ///
    /// Failures are returned to the caller: without the directory no
    /// company can be resolved.
    pub async fn fetch_corp_directory(&self) -> Result<CorpDirectory> {
        info!("fetching DART company directory");
        let bytes = self.get_bytes("corpCode.xml", &[]).await?;
        let directory = CorpDirectory::from_zip(&bytes)?;
        info!(companies = directory.len(), "company directory loaded");
        Ok(directory)
    }
}
