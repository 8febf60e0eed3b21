//! Domain types for bibliographic records.
//!
//! A [`Record`] is one canonical bibliographic entry as delivered by the
//! upstream download/deduplication pipeline. Records are normalized once at
//! construction and never mutated afterwards; a [`RecordSet`] owns them and
//! guarantees the ids form the contiguous range `[0, n)`.

pub mod normalize;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable index of a record within its [`RecordSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl RecordId {
    /// Returns the id as a vector index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for RecordId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// One canonical bibliographic entry.
///
/// Text fields are stored normalized (see [`normalize`]); `display_title`
/// keeps the title as it arrived for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Position in the record set.
    pub id: RecordId,

    /// Title as given upstream, whitespace-collapsed.
    pub display_title: String,

    /// Normalized title. Empty only for malformed upstream data.
    pub title: String,

    /// Unique whitespace tokens of `title`.
    #[serde(skip)]
    pub title_tokens: BTreeSet<String>,

    /// Normalized author names.
    pub authors: BTreeSet<String>,

    /// Normalized keywords.
    pub keywords: BTreeSet<String>,

    /// Publication year, if known.
    pub year: Option<i32>,

    /// Canonical DOI, carried for reference only.
    pub doi: Option<String>,

    /// Raw target ids this record explicitly cites, in source order.
    ///
    /// `Some` (even when empty) disables similarity inference for this
    /// record's outgoing edges.
    pub explicit_citations: Option<Vec<i64>>,
}

impl Record {
    /// Creates a record with the given id and title and no other metadata.
    #[must_use]
    pub fn new(id: impl Into<RecordId>, title: &str) -> Self {
        let normalized = normalize::normalize_text(title);
        Self {
            id: id.into(),
            display_title: title.split_whitespace().collect::<Vec<_>>().join(" "),
            title_tokens: normalize::tokens(&normalized),
            title: normalized,
            authors: BTreeSet::new(),
            keywords: BTreeSet::new(),
            year: None,
            doi: None,
            explicit_citations: None,
        }
    }

    /// Sets the authors, normalizing each name.
    #[must_use]
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.authors = normalize::normalize_items(authors);
        self
    }

    /// Sets the keywords, normalizing each keyword.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = normalize::normalize_items(keywords);
        self
    }

    /// Sets the publication year.
    #[must_use]
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    /// Sets the DOI, canonicalizing it.
    #[must_use]
    pub fn with_doi(mut self, doi: &str) -> Self {
        self.doi = normalize::normalize_doi(doi);
        self
    }

    /// Sets the explicit citation list.
    #[must_use]
    pub fn with_citations<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.explicit_citations = Some(targets.into_iter().collect());
        self
    }

    /// Returns `true` if the record carries explicit citation data.
    #[must_use]
    pub fn has_explicit_citations(&self) -> bool {
        self.explicit_citations.is_some()
    }

    /// Returns the title to show to humans, falling back to the id.
    #[must_use]
    pub fn label(&self) -> String {
        if self.display_title.is_empty() {
            format!("(untitled record {})", self.id)
        } else {
            self.display_title.clone()
        }
    }
}

/// Field that arrives either as one delimited string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    /// `"Smith, J.; Doe, A."`
    Delimited(String),
    /// `["Smith, J.", "Doe, A."]`
    Items(Vec<String>),
}

impl Default for TextList {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

/// Year that arrives either as a number or as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    /// `2019`
    Number(i64),
    /// `"2019/05/01"`
    Text(String),
}

impl YearValue {
    fn resolve(&self) -> Option<i32> {
        match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(text) => normalize::parse_year(text),
        }
    }
}

/// A record as produced by the upstream pipeline, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Optional explicit id; either every record carries one or none does.
    #[serde(default)]
    pub id: Option<i64>,

    /// Title text.
    #[serde(default)]
    pub title: String,

    /// Authors, delimited by `;` or `,` when given as a string.
    #[serde(default)]
    pub authors: TextList,

    /// Keywords, delimited by `;`, `,` or `|` when given as a string.
    #[serde(default)]
    pub keywords: TextList,

    /// Publication year.
    #[serde(default)]
    pub year: Option<YearValue>,

    /// DOI.
    #[serde(default)]
    pub doi: Option<String>,

    /// Explicit citation targets (record ids).
    #[serde(default, alias = "explicit_citations", alias = "references")]
    pub citations: Option<Vec<i64>>,
}

impl RawRecord {
    fn into_record(self, id: RecordId) -> Record {
        let mut record = Record::new(id, &self.title);
        record.authors = match &self.authors {
            TextList::Delimited(raw) => normalize::split_authors(raw),
            TextList::Items(items) => normalize::normalize_items(items),
        };
        record.keywords = match &self.keywords {
            TextList::Delimited(raw) => normalize::split_keywords(raw),
            TextList::Items(items) => normalize::normalize_items(items),
        };
        record.year = self.year.as_ref().and_then(YearValue::resolve);
        record.doi = self.doi.as_deref().and_then(normalize::normalize_doi);
        record.explicit_citations = self.citations;
        record
    }
}

/// The immutable, contiguously-indexed set of records for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Builds a record set from already-constructed records.
    ///
    /// Records may arrive in any order; they are placed by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if ids are duplicated or do not form
    /// the range `[0, n)`.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let n = records.len();
        let mut slots: Vec<Option<Record>> = vec![None; n];

        for (index, record) in records.into_iter().enumerate() {
            let id = record.id.index();
            if id >= n {
                return Err(Error::MalformedRecord {
                    index,
                    reason: format!("id {id} is outside the contiguous range 0..{n}"),
                });
            }
            if slots[id].is_some() {
                return Err(Error::MalformedRecord {
                    index,
                    reason: format!("duplicate id {id}"),
                });
            }
            slots[id] = Some(record);
        }

        // n records, n distinct ids, all below n: every slot is filled.
        Ok(Self {
            records: slots.into_iter().flatten().collect(),
        })
    }

    /// Normalizes raw upstream records into a record set.
    ///
    /// When no raw record carries an id, ids are assigned in input order.
    /// Otherwise every record must carry one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] for a missing, negative, duplicate,
    /// or out-of-range id.
    pub fn from_raw(raw: Vec<RawRecord>) -> Result<Self> {
        let explicit_ids = raw.iter().any(|r| r.id.is_some());

        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, r)| {
                let id = if explicit_ids {
                    let Some(raw_id) = r.id else {
                        return Err(Error::MalformedRecord {
                            index,
                            reason: "record has no id while other records do".to_string(),
                        });
                    };
                    usize::try_from(raw_id).map_err(|_| Error::MalformedRecord {
                        index,
                        reason: format!("negative id {raw_id}"),
                    })?
                } else {
                    index
                };
                Ok(r.into_record(RecordId(id)))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(records)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Resolves a raw citation target to a record id, if it is in range.
    #[must_use]
    pub fn resolve(&self, raw: i64) -> Option<RecordId> {
        usize::try_from(raw)
            .ok()
            .filter(|id| *id < self.records.len())
            .map(RecordId)
    }

    /// Iterates records in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the records as a slice indexed by id.
    #[must_use]
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Finds records whose normalized title contains the normalized fragment.
    ///
    /// Returns at most `limit` hits in id order. An empty fragment matches nothing.
    #[must_use]
    pub fn search_by_title(&self, fragment: &str, limit: usize) -> Vec<&Record> {
        let needle = normalize::normalize_text(fragment);
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.title.contains(&needle))
            .take(limit)
            .collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
