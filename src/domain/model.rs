use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

pub const COUNTRY_FIELD: &str = "Country Name";
pub const YEAR_FIELD: &str = "Year";
pub const YIELD_FIELD: &str = "Cereal_Yield";

/// One row of the yield table: cereal yield (kg/ha) for a country in a year.
///
/// A blank yield cell stays in the table as `None` (serialized as `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRecord {
    #[serde(rename = "Country Name")]
    pub country_name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Cereal_Yield")]
    pub cereal_yield: Option<f64>,
}

impl YieldRecord {
    pub fn new(country_name: impl Into<String>, year: i32, cereal_yield: f64) -> Self {
        Self {
            country_name: country_name.into(),
            year,
            cereal_yield: Some(cereal_yield),
        }
    }

    /// A row whose yield was not reported.
    pub fn missing(country_name: impl Into<String>, year: i32) -> Self {
        Self {
            country_name: country_name.into(),
            year,
            cereal_yield: None,
        }
    }
}

/// Immutable, file-ordered table of yield records.
///
/// Every filter returns borrowed rows in table order; that order is the
/// tie-break used by the rankings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldTable {
    records: Vec<YieldRecord>,
}

impl YieldTable {
    pub fn new(records: Vec<YieldRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[YieldRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_year(&self, year: i32) -> Vec<&YieldRecord> {
        self.records.iter().filter(|r| r.year == year).collect()
    }

    /// Unique years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unique years in order of first appearance.
    pub fn years_by_appearance(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.year)
            .filter(|year| seen.insert(*year))
            .collect()
    }

    /// Rows without a reported yield.
    pub fn missing_yields(&self) -> usize {
        self.records.iter().filter(|r| r.cereal_yield.is_none()).count()
    }

    /// Unique countries in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.country_name.as_str()))
            .map(|r| r.country_name.as_str())
            .collect()
    }

    /// (country, year) pairs that appear more than once.
    pub fn duplicate_keys(&self) -> Vec<(&str, i32)> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for record in &self.records {
            let key = (record.country_name.as_str(), record.year);
            if !seen.insert(key) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        duplicates
    }

    /// Smallest and largest reported yield over the whole table.
    pub fn yield_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().filter_map(|r| r.cereal_yield).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl FromIterator<YieldRecord> for YieldTable {
    fn from_iter<I: IntoIterator<Item = YieldRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A finished dashboard page for one selected year.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub year: i32,
    pub file_name: String,
    pub html: String,
}

/// Side files that accompany the pages in the export bundle.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: String,
    pub contents: String,
}

#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    pub pages: Vec<RenderedPage>,
    pub artifacts: Vec<Artifact>,
}
