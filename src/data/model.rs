use std::collections::BTreeSet;
use std::fmt;

use anyhow::{bail, Result};

use crate::error::DashError;

/// Control value meaning "every launch site".
pub const ALL_SITES: &str = "ALL";

/// The launch pads offered in the site dropdown.
pub const KNOWN_SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Parse the integer encoding used by the source data (0 / 1).
    pub fn from_class(class: i64) -> Result<Self> {
        match class {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => bail!("class must be 0 or 1, got {other}"),
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ---------------------------------------------------------------------------
// SiteSelection – value of the site dropdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Interpret a raw dropdown value; `"ALL"` selects every site.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }

    /// Dropdown label.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => "All Sites",
            SiteSelection::Site(s) => s,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "{ALL_SITES}"),
            SiteSelection::Site(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

impl LaunchRecord {
    /// Build a validated record from raw column values.
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        class: i64,
        booster_version_category: impl Into<String>,
    ) -> Result<Self> {
        if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
            bail!("payload mass must be a non-negative number, got {payload_mass_kg}");
        }
        Ok(LaunchRecord {
            launch_site: launch_site.into(),
            payload_mass_kg,
            outcome: Outcome::from_class(class)?,
            booster_version_category: booster_version_category.into(),
            flight_number: None,
            booster_version: None,
        })
    }

    pub fn with_flight_number(mut self, flight_number: Option<u32>) -> Self {
        self.flight_number = flight_number;
        self
    }

    pub fn with_booster_version(mut self, booster_version: Option<String>) -> Self {
        self.booster_version = booster_version;
        self
    }
}

// ---------------------------------------------------------------------------
// PayloadBounds / PayloadRange
// ---------------------------------------------------------------------------

/// Observed payload extremes; used to seed the range control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

/// Current value of the payload range control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    /// Inclusive at both ends. An inverted range contains nothing.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

impl From<PayloadBounds> for PayloadRange {
    fn from(bounds: PayloadBounds) -> Self {
        PayloadRange::new(bounds.min, bounds.max)
    }
}

/// Min / max payload mass over `records`.
pub fn bounds(records: &[LaunchRecord]) -> Result<PayloadBounds, DashError> {
    let mut iter = records.iter().map(|r| r.payload_mass_kg);
    let first = iter.next().ok_or(DashError::EmptyDataset)?;
    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Ok(PayloadBounds { min, max })
}

// ---------------------------------------------------------------------------
// LaunchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    sites: Vec<String>,
    booster_categories: BTreeSet<String>,
}

impl LaunchTable {
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        for rec in &records {
            if !sites.contains(&rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_version_category.clone());
        }
        LaunchTable {
            records,
            sites,
            booster_categories,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    pub fn bounds(&self) -> Result<PayloadBounds, DashError> {
        bounds(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) fn record(site: &str, payload: f64, class: i64, category: &str) -> LaunchRecord {
    LaunchRecord::new(site, payload, class, category).unwrap()
}

#[cfg(test)]
pub(crate) fn sample_table() -> LaunchTable {
    LaunchTable::from_records(vec![
        record("CCAFS LC-40", 500.0, 1, "v1.0"),
        record("CCAFS LC-40", 2000.0, 0, "v1.0"),
        record("KSC LC-39A", 1500.0, 1, "FT"),
    ])
}
