use std::collections::BTreeMap;
use std::fmt;

use super::model::{LaunchRecord, Outcome, SiteSelection};

// ---------------------------------------------------------------------------
// Success counts for the pie chart
// ---------------------------------------------------------------------------

/// What a group in [`SuccessCounts`] is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    Site(String),
    Outcome(Outcome),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Site(s) => write!(f, "{s}"),
            GroupKey::Outcome(o) => write!(f, "{o}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: GroupKey,
    pub count: u64,
}

/// Aggregated pie data: per-site success totals, or per-outcome counts for
/// one site.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessCounts {
    pub site: SiteSelection,
    pub title: String,
    pub groups: Vec<GroupCount>,
}

/// Group `records` for the success pie chart.
///
/// * `All` – one group per site (first-appearance order) whose count is the
///   number of successful launches, not attempts.
/// * `Site(s)` – one group per outcome class present at `s`, counting
///   attempts. An unknown site produces no groups.
pub fn aggregate(records: &[LaunchRecord], site: &SiteSelection) -> SuccessCounts {
    let (title, groups) = match site {
        SiteSelection::All => {
            let mut groups: Vec<GroupCount> = Vec::new();
            for rec in records {
                let success = u64::from(rec.outcome.value());
                match groups
                    .iter_mut()
                    .find(|g| matches!(&g.key, GroupKey::Site(s) if *s == rec.launch_site))
                {
                    Some(group) => group.count += success,
                    None => groups.push(GroupCount {
                        key: GroupKey::Site(rec.launch_site.clone()),
                        count: success,
                    }),
                }
            }
            ("Total Success Launches".to_string(), groups)
        }
        SiteSelection::Site(name) => {
            let mut groups: Vec<GroupCount> = Vec::new();
            for rec in records.iter().filter(|r| r.launch_site == *name) {
                let key = GroupKey::Outcome(rec.outcome);
                match groups.iter_mut().find(|g| g.key == key) {
                    Some(group) => group.count += 1,
                    None => groups.push(GroupCount { key, count: 1 }),
                }
            }
            (format!("Total Success Launches for site {name}"), groups)
        }
    };

    SuccessCounts {
        site: site.clone(),
        title,
        groups,
    }
}

// ---------------------------------------------------------------------------
// Success ratio report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SiteRatio {
    pub site: String,
    pub successes: u64,
    pub attempts: u64,
    pub ratio: f64,
}

impl SiteRatio {
    /// One-line startup report. The ratio always carries a decimal point.
    pub fn report_line(&self) -> String {
        format!(
            "Launch site with highest success ratio: {}, Success Ratio: {:?}",
            self.site, self.ratio
        )
    }
}

/// Successes ÷ attempts for each site, sorted by site name.
pub fn success_ratios(records: &[LaunchRecord]) -> Vec<SiteRatio> {
    let mut per_site: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for rec in records {
        let entry = per_site.entry(rec.launch_site.as_str()).or_default();
        if rec.outcome.is_success() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    per_site
        .into_iter()
        .map(|(site, (successes, attempts))| SiteRatio {
            site: site.to_string(),
            successes,
            attempts,
            ratio: if attempts > 0 {
                successes as f64 / attempts as f64
            } else {
                0.0
            },
        })
        .collect()
}

/// The site with the highest success ratio; ties go to the first site by name.
pub fn best_success_ratio(records: &[LaunchRecord]) -> Option<SiteRatio> {
    success_ratios(records)
        .into_iter()
        .fold(None, |best: Option<SiteRatio>, candidate| match best {
            Some(b) if b.ratio >= candidate.ratio => Some(b),
            _ => Some(candidate),
        })
}
