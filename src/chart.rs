use crate::data::aggregate::SuccessCounts;
use crate::data::model::{LaunchRecord, SiteSelection};

// ---------------------------------------------------------------------------
// Chart specifications: plain data handed to the painters in `ui`
// ---------------------------------------------------------------------------

/// What the pie slice labels show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInfo {
    Percent,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
    pub text_info: TextInfo,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of slice `idx` in the total; 0 when the total is 0.
    pub fn fraction(&self, idx: usize) -> f64 {
        let total = self.total();
        match self.slices.get(idx) {
            Some(slice) if total > 0 => slice.value as f64 / total as f64,
            _ => 0.0,
        }
    }

    /// Text drawn on/next to slice `idx`.
    pub fn slice_text(&self, idx: usize) -> String {
        match self.text_info {
            TextInfo::Percent => format!("{:.1}%", self.fraction(idx) * 100.0),
            TextInfo::Value => self
                .slices
                .get(idx)
                .map(|s| s.value.to_string())
                .unwrap_or_default(),
        }
    }
}

/// One booster category's points.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub category: String,
    /// `[payload_mass_kg, class]`
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Pie(PieChart),
    Scatter(ScatterChart),
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Pie chart from aggregated success counts. Per-site views show raw counts.
pub fn pie_chart(counts: &SuccessCounts) -> PieChart {
    let text_info = match counts.site {
        SiteSelection::All => TextInfo::Percent,
        SiteSelection::Site(_) => TextInfo::Value,
    };
    PieChart {
        title: counts.title.clone(),
        slices: counts
            .groups
            .iter()
            .map(|g| PieSlice {
                label: g.key.to_string(),
                value: g.count,
            })
            .collect(),
        text_info,
    }
}

/// Payload vs. class scatter, one series per booster category in order of
/// first appearance.
pub fn scatter_chart(site: &SiteSelection, records: &[&LaunchRecord]) -> ScatterChart {
    let title = match site {
        SiteSelection::All => "Correlation Between Payload and Success for All Sites".to_string(),
        SiteSelection::Site(s) => format!("Correlation Between Payload and Success for Site {s}"),
    };

    let mut series: Vec<ScatterSeries> = Vec::new();
    for rec in records {
        let point = [rec.payload_mass_kg, f64::from(rec.outcome.value())];
        match series
            .iter_mut()
            .find(|s| s.category == rec.booster_version_category)
        {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                category: rec.booster_version_category.clone(),
                points: vec![point],
            }),
        }
    }

    ScatterChart {
        title,
        x_label: "Payload Mass (kg)".to_string(),
        y_label: "class".to_string(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::aggregate;
    use crate::data::model::{record, sample_table};

    #[test]
    fn pie_for_all_sites_shows_percentages() {
        let table = sample_table();
        let pie = pie_chart(&aggregate(table.records(), &SiteSelection::All));
        assert_eq!(pie.text_info, TextInfo::Percent);
        assert_eq!(pie.total(), 2);
        assert_eq!(pie.fraction(0), 0.5);
        assert_eq!(pie.slice_text(1), "50.0%");
    }

    #[test]
    fn pie_for_one_site_shows_counts() {
        let table = sample_table();
        let pie = pie_chart(&aggregate(
            table.records(),
            &SiteSelection::parse("CCAFS LC-40"),
        ));
        assert_eq!(pie.text_info, TextInfo::Value);
        assert_eq!(pie.slices[0].label, "1");
        assert_eq!(pie.slice_text(0), "1");
    }

    #[test]
    fn empty_pie_has_zero_fractions() {
        let pie = pie_chart(&aggregate(&[], &SiteSelection::All));
        assert_eq!(pie.total(), 0);
        assert_eq!(pie.fraction(0), 0.0);
    }

    #[test]
    fn scatter_groups_by_booster_category() {
        let records = [
            record("KSC LC-39A", 100.0, 1, "FT"),
            record("KSC LC-39A", 200.0, 0, "B4"),
            record("KSC LC-39A", 300.0, 1, "FT"),
        ];
        let refs: Vec<&LaunchRecord> = records.iter().collect();
        let chart = scatter_chart(&SiteSelection::parse("KSC LC-39A"), &refs);

        assert_eq!(
            chart.title,
            "Correlation Between Payload and Success for Site KSC LC-39A"
        );
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].category, "FT");
        assert_eq!(chart.series[0].points, vec![[100.0, 1.0], [300.0, 1.0]]);
        assert_eq!(chart.series[1].points, vec![[200.0, 0.0]]);
        assert_eq!(chart.point_count(), 3);
    }

    #[test]
    fn scatter_for_all_sites_title() {
        let chart = scatter_chart(&SiteSelection::All, &[]);
        assert_eq!(
            chart.title,
            "Correlation Between Payload and Success for All Sites"
        );
        assert!(chart.series.is_empty());
    }
}
