use super::model::{LaunchRecord, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Payload / site predicate for the scatter chart
// ---------------------------------------------------------------------------

/// Return indices of records inside `range` (inclusive) launched from `site`.
///
/// An inverted range, or one with a NaN bound, selects nothing. Indices are
/// in dataset order.
pub fn scatter_indices(
    records: &[LaunchRecord],
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.payload_mass_kg))
        .filter(|(_, rec)| site.matches(&rec.launch_site))
        .map(|(i, _)| i)
        .collect()
}

/// The records selected by [`scatter_indices`], original order preserved.
pub fn filter_scatter<'a>(
    records: &'a [LaunchRecord],
    site: &SiteSelection,
    low: f64,
    high: f64,
) -> Vec<&'a LaunchRecord> {
    scatter_indices(records, site, PayloadRange::new(low, high))
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, sample_table};

    #[test]
    fn range_is_inclusive_and_order_is_stable() {
        let table = sample_table();
        let out = filter_scatter(table.records(), &SiteSelection::All, 1000.0, 3000.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], &record("CCAFS LC-40", 2000.0, 0, "v1.0"));
        assert_eq!(out[1], &record("KSC LC-39A", 1500.0, 1, "FT"));

        let edge = filter_scatter(table.records(), &SiteSelection::All, 500.0, 1500.0);
        assert_eq!(edge.len(), 2);
    }

    #[test]
    fn full_bounds_return_everything() {
        let table = sample_table();
        let b = table.bounds().unwrap();
        let out = filter_scatter(table.records(), &SiteSelection::All, b.min, b.max);
        assert_eq!(out.len(), table.len());
    }

    #[test]
    fn site_filter_applies_after_range() {
        let table = sample_table();
        let site = SiteSelection::parse("CCAFS LC-40");
        let out = filter_scatter(table.records(), &site, 0.0, 10_000.0);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.launch_site == "CCAFS LC-40"));
        assert!(out.iter().all(|r| (0.0..=10_000.0).contains(&r.payload_mass_kg)));
    }

    #[test]
    fn inverted_or_nan_range_is_empty() {
        let table = sample_table();
        assert!(filter_scatter(table.records(), &SiteSelection::All, 3000.0, 0.0).is_empty());
        assert!(filter_scatter(table.records(), &SiteSelection::All, f64::NAN, 3000.0).is_empty());
    }

    #[test]
    fn unknown_site_is_empty() {
        let table = sample_table();
        let site = SiteSelection::parse("Boca Chica");
        assert!(scatter_indices(table.records(), &site, PayloadRange::new(0.0, 1e6)).is_empty());
    }
}
