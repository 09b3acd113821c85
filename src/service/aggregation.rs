//! Pure aggregation folds over raw report sets.
//!
//! This is the single implementation of the grouping/summing behind every
//! analytics endpoint. A client re-deriving aggregates offline from a
//! cached report set calls these same functions, so the server path and
//! the fallback path cannot drift numerically. Keep this module free of
//! storage and HTTP concerns.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use bson::oid::ObjectId;

use crate::dto::analytics_dto::{DailySummary, MonthlySummary, RegionPerformance, RepPerformance};
use crate::model::report::DailyReport;
use crate::model::user::User;

/// Group reports by calendar date, most recent first.
pub fn daily_summaries(reports: &[DailyReport]) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<chrono::NaiveDate, DailySummary> = BTreeMap::new();
    for report in reports {
        let entry = by_date
            .entry(report.report_date)
            .or_insert_with(|| DailySummary {
                date: report.report_date,
                total_doctors: 0,
                total_pharmacies: 0,
                total_dispensaries: 0,
                total_orders: 0,
                total_value: 0.0,
            });
        entry.total_doctors += u64::from(report.total_doctors());
        entry.total_pharmacies += u64::from(report.pharmacies);
        entry.total_dispensaries += u64::from(report.dispensaries);
        entry.total_orders += u64::from(report.orders_count);
        entry.total_value += report.orders_value;
    }
    by_date.into_values().rev().collect()
}

/// Group reports by `YYYY-MM`, most recent first, capped at `max_months`.
pub fn monthly_summaries(reports: &[DailyReport], max_months: usize) -> Vec<MonthlySummary> {
    let mut by_month: BTreeMap<String, MonthlySummary> = BTreeMap::new();
    for report in reports {
        let month = report.report_date.format("%Y-%m").to_string();
        let entry = by_month
            .entry(month.clone())
            .or_insert_with(|| MonthlySummary {
                month,
                reports_count: 0,
                total_doctors: 0,
                total_pharmacies: 0,
                total_dispensaries: 0,
                total_orders: 0,
                total_value: 0.0,
            });
        entry.reports_count += 1;
        entry.total_doctors += u64::from(report.total_doctors());
        entry.total_pharmacies += u64::from(report.pharmacies);
        entry.total_dispensaries += u64::from(report.dispensaries);
        entry.total_orders += u64::from(report.orders_count);
        entry.total_value += report.orders_value;
    }
    by_month.into_values().rev().take(max_months).collect()
}

/// One row per representative, joined against their reports. Reps with no
/// in-window reports still appear with zero sums. Ordered by total order
/// value descending.
pub fn team_performance(reps: &[User], reports: &[DailyReport]) -> Vec<RepPerformance> {
    let mut by_rep: HashMap<ObjectId, RepPerformance> = HashMap::new();
    for rep in reps {
        let Some(id) = rep.id else { continue };
        by_rep.insert(
            id,
            RepPerformance {
                user_id: id.to_hex(),
                user_name: rep.name.clone(),
                region: rep.region.clone(),
                reports_count: 0,
                total_doctors: 0,
                total_visits: 0,
                total_orders: 0,
                total_value: 0.0,
            },
        );
    }
    for report in reports {
        // Reports from users outside the rep set (deactivated since
        // submission) are skipped.
        let Some(entry) = by_rep.get_mut(&report.user_id) else {
            continue;
        };
        entry.reports_count += 1;
        entry.total_doctors += u64::from(report.total_doctors());
        entry.total_visits += u64::from(report.total_visits());
        entry.total_orders += u64::from(report.orders_count);
        entry.total_value += report.orders_value;
    }
    let mut rows: Vec<RepPerformance> = by_rep.into_values().collect();
    rows.sort_by(|a, b| value_desc(a.total_value, b.total_value).then(a.user_name.cmp(&b.user_name)));
    rows
}

/// One row per region with at least one report, counting distinct
/// contributing representatives. Ordered by total order value descending.
///
/// The grouping key is the report's stored `region` (captured at
/// submission, where it defaults to the owner's profile region), not the
/// owner's current profile region, so a rep moving regions does not
/// rewrite their historical rows.
pub fn region_performance(reports: &[DailyReport]) -> Vec<RegionPerformance> {
    let mut by_region: HashMap<String, (RegionPerformance, HashSet<ObjectId>)> = HashMap::new();
    for report in reports {
        let (entry, contributors) = by_region
            .entry(report.region.clone())
            .or_insert_with(|| {
                (
                    RegionPerformance {
                        region: report.region.clone(),
                        active_reps: 0,
                        reports_count: 0,
                        total_doctors: 0,
                        total_orders: 0,
                        total_value: 0.0,
                    },
                    HashSet::new(),
                )
            });
        contributors.insert(report.user_id);
        entry.reports_count += 1;
        entry.total_doctors += u64::from(report.total_doctors());
        entry.total_orders += u64::from(report.orders_count);
        entry.total_value += report.orders_value;
    }
    let mut rows: Vec<RegionPerformance> = by_region
        .into_values()
        .map(|(mut entry, contributors)| {
            entry.active_reps = contributors.len() as u64;
            entry
        })
        .collect();
    rows.sort_by(|a, b| value_desc(a.total_value, b.total_value).then(a.region.cmp(&b.region)));
    rows
}

fn value_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
