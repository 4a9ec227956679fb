//! Numeric helpers behind the metric callouts, donuts and ranked table.

use crate::domain::model::{YieldRecord, YieldTable};
use crate::utils::error::{DashboardError, Result};
use std::cmp::Ordering;

pub const DEFAULT_THRESHOLD: f64 = 5000.0;

const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Human-readable number with an `M` or `K` suffix.
///
/// Values of one million and up keep one decimal unless they are an exact
/// multiple of a million. Everything below is floor-divided by 1000, so the
/// K branch truncates instead of rounding.
pub fn format_number(num: f64) -> String {
    if num >= MILLION {
        if num % MILLION == 0.0 {
            return format!("{} M", (num / MILLION) as i64);
        }
        return format!("{:.1} M", num / MILLION);
    }
    format!("{} K", (num / THOUSAND).floor() as i64)
}

/// Percentage (0-100) of rows for `year` whose yield is strictly above `threshold`.
pub fn calculate_percentage(table: &YieldTable, year: i32, threshold: f64) -> Result<f64> {
    percentage_above(&table.for_year(year), threshold).ok_or(DashboardError::NoDataForYear { year })
}

/// Same as [`calculate_percentage`] over an already filtered subset.
///
/// Rows without a yield still count in the denominator; they are never above.
pub fn percentage_above(rows: &[&YieldRecord], threshold: f64) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let above = rows
        .iter()
        .filter(|r| r.cereal_yield.is_some_and(|v| v > threshold))
        .count();
    Some(above as f64 / rows.len() as f64 * 100.0)
}

/// Complement of a percentage, kept inside 0-100.
pub fn complement(percentage: f64) -> f64 {
    100.0 - percentage.clamp(0.0, 100.0)
}

/// Orders reported yields in the requested direction; missing yields go last
/// either way.
fn by_yield(a: &YieldRecord, b: &YieldRecord, descending: bool) -> Ordering {
    match (a.cereal_yield, b.cereal_yield) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by yield, highest first. Equal yields keep table order and
/// missing yields go to the end.
pub fn sorted_by_yield_desc<'a>(rows: &[&'a YieldRecord]) -> Vec<&'a YieldRecord> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| by_yield(a, b, true));
    sorted
}

/// First row of a descending sort: the earliest row among the maxima.
pub fn highest_yield<'a>(rows: &[&'a YieldRecord]) -> Option<&'a YieldRecord> {
    sorted_by_yield_desc(rows).first().copied()
}

/// First row of an ascending sort: the earliest row among the minima.
pub fn lowest_yield<'a>(rows: &[&'a YieldRecord]) -> Option<&'a YieldRecord> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| by_yield(a, b, false));
    sorted.first().copied()
}

/// Selector options: unique years, newest first.
pub fn year_options(table: &YieldTable) -> Vec<i32> {
    let mut years = table.years();
    years.reverse();
    years
}

/// The selector defaults to the last option, i.e. the earliest year.
pub fn default_year(options: &[i32]) -> Option<i32> {
    options.last().copied()
}
