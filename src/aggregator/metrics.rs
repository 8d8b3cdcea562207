//! Queries over the flattened profile.
//!
//! Top functions are the primary optimization targets. Dimension extraction
//! feeds pie-style breakdowns, and relatives give the callers and callees of
//! one function.

use super::flatten::{AggregateEntry, FlatProfile};
use crate::parser::{MetricKey, Metrics};
use crate::utils::config::{NO_PARENT, OTHER_BUCKET};
use crate::utils::error::AnalysisError;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;

/// One function's cost for a given metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCost {
    pub name: String,
    pub value: f64,
    pub call_count: f64,
    /// Share of the profile total, in percent
    pub percentage: f64,
}

/// Rank functions by a metric
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `flat` - Flattened profile
/// * `total` - Profile total for the metric (usually the root's value)
/// * `metric` - Metric to rank by
/// * `limit` - Number of functions to return
///
/// # Returns
/// Functions sorted by metric value (descending, ties by name)
pub fn top_functions(
    flat: &FlatProfile,
    total: f64,
    metric: MetricKey,
    limit: usize,
) -> Vec<FunctionCost> {
    debug!(
        "Ranking top {} of {} functions by {}",
        limit,
        flat.function_count(),
        metric
    );

    let mut ranked: Vec<(&String, &AggregateEntry)> = flat.functions.iter().collect();
    ranked.sort_by(|(a_name, a), (b_name, b)| {
        descending(a.metrics.get(metric), b.metrics.get(metric)).then_with(|| a_name.cmp(b_name))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, entry)| create_function_cost(name, &entry.metrics, total, metric))
        .collect()
}

/// Create a FunctionCost from an aggregate entry
///
/// **Private** - internal conversion
fn create_function_cost(name: &str, metrics: &Metrics, total: f64, metric: MetricKey) -> FunctionCost {
    let value = metrics.get(metric);
    let percentage = if total != 0.0 {
        (value / total) * 100.0
    } else {
        0.0
    };

    FunctionCost {
        name: name.to_string(),
        value,
        call_count: metrics.ct,
        percentage,
    }
}

/// One slice of a dimension breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionSlice {
    pub name: String,
    pub value: f64,
}

/// Split a metric into the top `limit` functions plus one "Other" slice
///
/// The "Other" slice sums every function outside the top `limit` and is
/// omitted when nothing is left over.
pub fn extract_dimension(flat: &FlatProfile, metric: MetricKey, limit: usize) -> Vec<DimensionSlice> {
    let ranked = top_functions(flat, 0.0, metric, flat.function_count());

    let mut slices: Vec<DimensionSlice> = ranked
        .iter()
        .take(limit)
        .map(|cost| DimensionSlice {
            name: cost.name.clone(),
            value: cost.value,
        })
        .collect();

    let rest = &ranked[limit.min(ranked.len())..];
    if !rest.is_empty() {
        slices.push(DimensionSlice {
            name: OTHER_BUCKET.to_string(),
            value: rest.iter().map(|cost| cost.value).sum(),
        });
    }

    slices
}

/// A function together with its callers and callees
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relatives {
    pub function: String,
    pub current: AggregateEntry,
    /// Distinct callers in first-seen order, with their own aggregates
    pub parents: Vec<Relative>,
    /// Callees above the threshold, heaviest first, with edge metrics
    pub children: Vec<Relative>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relative {
    pub name: String,
    pub metrics: Metrics,
}

/// Look up the callers and callees of `symbol`
///
/// Callees are kept when their edge metric exceeds `threshold` times the
/// function's own aggregate metric. Returns `Ok(None)` for an unknown symbol.
///
/// # Errors
/// * `AnalysisError::InvalidMetric` - `metric` is not a recognized key
pub fn relatives(
    flat: &FlatProfile,
    symbol: &str,
    metric: &str,
    threshold: f64,
) -> Result<Option<Relatives>, AnalysisError> {
    let metric: MetricKey = metric.parse()?;

    let Some(current) = flat.get(symbol) else {
        return Ok(None);
    };

    let mut parents: Vec<Relative> = Vec::new();
    for parent in &current.parents {
        if parent == NO_PARENT || parents.iter().any(|p| &p.name == parent) {
            continue;
        }
        if let Some(entry) = flat.get(parent) {
            parents.push(Relative {
                name: parent.clone(),
                metrics: entry.metrics,
            });
        }
    }

    let own = current.metrics.get(metric);
    let mut children: Vec<Relative> = flat
        .callees(symbol)
        .map(|callees| {
            callees
                .iter()
                .filter(|(_, metrics)| own != 0.0 && metrics.get(metric) / own > threshold)
                .map(|(name, metrics)| Relative {
                    name: name.clone(),
                    metrics: *metrics,
                })
                .collect()
        })
        .unwrap_or_default();
    children.sort_by(|a, b| {
        descending(a.metrics.get(metric), b.metrics.get(metric)).then_with(|| a.name.cmp(&b.name))
    });

    Ok(Some(Relatives {
        function: symbol.to_string(),
        current: current.clone(),
        parents,
        children,
    }))
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
