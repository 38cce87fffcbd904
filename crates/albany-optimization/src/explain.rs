//! Plain-language summaries of solver results.

use crate::{OptimizationConstraints, PortfolioSolution};
use albany_primitives::Asset;

/// Holdings listed in an explanation.
pub const MAX_LISTED_HOLDINGS: usize = 5;

/// Largest holdings by absolute weight, at most [`MAX_LISTED_HOLDINGS`].
///
/// Labels are tickers when `assets` has one entry per weight, otherwise
/// `Asset {i}`. Weights within `tolerance` of zero are skipped and ties keep
/// column order.
pub fn top_holdings(weights: &[f64], assets: Option<&[Asset]>, tolerance: f64) -> Vec<(String, f64)> {
    let labels = assets.filter(|assets| assets.len() == weights.len());
    let mut holdings: Vec<(usize, f64)> = weights
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, w)| w.abs() > tolerance)
        .collect();
    holdings.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    holdings
        .into_iter()
        .take(MAX_LISTED_HOLDINGS)
        .map(|(i, w)| {
            let label = labels.map_or_else(|| format!("Asset {i}"), |assets| assets[i].ticker.clone());
            (label, w)
        })
        .collect()
}

/// Summary of a feasible solution.
///
/// Names the largest holdings, return and volatility, the Sharpe ratio when
/// defined, concentration against an equal-weight portfolio and the active
/// constraints.
pub fn explain_solution(
    solution: &PortfolioSolution,
    constraints: &OptimizationConstraints,
    assets: Option<&[Asset]>,
    tolerance: f64,
) -> String {
    let mut parts = Vec::new();

    let weights = solution.weights.to_vec();
    let holdings = top_holdings(&weights, assets, tolerance);
    if !holdings.is_empty() {
        let listed: Vec<String> = holdings
            .iter()
            .map(|(label, w)| format!("{label} {:.1}%", w * 100.0))
            .collect();
        parts.push(format!("Top holdings: {}.", listed.join(", ")));
    }

    parts.push(format!(
        "Expected return {:.2}%, volatility {:.2}%.",
        solution.expected_return * 100.0,
        solution.stdev * 100.0
    ));

    if let Some(sharpe) = solution.sharpe {
        parts.push(format!("Sharpe ratio {sharpe:.3}."));
    }

    parts.push(format!(
        "HHI {:.4}, effective N {:.1} (equal-weight would give N = {}).",
        solution.hhi,
        solution.effective_n,
        weights.len()
    ));

    let active = constraints.describe();
    if !active.is_empty() {
        parts.push(format!("Constraints applied: {active}."));
    }

    parts.join(" ")
}
