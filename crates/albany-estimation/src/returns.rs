//! Price to return conversion.

use crate::{EstimationError, Result, TimeSeriesTable};
use derive_more::Display;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How consecutive prices are turned into a return.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// `P_t / P_{t-1} - 1`
    #[default]
    #[display("simple")]
    Simple,
    /// `ln(P_t / P_{t-1})`
    #[display("log")]
    Log,
}

impl ReturnType {
    fn apply(self, previous: f64, current: f64) -> f64 {
        let ratio = current / previous;
        match self {
            Self::Simple => ratio - 1.0,
            Self::Log => ratio.ln(),
        }
    }
}

impl FromStr for ReturnType {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "log" => Ok(Self::Log),
            _ => Err(EstimationError::UnsupportedValue {
                kind: "return type",
                value: s.to_string(),
            }),
        }
    }
}

/// Convert a price table into a return table.
///
/// The first row has no prior price and is always dropped. Any later row
/// with a NaN return (a missing price on either side) is dropped along with
/// its date, so every remaining row is complete.
///
/// # Errors
/// Propagates table construction errors; labels are carried over from the
/// price table so this does not fail in practice.
pub fn compute_returns(prices: &TimeSeriesTable, return_type: ReturnType) -> Result<TimeSeriesTable> {
    let values = prices.values();
    let n_assets = prices.n_assets();

    let mut rows = Vec::with_capacity(prices.n_obs().saturating_sub(1) * n_assets);
    let mut dates = Vec::with_capacity(prices.n_obs().saturating_sub(1));

    for t in 1..prices.n_obs() {
        let previous = values.index_axis(Axis(0), t - 1);
        let current = values.index_axis(Axis(0), t);
        let row: Vec<f64> = previous
            .iter()
            .zip(current.iter())
            .map(|(&p0, &p1)| return_type.apply(p0, p1))
            .collect();

        if row.iter().any(|r| r.is_nan()) {
            continue;
        }
        rows.extend(row);
        dates.push(prices.dates()[t]);
    }

    let returns = Array2::from_shape_vec((dates.len(), n_assets), rows)
        .map_err(|e| EstimationError::InvalidParameter(e.to_string()))?;
    TimeSeriesTable::new(prices.asset_ids().to_vec(), dates, returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ndarray::array;
    use rstest::rstest;
    use uuid::Uuid;

    fn prices(values: Array2<f64>) -> TimeSeriesTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..values.nrows())
            .map(|i| start + chrono::Days::new(i as u64))
            .collect();
        let ids = (0..values.ncols()).map(|_| Uuid::new_v4()).collect();
        TimeSeriesTable::new(ids, dates, values).unwrap()
    }

    #[test]
    fn test_simple_returns_drop_first_row() {
        let table = prices(array![[100.0, 50.0], [110.0, 55.0], [99.0, 55.0]]);
        let returns = compute_returns(&table, ReturnType::Simple).unwrap();

        assert_eq!(returns.n_obs(), 2);
        assert_eq!(returns.dates(), &table.dates()[1..]);
        assert_eq!(returns.asset_ids(), table.asset_ids());
        assert_relative_eq!(returns.values()[[0, 0]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns.values()[[1, 0]], -0.1, epsilon = 1e-12);
        assert_relative_eq!(returns.values()[[1, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_returns() {
        let table = prices(array![[100.0], [110.0]]);
        let returns = compute_returns(&table, ReturnType::Log).unwrap();
        assert_relative_eq!(returns.values()[[0, 0]], (1.1f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_rows_with_missing_prices_are_dropped() {
        let table = prices(array![
            [100.0, 10.0],
            [101.0, f64::NAN],
            [102.0, 11.0],
            [103.0, 12.0],
        ]);
        let returns = compute_returns(&table, ReturnType::Simple).unwrap();

        // Both the row with the gap and the row after it produce NaN
        assert_eq!(returns.n_obs(), 1);
        assert_eq!(returns.dates()[0], table.dates()[3]);
    }

    #[test]
    fn test_single_price_row_gives_empty_returns() {
        let table = prices(array![[100.0, 10.0]]);
        let returns = compute_returns(&table, ReturnType::Simple).unwrap();
        assert_eq!(returns.n_obs(), 0);
        assert_eq!(returns.n_assets(), 2);
    }

    #[rstest]
    #[case("simple", ReturnType::Simple)]
    #[case("LOG", ReturnType::Log)]
    fn test_parse_return_type(#[case] input: &str, #[case] expected: ReturnType) {
        assert_eq!(input.parse::<ReturnType>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_return_type_is_unsupported() {
        let err = "arithmetic".parse::<ReturnType>().unwrap_err();
        assert!(matches!(err, EstimationError::UnsupportedValue { kind: "return type", .. }));
    }
}
