//! Dispatch of a persisted run definition to an entry point.

use crate::portfolio::DEFAULT_FRONTIER_POINTS;
use crate::{
    OptimizationError, OptimizationRequest, Result, SolverResult, compute_efficient_frontier,
    optimize_frontier_point, optimize_mvp, optimize_tangency,
};
use albany_primitives::PrimitivesError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of optimization run.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunType {
    /// Minimum-variance portfolio
    #[display("MVP")]
    Mvp,
    /// One point on the frontier at a target return
    #[display("FRONTIER_POINT")]
    FrontierPoint,
    /// The whole efficient frontier
    #[display("FRONTIER_SERIES")]
    FrontierSeries,
    /// Maximum-Sharpe portfolio
    #[display("TANGENCY")]
    Tangency,
}

/// Objective minimized by a run.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    /// Portfolio variance
    #[display("MIN_VAR")]
    MinVar,
    /// Negative Sharpe ratio
    #[display("MAX_SHARPE")]
    MaxSharpe,
}

impl RunType {
    /// Objective this run type optimizes.
    pub const fn objective(&self) -> Objective {
        match self {
            Self::Mvp | Self::FrontierPoint | Self::FrontierSeries => Objective::MinVar,
            Self::Tangency => Objective::MaxSharpe,
        }
    }
}

impl FromStr for RunType {
    type Err = OptimizationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MVP" => Ok(Self::Mvp),
            "FRONTIER_POINT" => Ok(Self::FrontierPoint),
            "FRONTIER_SERIES" => Ok(Self::FrontierSeries),
            "TANGENCY" => Ok(Self::Tangency),
            _ => Err(PrimitivesError::UnsupportedValue {
                kind: "run type",
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// A run definition: the run type and the parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    /// What to compute
    pub run_type: RunType,
    /// Required for [`RunType::FrontierPoint`]
    #[serde(default)]
    pub target_return: Option<f64>,
    /// Required for [`RunType::Tangency`]
    #[serde(default)]
    pub risk_free_rate: Option<f64>,
    /// Frontier resolution for [`RunType::FrontierSeries`]
    #[serde(default = "default_frontier_points")]
    pub n_points: usize,
}

const fn default_frontier_points() -> usize {
    DEFAULT_FRONTIER_POINTS
}

impl RunSpec {
    /// Run definition with no parameters set.
    pub const fn new(run_type: RunType) -> Self {
        Self {
            run_type,
            target_return: None,
            risk_free_rate: None,
            n_points: DEFAULT_FRONTIER_POINTS,
        }
    }

    /// Set the target return.
    pub const fn with_target_return(mut self, target_return: f64) -> Self {
        self.target_return = Some(target_return);
        self
    }

    /// Set the risk-free rate.
    pub const fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = Some(risk_free_rate);
        self
    }

    /// Set the number of frontier points.
    pub const fn with_n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }
}

fn required(value: Option<f64>, name: &str, run_type: RunType) -> Result<f64> {
    value.ok_or_else(|| {
        OptimizationError::InvalidParameter(format!("{name} is required for {run_type} runs"))
    })
}

/// Execute a run definition.
///
/// Single-portfolio runs yield one result; frontier series yield one per point.
///
/// # Errors
/// Returns [`OptimizationError::InvalidParameter`] when the run type needs a
/// parameter the run definition does not carry, and any error of the dispatched entry
/// point.
pub fn run(request: &OptimizationRequest<'_>, spec: &RunSpec) -> Result<Vec<SolverResult>> {
    match spec.run_type {
        RunType::Mvp => Ok(vec![optimize_mvp(request)?]),
        RunType::FrontierPoint => {
            let target = required(spec.target_return, "target_return", spec.run_type)?;
            Ok(vec![optimize_frontier_point(request, target)?])
        }
        RunType::FrontierSeries => compute_efficient_frontier(request, spec.n_points),
        RunType::Tangency => {
            let rf = required(spec.risk_free_rate, "risk_free_rate", spec.run_type)?;
            Ok(vec![optimize_tangency(request, rf)?])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptimizationConstraints;
    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    #[case(RunType::Mvp, Objective::MinVar)]
    #[case(RunType::FrontierPoint, Objective::MinVar)]
    #[case(RunType::FrontierSeries, Objective::MinVar)]
    #[case(RunType::Tangency, Objective::MaxSharpe)]
    fn test_objective_per_run_type(#[case] run_type: RunType, #[case] objective: Objective) {
        assert_eq!(run_type.objective(), objective);
        assert_eq!(run_type.to_string().parse::<RunType>().unwrap(), run_type);
    }

    #[test]
    fn test_unknown_run_type() {
        assert!(matches!(
            "BLACK_LITTERMAN".parse::<RunType>(),
            Err(OptimizationError::Primitives(PrimitivesError::UnsupportedValue { .. }))
        ));
    }

    #[test]
    fn test_missing_parameters() {
        let mu = array![0.05, 0.10];
        let sigma = array![[0.04, 0.0], [0.0, 0.04]];
        let constraints = OptimizationConstraints::default();
        let request = OptimizationRequest::new(&mu, &sigma, &constraints);

        for run_type in [RunType::FrontierPoint, RunType::Tangency] {
            assert!(matches!(
                run(&request, &RunSpec::new(run_type)),
                Err(OptimizationError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_dispatch() {
        let mu = array![0.05, 0.10];
        let sigma = array![[0.04, 0.0], [0.0, 0.04]];
        let constraints = OptimizationConstraints::default();
        let request = OptimizationRequest::new(&mu, &sigma, &constraints);

        let mvp = run(&request, &RunSpec::new(RunType::Mvp)).unwrap();
        assert_eq!(mvp.len(), 1);
        assert!(mvp[0].is_feasible());

        let series = run(&request, &RunSpec::new(RunType::FrontierSeries).with_n_points(4)).unwrap();
        assert_eq!(series.len(), 4);

        let tangency = run(
            &request,
            &RunSpec::new(RunType::Tangency).with_risk_free_rate(0.02),
        )
        .unwrap();
        assert!(tangency[0].solution().unwrap().sharpe.is_some());
    }

    #[test]
    fn test_run_definition_deserializes_with_defaults() {
        let spec: RunSpec = serde_json::from_str(r#"{"run_type": "FRONTIER_POINT", "target_return": 0.08}"#)
            .unwrap();
        assert_eq!(spec.run_type, RunType::FrontierPoint);
        assert_eq!(spec.target_return, Some(0.08));
        assert_eq!(spec.n_points, DEFAULT_FRONTIER_POINTS);
    }
}
