//! Operator-splitting solver for convex quadratic programs
//!
//! ```text
//! minimize    ½ xᵀ P x + qᵀ x
//! subject to  l ≤ C x ≤ u
//! ```
//!
//! ADMM iterates on the splitting `z = C x`. Each iteration solves one linear
//! system with the matrix `P + σI + Cᵀ diag(ρ) C`, which is factored once and
//! refactored only when ρ is rescaled.
//!
//! ADMM only has to find the active set. Once it stops, converged or not,
//! the active set is polished with direct KKT solves: rows that end up
//! violated are added, rows whose multipliers have the wrong sign are
//! dropped, and linearly dependent rows are skipped so degenerate vertices
//! still give a nonsingular system.
//!
//! A [`QpWorkspace`] links the solves of one SQP run. It keeps the last
//! active set, which is polished directly before any ADMM iteration runs,
//! along with the factor, the adapted ρ and the multipliers for ADMM warm
//! starts. It also caps the ADMM iterations spent across the run.

use crate::QpSettings;
use albany_math::{Cholesky, LuDecomposition, Result};
use ndarray::{Array1, Array2, Axis, Zip, s};

const RHO_MIN: f64 = 1e-6;
const RHO_MAX: f64 = 1e6;
/// Equality rows use a stiffer step so `z` tracks them closely.
const RHO_EQUALITY_SCALE: f64 = 1e3;
/// Rows whose bounds are this close are treated as equalities.
const EQUALITY_GAP: f64 = 1e-10;
/// Rescale ρ only when it moves by more than this factor.
const RHO_UPDATE_RATIO: f64 = 5.0;
/// Residuals are evaluated every this many iterations.
const CHECK_INTERVAL: usize = 10;
/// Iterations between ρ updates; a multiple of `CHECK_INTERVAL`.
const RHO_UPDATE_INTERVAL: usize = 50;
/// Tolerance of the primal infeasibility certificate.
const PRIMAL_INFEASIBILITY_TOLERANCE: f64 = 1e-6;
const NORM_FLOOR: f64 = 1e-30;

/// Feasibility and multiplier-sign tolerance of a polished point.
const POLISH_TOLERANCE: f64 = 1e-9;
/// Stationarity tolerance of a polished point, relative to `1 + ‖q‖∞`.
const POLISH_STATIONARITY_TOLERANCE: f64 = 1e-7;
const POLISH_DELTA: f64 = 1e-7;
const POLISH_REFINE_ITERATIONS: usize = 5;
const MAX_POLISH_ROUNDS: usize = 25;
/// Relative norm below which an active row counts as dependent.
const INDEPENDENCE_TOLERANCE: f64 = 1e-9;

/// Problem data, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QpProblem<'a> {
    pub(crate) p: &'a Array2<f64>,
    pub(crate) q: &'a Array1<f64>,
    pub(crate) c: &'a Array2<f64>,
    pub(crate) l: &'a Array1<f64>,
    pub(crate) u: &'a Array1<f64>,
}

/// How the solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QpStatus {
    Solved,
    PrimalInfeasible,
    MaxIterations,
}

#[derive(Debug, Clone)]
pub(crate) struct QpSolution {
    pub(crate) x: Array1<f64>,
    pub(crate) status: QpStatus,
    pub(crate) iterations: usize,
    pub(crate) primal_residual: f64,
}

#[derive(Debug, Clone)]
struct CachedFactor {
    p: Array2<f64>,
    equality: Vec<bool>,
    rho: f64,
    cholesky: Cholesky,
}

/// State shared by a sequence of QPs over the same constraint matrix.
#[derive(Debug, Clone)]
pub(crate) struct QpWorkspace {
    factor: Option<CachedFactor>,
    rho: Option<f64>,
    y: Option<Array1<f64>>,
    active: Option<Vec<(usize, ActiveSide)>>,
    remaining: usize,
}

impl QpWorkspace {
    pub(crate) const fn with_budget(iterations: usize) -> Self {
        Self {
            factor: None,
            rho: None,
            y: None,
            active: None,
            remaining: iterations,
        }
    }

    pub(crate) const fn exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Factor for `problem` at step size `rho`, reusing the cached one if it
    /// was built from the same `P`, equality pattern and ρ.
    fn factor(
        &mut self,
        problem: &QpProblem<'_>,
        equality: &[bool],
        rho: f64,
        sigma: f64,
    ) -> Result<Cholesky> {
        if let Some(cached) = &self.factor
            && cached.rho == rho
            && cached.equality == equality
            && cached.p == *problem.p
        {
            return Ok(cached.cholesky.clone());
        }
        let cholesky = factor_admm_system(problem, &rho_vector(rho, equality), sigma)?;
        self.factor = Some(CachedFactor {
            p: problem.p.clone(),
            equality: equality.to_vec(),
            rho,
            cholesky: cholesky.clone(),
        });
        Ok(cholesky)
    }

    /// Record a polished point as the warm start of the next solve.
    fn accept(&mut self, polished: Polished, iterations: usize) -> QpSolution {
        self.active = Some(polished.active);
        self.y = Some(polished.y);
        QpSolution {
            x: polished.x,
            status: QpStatus::Solved,
            iterations,
            primal_residual: polished.violation,
        }
    }
}

/// KKT point of a settled active set.
#[derive(Debug)]
struct Polished {
    x: Array1<f64>,
    y: Array1<f64>,
    violation: f64,
    active: Vec<(usize, ActiveSide)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveSide {
    Equality,
    Lower,
    Upper,
}

fn inf_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

fn project(v: &Array1<f64>, l: &Array1<f64>, u: &Array1<f64>) -> Array1<f64> {
    Zip::from(v)
        .and(l)
        .and(u)
        .map_collect(|&v, &lo, &hi| v.max(lo).min(hi))
}

fn rho_vector(rho: f64, equality: &[bool]) -> Array1<f64> {
    equality
        .iter()
        .map(|&eq| if eq { rho * RHO_EQUALITY_SCALE } else { rho })
        .collect()
}

fn factor_admm_system(
    problem: &QpProblem<'_>,
    rho: &Array1<f64>,
    sigma: f64,
) -> Result<Cholesky> {
    let n = problem.p.nrows();
    let scaled_c = problem.c * &rho.view().insert_axis(Axis(1));
    let matrix = problem.p + &(Array2::<f64>::eye(n) * sigma) + &problem.c.t().dot(&scaled_c);
    Cholesky::factor(&matrix)
}

/// Largest amount by which `cx` leaves `[l, u]`.
fn bound_violation(cx: &Array1<f64>, l: &Array1<f64>, u: &Array1<f64>) -> f64 {
    Zip::from(cx)
        .and(l)
        .and(u)
        .fold(0.0_f64, |acc, &v, &lo, &hi| acc.max(lo - v).max(v - hi))
}

/// Farkas certificate: `‖Cᵀδy‖ ≈ 0` while `uᵀδy⁺ + lᵀδy⁻ < 0`.
fn certifies_infeasibility(problem: &QpProblem<'_>, delta_y: &Array1<f64>, eps: f64) -> bool {
    let norm = inf_norm(delta_y);
    if norm <= NORM_FLOOR {
        return false;
    }
    if inf_norm(&problem.c.t().dot(delta_y)) > eps * norm {
        return false;
    }

    let mut support = 0.0;
    for ((&dy, &lo), &hi) in delta_y.iter().zip(problem.l.iter()).zip(problem.u.iter()) {
        if dy > 0.0 {
            if !hi.is_finite() {
                return false;
            }
            support += hi * dy;
        } else if dy < 0.0 {
            if !lo.is_finite() {
                return false;
            }
            support += lo * dy;
        }
    }
    support < -eps * norm
}

/// Solve a convex QP.
///
/// `P` must be positive semi-definite. Infeasibility and the iteration cap are
/// reported through [`QpStatus`]; an `Err` means the ADMM system could not be
/// factored, which happens when `P` is not positive semi-definite.
///
/// Iterations are charged to `workspace`; the solve stops early once its
/// budget runs out.
pub(crate) fn solve_qp(
    problem: &QpProblem<'_>,
    settings: &QpSettings,
    workspace: &mut QpWorkspace,
) -> Result<QpSolution> {
    let n = problem.p.nrows();
    let m = problem.c.nrows();
    let q = problem.q;

    let equality: Vec<bool> = problem
        .l
        .iter()
        .zip(problem.u.iter())
        .map(|(lo, hi)| (hi - lo).abs() <= EQUALITY_GAP)
        .collect();

    if let Some(active) = workspace
        .active
        .take()
        .filter(|active| active.iter().all(|&(row, _)| row < m))
        && let Some(polished) = polish(problem, active, &equality)
    {
        return Ok(workspace.accept(polished, 0));
    }

    let mut rho = workspace.rho.unwrap_or(settings.rho);
    let mut rho_vec = rho_vector(rho, &equality);
    let mut factor = workspace.factor(problem, &equality, rho, settings.sigma)?;

    let mut x = Array1::<f64>::zeros(n);
    let mut y = workspace
        .y
        .take()
        .filter(|y| y.len() == m)
        .unwrap_or_else(|| Array1::zeros(m));
    let mut z = project(&problem.c.dot(&x), problem.l, problem.u);

    let mut status = QpStatus::MaxIterations;
    let mut iterations = 0;
    let mut primal_residual = f64::INFINITY;
    let alpha = settings.alpha;
    let limit = settings.max_iterations.min(workspace.remaining);

    for iteration in 1..=limit {
        iterations = iteration;

        let rhs = &x * settings.sigma - q + &problem.c.t().dot(&(&rho_vec * &z - &y));
        let x_tilde = factor.solve(&rhs)?;
        let z_tilde = problem.c.dot(&x_tilde);

        let x_next = &x_tilde * alpha + &x * (1.0 - alpha);
        let z_relaxed = &z_tilde * alpha + &z * (1.0 - alpha);
        let z_next = project(&(&z_relaxed + &(&y / &rho_vec)), problem.l, problem.u);
        let y_next = &y + &(&rho_vec * &(&z_relaxed - &z_next));
        let delta_y = &y_next - &y;

        x = x_next;
        z = z_next;
        y = y_next;

        if iteration % CHECK_INTERVAL != 0 && iteration != limit {
            continue;
        }

        let cx = problem.c.dot(&x);
        let px = problem.p.dot(&x);
        let cty = problem.c.t().dot(&y);
        primal_residual = inf_norm(&(&cx - &z));
        let dual_residual = inf_norm(&(&px + q + &cty));

        let primal_scale = inf_norm(&cx).max(inf_norm(&z));
        let dual_scale = inf_norm(&px).max(inf_norm(&cty)).max(inf_norm(q));
        let eps_primal = settings.eps_abs + settings.eps_rel * primal_scale;
        let eps_dual = settings.eps_abs + settings.eps_rel * dual_scale;

        if primal_residual <= eps_primal && dual_residual <= eps_dual {
            status = QpStatus::Solved;
            break;
        }
        if certifies_infeasibility(problem, &delta_y, PRIMAL_INFEASIBILITY_TOLERANCE) {
            status = QpStatus::PrimalInfeasible;
            break;
        }

        if iteration % RHO_UPDATE_INTERVAL == 0 {
            let primal_ratio = primal_residual / primal_scale.max(NORM_FLOOR);
            let dual_ratio = dual_residual / dual_scale.max(NORM_FLOOR);
            let candidate =
                (rho * (primal_ratio / dual_ratio.max(NORM_FLOOR)).sqrt()).clamp(RHO_MIN, RHO_MAX);
            if candidate > rho * RHO_UPDATE_RATIO || candidate < rho / RHO_UPDATE_RATIO {
                rho = candidate;
                rho_vec = rho_vector(rho, &equality);
                factor = workspace.factor(problem, &equality, rho, settings.sigma)?;
            }
        }
    }
    workspace.remaining -= iterations;
    workspace.rho = Some(rho);

    if status == QpStatus::PrimalInfeasible {
        return Ok(QpSolution {
            x,
            status,
            iterations,
            primal_residual,
        });
    }

    let guess = guess_active_set(problem, &z, &y, &equality);
    if let Some(polished) = polish(problem, guess, &equality) {
        return Ok(workspace.accept(polished, iterations));
    }
    workspace.y = Some(y);

    Ok(QpSolution {
        x,
        status,
        iterations,
        primal_residual,
    })
}

/// Active rows guessed from the ADMM iterate: equalities first, then bound
/// rows by decreasing multiplier magnitude.
fn guess_active_set(
    problem: &QpProblem<'_>,
    z: &Array1<f64>,
    y: &Array1<f64>,
    equality: &[bool],
) -> Vec<(usize, ActiveSide)> {
    let mut inequalities: Vec<(usize, ActiveSide)> = (0..z.len())
        .filter(|&i| !equality[i])
        .filter_map(|i| {
            if z[i] - problem.l[i] < -y[i] {
                Some((i, ActiveSide::Lower))
            } else if problem.u[i] - z[i] < y[i] {
                Some((i, ActiveSide::Upper))
            } else {
                None
            }
        })
        .collect();
    inequalities.sort_by(|a, b| y[b.0].abs().total_cmp(&y[a.0].abs()));

    (0..z.len())
        .filter(|&i| equality[i])
        .map(|i| (i, ActiveSide::Equality))
        .chain(inequalities)
        .collect()
}

/// Keep the rows of `active`, in order, that are linearly independent of
/// the rows kept before them.
fn independent_rows(c: &Array2<f64>, active: &[(usize, ActiveSide)]) -> Vec<(usize, ActiveSide)> {
    let mut basis: Vec<Array1<f64>> = Vec::new();
    let mut kept = Vec::with_capacity(active.len());

    for &(row, side) in active {
        let mut v = c.row(row).to_owned();
        let norm = v.dot(&v).sqrt();
        if norm <= NORM_FLOOR {
            continue;
        }
        // Two Gram-Schmidt passes keep the basis orthogonal to working precision
        for _ in 0..2 {
            for b in &basis {
                let projection = b.dot(&v);
                v.scaled_add(-projection, b);
            }
        }
        let residual = v.dot(&v).sqrt();
        if residual <= INDEPENDENCE_TOLERANCE * norm {
            continue;
        }
        basis.push(v / residual);
        kept.push((row, side));
    }
    kept
}

/// Solve the equality-constrained QP on `rows`, returning `x` and the row
/// multipliers.
fn solve_kkt(
    problem: &QpProblem<'_>,
    rows: &[(usize, ActiveSide)],
) -> Option<(Array1<f64>, Array1<f64>)> {
    let n = problem.p.nrows();
    let k = rows.len();

    let mut kkt = Array2::<f64>::zeros((n + k, n + k));
    kkt.slice_mut(s![..n, ..n]).assign(problem.p);
    let mut rhs = Array1::<f64>::zeros(n + k);
    rhs.slice_mut(s![..n]).assign(&problem.q.mapv(|v| -v));
    for (j, &(row, side)) in rows.iter().enumerate() {
        let coefficients = problem.c.row(row);
        kkt.slice_mut(s![n + j, ..n]).assign(&coefficients);
        kkt.slice_mut(s![..n, n + j]).assign(&coefficients);
        rhs[n + j] = match side {
            ActiveSide::Equality | ActiveSide::Lower => problem.l[row],
            ActiveSide::Upper => problem.u[row],
        };
    }

    let mut regularized = kkt.clone();
    for i in 0..n {
        regularized[[i, i]] += POLISH_DELTA;
    }
    for j in n..n + k {
        regularized[[j, j]] -= POLISH_DELTA;
    }

    let lu = LuDecomposition::factor(&regularized).ok()?;
    let mut solution = lu.solve(&rhs).ok()?;
    for _ in 0..POLISH_REFINE_ITERATIONS {
        let residual = &rhs - &kkt.dot(&solution);
        solution += &lu.solve(&residual).ok()?;
    }
    if solution.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some((
        solution.slice(s![..n]).to_owned(),
        solution.slice(s![n..]).to_owned(),
    ))
}

/// Settle a working set into a KKT point of the QP.
///
/// Returns `None` when the active set cannot be settled within
/// `MAX_POLISH_ROUNDS`, a KKT system is singular, or the settled point is
/// not stationary.
fn polish(
    problem: &QpProblem<'_>,
    mut working: Vec<(usize, ActiveSide)>,
    equality: &[bool],
) -> Option<Polished> {
    let m = problem.c.nrows();

    for _ in 0..MAX_POLISH_ROUNDS {
        let rows = independent_rows(problem.c, &working);
        let (x, multipliers) = solve_kkt(problem, &rows)?;

        let wrong_sign = rows
            .iter()
            .zip(multipliers.iter())
            .filter_map(|(&(row, side), &multiplier)| {
                let excess = match side {
                    ActiveSide::Equality => 0.0,
                    ActiveSide::Lower => multiplier,
                    ActiveSide::Upper => -multiplier,
                };
                (excess > POLISH_TOLERANCE).then_some((row, excess))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((row, _)) = wrong_sign {
            working.retain(|&(r, _)| r != row);
            continue;
        }

        let cx = problem.c.dot(&x);
        let violated = (0..m)
            .filter_map(|i| {
                let below = problem.l[i] - cx[i];
                let above = cx[i] - problem.u[i];
                let side = if equality[i] {
                    ActiveSide::Equality
                } else if below > above {
                    ActiveSide::Lower
                } else {
                    ActiveSide::Upper
                };
                let amount = below.max(above);
                (amount > POLISH_TOLERANCE).then_some((i, side, amount))
            })
            .max_by(|a, b| a.2.total_cmp(&b.2));

        match violated {
            Some((row, side, _)) => {
                // A violated working row was skipped as dependent; promote it
                working.retain(|&(r, _)| r != row);
                let at = working
                    .iter()
                    .take_while(|(_, s)| *s == ActiveSide::Equality)
                    .count();
                working.insert(at, (row, side));
            }
            None => {
                let mut y_full = Array1::<f64>::zeros(m);
                for (&(row, _), &multiplier) in rows.iter().zip(multipliers.iter()) {
                    y_full[row] = multiplier;
                }
                let stationarity =
                    inf_norm(&(problem.p.dot(&x) + problem.q + problem.c.t().dot(&y_full)));
                if stationarity > POLISH_STATIONARITY_TOLERANCE * (1.0 + inf_norm(problem.q)) {
                    return None;
                }
                let violation = bound_violation(&cx, problem.l, problem.u).max(0.0);
                return Some(Polished {
                    x,
                    y: y_full,
                    violation,
                    active: working,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// Solve with default settings; also returns the final multipliers.
    fn solve(problem: &QpProblem<'_>) -> (QpSolution, Array1<f64>) {
        let settings = QpSettings::default();
        let mut workspace = QpWorkspace::with_budget(settings.iteration_budget);
        let solution = solve_qp(problem, &settings, &mut workspace).unwrap();
        let y = workspace.y.unwrap_or_else(|| Array1::zeros(problem.c.nrows()));
        (solution, y)
    }

    #[test]
    fn test_equality_constrained_box_qp() {
        let p = Array2::eye(2);
        let q = array![-1.0, -1.0];
        let c = array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        let l = array![1.0, 0.0, 0.0];
        let u = array![1.0, 1.0, 1.0];
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let (solution, y) = solve(&problem);
        assert_eq!(solution.status, QpStatus::Solved);
        assert_abs_diff_eq!(solution.x[0], 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(solution.x[1], 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(y[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_active_upper_bound_is_polished() {
        // Unconstrained by the box the optimum is (1.5, -0.5)
        let p = Array2::eye(2);
        let q = array![-2.0, 0.0];
        let c = array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        let l = array![1.0, 0.0, 0.0];
        let u = array![1.0, 0.7, 0.7];
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let (solution, y) = solve(&problem);
        assert_eq!(solution.status, QpStatus::Solved);
        assert_abs_diff_eq!(solution.x[0], 0.7, epsilon = 1e-10);
        assert_abs_diff_eq!(solution.x[1], 0.3, epsilon = 1e-10);
        assert!(y[1] > 0.0);
    }

    #[test]
    fn test_detects_primal_infeasibility() {
        let p = Array2::eye(2);
        let q = array![0.0, 0.0];
        let c = array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        let l = array![1.0, 0.0, 0.0];
        let u = array![1.0, 0.4, 0.4];
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let (solution, _) = solve(&problem);
        assert_eq!(solution.status, QpStatus::PrimalInfeasible);
    }

    #[test]
    fn test_unbounded_rows_stay_inactive() {
        // min ½(x - 2)² with x ≥ 0 and no upper bound
        let p = array![[1.0]];
        let q = array![-2.0];
        let c = array![[1.0]];
        let l = array![0.0];
        let u = array![f64::INFINITY];
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let (solution, _) = solve(&problem);
        assert_eq!(solution.status, QpStatus::Solved);
        assert_abs_diff_eq!(solution.x[0], 2.0, epsilon = 1e-7);
    }

    #[test]
    fn test_indefinite_hessian_fails_to_factor() {
        let p = array![[-1.0]];
        let q = array![0.0];
        let c = array![[1.0]];
        let l = array![-1.0];
        let u = array![1.0];
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let settings = QpSettings::default();
        let mut workspace = QpWorkspace::with_budget(settings.iteration_budget);
        assert!(solve_qp(&problem, &settings, &mut workspace).is_err());
    }

    /// Random long-only mean-variance QP with a return target between the
    /// lowest and highest expected return.
    #[test]
    fn test_starved_solve_is_polished_to_the_optimum() {
        let n = 25;
        let mut rng = StdRng::seed_from_u64(11);
        let factors = Array2::from_shape_fn((n, 3), |_| rng.gen_range(-0.2..0.2));
        let mut p = factors.dot(&factors.t());
        for i in 0..n {
            p[[i, i]] += 0.01;
        }
        let mu = Array1::from_shape_fn(n, |_| rng.gen_range(0.02..0.15));
        let max_mu = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_mu = mu.iter().copied().fold(f64::INFINITY, f64::min);
        let target = 0.8 * max_mu + 0.2 * min_mu;

        let q = Array1::zeros(n);
        let mut c = Array2::zeros((n + 2, n));
        c.row_mut(0).fill(1.0);
        c.row_mut(1).assign(&mu);
        c.slice_mut(s![2.., ..]).assign(&Array2::eye(n));
        let mut l = Array1::zeros(n + 2);
        let mut u = Array1::ones(n + 2);
        l[0] = 1.0;
        l[1] = target;
        u[1] = target;
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let (converged, _) = solve(&problem);
        assert_eq!(converged.status, QpStatus::Solved);

        // Too few iterations for ADMM to meet its tolerances on its own
        let settings = QpSettings {
            max_iterations: 500,
            ..Default::default()
        };
        let mut workspace = QpWorkspace::with_budget(settings.iteration_budget);
        let starved = solve_qp(&problem, &settings, &mut workspace).unwrap();

        assert_eq!(starved.status, QpStatus::Solved);
        assert!(starved.primal_residual <= POLISH_TOLERANCE);
        assert_abs_diff_eq!(starved.x.sum(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(starved.x.dot(&mu), target, epsilon = 1e-10);
        for (a, b) in starved.x.iter().zip(converged.x.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_dependent_active_rows_are_skipped() {
        let c = array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [2.0, 2.0]];
        let active = [
            (0, ActiveSide::Equality),
            (3, ActiveSide::Equality),
            (1, ActiveSide::Lower),
            (2, ActiveSide::Lower),
        ];
        let kept = independent_rows(&c, &active);
        assert_eq!(kept, vec![(0, ActiveSide::Equality), (1, ActiveSide::Lower)]);
    }

    #[test]
    fn test_workspace_reuses_factor_and_charges_budget() {
        let p = Array2::eye(2);
        let q = array![-1.0, -1.0];
        let c = array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        let l = array![1.0, 0.0, 0.0];
        let u = array![1.0, 1.0, 1.0];
        let problem = QpProblem {
            p: &p,
            q: &q,
            c: &c,
            l: &l,
            u: &u,
        };

        let settings = QpSettings::default();
        let mut workspace = QpWorkspace::with_budget(10_000);
        let first = solve_qp(&problem, &settings, &mut workspace).unwrap();
        assert_eq!(workspace.remaining, 10_000 - first.iterations);
        assert!(workspace.factor.is_some());
        assert!(workspace.y.is_some());

        // The stored active set settles the repeat solve without ADMM
        let second = solve_qp(&problem, &settings, &mut workspace).unwrap();
        assert_eq!(second.status, QpStatus::Solved);
        assert_eq!(second.iterations, 0);
        assert_abs_diff_eq!(second.x[0], 0.5, epsilon = 1e-10);

        let mut empty = QpWorkspace::with_budget(0);
        assert!(empty.exhausted());
        let starved = solve_qp(&problem, &settings, &mut empty).unwrap();
        assert_eq!(starved.iterations, 0);
    }
}
