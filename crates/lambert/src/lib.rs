//! Lambert boundary-value solver in Izzo's formulation.
//!
//! Given two position vectors and a time of flight, recover the departure and
//! arrival velocity vectors of the connecting conic. The iteration runs on
//! Izzo's x parameter with Householder (third-order) steps and switches
//! between the Lancaster, Lagrange, and Battin time-of-flight expressions for
//! numerical stability across elliptic, parabolic, and hyperbolic arcs.

use lunar_core::vector::{self, Vector3};
use std::f64::consts::PI;
use thiserror::Error;

/// Transfer direction around the central body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Short way: transfer angle below π.
    Prograde,
    /// Long way: transfer angle above π.
    Retrograde,
}

/// Failure modes of the solver, distinguished so callers can tell physical
/// impossibility from numerical non-convergence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LambertError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("multi-revolution transfers are not supported (requested {revolutions})")]
    Unsupported { revolutions: i32 },
    #[error("degenerate geometry: chord {chord_km} km is below the 1e-6 km floor")]
    DegenerateGeometry { chord_km: f64 },
    #[error("impossible geometry: |lambda| = {lambda} >= 1")]
    ImpossibleGeometry { lambda: f64 },
    #[error("time of flight too short: normalized {t_norm} below minimum {t_min}")]
    TimeTooShort { t_norm: f64, t_min: f64 },
    #[error("no convergence after {iterations} iterations (residual {residual:e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },
    #[error("singular solution: Lagrange g = {g:e} is numerically zero")]
    SingularSolution { g: f64 },
}

/// Solution of one Lambert call. Immutable; the solver keeps no state
/// between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertSolution {
    /// Departure velocity (km/s).
    pub v1: Vector3,
    /// Arrival velocity (km/s).
    pub v2: Vector3,
    /// Direction the solution was computed for.
    pub direction: Direction,
    /// Transfer angle swept by the arc (radians).
    pub transfer_angle_rad: f64,
    /// Iterations the root-finder needed.
    pub iterations: usize,
    /// Final residual of the time-of-flight equation.
    pub residual: f64,
    /// Advisory diagnostics (Lagrange determinant drift); never a failure.
    pub warning: Option<String>,
}

/// Iteration budget of the Householder root-finder.
pub const MAX_ITERATIONS: usize = 30;
/// Convergence tolerance on the normalized time-of-flight residual.
pub const TOLERANCE: f64 = 1e-14;
/// Largest x displacement allowed per Householder step.
const MAX_STEP: f64 = 0.5;
/// Iteration domain for x; the lower bound is open where the time relation
/// is singular.
const X_MIN: f64 = -1.0 + 1e-12;
const X_MAX: f64 = 50.0;
const MIN_POSITION_KM: f64 = 1e-6;
const MIN_CHORD_KM: f64 = 1e-6;
const DETERMINANT_TOLERANCE: f64 = 1e-10;
const MIN_LAGRANGE_G: f64 = 1e-15;

/// Solve Lambert's problem for the single-revolution arc between `r1` and
/// `r2` (km) with time of flight `tof_s` (seconds) about a body of
/// gravitational parameter `mu` (km³/s²).
pub fn solve(
    r1: &Vector3,
    r2: &Vector3,
    tof_s: f64,
    mu: f64,
    direction: Direction,
    revolutions: i32,
) -> Result<LambertSolution, LambertError> {
    if revolutions != 0 {
        return Err(LambertError::Unsupported { revolutions });
    }
    if !vector::is_finite(r1) || !vector::is_finite(r2) {
        return Err(LambertError::InvalidInput(
            "position vectors must be finite".into(),
        ));
    }
    if !tof_s.is_finite() || tof_s <= 0.0 {
        return Err(LambertError::InvalidInput(format!(
            "time of flight must be positive, got {tof_s}"
        )));
    }
    if !mu.is_finite() || mu <= 0.0 {
        return Err(LambertError::InvalidInput(format!(
            "gravitational parameter must be positive, got {mu}"
        )));
    }

    let r1_mag = vector::norm(r1);
    let r2_mag = vector::norm(r2);
    if r1_mag < MIN_POSITION_KM || r2_mag < MIN_POSITION_KM {
        return Err(LambertError::InvalidInput(format!(
            "position magnitudes {r1_mag} km / {r2_mag} km below the {MIN_POSITION_KM} km floor"
        )));
    }

    let chord_vec = vector::sub(r2, r1);
    let chord = vector::norm(&chord_vec);
    if chord < MIN_CHORD_KM {
        return Err(LambertError::DegenerateGeometry { chord_km: chord });
    }
    let semiperimeter = 0.5 * (r1_mag + r2_mag + chord);

    // Transfer angle: short way for prograde, its complement for retrograde.
    let cos_dnu = (vector::dot(r1, r2) / (r1_mag * r2_mag)).clamp(-1.0, 1.0);
    let mut dnu = cos_dnu.acos();
    if direction == Direction::Retrograde {
        dnu = 2.0 * PI - dnu;
    }

    let t_norm = (2.0 * mu / semiperimeter.powi(3)).sqrt() * tof_s;
    let lambda = (r1_mag * r2_mag).sqrt() * (dnu / 2.0).cos() / semiperimeter;
    if lambda.abs() >= 1.0 {
        return Err(LambertError::ImpossibleGeometry { lambda });
    }

    let t_min = (1.0 - lambda.powi(3)) / 3.0;
    if t_norm < t_min {
        return Err(LambertError::TimeTooShort { t_norm, t_min });
    }

    let (x, iterations, residual) = householder(t_norm, initial_guess(t_norm, lambda), lambda)?;

    // Recover the conic through the Lagrange coefficients. The angular
    // momentum follows from the tangential velocity of the Izzo
    // reconstruction: h = sqrt(mu*s/2) * sigma * (y + lambda*x).
    let y = (1.0 - lambda * lambda * (1.0 - x * x)).sqrt();
    let gamma = (mu * semiperimeter / 2.0).sqrt();
    let rho = (r1_mag - r2_mag) / chord;
    let sigma = (1.0 - rho * rho).max(0.0).sqrt();
    let h = gamma * sigma * (y + lambda * x);
    let p = h * h / mu;

    let one_minus_cos = 1.0 - dnu.cos();
    let sin_dnu = dnu.sin();
    let f = 1.0 - r2_mag / p * one_minus_cos;
    let g = r1_mag * r2_mag * sin_dnu / h;
    if g.abs() < MIN_LAGRANGE_G {
        return Err(LambertError::SingularSolution { g });
    }
    let g_dot = 1.0 - r1_mag / p * one_minus_cos;
    let f_dot =
        mu / h * (one_minus_cos / sin_dnu) * (one_minus_cos / p - 1.0 / r1_mag - 1.0 / r2_mag);

    let determinant = f * g_dot - f_dot * g;
    let warning = if (determinant - 1.0).abs() > DETERMINANT_TOLERANCE {
        Some(format!(
            "Lagrange determinant drifted to {determinant:.3e}; solution kept"
        ))
    } else {
        None
    };

    let v1 = vector::scale(&vector::sub(r2, &vector::scale(r1, f)), 1.0 / g);
    let v2 = vector::scale(&vector::sub(&vector::scale(r2, g_dot), r1), 1.0 / g);

    Ok(LambertSolution {
        v1,
        v2,
        direction,
        transfer_angle_rad: dnu,
        iterations,
        residual,
        warning,
    })
}

/// Starting point for the iteration, split by regime against the x = 0 and
/// parabolic reference times.
fn initial_guess(t_norm: f64, lambda: f64) -> f64 {
    let lambda2 = lambda * lambda;
    let lambda3 = lambda2 * lambda;
    let t00 = lambda.acos() + lambda * (1.0 - lambda2).sqrt();
    let t1 = 2.0 / 3.0 * (1.0 - lambda3);

    if t_norm >= t00 {
        -(t_norm - t00) / (t_norm - t00 + 4.0)
    } else if t_norm <= t1 {
        t1 * (t1 - t_norm) / (0.4 * (1.0 - lambda2 * lambda3) * t_norm) + 1.0
    } else {
        (t_norm / t00).powf(std::f64::consts::LN_2 / (t1 / t00).ln()) - 1.0
    }
}

/// Third-order Householder iteration on F(x) = t(x) - t_norm with a bounded
/// step and a bounded domain.
fn householder(
    t_norm: f64,
    x0: f64,
    lambda: f64,
) -> Result<(f64, usize, f64), LambertError> {
    let mut x = x0.clamp(X_MIN, X_MAX);
    let mut residual = f64::INFINITY;
    // Absolute below t_norm = 1, relative above: 1e-14 is finer than f64
    // resolves on long normalized times.
    let tolerance = TOLERANCE * t_norm.max(1.0);

    for iteration in 1..=MAX_ITERATIONS {
        let t = time_of_flight(x, lambda);
        let delta = t - t_norm;
        residual = delta.abs();
        if residual < tolerance {
            return Ok((x, iteration, residual));
        }

        let (dt, ddt, dddt) = time_derivatives(x, t, lambda);
        let dt2 = dt * dt;
        let denominator = dt * (dt2 - delta * ddt) + dddt * delta * delta / 6.0;
        let mut step = if denominator.abs() > f64::MIN_POSITIVE {
            delta * (dt2 - delta * ddt / 2.0) / denominator
        } else {
            delta / dt
        };
        if step.abs() > MAX_STEP {
            step = MAX_STEP * step.signum();
        }
        x = (x - step).clamp(X_MIN, X_MAX);
    }

    Err(LambertError::ConvergenceFailure {
        iterations: MAX_ITERATIONS,
        residual,
    })
}

// Expression-selection thresholds around the parabolic point x = 1.
const BATTIN_BOUNDARY: f64 = 0.01;
const LAGRANGE_BOUNDARY: f64 = 0.2;

/// Normalized time of flight t(x) for the single-revolution arc.
///
/// Battin's series covers the neighbourhood of the parabola, the Lagrange
/// expression the surrounding band, and Lancaster's form everything else.
fn time_of_flight(x: f64, lambda: f64) -> f64 {
    let dist = (x - 1.0).abs();
    if dist < LAGRANGE_BOUNDARY && dist > BATTIN_BOUNDARY {
        return lagrange_tof(x, lambda);
    }

    let k = lambda * lambda;
    let e = x * x - 1.0;
    let z = (1.0 + k * e).sqrt();

    if dist < BATTIN_BOUNDARY {
        let eta = z - lambda * x;
        let s1 = 0.5 * (1.0 - lambda - x * eta);
        let q = hypergeometric(s1, 1e-11) * (4.0 / 3.0);
        eta.powi(3) * q / 2.0 + 2.0 * lambda * eta
    } else {
        let rho = e.abs();
        let y = rho.sqrt();
        let g = x * z - lambda * e;
        let d = if e < 0.0 {
            g.acos()
        } else {
            (y * (z - lambda * x) + g).ln()
        };
        (x - lambda * z - d / y) / e
    }
}

/// Lagrange time-of-flight expression, valid on both the elliptic and the
/// hyperbolic side away from x = 1.
fn lagrange_tof(x: f64, lambda: f64) -> f64 {
    let a = 1.0 / (1.0 - x * x);
    if a > 0.0 {
        let alfa = 2.0 * x.acos();
        let beta_arg = (lambda * lambda / a).sqrt().min(1.0);
        let mut beta = 2.0 * beta_arg.asin();
        if lambda < 0.0 {
            beta = -beta;
        }
        a * a.sqrt() * ((alfa - alfa.sin()) - (beta - beta.sin())) / 2.0
    } else {
        let alfa = 2.0 * x.acosh();
        let mut beta = 2.0 * (-lambda * lambda / a).sqrt().asinh();
        if lambda < 0.0 {
            beta = -beta;
        }
        -a * (-a).sqrt() * ((beta - beta.sinh()) - (alfa - alfa.sinh())) / 2.0
    }
}

/// Analytic first, second, and third derivatives of t(x).
fn time_derivatives(x: f64, t: f64, lambda: f64) -> (f64, f64, f64) {
    let l2 = lambda * lambda;
    let l3 = l2 * lambda;
    let umx2 = 1.0 - x * x;
    let y = (1.0 - l2 * umx2).sqrt();
    let y2 = y * y;
    let y3 = y2 * y;

    let dt = (3.0 * t * x - 2.0 + 2.0 * l3 * x / y) / umx2;
    let ddt = (3.0 * t + 5.0 * x * dt + 2.0 * (1.0 - l2) * l3 / y3) / umx2;
    let dddt = (7.0 * x * ddt + 8.0 * dt - 6.0 * (1.0 - l2) * l2 * l3 * x / (y3 * y2)) / umx2;

    (dt, ddt, dddt)
}

/// Gauss hypergeometric series used by the Battin expression.
fn hypergeometric(z: f64, tol: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    for j in 0..100 {
        let j = j as f64;
        term = term * (3.0 + j) * (1.0 + j) / (2.5 + j) * z / (j + 1.0);
        sum += term;
        if term.abs() < tol {
            break;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_core::vector::norm;

    const MU_EARTH: f64 = 398_600.4418;

    #[test]
    fn quarter_orbit_recovers_circular_velocities() {
        let r: f64 = 7_000.0;
        let r1 = [r, 0.0, 0.0];
        let r2 = [0.0, r, 0.0];
        let period = 2.0 * PI * (r.powi(3) / MU_EARTH).sqrt();

        let sol = solve(&r1, &r2, period / 4.0, MU_EARTH, Direction::Prograde, 0).unwrap();
        let v_circ = (MU_EARTH / r).sqrt();

        assert!(sol.iterations <= MAX_ITERATIONS);
        assert!((norm(&sol.v1) - v_circ).abs() < 1e-6, "v1 = {:?}", sol.v1);
        assert!((norm(&sol.v2) - v_circ).abs() < 1e-6, "v2 = {:?}", sol.v2);
        // Departure velocity should be tangential (+y), arrival -x.
        assert!(sol.v1[1] > 0.99 * v_circ);
        assert!(sol.v2[0] < -0.99 * v_circ);
    }

    #[test]
    fn retrograde_sweeps_the_complementary_angle() {
        let r1 = [7_000.0, 0.0, 0.0];
        let r2 = [0.0, 7_000.0, 0.0];
        let tof = 3.0 * 3_600.0;
        let sol = solve(&r1, &r2, tof, MU_EARTH, Direction::Retrograde, 0).unwrap();
        assert!((sol.transfer_angle_rad - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn coincident_positions_are_degenerate() {
        let r1 = [7_000.0, 0.0, 0.0];
        let err = solve(&r1, &r1, 3_600.0, MU_EARTH, Direction::Prograde, 0).unwrap_err();
        assert!(matches!(err, LambertError::DegenerateGeometry { .. }));
    }

    #[test]
    fn multi_revolution_requests_are_rejected() {
        let r1 = [7_000.0, 0.0, 0.0];
        let r2 = [0.0, 7_000.0, 0.0];
        let err = solve(&r1, &r2, 3_600.0, MU_EARTH, Direction::Prograde, 1).unwrap_err();
        assert!(matches!(err, LambertError::Unsupported { revolutions: 1 }));
    }

    #[test]
    fn too_short_flight_time_is_reported() {
        let r1 = [7_000.0, 0.0, 0.0];
        let r2 = [0.0, 42_164.0, 0.0];
        let err = solve(&r1, &r2, 1.0, MU_EARTH, Direction::Prograde, 0).unwrap_err();
        assert!(matches!(err, LambertError::TimeTooShort { .. }));
    }

    #[test]
    fn lagrange_determinant_is_unity_for_valid_arcs() {
        let r1 = [8_000.0, 1_000.0, 500.0];
        let r2 = [-4_000.0, 9_000.0, 1_500.0];
        let sol = solve(&r1, &r2, 2.5 * 3_600.0, MU_EARTH, Direction::Prograde, 0).unwrap();
        // The advisory channel stays quiet when the determinant holds.
        assert!(sol.warning.is_none(), "warning = {:?}", sol.warning);
        assert!(sol.residual < 1e-13);
    }

    #[test]
    fn hyperbolic_fast_transfer_converges() {
        let r1 = [6_571.0, 0.0, 0.0];
        let r2 = [0.0, 20_000.0, 0.0];
        // Under the parabolic time for this geometry: forces the x > 1 branch.
        let sol = solve(&r1, &r2, 1_800.0, MU_EARTH, Direction::Prograde, 0).unwrap();
        let energy = 0.5 * norm(&sol.v1).powi(2) - MU_EARTH / 6_571.0;
        assert!(energy > 0.0, "expected hyperbolic departure, e = {energy}");
    }

    #[test]
    fn non_finite_inputs_are_rejected_eagerly() {
        let r1 = [f64::NAN, 0.0, 0.0];
        let r2 = [0.0, 7_000.0, 0.0];
        assert!(matches!(
            solve(&r1, &r2, 3_600.0, MU_EARTH, Direction::Prograde, 0),
            Err(LambertError::InvalidInput(_))
        ));
        let r1 = [7_000.0, 0.0, 0.0];
        assert!(matches!(
            solve(&r1, &r2, -1.0, MU_EARTH, Direction::Prograde, 0),
            Err(LambertError::InvalidInput(_))
        ));
    }
}
