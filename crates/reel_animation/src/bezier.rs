//! Cubic Bézier timing curves
//!
//! A curve is anchored at `(0, 0)` and `(1, 1)` with two control points.
//! Solving maps an input progress `x` to the curve's `y` by first finding the
//! curve parameter whose X coordinate equals `x`.
//!
//! The solver runs a fixed number of Newton-Raphson iterations and falls back
//! to bisection when the derivative is flat or Newton fails to converge.

/// Newton-Raphson iterations before falling back to bisection
pub const NEWTON_ITERATIONS: usize = 10;

/// Convergence tolerance on the X coordinate
pub const APPROXIMATION: f64 = 1e-4;

/// Upper bound on bisection steps
const BISECTION_LIMIT: usize = 64;

/// Bisection strategy used when Newton-Raphson gives up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BisectionMode {
    /// Historical behaviour: the sample is taken at the input value rather
    /// than at the bisection midpoint, so the search drifts to an end of the
    /// interval unless the input is already a fixed point of the curve.
    #[default]
    Legacy,
    /// Proper bisection on `X(t)`.
    Exact,
}

/// Cubic Bézier curve in polynomial form
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
    control: (f64, f64, f64, f64),
    newton_iterations: usize,
    approximation: f64,
    bisection: BisectionMode,
}

impl CubicBezier {
    /// Create a curve from its two control points
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;

        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;

        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
            control: (x1, y1, x2, y2),
            newton_iterations: NEWTON_ITERATIONS,
            approximation: APPROXIMATION,
            bisection: BisectionMode::default(),
        }
    }

    pub fn with_tolerances(mut self, newton_iterations: usize, approximation: f64) -> Self {
        self.newton_iterations = newton_iterations;
        self.approximation = approximation;
        self
    }

    pub fn with_bisection(mut self, mode: BisectionMode) -> Self {
        self.bisection = mode;
        self
    }

    /// Control points `(x1, y1, x2, y2)`
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        self.control
    }

    pub fn newton_iterations(&self) -> usize {
        self.newton_iterations
    }

    pub fn approximation(&self) -> f64 {
        self.approximation
    }

    /// Eased progress for input progress `t`
    ///
    /// Inputs outside `[0, 1]` clamp to the nearest end.
    pub fn solve(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_x(t))
    }

    #[inline]
    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    #[inline]
    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    #[inline]
    fn derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Curve parameter whose X coordinate is `value`
    fn solve_x(&self, value: f64) -> f64 {
        let mut result = value;
        for _ in 0..self.newton_iterations {
            let sample = self.sample_x(result);
            if (sample - value).abs() < self.approximation {
                return result;
            }
            let derivative = self.derivative_x(result);
            if derivative.abs() < self.approximation {
                break;
            }
            result -= (sample - value) / derivative;
        }

        match self.bisection {
            BisectionMode::Legacy => self.bisect_legacy(value),
            BisectionMode::Exact => self.bisect_exact(value),
        }
    }

    fn bisect_legacy(&self, value: f64) -> f64 {
        let mut low = 0.0;
        let mut high = 1.0;
        let mut t = value;
        let sample = self.sample_x(value);

        for _ in 0..BISECTION_LIMIT {
            if (sample - value).abs() < self.approximation {
                return t;
            }
            if value > sample {
                low = t;
            } else {
                high = t;
            }
            t = (high - low) / 2.0 + low;
        }
        t
    }

    fn bisect_exact(&self, value: f64) -> f64 {
        let mut low = 0.0;
        let mut high = 1.0;
        let mut t = value;

        for _ in 0..BISECTION_LIMIT {
            let sample = self.sample_x(t);
            if (sample - value).abs() < self.approximation {
                return t;
            }
            if value > sample {
                low = t;
            } else {
                high = t;
            }
            t = (high - low) / 2.0 + low;
        }
        t
    }
}
