use crate::nr::{self, IterationTrace, Run};

pub trait Func {
    fn f(&self, c: f64) -> f64;
    fn df(&self, c: f64) -> f64;

    fn trace(&self, run: &Run) -> IterationTrace {
        nr::iterate(
            |c| self.f(c),
            |c| self.df(c),
            run.initial_guess,
            run.max_iterations,
            run.tolerance,
        )
    }
}

/// `a * x^2 + b * x + c`.
///
/// The default is the curve the figures are drawn for,
/// `0.5 * C^2 - C + 1`, which has its minimum `0.5` at `C = 1` and no real
/// root.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

impl Default for Quadratic {
    fn default() -> Self {
        Self::new(0.5, -1.0, 1.0)
    }
}

impl Func for Quadratic {
    fn f(&self, c: f64) -> f64 {
        self.a * c * c + self.b * c + self.c
    }

    fn df(&self, c: f64) -> f64 {
        2.0 * self.a * c + self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 1.0, -1.0)]
    #[test_case(1.0, 0.5, 0.0)]
    #[test_case(2.0, 1.0, 1.0)]
    #[test_case(-1.0, 2.5, -2.0)]
    fn default_curve(c: f64, f: f64, df: f64) {
        let q = Quadratic::default();
        assert_eq!(q.f(c), f);
        assert_eq!(q.df(c), df);
    }

    #[test]
    fn evaluation_is_pure() {
        let q = Quadratic::default();
        for c in [-0.7, 0.0, 0.3, 1.0, 1.0 + 1e-12, 17.25] {
            assert_eq!(q.f(c).to_bits(), q.f(c).to_bits());
            assert_eq!(q.df(c).to_bits(), q.df(c).to_bits());
        }
    }
}
