use std::ops::ControlFlow;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Run {
    pub initial_guess: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            initial_guess: 0.0,
            max_iterations: 10,
            tolerance: 1.0e-6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    #[default]
    Iterating,
    Converged,
    /// The derivative was exactly zero at `at` on pass `iteration`.
    Degenerate {
        iteration: usize,
        at: f64,
    },
    Exhausted,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Iterating)
    }
}

/// The iterates of a Newton-Raphson run, starting with the initial guess, and
/// the state the run ended in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IterationTrace {
    values: Vec<f64>,
    status: Status,
}

impl IterationTrace {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }

    pub fn steps(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied().tuple_windows::<(_, _)>()
    }

    pub fn last_step(&self) -> Option<f64> {
        self.steps().last().map(|(c0, c1)| (c1 - c0).abs())
    }
}

/// Newton-Raphson iteration with a guard against a vanishing derivative.
///
/// Runs at most `max_iterations` update steps starting from `guess`. The run
/// stops early when the derivative at the current point is exactly zero, in
/// which case nothing is appended for that pass, or when two successive
/// iterates differ by less than `tolerance`.
pub fn iterate(
    f: impl Fn(f64) -> f64,
    df: impl Fn(f64) -> f64,
    guess: f64,
    max_iterations: usize,
    tolerance: f64,
) -> IterationTrace {
    let mut values = vec![guess];

    let flow = (0..max_iterations).try_fold(guess, |c0, i| {
        let derivative = df(c0);
        if derivative == 0.0 {
            log::warn!("Derivative zero at iteration {i}, C = {c0}. Stopping iteration.");
            return ControlFlow::Break(Status::Degenerate { iteration: i, at: c0 });
        }

        let c1 = c0 - f(c0) / derivative;
        values.push(c1);
        log::debug!("[{i}] {c0} -> {c1}");

        if (c1 - c0).abs() < tolerance {
            ControlFlow::Break(Status::Converged)
        } else {
            ControlFlow::Continue(c1)
        }
    });

    let status = match flow {
        ControlFlow::Break(status) => status,
        ControlFlow::Continue(_) => Status::Exhausted,
    };

    IterationTrace { values, status }
}
