use std::ops::Range;

use crate::func::Func;
use crate::nr::IterationTrace;

/// A single animation frame: iterate number `index` at `(x, f(x))`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

pub fn frames(trace: &IterationTrace, func: &impl Func) -> Vec<Frame> {
    trace
        .values()
        .iter()
        .enumerate()
        .map(|(index, &x)| Frame {
            index,
            x,
            y: func.f(x),
        })
        .collect()
}

/// `count` evenly spaced samples of `func` over `range`, both ends included.
pub fn sample(func: &impl Func, range: Range<f64>, count: usize) -> Vec<(f64, f64)> {
    match count {
        0 => vec![],
        1 => vec![(range.start, func.f(range.start))],
        _ => {
            let step = (range.end - range.start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    let x = if i == count - 1 {
                        range.end
                    } else {
                        range.start + step * i as f64
                    };
                    (x, func.f(x))
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quadratic, Run};

    #[test]
    fn one_frame_per_iterate() {
        let q = Quadratic::default();
        let trace = q.trace(&Run {
            initial_guess: 0.5,
            ..Default::default()
        });
        let frames = frames(&trace, &q);
        assert_eq!(frames.len(), trace.len());
        for (i, (frame, &x)) in frames.iter().zip(trace.values()).enumerate() {
            assert_eq!(frame.index, i);
            assert_eq!(frame.x, x);
            assert_eq!(frame.y, q.f(x));
        }
    }

    #[test]
    fn default_run_frames() {
        let q = Quadratic::default();
        let frames = frames(&q.trace(&Run::default()), &q);
        assert_eq!(
            frames,
            vec![
                Frame {
                    index: 0,
                    x: 0.0,
                    y: 1.0
                },
                Frame {
                    index: 1,
                    x: 1.0,
                    y: 0.5
                },
            ]
        );
    }

    #[test]
    fn samples_include_both_ends() {
        let q = Quadratic::default();
        let samples = sample(&q, -1.0..2.0, 400);
        assert_eq!(samples.len(), 400);
        assert_eq!(samples[0], (-1.0, 2.5));
        assert_eq!(samples[399], (2.0, 1.0));
        assert!(samples.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn degenerate_sample_counts() {
        let q = Quadratic::default();
        assert!(sample(&q, 0.0..1.0, 0).is_empty());
        assert_eq!(sample(&q, 0.0..1.0, 1), vec![(0.0, 1.0)]);
    }
}
