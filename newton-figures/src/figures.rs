use std::fs::File;
use std::io::{prelude::*, BufWriter, Result};

use indicatif::ProgressBar;
use newton::{frame, Func, IterationTrace, Run};

use crate::cache;
use crate::fig_writer::{Bounds, FigureWriter, FinishedFigure};
use crate::utils::{error, Settings, Size, RON_EXT};

const SIZE: Size = Size {
    width: 600,
    height: 500,
};
const CURVE_SAMPLES: usize = 400;

/// Everything the animation is drawn from. Written next to the GIF so the
/// cache can tell when the figure is stale.
#[derive(Debug, serde::Serialize)]
struct Record<'a> {
    run: Run,
    trace: &'a IterationTrace,
    size: Size,
    delay: u32,
}

fn write_record(trace: &IterationTrace, run: Run, settings: &Settings) -> Result<()> {
    let record = Record {
        run,
        trace,
        size: SIZE,
        delay: settings.delay,
    };
    let text = ron::ser::to_string_pretty(&record, ron::ser::PrettyConfig::default())
        .map_err(|e| error(&e.to_string()))?;

    let path = settings.path(RON_EXT);
    log::info!("[{}]: Writing {}", settings.name, path.to_string_lossy());
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{text}")?;
    writer.flush()
}

pub fn fig_newton_raphson(
    trace: &IterationTrace,
    run: Run,
    func: &impl Func,
    cache: &cache::Cache,
    settings: &Settings,
    pb: &ProgressBar,
) -> Result<FinishedFigure> {
    let name = settings.name.as_str();

    write_record(trace, run, settings)?;

    if !settings.rebuild && cache.check(name)? {
        log::info!("[{name}]: Matches cached entry");
        return Ok(FinishedFigure {
            name: name.to_owned(),
            frame_count: 0,
            cached: true,
        });
    }

    let frames = frame::frames(trace, func);
    let bounds = Bounds::around(-1.0..2.0, &frames);
    let curve = frame::sample(func, bounds.x_range.clone(), CURVE_SAMPLES);
    let bounds = bounds.fit_y(&curve, &frames);

    let mut figure = FigureWriter::new(name, bounds, SIZE, settings);
    figure.add_curve(curve);
    figure.finish(&frames, pb)
}
