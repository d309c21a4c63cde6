use std::io::Result;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use newton::{Func, Quadratic, Status};

mod cache;
mod fig_writer;
mod figures;
mod utils;

use crate::utils::{error, Settings, GIF_EXT};

fn main() -> Result<()> {
    let settings = Settings::parse();

    if settings.verbose > 0 {
        tracing_subscriber::fmt::fmt()
            .with_writer(std::io::stderr)
            .init();
        log::set_max_level(if settings.verbose > 1 {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Debug
        });
    }

    let bar_style = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
    )
    .map_err(|e| error(&e.to_string()))?;

    let run = settings.run()?;
    let func = Quadratic::default();

    if settings.verbose == 0 {
        println!("[1/3] Iterating");
    }
    let trace = func.trace(&run);

    match trace.status() {
        Status::Converged => log::info!(
            "Converged to {} after {} steps",
            trace.last(),
            trace.len() - 1
        ),
        Status::Degenerate { iteration, at } => log::warn!(
            "Derivative vanished at iteration {iteration} (C = {at}), keeping {} iterates",
            trace.len()
        ),
        Status::Exhausted => log::info!(
            "No convergence within {} iterations (last step {:?})",
            run.max_iterations,
            trace.last_step()
        ),
        Status::Iterating => return Err(error("Iteration did not terminate")),
    }

    std::fs::create_dir_all(&settings.output_dir)?;
    let cache = cache::Cache::load(&settings.output_dir)?;

    if settings.verbose == 0 {
        if settings.rebuild {
            println!("[2/3] Rendering animation (ignoring cache)");
        } else {
            println!("[2/3] Rendering animation");
        }
    }

    let pb = if settings.verbose == 0 {
        ProgressBar::new(trace.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(bar_style);

    let finished_figure = figures::fig_newton_raphson(&trace, run, &func, &cache, &settings, &pb)?;
    pb.finish_and_clear();

    if settings.verbose == 0 {
        println!("[3/3] Saving cache");
    }
    let mut new_cache = cache;
    new_cache.update(&finished_figure.name)?;
    new_cache.save()?;

    let path = settings.path(GIF_EXT);
    if finished_figure.cached {
        log::info!("[{}] Up to date.", finished_figure.name);
    } else {
        log::info!(
            "[{}] Done, {} frames.",
            finished_figure.name,
            finished_figure.frame_count
        );
    }
    if settings.verbose == 0 {
        println!("{}", path.to_string_lossy());
    }

    Ok(())
}
