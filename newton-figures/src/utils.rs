use std::io::Result;
use std::path::PathBuf;

use clap::Parser;
use newton::Run;

pub const GIF_EXT: &str = "gif";
pub const RON_EXT: &str = "ron";

pub fn error(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,
    #[arg(short, long, default_value = "chapter4_newton_raphson_safe")]
    pub name: String,
    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub guess: f64,
    #[arg(short, long, default_value_t = 10)]
    pub iterations: usize,
    #[arg(short, long, default_value_t = 1.0e-6, allow_hyphen_values = true)]
    pub tolerance: f64,
    /// Frame delay in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    pub delay: u32,
    #[arg(short, long)]
    pub rebuild: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Settings {
    pub fn run(&self) -> Result<Run> {
        if !self.guess.is_finite() {
            return Err(error(&format!("Initial guess must be finite ({})", self.guess)));
        }
        if self.iterations == 0 {
            return Err(error("Need at least one iteration"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(error(&format!(
                "Tolerance must be finite and non-negative ({})",
                self.tolerance
            )));
        }
        Ok(Run {
            initial_guess: self.guess,
            max_iterations: self.iterations,
            tolerance: self.tolerance,
        })
    }

    pub fn path(&self, ext: &str) -> PathBuf {
        let mut path = PathBuf::from(&self.output_dir).join(&self.name);
        path.set_extension(ext);
        path
    }
}
