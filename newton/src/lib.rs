#![warn(clippy::all, rust_2018_idioms)]

pub mod frame;
mod func;
pub mod nr;

pub use frame::Frame;
pub use func::{Func, Quadratic};
pub use nr::{iterate, IterationTrace, Run, Status};
