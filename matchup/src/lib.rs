mod calc;
mod common;
mod import;
mod matrix;
mod session;
mod severity;
mod spread;
mod team;

pub use calc::*;
pub use common::*;
pub use import::*;
pub use matrix::*;
pub use session::*;
pub use severity::*;
pub use spread::*;
pub use team::*;
