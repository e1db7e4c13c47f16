mod base;
mod make;

pub mod notation;

pub use base::*;
pub use make::*;
pub use notation::{notation, Notation};
