pub mod measurements;
pub mod stations;

pub use measurements::*;
pub use stations::*;
