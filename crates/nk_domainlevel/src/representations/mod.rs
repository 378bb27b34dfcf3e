mod domain;
mod complex;
mod solution;
mod strand;
mod reactions;

pub use domain::*;
pub use complex::*;
pub use solution::*;
pub use strand::*;
pub use reactions::*;
