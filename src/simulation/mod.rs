mod collision;
mod lander;
mod physics;
mod terrain;

pub use collision::*;
pub use lander::*;
pub use physics::*;
pub use terrain::*;
