mod error;
pub mod init;
mod session;
mod settings;
mod simulation;

pub use error::Error;
pub use session::*;
pub use settings::*;
pub use simulation::*;
