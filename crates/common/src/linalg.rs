pub mod faer;
pub mod nalgebra;

pub use self::faer::{FactorizationError, FaerLu};
