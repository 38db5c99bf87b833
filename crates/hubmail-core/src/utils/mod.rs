/// Utility modules
pub mod logging;
pub mod password;
pub mod validation;

pub use logging::*;
pub use password::*;
pub use validation::*;
