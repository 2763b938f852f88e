// HTTP routes
pub mod analyze;
pub mod fallback;
pub mod health;

pub use analyze::*;
pub use fallback::*;
pub use health::*;
