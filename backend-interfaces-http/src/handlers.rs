pub mod analytics_handlers;
pub mod ops_handlers;

pub use analytics_handlers::*;
pub use ops_handlers::*;
