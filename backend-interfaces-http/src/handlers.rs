pub mod analytics_handlers;
pub mod export_handlers;
pub mod ops_handlers;
pub mod registry_handlers;
pub mod scan_handlers;

pub use analytics_handlers::*;
pub use export_handlers::*;
pub use ops_handlers::*;
pub use registry_handlers::*;
pub use scan_handlers::*;
