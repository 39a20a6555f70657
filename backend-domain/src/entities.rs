// Domain entities

pub mod dashboard;
pub mod runtime;
pub mod scan_event;
pub mod wine;

pub use dashboard::*;
pub use runtime::*;
pub use scan_event::*;
pub use wine::*;
