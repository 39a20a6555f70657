// Domain value objects
pub mod date_range;
pub mod device_type;

pub use date_range::*;
pub use device_type::*;
