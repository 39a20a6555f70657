// Domain services — pure logic over scan events

pub mod aggregate;
pub mod classify;
pub mod privacy;
pub mod sample;

pub use aggregate::*;
pub use classify::*;
pub use privacy::*;
pub use sample::*;
