pub mod property;
pub mod filter;
pub mod advisor;

pub use property::*;
pub use filter::*;
pub use advisor::*;
