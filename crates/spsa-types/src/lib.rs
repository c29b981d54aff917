pub mod errors;
pub mod extra;
pub mod progress;
pub mod vector;

pub use errors::*;
pub use extra::*;
pub use progress::*;
pub use vector::*;
