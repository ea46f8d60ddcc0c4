pub mod alias;
pub mod speakers;

pub use alias::*;
pub use speakers::*;
