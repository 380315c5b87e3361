pub mod builder;
pub mod classify;
pub mod insert;

pub use builder::{build, generate};
pub use classify::{classify, Classified};
pub use insert::prepare_inserted_row;
