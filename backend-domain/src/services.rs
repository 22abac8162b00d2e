// Domain services: pure functions over entities, no I/O
pub mod histogram;
pub mod predicate;
pub mod series;
pub mod synthetic;

pub use histogram::*;
pub use predicate::*;
pub use series::*;
pub use synthetic::*;
