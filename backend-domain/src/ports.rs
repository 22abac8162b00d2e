// Repository port
// What the application needs from the anomaly store

pub mod repositories;

pub use repositories::*;
