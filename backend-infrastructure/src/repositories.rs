pub mod dashboard_repository;
pub mod postgres;
pub mod rows;

pub use dashboard_repository::*;
pub use postgres::*;
pub use rows::*;
