// Domain value objects
pub mod array_column;
pub mod data_source_kind;
pub mod export_format;
pub mod time_range;
pub mod user_id_match;

pub use array_column::*;
pub use data_source_kind::*;
pub use export_format::*;
pub use time_range::*;
pub use user_id_match::*;
