pub mod stream_client;

pub use stream_client::*;
