pub mod common;
pub mod error;
pub mod processing;

pub use error::StegoError;
pub use processing::{decode, encode, hide, reveal, Decoder, Encoder};
