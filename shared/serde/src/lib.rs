//! # Vault Serde
//! Bit-level serialization for entity wire packets.

mod bit_reader;
mod bit_writer;
mod error;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::UnsignedVariableInteger;
pub use serde::Serde;
