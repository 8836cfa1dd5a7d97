use thiserror::Error;

/// Errors raised while reading a packet back out of a bit buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the value was fully read
    #[error("Unexpected end of buffer after {bits_read} bits")]
    UnexpectedEnd { bits_read: u32 },

    /// A string field did not contain valid UTF-8
    #[error("String field is not valid UTF-8")]
    InvalidUtf8,

    /// A tag or discriminant held a value the reader does not know
    #[error("Invalid {what}: {value}")]
    InvalidTag { what: &'static str, value: u64 },
}
