use crate::codec::CodecError;
use crate::coding::{DecodingError, EncodingError};
use crate::model::Coding;
use crate::session::TransportError;
use thiserror::Error;

/// Everything that can go wrong building or submitting one request.
///
/// Every variant is local to the request that produced it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Message needs more than 255 segments, more than one unit with splitting
    /// disabled, or more than a message_payload TLV can carry
    #[error("Message is too long")]
    MessageTooLong,

    /// No encode/split strategy is registered for the coding
    #[error("Coding {0} is unsupported")]
    UnsupportedCoding(Coding),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    /// An address type with no wire value, e.g. one copied from an inbound PDU
    #[error("Unsupported {field} value {value:#04x}")]
    UnsupportedAddressType { field: &'static str, value: u8 },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
