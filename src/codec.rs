// SMPP v3.4 Codec - Separates parsing/encoding logic from domain models
//
// Wire structures implement Encodable/Decodable; Frame::parse turns one complete
// inbound PDU into the variant the engine knows how to translate.

use crate::datatypes::{CommandId, DeliverSm, SubmitSmResponse};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Maximum allowed PDU size to prevent memory exhaustion attacks
pub const MAX_PDU_SIZE: u32 = 65536 + 1024;

/// SMPP v3.4 PDU Header (16 bytes, common to all PDUs)
///
/// command_id and command_status stay raw here. Unknown values are a translation
/// concern, not a framing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: u32,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode PDU header from buffer with validation
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        let command_id = buf.get_u32();
        let command_status = buf.get_u32();
        let sequence_number = buf.get_u32();

        if command_length < Self::SIZE as u32 || command_length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }

    /// Encode PDU header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id);
        buf.put_u32(self.command_status);
        buf.put_u32(self.sequence_number);
    }

    /// The typed command, if the id is one this crate names
    pub fn command(&self) -> Option<CommandId> {
        CommandId::try_from(self.command_id).ok()
    }

    /// Number of body octets following the header
    pub fn body_len(&self) -> usize {
        self.command_length as usize - Self::SIZE
    }
}

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// Encode this PDU to the buffer, header included
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Encode into a fresh buffer and patch command_length
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::with_capacity(256);
        self.encode(&mut buf)?;

        let length = buf.len() as u32;
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode this PDU from the buffer after header
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;

    /// Return the expected command_id for this PDU type
    fn command_id() -> CommandId;

    /// Validate the header is appropriate for this PDU type
    fn validate_header(header: &PduHeader) -> Result<(), CodecError> {
        if header.command_id != Self::command_id() as u32 {
            return Err(CodecError::UnexpectedCommandId {
                expected: Self::command_id(),
                actual: header.command_id,
            });
        }
        Ok(())
    }
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("Incomplete PDU: need more data")]
    Incomplete,

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("Unexpected command_id: expected {expected:?}, got {actual:#x}")]
    UnexpectedCommandId { expected: CommandId, actual: u32 },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("TLV parsing error: {0}")]
    TlvError(String),

    #[error("UTF-8 decoding error in field '{field}'")]
    Utf8Error { field: &'static str },
}

/// Decode a variable-length C-Octet string of at most `max_len` octets,
/// terminator included
pub fn decode_cstring(
    buf: &mut Cursor<&[u8]>,
    max_len: usize,
    field_name: &'static str,
) -> Result<String, CodecError> {
    let rest = buf.chunk();
    let window = &rest[..rest.len().min(max_len)];

    let end = match window.iter().position(|&b| b == 0) {
        Some(end) => end,
        None if rest.len() < max_len => return Err(CodecError::Incomplete),
        None => {
            return Err(CodecError::FieldValidation {
                field: field_name,
                reason: format!("missing terminator within {max_len} octets"),
            });
        }
    };

    let value = std::str::from_utf8(&window[..end])
        .map_err(|_| CodecError::Utf8Error { field: field_name })?
        .to_owned();
    buf.advance(end + 1);

    Ok(value)
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode `len` raw octets
pub fn decode_bytes(buf: &mut Cursor<&[u8]>, len: usize) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Encode a variable-length C-Octet string; `max_len` includes the terminator
pub fn encode_cstring(
    buf: &mut BytesMut,
    value: &str,
    max_len: usize,
    field_name: &'static str,
) -> Result<(), CodecError> {
    if value.len() >= max_len {
        return Err(CodecError::FieldValidation {
            field: field_name,
            reason: format!("{} octets exceeds limit of {}", value.len(), max_len - 1),
        });
    }

    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// An inbound PDU as far as this engine needs to understand it
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    SubmitSmResp(SubmitSmResponse),
    DeliverSm(Box<DeliverSm>),

    /// Everything else, kept as header plus opaque body
    Other { header: PduHeader, body: Bytes },
}

impl Frame {
    /// Check whether `buf` starts with a complete PDU and return its length.
    ///
    /// Transports call this on their read buffer to split the byte stream into
    /// PDUs for [`Session::on_frame`](crate::session::Session::on_frame), which
    /// applies the same check. The cursor position is left unchanged.
    pub fn check(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
        if buf.remaining() < 4 {
            return Err(CodecError::Incomplete);
        }

        let pos = buf.position();
        let command_length = buf.get_u32();
        buf.set_position(pos);

        if command_length < PduHeader::SIZE as u32 || command_length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        if buf.remaining() < command_length as usize {
            return Err(CodecError::Incomplete);
        }

        Ok(command_length as usize)
    }

    /// Parse one complete PDU
    pub fn parse(data: &[u8]) -> Result<Frame, CodecError> {
        let mut buf = Cursor::new(data);
        let header = PduHeader::decode(&mut buf)?;

        if buf.remaining() < header.body_len() {
            return Err(CodecError::Incomplete);
        }

        // Bound the body so trailing bytes of a following PDU are never read as TLVs
        let start = buf.position() as usize;
        let body = &data[start..start + header.body_len()];
        let mut body_buf = Cursor::new(body);

        let frame = match header.command() {
            Some(CommandId::SubmitSmResp) => {
                Frame::SubmitSmResp(SubmitSmResponse::decode(header, &mut body_buf)?)
            }
            Some(CommandId::DeliverSm) => {
                Frame::DeliverSm(Box::new(DeliverSm::decode(header, &mut body_buf)?))
            }
            _ => Frame::Other {
                header,
                body: Bytes::copy_from_slice(body),
            },
        };

        Ok(frame)
    }

    /// Raw command_id for this frame
    pub fn command_id(&self) -> u32 {
        match self {
            Frame::SubmitSmResp(_) => CommandId::SubmitSmResp as u32,
            Frame::DeliverSm(_) => CommandId::DeliverSm as u32,
            Frame::Other { header, .. } => header.command_id,
        }
    }

    /// Raw command_status for this frame
    pub fn command_status(&self) -> u32 {
        match self {
            Frame::SubmitSmResp(pdu) => pdu.command_status,
            Frame::DeliverSm(pdu) => pdu.command_status,
            Frame::Other { header, .. } => header.command_status,
        }
    }

    /// Get the sequence number for this frame
    pub fn sequence_number(&self) -> u32 {
        match self {
            Frame::SubmitSmResp(pdu) => pdu.sequence_number,
            Frame::DeliverSm(pdu) => pdu.sequence_number,
            Frame::Other { header, .. } => header.sequence_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_only(command_id: u32, status: u32, sequence: u32) -> Vec<u8> {
        let mut pdu = Vec::new();
        pdu.extend_from_slice(&16u32.to_be_bytes());
        pdu.extend_from_slice(&command_id.to_be_bytes());
        pdu.extend_from_slice(&status.to_be_bytes());
        pdu.extend_from_slice(&sequence.to_be_bytes());
        pdu
    }

    #[test]
    fn pdu_header_encode_decode() {
        let header = PduHeader {
            command_length: 24,
            command_id: CommandId::EnquireLink as u32,
            command_status: 0,
            sequence_number: 42,
        };

        let mut buf = BytesMut::new();
        header.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = PduHeader::decode(&mut cursor).unwrap();

        assert_eq!(header, decoded);
        assert_eq!(decoded.command(), Some(CommandId::EnquireLink));
        assert_eq!(decoded.body_len(), 8);
    }

    #[test]
    fn pdu_header_rejects_short_length() {
        let mut data = header_only(0x15, 0, 1);
        data[3] = 0x08;
        let mut cursor = Cursor::new(data.as_slice());

        let result = PduHeader::decode(&mut cursor);
        assert!(matches!(result, Err(CodecError::InvalidPduLength { length: 8, .. })));
    }

    #[test]
    fn decode_cstring_variable_length() {
        let data = b"hello\0rest";
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_cstring(&mut cursor, 21, "test").unwrap();
        assert_eq!(result, "hello");
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn decode_cstring_missing_terminator() {
        let data = b"abcdefgh";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            decode_cstring(&mut cursor, 6, "service_type"),
            Err(CodecError::FieldValidation { field: "service_type", .. })
        ));

        let mut cursor = Cursor::new(&b"abc"[..]);
        assert_eq!(decode_cstring(&mut cursor, 6, "service_type"), Err(CodecError::Incomplete));
    }

    #[test]
    fn encode_cstring_enforces_limit() {
        let mut buf = BytesMut::new();
        encode_cstring(&mut buf, "hello", 6, "test").unwrap();
        assert_eq!(buf.as_ref(), b"hello\0");

        let err = encode_cstring(&mut buf, "toolong", 6, "service_type").unwrap_err();
        assert!(matches!(err, CodecError::FieldValidation { field: "service_type", .. }));
    }

    #[test]
    fn check_reports_complete_length() {
        let mut data = header_only(0x15, 0, 7);
        data.extend_from_slice(&[0xAA, 0xBB]);
        let mut cursor = Cursor::new(data.as_slice());
        assert_eq!(Frame::check(&mut cursor), Ok(16));
        assert_eq!(cursor.position(), 0);

        let partial = &data[..10];
        let mut cursor = Cursor::new(partial);
        assert_eq!(Frame::check(&mut cursor), Err(CodecError::Incomplete));
    }

    #[test]
    fn unknown_command_is_kept_opaque() {
        let mut data = Vec::new();
        data.extend_from_slice(&20u32.to_be_bytes());
        data.extend_from_slice(&0x0000_000Au32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&9u32.to_be_bytes());
        data.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);

        match Frame::parse(&data).unwrap() {
            Frame::Other { header, body } => {
                assert_eq!(header.command_id, 0x0000_000A);
                assert_eq!(body.as_ref(), &[0x01, 0x02, 0x03, 0x04]);
            }
            other => panic!("Expected Other frame, got {other:?}"),
        }
    }

    #[test]
    fn frame_accessors() {
        let data = header_only(CommandId::EnquireLinkResp as u32, 0, 43);
        let frame = Frame::parse(&data).unwrap();

        assert_eq!(frame.command_id(), CommandId::EnquireLinkResp as u32);
        assert_eq!(frame.command_status(), 0);
        assert_eq!(frame.sequence_number(), 43);
    }

    #[test]
    fn error_submit_sm_resp_has_no_body() {
        let data = header_only(CommandId::SubmitSmResp as u32, 0x45, 3);
        match Frame::parse(&data).unwrap() {
            Frame::SubmitSmResp(resp) => {
                assert_eq!(resp.command_status, 0x45);
                assert_eq!(resp.message_id, "");
            }
            other => panic!("Expected SubmitSmResp, got {other:?}"),
        }
    }
}
