use crate::codec::{CodecError, decode_bytes, decode_u16};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Reference number of a concatenated short message, 2 octets
pub const SAR_MSG_REF_NUM: u16 = 0x020C;
/// Total number of segments in a concatenated short message, 1 octet
pub const SAR_TOTAL_SEGMENTS: u16 = 0x020E;
/// 1-based position of this segment, 1 octet
pub const SAR_SEGMENT_SEQNUM: u16 = 0x020F;
/// Extended user data, used instead of short_message
pub const MESSAGE_PAYLOAD: u16 = 0x0424;
/// SMSC message id a delivery receipt refers to
pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tlv {
    /// The Tag field is used to uniquely identify the particular optional parameter in question.
    pub tag: u16,

    /// The Value field contains the actual data for the optional parameter in question.
    /// Its length is written on the wire from this buffer.
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn from_u8(tag: u16, value: u8) -> Self {
        Self::new(tag, Bytes::copy_from_slice(&[value]))
    }

    pub fn from_u16(tag: u16, value: u16) -> Self {
        Self::new(tag, Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let length = u16::try_from(self.value.len()).map_err(|_| {
            CodecError::TlvError(format!(
                "value of tag {:#06x} is {} octets, limit is {}",
                self.tag,
                self.value.len(),
                u16::MAX
            ))
        })?;

        buf.put_u16(self.tag);
        buf.put_u16(length);
        buf.put_slice(&self.value);
        Ok(())
    }

    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let tag = decode_u16(buf)?;
        let length = decode_u16(buf)?;
        let value = decode_bytes(buf, length as usize).map_err(|_| {
            CodecError::TlvError(format!("tag {tag:#06x} declares {length} octets past end of PDU"))
        })?;

        Ok(Self { tag, value })
    }

    /// Decode TLVs until the buffer is exhausted
    pub fn decode_all(buf: &mut Cursor<&[u8]>) -> Result<Vec<Self>, CodecError> {
        let mut tlvs = Vec::new();
        while buf.has_remaining() {
            tlvs.push(Self::decode(buf)?);
        }
        Ok(tlvs)
    }
}

/// First TLV with the given tag
pub fn find(tlvs: &[Tlv], tag: u16) -> Option<&Tlv> {
    tlvs.iter().find(|tlv| tlv.tag == tag)
}
