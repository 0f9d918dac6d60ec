// ABOUTME: Header-only responses an ESME owes the SMSC for link management requests
// ABOUTME: enquire_link_resp and unbind_resp always carry ESME_ROK and no body

use crate::codec::{CodecError, Encodable, PduHeader};
use crate::datatypes::{CommandId, CommandStatus};
use bytes::BytesMut;

#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnbindResponse {
    pub sequence_number: u32,
}

fn encode_header_only(buf: &mut BytesMut, command_id: CommandId, sequence_number: u32) {
    PduHeader {
        command_length: PduHeader::SIZE as u32,
        command_id: command_id as u32,
        command_status: CommandStatus::Ok as u32,
        sequence_number,
    }
    .encode(buf);
}

impl Encodable for EnquireLinkResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header_only(buf, CommandId::EnquireLinkResp, self.sequence_number);
        Ok(())
    }
}

impl Encodable for UnbindResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header_only(buf, CommandId::UnbindResp, self.sequence_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enquire_link_resp_is_header_only() {
        let bytes = EnquireLinkResponse { sequence_number: 9 }.to_bytes().unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[
                0x00, 0x00, 0x00, 0x10, 0x80, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x09
            ]
        );
    }

    #[test]
    fn unbind_resp_is_header_only() {
        let bytes = UnbindResponse { sequence_number: 2 }.to_bytes().unwrap();
        assert_eq!(bytes.len(), PduHeader::SIZE);
        assert_eq!(&bytes[4..8], &0x8000_0006u32.to_be_bytes());
        assert_eq!(&bytes[12..16], &2u32.to_be_bytes());
    }
}
