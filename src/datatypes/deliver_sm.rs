use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_bytes, decode_cstring, decode_u8,
    encode_cstring,
};
use crate::datatypes::submit_sm::{ADDR_LEN, MESSAGE_ID_LEN, SERVICE_TYPE_LEN, TIME_LEN};
use crate::datatypes::tlv::{self, Tlv};
use crate::datatypes::{CommandId, DataCoding, ESM_CLASS_UDHI};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// esm_class message type bits marking an SMSC delivery receipt
pub const ESM_CLASS_DELIVERY_RECEIPT: u8 = 0x04;

/// This operation is used by the SMSC to deliver a short message to an ESME.
/// The deliver_sm PDU is used to deliver both mobile originated messages and
/// delivery receipts from the SMSC to the ESME.
///
/// Address TON/NPI are kept as raw bytes: an SMSC may send values this crate
/// does not name, and those must reach the caller intact.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeliverSm {
    pub command_status: u32,
    pub sequence_number: u32,

    pub service_type: String,

    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,

    pub dest_addr_ton: u8,
    pub dest_addr_npi: u8,
    pub destination_addr: String,

    /// 4.3.8 esm_class: Bit 2 set marks a delivery receipt, bit 6 a UDH in
    ///       short_message.
    pub esm_class: u8,

    pub protocol_id: u8,
    pub priority_flag: u8,

    /// Unused for deliver_sm, normally empty
    pub schedule_delivery_time: String,
    /// Unused for deliver_sm, normally empty
    pub validity_period: String,

    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: DataCoding,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
    pub tlvs: Vec<Tlv>,
}

impl DeliverSm {
    /// First optional parameter with the given tag
    pub fn tlv(&self, tag: u16) -> Option<&Tlv> {
        tlv::find(&self.tlvs, tag)
    }

    /// User data: short_message, or the message_payload TLV when the inline
    /// message is empty
    pub fn payload(&self) -> &[u8] {
        if self.short_message.is_empty() {
            if let Some(payload) = self.tlv(tlv::MESSAGE_PAYLOAD) {
                return &payload.value;
            }
        }
        &self.short_message
    }

    /// Payload with any user data header removed. `None` when UDHI is set but the
    /// header length runs past the end of the payload.
    pub fn user_data(&self) -> Option<&[u8]> {
        let payload = self.payload();
        if self.esm_class & ESM_CLASS_UDHI == 0 {
            return Some(payload);
        }
        let header_len = 1 + usize::from(*payload.first()?);
        payload.get(header_len..)
    }

    /// receipted_message_id TLV as text, without its terminator
    pub fn receipted_message_id(&self) -> Option<String> {
        let value = &self.tlv(tlv::RECEIPTED_MESSAGE_ID)?.value;
        let end = value.iter().position(|&b| b == 0).unwrap_or(value.len());
        Some(String::from_utf8_lossy(&value[..end]).into_owned())
    }

    pub fn is_delivery_receipt(&self) -> bool {
        self.esm_class & 0x3C == ESM_CLASS_DELIVERY_RECEIPT
    }
}

impl Decodable for DeliverSm {
    fn command_id() -> CommandId {
        CommandId::DeliverSm
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type = decode_cstring(buf, SERVICE_TYPE_LEN, "service_type")?;
        let source_addr_ton = decode_u8(buf)?;
        let source_addr_npi = decode_u8(buf)?;
        let source_addr = decode_cstring(buf, ADDR_LEN, "source_addr")?;
        let dest_addr_ton = decode_u8(buf)?;
        let dest_addr_npi = decode_u8(buf)?;
        let destination_addr = decode_cstring(buf, ADDR_LEN, "destination_addr")?;
        let esm_class = decode_u8(buf)?;
        let protocol_id = decode_u8(buf)?;
        let priority_flag = decode_u8(buf)?;
        let schedule_delivery_time = decode_cstring(buf, TIME_LEN, "schedule_delivery_time")?;
        let validity_period = decode_cstring(buf, TIME_LEN, "validity_period")?;
        let registered_delivery = decode_u8(buf)?;
        let replace_if_present_flag = decode_u8(buf)?;
        let data_coding = DataCoding::from_byte(decode_u8(buf)?);
        let sm_default_msg_id = decode_u8(buf)?;
        let sm_length = decode_u8(buf)?;
        let short_message = decode_bytes(buf, sm_length as usize)?;
        let tlvs = Tlv::decode_all(buf)?;

        Ok(DeliverSm {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addr_ton,
            dest_addr_npi,
            destination_addr,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            short_message,
            tlvs,
        })
    }
}

impl Encodable for DeliverSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if self.short_message.len() > u8::MAX as usize {
            return Err(CodecError::FieldValidation {
                field: "short_message",
                reason: format!("{} octets does not fit sm_length", self.short_message.len()),
            });
        }

        PduHeader {
            command_length: 0,
            command_id: CommandId::DeliverSm as u32,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        encode_cstring(buf, &self.service_type, SERVICE_TYPE_LEN, "service_type")?;
        buf.put_u8(self.source_addr_ton);
        buf.put_u8(self.source_addr_npi);
        encode_cstring(buf, &self.source_addr, ADDR_LEN, "source_addr")?;
        buf.put_u8(self.dest_addr_ton);
        buf.put_u8(self.dest_addr_npi);
        encode_cstring(buf, &self.destination_addr, ADDR_LEN, "destination_addr")?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        encode_cstring(buf, &self.schedule_delivery_time, TIME_LEN, "schedule_delivery_time")?;
        encode_cstring(buf, &self.validity_period, TIME_LEN, "validity_period")?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding.to_byte());
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);

        for tlv in &self.tlvs {
            tlv.encode(buf)?;
        }

        let length = buf.len() as u32;
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(())
    }
}

/// Acknowledgement the ESME returns for every deliver_sm
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeliverSmResponse {
    pub command_status: u32,
    pub sequence_number: u32,

    /// 4.6.2 message_id: unused for deliver_sm_resp and sent empty
    pub message_id: String,
}

impl Encodable for DeliverSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader {
            command_length: 0,
            command_id: CommandId::DeliverSmResp as u32,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        encode_cstring(buf, &self.message_id, MESSAGE_ID_LEN, "message_id")?;

        let length = buf.len() as u32;
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(())
    }
}
