use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_bytes, decode_cstring, decode_u8,
    encode_cstring,
};
use crate::datatypes::tlv::{self, Tlv};
use crate::datatypes::{CommandId, DataCoding, NumericPlanIndicator, TypeOfNumber};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

// SMPP v3.4 field limits, terminator included
pub(crate) const SERVICE_TYPE_LEN: usize = 6;
pub(crate) const ADDR_LEN: usize = 21;
pub(crate) const TIME_LEN: usize = 17;
pub(crate) const MESSAGE_ID_LEN: usize = 65;

/// Largest short_message carried inline
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 254;

/// This operation is used by an ESME to submit a short message to the SMSC for onward transmission
/// to a specified short message entity (SME).
///
/// sm_length is not stored; it is always derived from `short_message` when encoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmitSm {
    pub sequence_number: u32,

    /// 4.1.1 service_type: SMS application service, empty for the SMSC default.
    pub service_type: String,

    pub source_addr_ton: TypeOfNumber,
    pub source_addr_npi: NumericPlanIndicator,
    pub source_addr: String,

    pub dest_addr_ton: TypeOfNumber,
    pub dest_addr_npi: NumericPlanIndicator,
    pub destination_addr: String,

    /// 4.1.8 esm_class: messaging mode and type. Bit 6 (0x40) is UDHI, set when
    ///       short_message begins with a user data header.
    pub esm_class: u8,

    pub protocol_id: u8,
    pub priority_flag: u8,

    /// Absolute or relative SMPP time, empty for immediate delivery
    pub schedule_delivery_time: String,

    /// Absolute or relative SMPP time, empty for the SMSC default
    pub validity_period: String,

    /// 4.1.13 registered_delivery: receipt and notification request bits.
    pub registered_delivery: u8,

    pub replace_if_present_flag: u8,
    pub data_coding: DataCoding,
    pub sm_default_msg_id: u8,

    /// Up to 254 octets of user data. Empty when message_payload is used.
    pub short_message: Bytes,

    /// Optional parameters in the order they are written
    pub tlvs: Vec<Tlv>,
}

impl SubmitSm {
    /// Validates the PDU against SMPP v3.4 length and exclusivity rules
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.short_message.len() > MAX_SHORT_MESSAGE_LENGTH {
            return Err(CodecError::FieldValidation {
                field: "short_message",
                reason: format!(
                    "{} octets exceeds limit of {}",
                    self.short_message.len(),
                    MAX_SHORT_MESSAGE_LENGTH
                ),
            });
        }

        if !self.short_message.is_empty() && self.tlv(tlv::MESSAGE_PAYLOAD).is_some() {
            return Err(CodecError::FieldValidation {
                field: "message_payload",
                reason: "short_message and message_payload are mutually exclusive".to_string(),
            });
        }

        Ok(())
    }

    /// First optional parameter with the given tag
    pub fn tlv(&self, tag: u16) -> Option<&Tlv> {
        tlv::find(&self.tlvs, tag)
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        self.validate()?;

        // command_length is patched once the body is known
        PduHeader {
            command_length: 0,
            command_id: CommandId::SubmitSm as u32,
            command_status: 0,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        encode_cstring(buf, &self.service_type, SERVICE_TYPE_LEN, "service_type")?;
        buf.put_u8(self.source_addr_ton as u8);
        buf.put_u8(self.source_addr_npi as u8);
        encode_cstring(buf, &self.source_addr, ADDR_LEN, "source_addr")?;
        buf.put_u8(self.dest_addr_ton as u8);
        buf.put_u8(self.dest_addr_npi as u8);
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

        // short_message is not null terminated, sm_length carries its size
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

impl Decodable for SubmitSm {
    fn command_id() -> CommandId {
        CommandId::SubmitSm
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type = decode_cstring(buf, SERVICE_TYPE_LEN, "service_type")?;
        let source_addr_ton = decode_ton(buf)?;
        let source_addr_npi = decode_npi(buf)?;
        let source_addr = decode_cstring(buf, ADDR_LEN, "source_addr")?;
        let dest_addr_ton = decode_ton(buf)?;
        let dest_addr_npi = decode_npi(buf)?;
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

        Ok(SubmitSm {
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

fn decode_ton(buf: &mut Cursor<&[u8]>) -> Result<TypeOfNumber, CodecError> {
    let raw = decode_u8(buf)?;
    TypeOfNumber::try_from(raw).map_err(|_| CodecError::FieldValidation {
        field: "addr_ton",
        reason: format!("unknown type of number {raw:#04x}"),
    })
}

fn decode_npi(buf: &mut Cursor<&[u8]>) -> Result<NumericPlanIndicator, CodecError> {
    let raw = decode_u8(buf)?;
    NumericPlanIndicator::try_from(raw).map_err(|_| CodecError::FieldValidation {
        field: "addr_npi",
        reason: format!("unknown numbering plan {raw:#04x}"),
    })
}

/// The submit_sm_resp PDU. Its body (message_id) is only present when
/// command_status is 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitSmResponse {
    /// Raw status, kept numeric so vendor codes survive
    pub command_status: u32,
    pub sequence_number: u32,

    /// 4.2.1 message_id: SMSC assigned identifier, up to 65 octets with terminator.
    pub message_id: String,
}

impl Encodable for SubmitSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader {
            command_length: 0,
            command_id: CommandId::SubmitSmResp as u32,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        if self.command_status == 0 {
            encode_cstring(buf, &self.message_id, MESSAGE_ID_LEN, "message_id")?;
        }

        let length = buf.len() as u32;
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(())
    }
}

impl Decodable for SubmitSmResponse {
    fn command_id() -> CommandId {
        CommandId::SubmitSmResp
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let message_id = if buf.has_remaining() {
            decode_cstring(buf, MESSAGE_ID_LEN, "message_id")?
        } else {
            String::new()
        };

        Ok(SubmitSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}
