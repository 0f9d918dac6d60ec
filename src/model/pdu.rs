use crate::model::{Address, Coding, Command, Status};

/// Header attached to every protocol event surfaced to a caller
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub command: Command,
    pub status: Status,
    pub sequence: u32,
}

/// Concatenation metadata of one segment of a multi-part message.
///
/// UDH references are 8-bit; they are widened here so both modes share a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Concat {
    pub reference: u16,
    pub total: u8,
    /// 1-based
    pub seq: u8,
}

/// An inbound short message or delivery receipt
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub header: Header,
    pub source: Address,
    pub destination: Address,
    pub esm_class: u8,
    /// `None` when the wire tag names no known scheme
    pub coding: Option<Coding>,
    /// Raw data_coding byte as received
    pub data_coding: u8,
    /// Decoded text, or a base64 dump of the payload when it could not be decoded
    pub message: String,
    /// receipted_message_id, when the SMSC sent one
    pub message_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pdu {
    Generic(Header),
    SubmitAck {
        header: Header,
        message_id: String,
    },
    Delivery(Delivery),
    Submit {
        header: Header,
        concat: Option<Concat>,
        multi_segment: bool,
    },
}

impl Pdu {
    pub fn header(&self) -> &Header {
        match self {
            Pdu::Generic(header) => header,
            Pdu::SubmitAck { header, .. } => header,
            Pdu::Delivery(delivery) => &delivery.header,
            Pdu::Submit { header, .. } => header,
        }
    }
}

/// Which way a protocol event travelled
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Outbound,
    Inbound,
}
