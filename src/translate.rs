// Translation between the abstract protocol model and SMPP wire values
//
// Outbound this builds the submit_sm envelope; inbound it turns decoded frames
// into protocol events.

use crate::codec::{Encodable, Frame};
use crate::coding::{Strategy, TextCoding};
use crate::datatypes::{
    CommandId, CommandStatus, DataCoding, DeliverSm, DeliverSmResponse, EnquireLinkResponse,
    NumericPlanIndicator, SubmitSm, TypeOfNumber, UnbindResponse,
};
use crate::error::{EngineError, EngineResult};
use crate::model::{
    Address, Coding, Command, Delivery, Header, Npi, Pdu, RegisteredDelivery, Request, Status,
    Ton,
};
use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use tracing::{debug, warn};

/// Wire registered_delivery bits
pub const SMSC_RECEIPT_REQUESTED: u8 = 0x01;
pub const SMSC_RECEIPT_ON_FAILURE: u8 = 0x02;
pub const INTERMEDIATE_NOTIFICATION: u8 = 0x10;

impl From<Command> for CommandId {
    fn from(command: Command) -> Self {
        match command {
            Command::GenericNack => CommandId::GenericNack,
            Command::BindReceiver => CommandId::BindReceiver,
            Command::BindReceiverResp => CommandId::BindReceiverResp,
            Command::BindTransmitter => CommandId::BindTransmitter,
            Command::BindTransmitterResp => CommandId::BindTransmitterResp,
            Command::BindTransceiver => CommandId::BindTransceiver,
            Command::BindTransceiverResp => CommandId::BindTransceiverResp,
            Command::SubmitSm => CommandId::SubmitSm,
            Command::SubmitSmResp => CommandId::SubmitSmResp,
            Command::DeliverSm => CommandId::DeliverSm,
            Command::DeliverSmResp => CommandId::DeliverSmResp,
            Command::Unbind => CommandId::Unbind,
            Command::UnbindResp => CommandId::UnbindResp,
            Command::EnquireLink => CommandId::EnquireLink,
            Command::EnquireLinkResp => CommandId::EnquireLinkResp,
        }
    }
}

impl From<CommandId> for Command {
    fn from(id: CommandId) -> Self {
        match id {
            CommandId::GenericNack => Command::GenericNack,
            CommandId::BindReceiver => Command::BindReceiver,
            CommandId::BindReceiverResp => Command::BindReceiverResp,
            CommandId::BindTransmitter => Command::BindTransmitter,
            CommandId::BindTransmitterResp => Command::BindTransmitterResp,
            CommandId::BindTransceiver => Command::BindTransceiver,
            CommandId::BindTransceiverResp => Command::BindTransceiverResp,
            CommandId::SubmitSm => Command::SubmitSm,
            CommandId::SubmitSmResp => Command::SubmitSmResp,
            CommandId::DeliverSm => Command::DeliverSm,
            CommandId::DeliverSmResp => Command::DeliverSmResp,
            CommandId::Unbind => Command::Unbind,
            CommandId::UnbindResp => Command::UnbindResp,
            CommandId::EnquireLink => Command::EnquireLink,
            CommandId::EnquireLinkResp => Command::EnquireLinkResp,
        }
    }
}

impl From<CommandStatus> for Status {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Ok => Status::Ok,
            CommandStatus::InvalidMsgLength => Status::InvMsgLen,
            CommandStatus::InvalidCommandLength => Status::InvCmdLen,
            CommandStatus::InvalidCommandId => Status::InvCmdId,
            CommandStatus::IncorrectBindStatus => Status::InvBndSts,
            CommandStatus::AlreadyBoundState => Status::AlyBnd,
            CommandStatus::InvalidPriorityFlag => Status::InvPrtFlg,
            CommandStatus::InvalidRegisteredDeliveryFlag => Status::InvRegDlvFlg,
            CommandStatus::SystemError => Status::SysErr,
            CommandStatus::InvalidSourceAddress => Status::InvSrcAdr,
            CommandStatus::InvalidDestinationAddress => Status::InvDstAdr,
            CommandStatus::InvalidMessageId => Status::InvMsgId,
            CommandStatus::BindFailed => Status::BindFail,
            CommandStatus::InvalidPassword => Status::InvPaswd,
            CommandStatus::InvalidSystemId => Status::InvSysId,
            CommandStatus::CancelSmFailed => Status::CancelFail,
            CommandStatus::ReplacedSmFailed => Status::ReplaceFail,
            CommandStatus::MessageQueueFull => Status::MsgQFul,
            CommandStatus::InvalidServiceType => Status::InvSerTyp,
            CommandStatus::InvalidNumberOfDestinations => Status::InvNumDests,
            CommandStatus::InvalidDistributionListName => Status::InvDlName,
            CommandStatus::InvalidDestinationFlag => Status::InvDestFlag,
            CommandStatus::InvalidSubmitWithReplaceRequest => Status::InvSubRep,
            CommandStatus::InvalidEsmClassFieldData => Status::InvEsmClass,
            CommandStatus::CannotSubmitToDistributionList => Status::CntSubDl,
            CommandStatus::SubmitFailed => Status::SubmitFail,
            CommandStatus::InvalidSourceAddressTon => Status::InvSrcTon,
            CommandStatus::InvalidSourceAddressNpi => Status::InvSrcNpi,
            CommandStatus::InvalidDestinationAddressTon => Status::InvDstTon,
            CommandStatus::InvalidDestinationAddressNpi => Status::InvDstNpi,
            CommandStatus::InvalidSystemTypeField => Status::InvSysTyp,
            CommandStatus::InvalidReplaceIfPresentFlag => Status::InvRepFlag,
            CommandStatus::InvalidNumberOfMessages => Status::InvNumMsgs,
            CommandStatus::ThrottlingError => Status::Throttled,
            CommandStatus::InvalidScheduledDeliveryTime => Status::InvSched,
            CommandStatus::InvalidExpiryTime => Status::InvExpiry,
            CommandStatus::InvalidPredefinedMessageId => Status::InvDftMsgId,
            CommandStatus::ReceiverTemporaryAppError => Status::XTAppn,
            CommandStatus::ReceiverPermanentAppError => Status::XPAppn,
            CommandStatus::ReceiverRejectMessageError => Status::XRAppn,
            CommandStatus::QuerySmRequestFailed => Status::QueryFail,
            CommandStatus::ErrorInOptionalPartofPduBody => Status::InvOptParStream,
            CommandStatus::OptionalParameterNotAllowed => Status::OptParNotAllwd,
            CommandStatus::InvalidParameterLength => Status::InvParLen,
            CommandStatus::ExpectedOptionalParameterMissing => Status::MissingOptParam,
            CommandStatus::InvalidOptionalParameterValue => Status::InvOptParamVal,
            CommandStatus::DeliveryFailed => Status::DeliveryFailure,
            CommandStatus::UnknownError => Status::UnknownErr,
        }
    }
}

impl Status {
    /// Named wire status, `None` for [`Status::Other`]
    pub fn to_command_status(self) -> Option<CommandStatus> {
        let status = match self {
            Status::Ok => CommandStatus::Ok,
            Status::InvMsgLen => CommandStatus::InvalidMsgLength,
            Status::InvCmdLen => CommandStatus::InvalidCommandLength,
            Status::InvCmdId => CommandStatus::InvalidCommandId,
            Status::InvBndSts => CommandStatus::IncorrectBindStatus,
            Status::AlyBnd => CommandStatus::AlreadyBoundState,
            Status::InvPrtFlg => CommandStatus::InvalidPriorityFlag,
            Status::InvRegDlvFlg => CommandStatus::InvalidRegisteredDeliveryFlag,
            Status::SysErr => CommandStatus::SystemError,
            Status::InvSrcAdr => CommandStatus::InvalidSourceAddress,
            Status::InvDstAdr => CommandStatus::InvalidDestinationAddress,
            Status::InvMsgId => CommandStatus::InvalidMessageId,
            Status::BindFail => CommandStatus::BindFailed,
            Status::InvPaswd => CommandStatus::InvalidPassword,
            Status::InvSysId => CommandStatus::InvalidSystemId,
            Status::CancelFail => CommandStatus::CancelSmFailed,
            Status::ReplaceFail => CommandStatus::ReplacedSmFailed,
            Status::MsgQFul => CommandStatus::MessageQueueFull,
            Status::InvSerTyp => CommandStatus::InvalidServiceType,
            Status::InvNumDests => CommandStatus::InvalidNumberOfDestinations,
            Status::InvDlName => CommandStatus::InvalidDistributionListName,
            Status::InvDestFlag => CommandStatus::InvalidDestinationFlag,
            Status::InvSubRep => CommandStatus::InvalidSubmitWithReplaceRequest,
            Status::InvEsmClass => CommandStatus::InvalidEsmClassFieldData,
            Status::CntSubDl => CommandStatus::CannotSubmitToDistributionList,
            Status::SubmitFail => CommandStatus::SubmitFailed,
            Status::InvSrcTon => CommandStatus::InvalidSourceAddressTon,
            Status::InvSrcNpi => CommandStatus::InvalidSourceAddressNpi,
            Status::InvDstTon => CommandStatus::InvalidDestinationAddressTon,
            Status::InvDstNpi => CommandStatus::InvalidDestinationAddressNpi,
            Status::InvSysTyp => CommandStatus::InvalidSystemTypeField,
            Status::InvRepFlag => CommandStatus::InvalidReplaceIfPresentFlag,
            Status::InvNumMsgs => CommandStatus::InvalidNumberOfMessages,
            Status::Throttled => CommandStatus::ThrottlingError,
            Status::InvSched => CommandStatus::InvalidScheduledDeliveryTime,
            Status::InvExpiry => CommandStatus::InvalidExpiryTime,
            Status::InvDftMsgId => CommandStatus::InvalidPredefinedMessageId,
            Status::XTAppn => CommandStatus::ReceiverTemporaryAppError,
            Status::XPAppn => CommandStatus::ReceiverPermanentAppError,
            Status::XRAppn => CommandStatus::ReceiverRejectMessageError,
            Status::QueryFail => CommandStatus::QuerySmRequestFailed,
            Status::InvOptParStream => CommandStatus::ErrorInOptionalPartofPduBody,
            Status::OptParNotAllwd => CommandStatus::OptionalParameterNotAllowed,
            Status::InvParLen => CommandStatus::InvalidParameterLength,
            Status::MissingOptParam => CommandStatus::ExpectedOptionalParameterMissing,
            Status::InvOptParamVal => CommandStatus::InvalidOptionalParameterValue,
            Status::DeliveryFailure => CommandStatus::DeliveryFailed,
            Status::UnknownErr => CommandStatus::UnknownError,
            Status::Other(_) => return None,
        };
        Some(status)
    }

    /// Raw command_status; never fails, unnamed codes pass through
    pub fn to_wire(self) -> u32 {
        match self {
            Status::Other(raw) => raw,
            named => named.to_command_status().map_or(0, |status| status as u32),
        }
    }

    /// Unnamed codes are kept as [`Status::Other`]
    pub fn from_wire(raw: u32) -> Self {
        CommandStatus::try_from(raw).map_or(Status::Other(raw), Status::from)
    }
}

impl TryFrom<Ton> for TypeOfNumber {
    type Error = EngineError;

    fn try_from(ton: Ton) -> Result<Self, Self::Error> {
        match ton {
            Ton::Unknown => Ok(TypeOfNumber::Unknown),
            Ton::International => Ok(TypeOfNumber::International),
            Ton::National => Ok(TypeOfNumber::National),
            Ton::NetworkSpecific => Ok(TypeOfNumber::NetworkSpecific),
            Ton::SubscriberNumber => Ok(TypeOfNumber::SubscriberNumber),
            Ton::Alphanumeric => Ok(TypeOfNumber::Alphanumeric),
            Ton::Abbreviated => Ok(TypeOfNumber::Abbreviated),
            Ton::Other(value) => Err(EngineError::UnsupportedAddressType { field: "TON", value }),
        }
    }
}

impl From<u8> for Ton {
    fn from(raw: u8) -> Self {
        match TypeOfNumber::try_from(raw) {
            Ok(TypeOfNumber::Unknown) => Ton::Unknown,
            Ok(TypeOfNumber::International) => Ton::International,
            Ok(TypeOfNumber::National) => Ton::National,
            Ok(TypeOfNumber::NetworkSpecific) => Ton::NetworkSpecific,
            Ok(TypeOfNumber::SubscriberNumber) => Ton::SubscriberNumber,
            Ok(TypeOfNumber::Alphanumeric) => Ton::Alphanumeric,
            Ok(TypeOfNumber::Abbreviated) => Ton::Abbreviated,
            Err(_) => Ton::Other(raw),
        }
    }
}

impl TryFrom<Npi> for NumericPlanIndicator {
    type Error = EngineError;

    fn try_from(npi: Npi) -> Result<Self, Self::Error> {
        match npi {
            Npi::Unknown => Ok(NumericPlanIndicator::Unknown),
            Npi::Isdn => Ok(NumericPlanIndicator::ISDN),
            Npi::Data => Ok(NumericPlanIndicator::Data),
            Npi::Telex => Ok(NumericPlanIndicator::Telex),
            Npi::LandMobile => Ok(NumericPlanIndicator::LandMobile),
            Npi::National => Ok(NumericPlanIndicator::National),
            Npi::Private => Ok(NumericPlanIndicator::Private),
            Npi::Ermes => Ok(NumericPlanIndicator::ERMES),
            Npi::Internet => Ok(NumericPlanIndicator::Internet),
            Npi::WapClientId => Ok(NumericPlanIndicator::WAPClientId),
            Npi::Other(value) => Err(EngineError::UnsupportedAddressType { field: "NPI", value }),
        }
    }
}

impl From<u8> for Npi {
    fn from(raw: u8) -> Self {
        match NumericPlanIndicator::try_from(raw) {
            Ok(NumericPlanIndicator::Unknown) => Npi::Unknown,
            Ok(NumericPlanIndicator::ISDN) => Npi::Isdn,
            Ok(NumericPlanIndicator::Data) => Npi::Data,
            Ok(NumericPlanIndicator::Telex) => Npi::Telex,
            Ok(NumericPlanIndicator::LandMobile) => Npi::LandMobile,
            Ok(NumericPlanIndicator::National) => Npi::National,
            Ok(NumericPlanIndicator::Private) => Npi::Private,
            Ok(NumericPlanIndicator::ERMES) => Npi::Ermes,
            Ok(NumericPlanIndicator::Internet) => Npi::Internet,
            Ok(NumericPlanIndicator::WAPClientId) => Npi::WapClientId,
            Err(_) => Npi::Other(raw),
        }
    }
}

impl RegisteredDelivery {
    pub fn to_wire(self) -> u8 {
        let mut bits = 0;
        if self.contains(RegisteredDelivery::REQUESTED) {
            bits |= SMSC_RECEIPT_REQUESTED;
        }
        if self.contains(RegisteredDelivery::ON_FAILURE) {
            bits |= SMSC_RECEIPT_ON_FAILURE;
        }
        if self.contains(RegisteredDelivery::INTERMEDIATE) {
            bits |= INTERMEDIATE_NOTIFICATION;
        }
        bits
    }

    /// Bits other than the three known ones are ignored
    pub fn from_wire(bits: u8) -> Self {
        let mut flags = RegisteredDelivery::NONE;
        if bits & SMSC_RECEIPT_REQUESTED != 0 {
            flags |= RegisteredDelivery::REQUESTED;
        }
        if bits & SMSC_RECEIPT_ON_FAILURE != 0 {
            flags |= RegisteredDelivery::ON_FAILURE;
        }
        if bits & INTERMEDIATE_NOTIFICATION != 0 {
            flags |= RegisteredDelivery::INTERMEDIATE;
        }
        flags
    }
}

/// Coding named by an inbound data_coding tag.
///
/// The SMSC default tag is shared by both GSM variants; it resolves to packed
/// GSM7 only when that is the session default.
pub fn coding_from_wire(data_coding: DataCoding, default_coding: Coding) -> Option<Coding> {
    match data_coding {
        DataCoding::SmscDefault if default_coding == Coding::Gsm7 => Some(Coding::Gsm7),
        DataCoding::SmscDefault => Some(Coding::Gsm8),
        DataCoding::Ascii => Some(Coding::Ascii),
        DataCoding::Octet => Some(Coding::Octet1),
        DataCoding::Latin1 => Some(Coding::Latin1),
        DataCoding::OctetAlt => Some(Coding::Octet2),
        DataCoding::Jis => Some(Coding::Jis),
        DataCoding::Cyrillic => Some(Coding::Cyrillic),
        DataCoding::LatinHebrew => Some(Coding::Hebrew),
        DataCoding::Ucs2 => Some(Coding::Ucs2),
        DataCoding::Pictogram => Some(Coding::Pictogram),
        DataCoding::MusicCodes => Some(Coding::MusicCodes),
        DataCoding::ExtendedJis => Some(Coding::ExtendedJis),
        DataCoding::Ksc5601 => Some(Coding::Ksc5601),
        DataCoding::Custom(_) => None,
    }
}

/// Envelope shared by every segment of `request`: addresses, validity period,
/// registered delivery and caller TLVs. Payload fields are left empty.
pub fn submit_template(request: &Request) -> EngineResult<SubmitSm> {
    let (source_addr_ton, source_addr_npi) = address_to_wire(&request.source)?;
    let (dest_addr_ton, dest_addr_npi) = address_to_wire(&request.destination)?;

    Ok(SubmitSm {
        source_addr_ton,
        source_addr_npi,
        source_addr: request.source.addr.clone(),
        dest_addr_ton,
        dest_addr_npi,
        destination_addr: request.destination.addr.clone(),
        validity_period: request.validity_period.clone(),
        registered_delivery: request.registered_delivery.to_wire(),
        data_coding: request.coding.data_coding(),
        tlvs: request.tlvs.clone(),
        ..Default::default()
    })
}

fn address_to_wire(address: &Address) -> EngineResult<(TypeOfNumber, NumericPlanIndicator)> {
    Ok((address.ton.try_into()?, address.npi.try_into()?))
}

/// Translate one inbound frame into a protocol event.
///
/// Frames whose command_id is not in the vocabulary are dropped.
pub fn inbound(frame: &Frame, default_coding: Coding) -> Option<Pdu> {
    let command = match CommandId::try_from(frame.command_id()) {
        Ok(id) => Command::from(id),
        Err(_) => {
            warn!(
                command_id = %format!("{:#010x}", frame.command_id()),
                sequence = frame.sequence_number(),
                "dropping PDU with unknown command_id"
            );
            return None;
        }
    };

    let header = Header {
        command,
        status: Status::from_wire(frame.command_status()),
        sequence: frame.sequence_number(),
    };

    let pdu = match frame {
        Frame::SubmitSmResp(resp) => Pdu::SubmitAck {
            header,
            message_id: resp.message_id.clone(),
        },
        Frame::DeliverSm(deliver) => Pdu::Delivery(delivery(header, deliver, default_coding)),
        Frame::Other { .. } => Pdu::Generic(header),
    };

    Some(pdu)
}

/// The response an ESME owes for an inbound request: the event header to report
/// and the encoded PDU to send. `None` for commands that need no answer here.
pub fn response_to(request: &Header) -> EngineResult<Option<(Header, Bytes)>> {
    let sequence_number = request.sequence;
    let (command, bytes) = match request.command {
        Command::DeliverSm => {
            let resp = DeliverSmResponse {
                command_status: CommandStatus::Ok as u32,
                sequence_number,
                message_id: String::new(),
            };
            (Command::DeliverSmResp, resp.to_bytes()?)
        }
        Command::EnquireLink => (
            Command::EnquireLinkResp,
            EnquireLinkResponse { sequence_number }.to_bytes()?,
        ),
        Command::Unbind => (
            Command::UnbindResp,
            UnbindResponse { sequence_number }.to_bytes()?,
        ),
        _ => return Ok(None),
    };

    let header = Header {
        command,
        status: Status::Ok,
        sequence: sequence_number,
    };
    Ok(Some((header, bytes)))
}

fn delivery(header: Header, deliver: &DeliverSm, default_coding: Coding) -> Delivery {
    let coding = coding_from_wire(deliver.data_coding, default_coding);
    let message = match deliver.user_data() {
        Some(data) => decode_payload(coding, data),
        None => {
            let payload = deliver.payload();
            debug!(len = payload.len(), "user data header overruns payload, using base64");
            general_purpose::STANDARD.encode(payload)
        }
    };

    Delivery {
        header,
        source: Address::new(
            deliver.source_addr_ton.into(),
            deliver.source_addr_npi.into(),
            deliver.source_addr.clone(),
        ),
        destination: Address::new(
            deliver.dest_addr_ton.into(),
            deliver.dest_addr_npi.into(),
            deliver.destination_addr.clone(),
        ),
        esm_class: deliver.esm_class,
        coding,
        data_coding: deliver.data_coding.to_byte(),
        message,
        message_id: deliver.receipted_message_id(),
    }
}

/// Decode with the coding's strategy, or fall back to a base64 dump of the
/// raw bytes when there is none or decoding fails
pub fn decode_payload(coding: Option<Coding>, payload: &[u8]) -> String {
    let Some(strategy) = coding.and_then(Strategy::for_coding) else {
        debug!(?coding, len = payload.len(), "no decoder for payload, using base64");
        return general_purpose::STANDARD.encode(payload);
    };

    match strategy.decode(payload) {
        Ok(text) => text,
        Err(err) => {
            debug!(?coding, %err, "payload failed to decode, using base64");
            general_purpose::STANDARD.encode(payload)
        }
    }
}
