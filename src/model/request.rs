use crate::datatypes::Tlv;
use crate::macros::builder_setters;
use crate::model::{Address, Coding};
use std::ops::{BitOr, BitOrAssign};

/// Octets of user data per segment when the caller does not choose
pub const DEFAULT_BYTES_PER_SEGMENT: usize = 140;

/// How a message that does not fit one segment is carried
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SplitMode {
    /// Concatenation header inside short_message
    #[default]
    Udh,
    /// sar_* optional parameters
    Sar,
    /// Whole message in one message_payload parameter, never split
    MessagePayload,
    /// Fail instead of splitting
    Disabled,
}

/// Delivery receipt and notification requests, combinable with `|`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegisteredDelivery(u8);

impl RegisteredDelivery {
    pub const NONE: Self = Self(0);
    pub const REQUESTED: Self = Self(1);
    pub const ON_FAILURE: Self = Self(1 << 1);
    pub const INTERMEDIATE: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for RegisteredDelivery {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RegisteredDelivery {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One logical outbound message
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub source: Address,
    pub destination: Address,
    /// SMPP time string, passed through untouched
    pub validity_period: String,
    pub registered_delivery: RegisteredDelivery,
    pub message: String,
    /// Coding used to produce the bytes
    pub coding: Coding,
    /// Coding advertised in data_coding instead of `coding`'s own tag
    pub deceptive_coding: Option<Coding>,
    pub split_mode: SplitMode,
    pub bytes_per_segment: usize,
    /// Copied onto every segment
    pub tlvs: Vec<Tlv>,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    source: Address,
    destination: Address,
    validity_period: String,
    registered_delivery: RegisteredDelivery,
    message: String,
    coding: Coding,
    deceptive_coding: Option<Coding>,
    split_mode: SplitMode,
    bytes_per_segment: usize,
    tlvs: Vec<Tlv>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            source: Address::default(),
            destination: Address::default(),
            validity_period: String::new(),
            registered_delivery: RegisteredDelivery::NONE,
            message: String::new(),
            coding: Coding::Gsm7,
            deceptive_coding: None,
            split_mode: SplitMode::Udh,
            bytes_per_segment: DEFAULT_BYTES_PER_SEGMENT,
            tlvs: Vec::new(),
        }
    }
}

impl RequestBuilder {
    builder_setters! {
        source: Address,
        destination: Address,
        registered_delivery: RegisteredDelivery,
        coding: Coding,
        split_mode: SplitMode,
        bytes_per_segment: usize,
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn validity_period(mut self, validity_period: impl Into<String>) -> Self {
        self.validity_period = validity_period.into();
        self
    }

    /// Advertise `coding` on the wire while encoding with the effective coding
    pub fn deceptive_coding(mut self, coding: Coding) -> Self {
        self.deceptive_coding = Some(coding);
        self
    }

    /// Add an optional parameter carried on every segment
    pub fn tlv(mut self, tlv: Tlv) -> Self {
        self.tlvs.push(tlv);
        self
    }

    pub fn build(self) -> Request {
        Request {
            source: self.source,
            destination: self.destination,
            validity_period: self.validity_period,
            registered_delivery: self.registered_delivery,
            message: self.message,
            coding: self.coding,
            deceptive_coding: self.deceptive_coding,
            split_mode: self.split_mode,
            bytes_per_segment: self.bytes_per_segment,
            tlvs: self.tlvs,
        }
    }
}
