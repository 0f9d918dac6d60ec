use std::fmt;

/// Type of number.
///
/// `Other` only ever comes from an inbound PDU carrying a value outside the
/// SMPP v3.4 table; submitting it is an error.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ton {
    #[default]
    Unknown,
    International,
    National,
    NetworkSpecific,
    SubscriberNumber,
    Alphanumeric,
    Abbreviated,
    Other(u8),
}

/// Numbering plan indicator. `Other` follows the same rule as [`Ton::Other`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Npi {
    #[default]
    Unknown,
    Isdn,
    Data,
    Telex,
    LandMobile,
    National,
    Private,
    Ermes,
    Internet,
    WapClientId,
    Other(u8),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address {
    pub ton: Ton,
    pub npi: Npi,
    pub addr: String,
}

impl Address {
    pub fn new(ton: Ton, npi: Npi, addr: impl Into<String>) -> Self {
        Self {
            ton,
            npi,
            addr: addr.into(),
        }
    }

    /// International ISDN number, the usual shape of an MSISDN
    pub fn international(addr: impl Into<String>) -> Self {
        Self::new(Ton::International, Npi::Isdn, addr)
    }

    /// Alphanumeric sender id
    pub fn alphanumeric(addr: impl Into<String>) -> Self {
        Self::new(Ton::Alphanumeric, Npi::Unknown, addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}/{:?})", self.addr, self.ton, self.npi)
    }
}
