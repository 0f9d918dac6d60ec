mod gsm7;
mod ucs2;

pub use gsm7::{Gsm7Packed, Gsm8};
pub use ucs2::Ucs2;

use crate::datatypes::DataCoding;
use crate::model::Coding;
use thiserror::Error;

/// Budget substituted by the splitters when the caller's is below [`MIN_SPLIT_BUDGET`]
pub const FALLBACK_SPLIT_BUDGET: usize = 134;
pub const MIN_SPLIT_BUDGET: usize = 64;

pub(crate) fn split_budget(octet_limit: usize) -> usize {
    if octet_limit < MIN_SPLIT_BUDGET {
        FALLBACK_SPLIT_BUDGET
    } else {
        octet_limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("character {character:?} cannot be represented in {coding}")]
    UnsupportedCharacter {
        coding: &'static str,
        character: char,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("byte {0:#04x} is not a GSM 7-bit character")]
    InvalidByte(u8),

    #[error("escape sequence 0x1B {0:#04x} is not in the GSM extension table")]
    InvalidEscape(u8),

    #[error("escape byte at end of input")]
    TruncatedEscape,

    #[error("UCS-2 payload has odd length {0}")]
    OddLength(usize),

    #[error("UCS-2 payload is not valid UTF-16")]
    InvalidUtf16,
}

/// Encode, decode and split text in one coding scheme
pub trait TextCoding {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError>;

    fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError>;

    /// Whether `text` needs more than `octet_limit` octets once encoded
    fn should_split(&self, text: &str, octet_limit: usize) -> bool;

    /// Encode `text` as ordered chunks of at most `octet_limit` octets each.
    /// Limits below 64 are replaced by 134.
    fn encode_split(&self, text: &str, octet_limit: usize) -> Result<Vec<Vec<u8>>, EncodingError>;

    /// Tag written to data_coding
    fn data_coding(&self) -> DataCoding;
}

/// Every coding with a registered strategy
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    Gsm7Packed(Gsm7Packed),
    Gsm8(Gsm8),
    Ucs2(Ucs2),
}

impl Strategy {
    pub fn for_coding(coding: Coding) -> Option<Self> {
        match coding {
            Coding::Gsm7 => Some(Strategy::Gsm7Packed(Gsm7Packed)),
            Coding::Gsm8 => Some(Strategy::Gsm8(Gsm8)),
            Coding::Ucs2 => Some(Strategy::Ucs2(Ucs2)),
            _ => None,
        }
    }

    /// Codings that can be encoded and split
    pub fn supported() -> impl Iterator<Item = Coding> {
        Coding::ALL
            .into_iter()
            .filter(|coding| Self::for_coding(*coding).is_some())
    }
}

macro_rules! dispatch {
    ($strategy:expr, $coding:ident => $call:expr) => {
        match $strategy {
            Strategy::Gsm7Packed($coding) => $call,
            Strategy::Gsm8($coding) => $call,
            Strategy::Ucs2($coding) => $call,
        }
    };
}

impl TextCoding for Strategy {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        dispatch!(self, coding => coding.encode(text))
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError> {
        dispatch!(self, coding => coding.decode(bytes))
    }

    fn should_split(&self, text: &str, octet_limit: usize) -> bool {
        dispatch!(self, coding => coding.should_split(text, octet_limit))
    }

    fn encode_split(&self, text: &str, octet_limit: usize) -> Result<Vec<Vec<u8>>, EncodingError> {
        dispatch!(self, coding => coding.encode_split(text, octet_limit))
    }

    fn data_coding(&self) -> DataCoding {
        dispatch!(self, coding => coding.data_coding())
    }
}

/// Delegates everything to `effective` but advertises another tag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Deceptive<C> {
    effective: C,
    data_coding: DataCoding,
}

impl<C: TextCoding> Deceptive<C> {
    pub fn new(effective: C, data_coding: DataCoding) -> Self {
        Self {
            effective,
            data_coding,
        }
    }

    pub fn effective(&self) -> &C {
        &self.effective
    }
}

impl<C: TextCoding> TextCoding for Deceptive<C> {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        self.effective.encode(text)
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError> {
        self.effective.decode(bytes)
    }

    fn should_split(&self, text: &str, octet_limit: usize) -> bool {
        self.effective.should_split(text, octet_limit)
    }

    fn encode_split(&self, text: &str, octet_limit: usize) -> Result<Vec<Vec<u8>>, EncodingError> {
        self.effective.encode_split(text, octet_limit)
    }

    fn data_coding(&self) -> DataCoding {
        self.data_coding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_three_codings() {
        let supported: Vec<_> = Strategy::supported().collect();
        assert_eq!(supported, vec![Coding::Gsm7, Coding::Gsm8, Coding::Ucs2]);
        assert!(Strategy::for_coding(Coding::Latin1).is_none());
    }

    #[test]
    fn strategy_tags_match_coding_tags() {
        for coding in Strategy::supported() {
            let strategy = Strategy::for_coding(coding).unwrap();
            assert_eq!(strategy.data_coding(), coding.data_coding());
        }
    }

    #[test]
    fn deceptive_only_changes_tag() {
        let effective = Strategy::for_coding(Coding::Ucs2).unwrap();
        let deceptive = Deceptive::new(effective, Coding::Gsm7.data_coding());
        let text = "Привет, мир";

        assert_eq!(deceptive.data_coding(), DataCoding::SmscDefault);
        assert_eq!(deceptive.encode(text), effective.encode(text));
        let bytes = deceptive.encode(text).unwrap();
        assert_eq!(deceptive.decode(&bytes).unwrap(), text);
        assert_eq!(deceptive.should_split(text, 10), effective.should_split(text, 10));
        assert_eq!(deceptive.encode_split(text, 64), effective.encode_split(text, 64));
    }

    #[test]
    fn sub_minimum_budget_falls_back() {
        assert_eq!(split_budget(0), 134);
        assert_eq!(split_budget(63), 134);
        assert_eq!(split_budget(64), 64);
        assert_eq!(split_budget(200), 200);
    }
}
