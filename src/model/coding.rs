use crate::datatypes::DataCoding;
use std::fmt;
use std::str::FromStr;

/// Coding scheme of a message body.
///
/// Gsm7 and Gsm8 share the SMSC default tag; they differ only in whether
/// septets are packed on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Coding {
    #[default]
    Gsm7,
    Gsm8,
    Ascii,
    Octet1,
    Latin1,
    Octet2,
    Jis,
    Cyrillic,
    Hebrew,
    Ucs2,
    Pictogram,
    MusicCodes,
    ExtendedJis,
    Ksc5601,
}

impl Coding {
    pub const ALL: [Coding; 14] = [
        Coding::Gsm7,
        Coding::Gsm8,
        Coding::Ascii,
        Coding::Octet1,
        Coding::Latin1,
        Coding::Octet2,
        Coding::Jis,
        Coding::Cyrillic,
        Coding::Hebrew,
        Coding::Ucs2,
        Coding::Pictogram,
        Coding::MusicCodes,
        Coding::ExtendedJis,
        Coding::Ksc5601,
    ];

    /// Wire tag advertised for this scheme
    pub fn data_coding(self) -> DataCoding {
        match self {
            Coding::Gsm7 | Coding::Gsm8 => DataCoding::SmscDefault,
            Coding::Ascii => DataCoding::Ascii,
            Coding::Octet1 => DataCoding::Octet,
            Coding::Latin1 => DataCoding::Latin1,
            Coding::Octet2 => DataCoding::OctetAlt,
            Coding::Jis => DataCoding::Jis,
            Coding::Cyrillic => DataCoding::Cyrillic,
            Coding::Hebrew => DataCoding::LatinHebrew,
            Coding::Ucs2 => DataCoding::Ucs2,
            Coding::Pictogram => DataCoding::Pictogram,
            Coding::MusicCodes => DataCoding::MusicCodes,
            Coding::ExtendedJis => DataCoding::ExtendedJis,
            Coding::Ksc5601 => DataCoding::Ksc5601,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Coding::Gsm7 => "GSM7",
            Coding::Gsm8 => "GSM8",
            Coding::Ascii => "ASCII",
            Coding::Octet1 => "OCTET1",
            Coding::Latin1 => "LATIN1",
            Coding::Octet2 => "OCTET2",
            Coding::Jis => "JIS",
            Coding::Cyrillic => "CYRILLIC",
            Coding::Hebrew => "HEBREW",
            Coding::Ucs2 => "UCS2",
            Coding::Pictogram => "PICTOGRAM",
            Coding::MusicCodes => "MUSIC_CODES",
            Coding::ExtendedJis => "EXTENDED_JIS",
            Coding::Ksc5601 => "KSC5601",
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown coding '{0}'")]
pub struct UnknownCoding(pub String);

impl FromStr for Coding {
    type Err = UnknownCoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coding::ALL
            .into_iter()
            .find(|coding| coding.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCoding(s.to_string()))
    }
}
