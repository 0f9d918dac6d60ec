// ABOUTME: Wire-level SMPP data_coding byte as a strongly-typed scheme with a Custom escape hatch
// ABOUTME: Covers every standard-assigned tag from SMPP v3.4 section 5.2.19

use std::fmt;

/// Wire data_coding scheme.
///
/// Two distinct tags exist for unspecified 8-bit octets (0x02 and 0x04); both are
/// kept apart so the byte survives a round trip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum DataCoding {
    /// SMSC Default Alphabet (GSM 7-bit)
    #[default]
    SmscDefault,
    /// IA5 (CCITT T.50)/ASCII
    Ascii,
    /// Octet unspecified (8-bit binary), tag 0x02
    Octet,
    /// Latin-1 (ISO-8859-1)
    Latin1,
    /// Octet unspecified (8-bit binary), tag 0x04
    OctetAlt,
    /// JIS (X 0208-1990)
    Jis,
    /// Cyrillic (ISO-8859-5)
    Cyrillic,
    /// Latin/Hebrew (ISO-8859-8)
    LatinHebrew,
    /// UCS-2 (ISO/IEC-10646)
    Ucs2,
    /// Pictogram encoding
    Pictogram,
    /// ISO-2022-JP (music codes)
    MusicCodes,
    /// Extended Kanji JIS (X 0212-1990)
    ExtendedJis,
    /// KS C 5601
    Ksc5601,
    /// Reserved or vendor specific value
    Custom(u8),
}

impl DataCoding {
    /// Creates a DataCoding from a raw wire byte
    pub fn from_byte(value: u8) -> Self {
        match value {
            0x00 => DataCoding::SmscDefault,
            0x01 => DataCoding::Ascii,
            0x02 => DataCoding::Octet,
            0x03 => DataCoding::Latin1,
            0x04 => DataCoding::OctetAlt,
            0x05 => DataCoding::Jis,
            0x06 => DataCoding::Cyrillic,
            0x07 => DataCoding::LatinHebrew,
            0x08 => DataCoding::Ucs2,
            0x09 => DataCoding::Pictogram,
            0x0A => DataCoding::MusicCodes,
            0x0D => DataCoding::ExtendedJis,
            0x0E => DataCoding::Ksc5601,
            _ => DataCoding::Custom(value),
        }
    }

    /// Returns the raw u8 value for wire protocol
    pub fn to_byte(&self) -> u8 {
        match self {
            DataCoding::SmscDefault => 0x00,
            DataCoding::Ascii => 0x01,
            DataCoding::Octet => 0x02,
            DataCoding::Latin1 => 0x03,
            DataCoding::OctetAlt => 0x04,
            DataCoding::Jis => 0x05,
            DataCoding::Cyrillic => 0x06,
            DataCoding::LatinHebrew => 0x07,
            DataCoding::Ucs2 => 0x08,
            DataCoding::Pictogram => 0x09,
            DataCoding::MusicCodes => 0x0A,
            DataCoding::ExtendedJis => 0x0D,
            DataCoding::Ksc5601 => 0x0E,
            DataCoding::Custom(value) => *value,
        }
    }

    /// Returns the character set name for this encoding
    pub fn charset_name(&self) -> &'static str {
        match self {
            DataCoding::SmscDefault => "GSM 7-bit Default",
            DataCoding::Ascii => "ASCII/IA5",
            DataCoding::Octet | DataCoding::OctetAlt => "Binary",
            DataCoding::Latin1 => "ISO-8859-1",
            DataCoding::Jis => "JIS X 0208-1990",
            DataCoding::Cyrillic => "ISO-8859-5",
            DataCoding::LatinHebrew => "ISO-8859-8",
            DataCoding::Ucs2 => "UCS-2",
            DataCoding::Pictogram => "Pictogram",
            DataCoding::MusicCodes => "ISO-2022-JP",
            DataCoding::ExtendedJis => "JIS X 0212-1990",
            DataCoding::Ksc5601 => "KS C 5601",
            DataCoding::Custom(_) => "Custom/Reserved",
        }
    }
}

impl fmt::Display for DataCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.charset_name(), self.to_byte())
    }
}

impl From<u8> for DataCoding {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl From<DataCoding> for u8 {
    fn from(data_coding: DataCoding) -> Self {
        data_coding.to_byte()
    }
}
