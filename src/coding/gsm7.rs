// GSM 03.38 default alphabet, packed (GSM7) and one septet per octet (GSM8).
// Extension table characters cost two septets and are never split from their escape.

use super::{DecodingError, EncodingError, TextCoding, split_budget};
use crate::datatypes::DataCoding;

const ESC: u8 = 0x1B;
const CR: u8 = 0x0D;

/// Basic character set. Index 0x1B is the escape to the extension table and
/// never produced by encoding.
const BASIC: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', //
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1B}', 'Æ', 'æ', 'ß', 'É', //
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?', //
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', //
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§', //
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', //
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à', //
];

const EXTENSION: [(u8, char); 10] = [
    (0x0A, '\u{0C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Septet {
    Basic(u8),
    Escaped(u8),
}

impl Septet {
    fn lookup(ch: char) -> Option<Self> {
        if let Some(code) = BASIC.iter().position(|&c| c == ch) {
            if code as u8 != ESC {
                return Some(Septet::Basic(code as u8));
            }
        }
        EXTENSION
            .iter()
            .find(|(_, c)| *c == ch)
            .map(|(code, _)| Septet::Escaped(*code))
    }

    fn of(ch: char, coding: &'static str) -> Result<Self, EncodingError> {
        Self::lookup(ch).ok_or(EncodingError::UnsupportedCharacter {
            coding,
            character: ch,
        })
    }

    fn len(self) -> usize {
        match self {
            Septet::Basic(_) => 1,
            Septet::Escaped(_) => 2,
        }
    }

    fn push_to(self, out: &mut Vec<u8>) {
        match self {
            Septet::Basic(code) => out.push(code),
            Septet::Escaped(code) => out.extend_from_slice(&[ESC, code]),
        }
    }
}

/// Septets a character occupies; unrepresentable characters count as one so
/// sizing never fails and encoding reports the error
fn septet_cost(ch: char) -> usize {
    Septet::lookup(ch).map_or(1, Septet::len)
}

fn to_septets(text: &str, coding: &'static str) -> Result<Vec<u8>, EncodingError> {
    let mut septets = Vec::with_capacity(text.len());
    for ch in text.chars() {
        Septet::of(ch, coding)?.push_to(&mut septets);
    }
    Ok(septets)
}

fn from_septets(septets: &[u8]) -> Result<String, DecodingError> {
    let mut text = String::with_capacity(septets.len());
    let mut iter = septets.iter().copied();

    while let Some(code) = iter.next() {
        if code == ESC {
            let next = iter.next().ok_or(DecodingError::TruncatedEscape)?;
            let ch = EXTENSION
                .iter()
                .find(|(c, _)| *c == next)
                .map(|(_, ch)| *ch)
                .ok_or(DecodingError::InvalidEscape(next))?;
            text.push(ch);
        } else {
            let ch = BASIC
                .get(code as usize)
                .ok_or(DecodingError::InvalidByte(code))?;
            text.push(*ch);
        }
    }

    Ok(text)
}

/// Trailing octet bit marking a doubled closing CR
const DOUBLED_CR: u8 = 0x80;

/// Pack septets LSB first.
///
/// A final octet with 7 spare bits gets a CR in them so it cannot be read as a
/// trailing '@'. Text that already fills whole octets and ends in CR would then
/// look padded, so its CR is doubled and the one spare bit left in the last
/// octet is set. Receivers that ignore the spare bit see `<CR><CR>`, which
/// GSM 03.38 defines as equivalent to a single `<CR>`.
fn pack(septets: &[u8]) -> Vec<u8> {
    let doubled = septets.len() % 8 == 0 && septets.last() == Some(&CR);
    let pad = (septets.len() % 8 == 7 || doubled).then_some(&CR);
    let mut packed = Vec::with_capacity((septets.len() * 7).div_ceil(8) + 1);
    let mut acc: u16 = 0;
    let mut bits = 0;

    for &septet in septets.iter().chain(pad) {
        acc |= u16::from(septet & 0x7F) << bits;
        bits += 7;
        while bits >= 8 {
            packed.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        packed.push(acc as u8);
    }

    if doubled {
        if let Some(last) = packed.last_mut() {
            *last |= DOUBLED_CR;
        }
    }

    packed
}

/// Inverse of [`pack`]. A closing CR is dropped when it fills the last octet
/// exactly or when the spare bits after it are set.
fn unpack(packed: &[u8]) -> Vec<u8> {
    let mut septets = Vec::with_capacity(packed.len() * 8 / 7);
    let mut acc: u16 = 0;
    let mut bits = 0;

    for &octet in packed {
        acc |= u16::from(octet) << bits;
        bits += 8;
        while bits >= 7 {
            septets.push((acc & 0x7F) as u8);
            acc >>= 7;
            bits -= 7;
        }
    }

    let marked = acc != 0;
    if septets.last() == Some(&CR) && (packed.len() % 7 == 0 || marked) {
        septets.pop();
    }

    septets
}

/// Octets `pack` produces for `count` septets
fn packed_len(count: usize, ends_with_cr: bool) -> usize {
    let doubled = count % 8 == 0 && ends_with_cr;
    ((count + usize::from(doubled)) * 7).div_ceil(8)
}

/// GSM 7-bit default alphabet, packed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Gsm7Packed;

impl TextCoding for Gsm7Packed {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        Ok(pack(&to_septets(text, "GSM7")?))
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError> {
        from_septets(&unpack(bytes))
    }

    fn should_split(&self, text: &str, octet_limit: usize) -> bool {
        let septets: usize = text.chars().map(septet_cost).sum();
        packed_len(septets, text.ends_with('\r')) > octet_limit
    }

    /// Chunks hold at most `octet_limit` septets each and are packed independently
    fn encode_split(&self, text: &str, octet_limit: usize) -> Result<Vec<Vec<u8>>, EncodingError> {
        let limit = split_budget(octet_limit);
        let mut chunks = Vec::new();
        let mut current = Vec::with_capacity(limit);

        for ch in text.chars() {
            let septet = Septet::of(ch, "GSM7")?;
            if current.len() + septet.len() > limit {
                chunks.push(pack(&current));
                current.clear();
            }
            septet.push_to(&mut current);
        }
        if !current.is_empty() {
            chunks.push(pack(&current));
        }

        Ok(chunks)
    }

    fn data_coding(&self) -> DataCoding {
        DataCoding::SmscDefault
    }
}

/// GSM 7-bit default alphabet, one septet per octet
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Gsm8;

impl TextCoding for Gsm8 {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        to_septets(text, "GSM8")
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError> {
        from_septets(bytes)
    }

    fn should_split(&self, text: &str, octet_limit: usize) -> bool {
        let escaped = text
            .chars()
            .filter(|&ch| matches!(Septet::lookup(ch), Some(Septet::Escaped(_))))
            .count();
        let plain = text.chars().count() - escaped;
        plain + escaped * 2 > octet_limit
    }

    fn encode_split(&self, text: &str, octet_limit: usize) -> Result<Vec<Vec<u8>>, EncodingError> {
        let limit = split_budget(octet_limit);
        let bytes = self.encode(text)?;

        let mut chunks = Vec::new();
        let mut from = 0;
        while from < bytes.len() {
            let mut to = from;
            while to < bytes.len() {
                let inc = if bytes[to] == ESC { 2 } else { 1 };
                if to - from + inc > limit {
                    break;
                }
                to += inc;
            }
            chunks.push(bytes[from..to].to_vec());
            from = to;
        }

        Ok(chunks)
    }

    fn data_coding(&self) -> DataCoding {
        DataCoding::SmscDefault
    }
}
