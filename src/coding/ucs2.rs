use super::{DecodingError, EncodingError, TextCoding, split_budget};
use crate::datatypes::DataCoding;

/// UCS-2 as sent by real SMSCs: UTF-16BE, surrogate pairs for scalars
/// outside the BMP
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ucs2;

impl TextCoding for Ucs2 {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError> {
        if bytes.len() % 2 != 0 {
            return Err(DecodingError::OddLength(bytes.len()));
        }

        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).map_err(|_| DecodingError::InvalidUtf16)
    }

    fn should_split(&self, text: &str, octet_limit: usize) -> bool {
        text.encode_utf16().count() * 2 > octet_limit
    }

    /// Boundaries only ever fall between scalars
    fn encode_split(&self, text: &str, octet_limit: usize) -> Result<Vec<Vec<u8>>, EncodingError> {
        let limit = split_budget(octet_limit);
        let encoded = self.encode(text)?;

        let mut chunks = Vec::new();
        let mut from = 0;
        let mut len = 0;
        for ch in text.chars() {
            let size = ch.len_utf16() * 2;
            if len + size > limit {
                chunks.push(encoded[from..from + len].to_vec());
                from += len;
                len = 0;
            }
            len += size;
        }
        if len > 0 {
            chunks.push(encoded[from..from + len].to_vec());
        }

        Ok(chunks)
    }

    fn data_coding(&self) -> DataCoding {
        DataCoding::Ucs2
    }
}
