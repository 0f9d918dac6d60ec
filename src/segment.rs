// Segmentation - one outbound request becomes the ordered submit_sm PDUs that carry it
//
// Concatenation uses either a user data header in short_message or the SAR
// optional parameters. The advertised data_coding may differ from the coding
// actually used to encode the text.

use crate::coding::{Deceptive, Strategy, TextCoding};
use crate::datatypes::{ESM_CLASS_UDHI, SubmitSm, Tlv, tlv};
use crate::error::{EngineError, EngineResult};
use crate::model::{Concat, Request, SplitMode};
use crate::reference::ReferenceCounter;
use crate::translate;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Octets taken by the 8-bit reference concatenation header
pub const UDH_SIZE: usize = 6;

/// Largest segment count the total fields can express
pub const MAX_SEGMENTS: usize = 255;

/// Largest message_payload value a TLV length can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// One submit_sm ready to send, plus the concatenation data written into it
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub pdu: SubmitSm,
    pub concat: Option<Concat>,
}

/// Splits requests, drawing concatenation references from a shared counter
#[derive(Clone, Debug, Default)]
pub struct Segmenter {
    counter: Arc<ReferenceCounter>,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter(counter: Arc<ReferenceCounter>) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &Arc<ReferenceCounter> {
        &self.counter
    }

    /// Build the submit_sm PDUs for `request`.
    ///
    /// Fails before any reference is drawn when the coding has no strategy or
    /// an address cannot be expressed on the wire.
    pub fn split(&self, request: &Request) -> EngineResult<Vec<Segment>> {
        let strategy = Strategy::for_coding(request.coding)
            .ok_or(EngineError::UnsupportedCoding(request.coding))?;
        let template = translate::submit_template(request)?;

        match request.deceptive_coding {
            Some(advertised) => {
                let coding = Deceptive::new(strategy, advertised.data_coding());
                self.split_with(&coding, request, template)
            }
            None => self.split_with(&strategy, request, template),
        }
    }

    fn split_with<C: TextCoding>(
        &self,
        coding: &C,
        request: &Request,
        mut template: SubmitSm,
    ) -> EngineResult<Vec<Segment>> {
        template.data_coding = coding.data_coding();
        let budget = request.bytes_per_segment;
        let text = request.message.as_str();

        if request.split_mode == SplitMode::MessagePayload {
            let payload = coding.encode(text)?;
            if payload.len() > MAX_PAYLOAD_SIZE {
                return Err(EngineError::MessageTooLong);
            }
            template.tlvs.push(Tlv::new(tlv::MESSAGE_PAYLOAD, payload));
            return Ok(vec![Segment {
                pdu: template,
                concat: None,
            }]);
        }

        if !coding.should_split(text, budget) {
            return Ok(vec![inline(template, coding.encode(text)?)]);
        }

        let chunks = match request.split_mode {
            SplitMode::Udh => coding.encode_split(text, budget.saturating_sub(UDH_SIZE).max(1))?,
            SplitMode::Sar => coding.encode_split(text, budget)?,
            SplitMode::Disabled | SplitMode::MessagePayload => {
                return Err(EngineError::MessageTooLong);
            }
        };

        if chunks.len() > MAX_SEGMENTS {
            return Err(EngineError::MessageTooLong);
        }

        // The splitter's budget can be larger than the caller's
        if chunks.len() == 1 {
            return Ok(chunks
                .into_iter()
                .map(|chunk| inline(template.clone(), chunk))
                .collect());
        }

        let reference = self.counter.next();
        let total = chunks.len() as u8;
        debug!(
            reference,
            total,
            mode = ?request.split_mode,
            coding = %request.coding,
            "splitting message"
        );

        let segments = chunks
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                let seq = index as u8 + 1;
                match request.split_mode {
                    SplitMode::Sar => sar_segment(&template, chunk, reference as u16, total, seq),
                    _ => udh_segment(&template, chunk, reference as u8, total, seq),
                }
            })
            .collect();

        Ok(segments)
    }
}

fn inline(mut pdu: SubmitSm, message: Vec<u8>) -> Segment {
    pdu.short_message = Bytes::from(message);
    Segment { pdu, concat: None }
}

fn udh_segment(template: &SubmitSm, chunk: Vec<u8>, reference: u8, total: u8, seq: u8) -> Segment {
    let mut pdu = template.clone();
    pdu.esm_class |= ESM_CLASS_UDHI;

    let mut message = Vec::with_capacity(UDH_SIZE + chunk.len());
    message.extend_from_slice(&[0x05, 0x00, 0x03, reference, total, seq]);
    message.extend_from_slice(&chunk);
    pdu.short_message = Bytes::from(message);

    Segment {
        pdu,
        concat: Some(Concat {
            reference: u16::from(reference),
            total,
            seq,
        }),
    }
}

fn sar_segment(template: &SubmitSm, chunk: Vec<u8>, reference: u16, total: u8, seq: u8) -> Segment {
    let mut pdu = template.clone();
    pdu.short_message = Bytes::from(chunk);
    pdu.tlvs.retain(|param| {
        !matches!(
            param.tag,
            tlv::SAR_MSG_REF_NUM | tlv::SAR_TOTAL_SEGMENTS | tlv::SAR_SEGMENT_SEQNUM
        )
    });
    pdu.tlvs.extend([
        Tlv::from_u16(tlv::SAR_MSG_REF_NUM, reference),
        Tlv::from_u8(tlv::SAR_TOTAL_SEGMENTS, total),
        Tlv::from_u8(tlv::SAR_SEGMENT_SEQNUM, seq),
    ]);

    Segment {
        pdu,
        concat: Some(Concat {
            reference,
            total,
            seq,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::DataCoding;
    use crate::model::{Address, Coding, Ton};

    fn request(message: &str) -> crate::model::RequestBuilder {
        Request::builder()
            .source(Address::alphanumeric("ACME"))
            .destination(Address::international("447700900123"))
            .message(message)
    }

    #[test]
    fn short_message_is_inline() {
        let segments = Segmenter::new().split(&request("Hello").build()).unwrap();

        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        assert_eq!(segment.concat, None);
        assert_eq!(segment.pdu.short_message.as_ref(), &[0xC8, 0x32, 0x9B, 0xFD, 0x06]);
        assert_eq!(segment.pdu.data_coding, DataCoding::SmscDefault);
        assert_eq!(segment.pdu.esm_class & ESM_CLASS_UDHI, 0);
    }

    #[test]
    fn udh_segments_carry_header() {
        let segmenter = Segmenter::new();
        let text = "x".repeat(300);
        let segments = segmenter
            .split(&request(&text).coding(Coding::Gsm8).build())
            .unwrap();

        // 140 - 6 leaves 134 octets of text per segment
        assert_eq!(segments.len(), 3);
        for (index, segment) in segments.iter().enumerate() {
            let seq = index as u8 + 1;
            let message = &segment.pdu.short_message;
            assert_eq!(&message[..6], &[0x05, 0x00, 0x03, 1, 3, seq]);
            assert_eq!(segment.pdu.esm_class & ESM_CLASS_UDHI, ESM_CLASS_UDHI);
            assert_eq!(
                segment.concat,
                Some(Concat {
                    reference: 1,
                    total: 3,
                    seq
                })
            );
            assert!(message.len() <= 140);
        }
        assert_eq!(segments[2].pdu.short_message.len(), 6 + 300 - 2 * 134);
        assert_eq!(segmenter.counter().current(), 1);
    }

    #[test]
    fn sar_segments_carry_tlvs() {
        let text = "y".repeat(200);
        let segments = Segmenter::new()
            .split(
                &request(&text)
                    .coding(Coding::Gsm8)
                    .split_mode(SplitMode::Sar)
                    .tlv(Tlv::from_u8(tlv::SAR_TOTAL_SEGMENTS, 9))
                    .tlv(Tlv::from_u16(0x0204, 7))
                    .build(),
            )
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].pdu.short_message.len(), 140);
        assert_eq!(segments[1].pdu.short_message.len(), 60);
        for (index, segment) in segments.iter().enumerate() {
            let pdu = &segment.pdu;
            assert_eq!(pdu.esm_class & ESM_CLASS_UDHI, 0);
            assert_eq!(pdu.tlv(tlv::SAR_MSG_REF_NUM), Some(&Tlv::from_u16(tlv::SAR_MSG_REF_NUM, 1)));
            assert_eq!(
                pdu.tlv(tlv::SAR_TOTAL_SEGMENTS),
                Some(&Tlv::from_u8(tlv::SAR_TOTAL_SEGMENTS, 2))
            );
            assert_eq!(
                pdu.tlv(tlv::SAR_SEGMENT_SEQNUM),
                Some(&Tlv::from_u8(tlv::SAR_SEGMENT_SEQNUM, index as u8 + 1))
            );
            assert_eq!(pdu.tlv(0x0204), Some(&Tlv::from_u16(0x0204, 7)));
            assert_eq!(pdu.tlvs.len(), 4);
        }
    }

    #[test]
    fn udh_reference_truncates_to_eight_bits() {
        let segmenter = Segmenter::with_counter(Arc::new(ReferenceCounter::starting_after(255)));
        let segments = segmenter
            .split(&request(&"z".repeat(200)).coding(Coding::Gsm8).build())
            .unwrap();

        assert_eq!(segmenter.counter().current(), 256);
        assert_eq!(segments[0].pdu.short_message[3], 0);
        assert_eq!(segments[0].concat.map(|concat| concat.reference), Some(0));
    }

    #[test]
    fn sar_reference_truncates_to_sixteen_bits() {
        let segmenter =
            Segmenter::with_counter(Arc::new(ReferenceCounter::starting_after(0x1_0004)));
        let segments = segmenter
            .split(
                &request(&"z".repeat(200))
                    .coding(Coding::Gsm8)
                    .split_mode(SplitMode::Sar)
                    .build(),
            )
            .unwrap();

        assert_eq!(segments[1].concat.map(|concat| concat.reference), Some(5));
    }

    #[test]
    fn payload_mode_sends_one_pdu() {
        let text = "p".repeat(1000);
        let segments = Segmenter::new()
            .split(
                &request(&text)
                    .coding(Coding::Gsm8)
                    .split_mode(SplitMode::MessagePayload)
                    .build(),
            )
            .unwrap();

        assert_eq!(segments.len(), 1);
        let pdu = &segments[0].pdu;
        assert!(pdu.short_message.is_empty());
        assert_eq!(pdu.tlv(tlv::MESSAGE_PAYLOAD).map(|tlv| tlv.value.len()), Some(1000));
    }

    #[test]
    fn payload_mode_rejects_oversized_message() {
        let text = "p".repeat(MAX_PAYLOAD_SIZE + 1);
        let result = Segmenter::new().split(
            &request(&text)
                .coding(Coding::Gsm8)
                .split_mode(SplitMode::MessagePayload)
                .build(),
        );
        assert!(matches!(result, Err(EngineError::MessageTooLong)));
    }

    #[test]
    fn disabled_mode_rejects_long_message() {
        let segmenter = Segmenter::new();
        let result = segmenter.split(
            &request(&"d".repeat(200))
                .coding(Coding::Gsm8)
                .split_mode(SplitMode::Disabled)
                .build(),
        );
        assert!(matches!(result, Err(EngineError::MessageTooLong)));
        assert_eq!(segmenter.counter().current(), 0);

        let fits = segmenter
            .split(&request("short").split_mode(SplitMode::Disabled).build())
            .unwrap();
        assert_eq!(fits.len(), 1);
    }

    #[test]
    fn too_many_segments_is_rejected() {
        let text = "m".repeat(134 * 256);
        let result = Segmenter::new().split(&request(&text).coding(Coding::Gsm8).build());
        assert!(matches!(result, Err(EngineError::MessageTooLong)));
    }

    #[test]
    fn unsupported_coding_is_rejected() {
        let result = Segmenter::new().split(&request("hi").coding(Coding::Latin1).build());
        assert!(matches!(
            result,
            Err(EngineError::UnsupportedCoding(Coding::Latin1))
        ));
    }

    #[test]
    fn unknown_address_type_draws_no_reference() {
        let segmenter = Segmenter::new();
        let result = segmenter.split(
            &request(&"u".repeat(400))
                .source(Address::new(Ton::Other(9), Default::default(), "123"))
                .build(),
        );
        assert!(matches!(
            result,
            Err(EngineError::UnsupportedAddressType { field: "TON", value: 9 })
        ));
        assert_eq!(segmenter.counter().current(), 0);
    }

    #[test]
    fn deceptive_coding_changes_only_the_tag() {
        let text = "Привет";
        let segments = Segmenter::new()
            .split(
                &request(text)
                    .coding(Coding::Ucs2)
                    .deceptive_coding(Coding::Latin1)
                    .build(),
            )
            .unwrap();

        let pdu = &segments[0].pdu;
        assert_eq!(pdu.data_coding, DataCoding::Latin1);
        assert_eq!(pdu.short_message.len(), 12);
        assert_eq!(&pdu.short_message[..2], &[0x04, 0x1F]);
    }

    #[test]
    fn small_budget_that_fits_after_fallback_is_one_segment() {
        // 50 octets exceeds the budget of 40, but the splitter widens it to 134
        let segmenter = Segmenter::new();
        let segments = segmenter
            .split(
                &request(&"s".repeat(50))
                    .coding(Coding::Gsm8)
                    .bytes_per_segment(40)
                    .build(),
            )
            .unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].concat, None);
        assert_eq!(segments[0].pdu.short_message.len(), 50);
        assert_eq!(segments[0].pdu.esm_class & ESM_CLASS_UDHI, 0);
        assert_eq!(segmenter.counter().current(), 0);
    }
}
