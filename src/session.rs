// Session - hands segments to a transport in order and reports protocol events
//
// The transport owns the socket. It pushes each inbound PDU in through
// Session::on_frame, sends back whatever response that returns, and reports
// closure through Session::on_closed.

use crate::codec::Frame;
use crate::datatypes::SubmitSm;
use crate::error::EngineResult;
use crate::macros::builder_setters;
use crate::model::{Coding, Command, Direction, Header, Pdu, Request, Status};
use crate::reference::ReferenceCounter;
use crate::segment::Segmenter;
use crate::translate;
use bytes::Bytes;
use std::io::{self, Cursor};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures reported by a [`Transport`]
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Transport is closed")]
    Closed,

    #[error("Connection error: {0}")]
    Io(#[from] io::Error),

    #[error("Submission rejected: {0}")]
    Rejected(String),
}

/// Link to the SMSC that owns the socket, bind state and sequence numbers
pub trait Transport {
    /// Queue one submit_sm and return the sequence number it was sent with
    async fn submit(&mut self, pdu: SubmitSm) -> Result<u32, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Called once per outbound or inbound protocol event
pub type EventHandler = Box<dyn Fn(Direction, &Pdu) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Coding assumed for inbound data_coding 0x00
    pub default_coding: Coding,
}

/// What one inbound PDU produced
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    /// The protocol event, `None` when the command id is unknown
    pub pdu: Option<Pdu>,
    /// Encoded response the transport must send back to the SMSC
    pub response: Option<Bytes>,
}

pub struct Session<T> {
    transport: T,
    segmenter: Segmenter,
    options: SessionOptions,
    handler: Option<EventHandler>,
    closing: bool,
    closed: bool,
    close_error: Option<TransportError>,
}

impl<T: Transport> Session<T> {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn new(transport: T) -> Self {
        SessionBuilder::default().build(transport)
    }

    /// Segment `request` and submit every segment in order.
    ///
    /// Returns the sequence numbers the transport assigned. Nothing is
    /// submitted when segmentation or PDU validation fails; a transport error
    /// stops the remaining segments.
    pub async fn send_message(&mut self, request: &Request) -> EngineResult<Vec<u32>> {
        if self.closed || self.closing {
            return Err(TransportError::Closed.into());
        }

        let segments = self.segmenter.split(request)?;
        for segment in &segments {
            segment.pdu.validate()?;
        }

        let multi_segment = segments.len() > 1;
        let mut sequences = Vec::with_capacity(segments.len());
        for segment in segments {
            let sequence = self.transport.submit(segment.pdu).await?;
            sequences.push(sequence);

            self.emit(
                Direction::Outbound,
                &Pdu::Submit {
                    header: Header {
                        command: Command::SubmitSm,
                        status: Status::Ok,
                        sequence,
                    },
                    concat: segment.concat,
                    multi_segment,
                },
            );
        }

        debug!(
            destination = %request.destination,
            segments = sequences.len(),
            "message submitted"
        );
        Ok(sequences)
    }

    /// Handle one inbound wire PDU.
    ///
    /// `data` must start with a complete PDU; anything past its command_length
    /// is ignored. Transports find PDU boundaries in their read buffer with
    /// [`Frame::check`].
    ///
    /// deliver_sm, enquire_link and unbind are answered: the response is
    /// reported as an outbound event and returned for the transport to send.
    /// unbind and unbind_resp mark the session as closing.
    pub fn on_frame(&mut self, data: &[u8]) -> EngineResult<Inbound> {
        let len = Frame::check(&mut Cursor::new(data))?;
        let frame = Frame::parse(&data[..len])?;

        let Some(pdu) = translate::inbound(&frame, self.options.default_coding) else {
            return Ok(Inbound {
                pdu: None,
                response: None,
            });
        };
        self.emit(Direction::Inbound, &pdu);

        let request = *pdu.header();
        if matches!(request.command, Command::Unbind | Command::UnbindResp) {
            info!(sequence = request.sequence, command = %request.command, "session closing");
            self.closing = true;
        }

        let response = match translate::response_to(&request)? {
            Some((header, bytes)) => {
                debug!(sequence = header.sequence, command = %header.command, "responding");
                self.emit(Direction::Outbound, &Pdu::Generic(header));
                Some(bytes)
            }
            None => None,
        };

        Ok(Inbound {
            pdu: Some(pdu),
            response,
        })
    }

    /// Record that the transport went away, with the error that ended it if any
    pub fn on_closed(&mut self, error: Option<TransportError>) {
        match &error {
            Some(err) => warn!(%err, "transport closed with error"),
            None => info!("transport closed"),
        }
        self.closed = true;
        self.close_error = error;
    }

    pub async fn close(&mut self) -> EngineResult<()> {
        if self.closed {
            return Ok(());
        }
        self.transport.close().await?;
        self.on_closed(None);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// An unbind was exchanged; no further messages are submitted
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn close_error(&self) -> Option<&TransportError> {
        self.close_error.as_ref()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn emit(&self, direction: Direction, pdu: &Pdu) {
        if let Some(handler) = &self.handler {
            handler(direction, pdu);
        }
    }
}

/// Builder for [`Session`]; sessions created without a counter get their own
#[derive(Default)]
pub struct SessionBuilder {
    default_coding: Coding,
    counter: Option<Arc<ReferenceCounter>>,
    handler: Option<EventHandler>,
}

impl SessionBuilder {
    builder_setters! {
        default_coding: Coding,
    }

    /// Share concatenation references with other sessions on the same link
    pub fn counter(mut self, counter: Arc<ReferenceCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Direction, &Pdu) + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn build<T: Transport>(self, transport: T) -> Session<T> {
        let segmenter = match self.counter {
            Some(counter) => Segmenter::with_counter(counter),
            None => Segmenter::new(),
        };

        Session {
            transport,
            segmenter,
            options: SessionOptions {
                default_coding: self.default_coding,
            },
            handler: self.handler,
            closing: false,
            closed: false,
            close_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, Encodable};
    use crate::datatypes::{DataCoding, DeliverSm, SubmitSmResponse};
    use crate::error::EngineError;
    use crate::model::{Address, Concat, SplitMode};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTransport {
        submitted: Vec<SubmitSm>,
        fail_after: Option<usize>,
        closed: bool,
    }

    impl Transport for MockTransport {
        async fn submit(&mut self, mut pdu: SubmitSm) -> Result<u32, TransportError> {
            if self.fail_after == Some(self.submitted.len()) {
                return Err(TransportError::Rejected("queue full".to_string()));
            }
            pdu.sequence_number = self.submitted.len() as u32 + 1;
            let sequence = pdu.sequence_number;
            self.submitted.push(pdu);
            Ok(sequence)
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            self.closed = true;
            Ok(())
        }
    }

    type Events = Arc<Mutex<Vec<(Direction, Pdu)>>>;

    fn recording_session(transport: MockTransport) -> (Session<MockTransport>, Events) {
        let events: Events = Arc::default();
        let sink = Arc::clone(&events);
        let session = Session::<MockTransport>::builder()
            .handler(move |direction, pdu| sink.lock().unwrap().push((direction, pdu.clone())))
            .build(transport);
        (session, events)
    }

    fn request(message: &str) -> crate::model::RequestBuilder {
        Request::builder()
            .source(Address::alphanumeric("ACME"))
            .destination(Address::international("447700900123"))
            .message(message)
    }

    #[tokio::test]
    async fn segments_are_submitted_in_order() {
        let (mut session, events) = recording_session(MockTransport::default());

        let sequences = session
            .send_message(&request(&"a".repeat(300)).coding(Coding::Gsm8).build())
            .await
            .unwrap();
        assert_eq!(sequences, vec![1, 2, 3]);

        let submitted = &session.transport().submitted;
        for (index, pdu) in submitted.iter().enumerate() {
            assert_eq!(pdu.short_message[5], index as u8 + 1);
        }

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        for (index, (direction, pdu)) in events.iter().enumerate() {
            assert_eq!(*direction, Direction::Outbound);
            let Pdu::Submit {
                header,
                concat,
                multi_segment,
            } = pdu
            else {
                panic!("Expected Submit");
            };
            assert_eq!(header.command, Command::SubmitSm);
            assert_eq!(header.sequence, index as u32 + 1);
            assert!(*multi_segment);
            assert_eq!(
                *concat,
                Some(Concat {
                    reference: 1,
                    total: 3,
                    seq: index as u8 + 1
                })
            );
        }
    }

    #[tokio::test]
    async fn invalid_request_submits_nothing() {
        let (mut session, events) = recording_session(MockTransport::default());

        let err = session
            .send_message(
                &request(&"a".repeat(300))
                    .coding(Coding::Gsm8)
                    .split_mode(SplitMode::Disabled)
                    .build(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MessageTooLong));

        // Fits the caller's budget but not short_message
        let err = session
            .send_message(
                &request(&"b".repeat(260))
                    .coding(Coding::Gsm8)
                    .bytes_per_segment(300)
                    .build(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Codec(_)));

        assert!(session.transport().submitted.is_empty());
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_stops_remaining_segments() {
        let transport = MockTransport {
            fail_after: Some(1),
            ..Default::default()
        };
        let (mut session, events) = recording_session(transport);

        let err = session
            .send_message(&request(&"a".repeat(300)).coding(Coding::Gsm8).build())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Transport(TransportError::Rejected(_))));
        assert_eq!(session.transport().submitted.len(), 1);
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    fn header_only(command_id: u32, sequence: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&16u32.to_be_bytes());
        data.extend_from_slice(&command_id.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&sequence.to_be_bytes());
        data
    }

    #[test]
    fn inbound_delivery_is_reported_and_acknowledged() {
        let (mut session, events) = recording_session(MockTransport::default());
        let data = DeliverSm {
            sequence_number: 77,
            source_addr_ton: 1,
            source_addr_npi: 1,
            source_addr: "447700900123".to_string(),
            data_coding: DataCoding::SmscDefault,
            short_message: bytes::Bytes::from_static(&[0xC8, 0x32, 0x9B, 0xFD, 0x06]),
            ..Default::default()
        }
        .to_bytes()
        .unwrap();

        let inbound = session.on_frame(&data).unwrap();
        let pdu = inbound.pdu.unwrap();
        let Pdu::Delivery(delivery) = &pdu else {
            panic!("Expected Delivery");
        };
        assert_eq!(delivery.message, "Hello");
        assert_eq!(delivery.coding, Some(Coding::Gsm7));
        assert_eq!(delivery.header.sequence, 77);

        let response = inbound.response.unwrap();
        assert_eq!(&response[4..8], &0x8000_0005u32.to_be_bytes());
        assert_eq!(&response[12..16], &77u32.to_be_bytes());

        let ack = Pdu::Generic(Header {
            command: Command::DeliverSmResp,
            status: Status::Ok,
            sequence: 77,
        });
        let events = events.lock().unwrap();
        assert_eq!(
            events.as_slice(),
            &[(Direction::Inbound, pdu.clone()), (Direction::Outbound, ack)]
        );
        assert!(!session.is_closing());
    }

    #[test]
    fn inbound_default_coding_is_configurable() {
        let mut session = Session::<MockTransport>::builder()
            .default_coding(Coding::Ucs2)
            .build(MockTransport::default());
        let data = DeliverSm {
            short_message: bytes::Bytes::from_static(b"Hello"),
            ..Default::default()
        }
        .to_bytes()
        .unwrap();

        let Some(Pdu::Delivery(delivery)) = session.on_frame(&data).unwrap().pdu else {
            panic!("Expected Delivery");
        };
        assert_eq!(delivery.coding, Some(Coding::Gsm8));
        assert_eq!(delivery.message, "Hello");
    }

    #[test]
    fn unknown_inbound_command_is_dropped() {
        let (mut session, events) = recording_session(MockTransport::default());
        let data = header_only(0x0000_0103, 9);

        assert_eq!(
            session.on_frame(&data).unwrap(),
            Inbound {
                pdu: None,
                response: None
            }
        );
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn submit_ack_is_reported() {
        let (mut session, events) = recording_session(MockTransport::default());
        let data = SubmitSmResponse {
            command_status: 0,
            sequence_number: 4,
            message_id: "abc123".to_string(),
        }
        .to_bytes()
        .unwrap();

        let inbound = session.on_frame(&data).unwrap();
        assert_eq!(
            inbound.pdu,
            Some(Pdu::SubmitAck {
                header: Header {
                    command: Command::SubmitSmResp,
                    status: Status::Ok,
                    sequence: 4,
                },
                message_id: "abc123".to_string(),
            })
        );
        assert_eq!(inbound.response, None);
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn enquire_link_is_answered() {
        let (mut session, events) = recording_session(MockTransport::default());

        let inbound = session.on_frame(&header_only(0x0000_0015, 12)).unwrap();
        assert_eq!(
            inbound.response.as_deref(),
            Some(&header_only(0x8000_0015, 12)[..])
        );

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1.header().command, Command::EnquireLink);
        assert_eq!(
            events[1],
            (
                Direction::Outbound,
                Pdu::Generic(Header {
                    command: Command::EnquireLinkResp,
                    status: Status::Ok,
                    sequence: 12,
                })
            )
        );
        assert!(!session.is_closing());
    }

    #[tokio::test]
    async fn unbind_is_answered_and_closes_session() {
        let (mut session, _events) = recording_session(MockTransport::default());

        let inbound = session.on_frame(&header_only(0x0000_0006, 5)).unwrap();
        assert_eq!(
            inbound.response.as_deref(),
            Some(&header_only(0x8000_0006, 5)[..])
        );
        assert!(session.is_closing());

        let err = session.send_message(&request("hi").build()).await.unwrap_err();
        assert!(matches!(err, EngineError::Transport(TransportError::Closed)));
        assert!(session.transport().submitted.is_empty());
    }

    #[test]
    fn unbind_resp_closes_without_answer() {
        let (mut session, events) = recording_session(MockTransport::default());

        let inbound = session.on_frame(&header_only(0x8000_0006, 3)).unwrap();
        assert_eq!(inbound.response, None);
        assert!(session.is_closing());
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn partial_frame_is_rejected() {
        let (mut session, events) = recording_session(MockTransport::default());
        let data = header_only(0x0000_0015, 1);

        let err = session.on_frame(&data[..10]).unwrap_err();
        assert!(matches!(err, EngineError::Codec(CodecError::Incomplete)));

        // Bytes of the next PDU after command_length are left alone
        let mut two = data.clone();
        two.extend_from_slice(&data[..6]);
        assert!(session.on_frame(&two).unwrap().response.is_some());
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn closed_session_rejects_messages() {
        let (mut session, _events) = recording_session(MockTransport::default());
        session.on_closed(Some(TransportError::Io(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "reset by peer",
        ))));

        assert!(session.is_closed());
        assert!(matches!(session.close_error(), Some(TransportError::Io(_))));

        let err = session.send_message(&request("hi").build()).await.unwrap_err();
        assert!(matches!(err, EngineError::Transport(TransportError::Closed)));
    }

    #[tokio::test]
    async fn close_shuts_transport() {
        let mut session = Session::new(MockTransport::default());
        session.close().await.unwrap();

        assert!(session.is_closed());
        assert!(session.close_error().is_none());
        assert!(session.transport().closed);
    }

    #[tokio::test]
    async fn sessions_can_share_a_counter() {
        let counter = Arc::new(ReferenceCounter::new());
        let mut first = Session::<MockTransport>::builder()
            .counter(Arc::clone(&counter))
            .build(MockTransport::default());
        let mut second = Session::<MockTransport>::builder()
            .counter(Arc::clone(&counter))
            .build(MockTransport::default());

        let long = request(&"a".repeat(200)).coding(Coding::Gsm8).build();
        first.send_message(&long).await.unwrap();
        second.send_message(&long).await.unwrap();

        assert_eq!(first.transport().submitted[0].short_message[3], 1);
        assert_eq!(second.transport().submitted[0].short_message[3], 2);
        assert_eq!(counter.current(), 2);
    }
}
