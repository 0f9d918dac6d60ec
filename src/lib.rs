//! SMPP v3.4 message encoding and segmentation.
//!
//! Turns an abstract outbound [`Request`] into the ordered `submit_sm` PDUs
//! that carry it, choosing a text coding, splitting with a concatenation
//! header or SAR parameters, and translating between the abstract protocol
//! vocabulary and wire values in both directions.
//!
//! # Examples
//!
//! ## Splitting a long message
//!
//! ```rust
//! use smpp_segmenter::model::{Address, Coding, Request};
//! use smpp_segmenter::segment::Segmenter;
//!
//! fn main() -> Result<(), smpp_segmenter::EngineError> {
//!     let request = Request::builder()
//!         .source(Address::alphanumeric("ACME"))
//!         .destination(Address::international("447700900123"))
//!         .coding(Coding::Gsm7)
//!         .message("a".repeat(300))
//!         .build();
//!
//!     let segments = Segmenter::new().split(&request)?;
//!     assert_eq!(segments.len(), 3);
//!
//!     for segment in &segments {
//!         let concat = segment.concat.expect("multi-part message");
//!         println!("part {}/{} ref {}", concat.seq, concat.total, concat.reference);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Submitting through a session
//!
//! ```rust,no_run
//! use smpp_segmenter::datatypes::SubmitSm;
//! use smpp_segmenter::model::{Address, Request};
//! use smpp_segmenter::session::{Session, Transport, TransportError};
//!
//! struct Smsc;
//!
//! impl Transport for Smsc {
//!     async fn submit(&mut self, _pdu: SubmitSm) -> Result<u32, TransportError> {
//!         Ok(1)
//!     }
//!
//!     async fn close(&mut self) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::<Smsc>::builder()
//!         .handler(|direction, pdu| println!("{direction:?} {:?}", pdu.header()))
//!         .build(Smsc);
//!
//!     let request = Request::builder()
//!         .destination(Address::international("447700900123"))
//!         .message("Hello, World!")
//!         .build();
//!     session.send_message(&request).await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

mod macros;

pub mod codec;
pub mod coding;
pub mod datatypes;
pub mod error;
pub mod model;
pub mod reference;
pub mod segment;
pub mod session;
pub mod translate;


// Re-export codec types for direct access
pub use codec::{CodecError, Decodable, Encodable, Frame, PduHeader};

pub use coding::{Strategy, TextCoding};
pub use error::{EngineError, EngineResult};
pub use model::{Address, Coding, Concat, Direction, Pdu, Request, SplitMode};
pub use reference::ReferenceCounter;
pub use segment::{Segment, Segmenter};
pub use session::{Inbound, Session, SessionBuilder, Transport, TransportError};
