mod address;
mod coding;
mod command;
mod pdu;
mod request;

pub use address::{Address, Npi, Ton};
pub use coding::{Coding, UnknownCoding};
pub use command::{Command, Status};
pub use pdu::{Concat, Delivery, Direction, Header, Pdu};
pub use request::{
    DEFAULT_BYTES_PER_SEGMENT, RegisteredDelivery, Request, RequestBuilder, SplitMode,
};
