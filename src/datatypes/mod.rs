mod command_id;
mod command_status;
mod data_coding;
mod deliver_sm;
mod link;
mod numeric_plan_indicator;
mod submit_sm;
pub mod tlv;
mod type_of_number;

pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_coding::DataCoding;
pub use deliver_sm::{DeliverSm, DeliverSmResponse, ESM_CLASS_DELIVERY_RECEIPT};
pub use link::{EnquireLinkResponse, UnbindResponse};
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use submit_sm::{MAX_SHORT_MESSAGE_LENGTH, SubmitSm, SubmitSmResponse};
pub use tlv::Tlv;
pub use type_of_number::TypeOfNumber;

/// esm_class bit signalling a user data header at the start of short_message
pub const ESM_CLASS_UDHI: u8 = 0x40;
