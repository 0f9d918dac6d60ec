// ABOUTME: Demo program that segments a message from the command line and prints the wire PDUs
// ABOUTME: Runs the full outbound path through a Session with a transport that dumps each submit_sm

use argh::FromArgs;
use smpp_segmenter::codec::Encodable;
use smpp_segmenter::datatypes::SubmitSm;
use smpp_segmenter::model::{Address, Coding, RegisteredDelivery, Request, SplitMode};
use smpp_segmenter::session::{Session, Transport, TransportError};
use std::error::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Segment a message and print the submit_sm PDUs that would be sent
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the message to segment
    #[argh(option, short = 'm')]
    message: String,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the sender, numeric or alphanumeric
    #[argh(option, short = 'f')]
    from: String,

    /// coding used to encode the text (default: gsm7)
    #[argh(option, short = 'c', default = "Coding::Gsm7")]
    coding: Coding,

    /// coding advertised in data_coding instead of the real one
    #[argh(option)]
    deceptive: Option<Coding>,

    /// udh, sar, payload or disabled (default: udh)
    #[argh(option, short = 's', default = "String::from(\"udh\")")]
    split: String,

    /// octets of user data per segment (default: 140)
    #[argh(option, short = 'b', default = "140")]
    bytes_per_segment: usize,

    /// request a delivery receipt
    #[argh(switch, short = 'r')]
    receipt: bool,
}

/// Transport that prints each PDU instead of sending it
#[derive(Default)]
struct DumpTransport {
    sequence: u32,
}

impl Transport for DumpTransport {
    async fn submit(&mut self, mut pdu: SubmitSm) -> Result<u32, TransportError> {
        self.sequence += 1;
        pdu.sequence_number = self.sequence;

        let wire = pdu
            .to_bytes()
            .map_err(|e| TransportError::Rejected(e.to_string()))?;
        let hex: String = wire.iter().map(|b| format!("{b:02X}")).collect();
        println!("#{} ({} octets) {hex}", self.sequence, wire.len());

        Ok(self.sequence)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn split_mode(name: &str) -> Result<SplitMode, Box<dyn Error>> {
    match name.to_ascii_lowercase().as_str() {
        "udh" => Ok(SplitMode::Udh),
        "sar" => Ok(SplitMode::Sar),
        "payload" => Ok(SplitMode::MessagePayload),
        "disabled" => Ok(SplitMode::Disabled),
        other => Err(format!("unknown split mode: {other}").into()),
    }
}

fn sender(from: String) -> Address {
    if from.chars().all(|c| c.is_ascii_digit()) {
        Address::international(from)
    } else {
        Address::alphanumeric(from)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::TRACE
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut builder = Request::builder()
        .source(sender(cli_args.from))
        .destination(Address::international(cli_args.to))
        .coding(cli_args.coding)
        .split_mode(split_mode(&cli_args.split)?)
        .bytes_per_segment(cli_args.bytes_per_segment)
        .message(cli_args.message);
    if let Some(coding) = cli_args.deceptive {
        builder = builder.deceptive_coding(coding);
    }
    if cli_args.receipt {
        builder = builder.registered_delivery(RegisteredDelivery::REQUESTED);
    }
    let request = builder.build();

    let mut session = Session::<DumpTransport>::builder()
        .handler(|direction, pdu| tracing::debug!(?direction, ?pdu, "protocol event"))
        .build(DumpTransport::default());

    let sequences = session.send_message(&request).await?;
    println!(
        "{} segment(s), coding {}",
        sequences.len(),
        request.deceptive_coding.unwrap_or(request.coding)
    );

    session.close().await?;
    Ok(())
}
