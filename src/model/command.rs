use std::fmt;

/// Operations this engine sends, receives or reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    GenericNack,
    BindReceiver,
    BindReceiverResp,
    BindTransmitter,
    BindTransmitterResp,
    BindTransceiver,
    BindTransceiverResp,
    SubmitSm,
    SubmitSmResp,
    DeliverSm,
    DeliverSmResp,
    Unbind,
    UnbindResp,
    EnquireLink,
    EnquireLinkResp,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::GenericNack,
        Command::BindReceiver,
        Command::BindReceiverResp,
        Command::BindTransmitter,
        Command::BindTransmitterResp,
        Command::BindTransceiver,
        Command::BindTransceiverResp,
        Command::SubmitSm,
        Command::SubmitSmResp,
        Command::DeliverSm,
        Command::DeliverSmResp,
        Command::Unbind,
        Command::UnbindResp,
        Command::EnquireLink,
        Command::EnquireLinkResp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::GenericNack => "GENERIC_NACK",
            Command::BindReceiver => "BIND_RECEIVER",
            Command::BindReceiverResp => "BIND_RECEIVER_RESP",
            Command::BindTransmitter => "BIND_TRANSMITTER",
            Command::BindTransmitterResp => "BIND_TRANSMITTER_RESP",
            Command::BindTransceiver => "BIND_TRANSCEIVER",
            Command::BindTransceiverResp => "BIND_TRANSCEIVER_RESP",
            Command::SubmitSm => "SUBMIT_SM",
            Command::SubmitSmResp => "SUBMIT_SM_RESP",
            Command::DeliverSm => "DELIVER_SM",
            Command::DeliverSmResp => "DELIVER_SM_RESP",
            Command::Unbind => "UNBIND",
            Command::UnbindResp => "UNBIND_RESP",
            Command::EnquireLink => "ENQUIRE_LINK",
            Command::EnquireLinkResp => "ENQUIRE_LINK_RESP",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! statuses {
    ($($variant:ident => $mnemonic:literal),* $(,)?) => {
        /// Command status of a protocol event.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Status {
            $($variant,)*
            /// Reserved, extension or vendor code with no name in SMPP v3.4
            Other(u32),
        }

        impl Status {
            /// Every named status
            pub const NAMED: &'static [Status] = &[$(Status::$variant),*];

            pub fn mnemonic(self) -> Option<&'static str> {
                match self {
                    $(Status::$variant => Some($mnemonic),)*
                    Status::Other(_) => None,
                }
            }
        }
    };
}

statuses! {
    Ok => "ESME_ROK",
    InvMsgLen => "ESME_RINVMSGLEN",
    InvCmdLen => "ESME_RINVCMDLEN",
    InvCmdId => "ESME_RINVCMDID",
    InvBndSts => "ESME_RINVBNDSTS",
    AlyBnd => "ESME_RALYBND",
    InvPrtFlg => "ESME_RINVPRTFLG",
    InvRegDlvFlg => "ESME_RINVREGDLVFLG",
    SysErr => "ESME_RSYSERR",
    InvSrcAdr => "ESME_RINVSRCADR",
    InvDstAdr => "ESME_RINVDSTADR",
    InvMsgId => "ESME_RINVMSGID",
    BindFail => "ESME_RBINDFAIL",
    InvPaswd => "ESME_RINVPASWD",
    InvSysId => "ESME_RINVSYSID",
    CancelFail => "ESME_RCANCELFAIL",
    ReplaceFail => "ESME_RREPLACEFAIL",
    MsgQFul => "ESME_RMSGQFUL",
    InvSerTyp => "ESME_RINVSERTYP",
    InvNumDests => "ESME_RINVNUMDESTS",
    InvDlName => "ESME_RINVDLNAME",
    InvDestFlag => "ESME_RINVDESTFLAG",
    InvSubRep => "ESME_RINVSUBREP",
    InvEsmClass => "ESME_RINVESMCLASS",
    CntSubDl => "ESME_RCNTSUBDL",
    SubmitFail => "ESME_RSUBMITFAIL",
    InvSrcTon => "ESME_RINVSRCTON",
    InvSrcNpi => "ESME_RINVSRCNPI",
    InvDstTon => "ESME_RINVDSTTON",
    InvDstNpi => "ESME_RINVDSTNPI",
    InvSysTyp => "ESME_RINVSYSTYP",
    InvRepFlag => "ESME_RINVREPFLAG",
    InvNumMsgs => "ESME_RINVNUMMSGS",
    Throttled => "ESME_RTHROTTLED",
    InvSched => "ESME_RINVSCHED",
    InvExpiry => "ESME_RINVEXPIRY",
    InvDftMsgId => "ESME_RINVDFTMSGID",
    XTAppn => "ESME_RX_T_APPN",
    XPAppn => "ESME_RX_P_APPN",
    XRAppn => "ESME_RX_R_APPN",
    QueryFail => "ESME_RQUERYFAIL",
    InvOptParStream => "ESME_RINVOPTPARSTREAM",
    OptParNotAllwd => "ESME_ROPTPARNOTALLWD",
    InvParLen => "ESME_RINVPARLEN",
    MissingOptParam => "ESME_RMISSINGOPTPARAM",
    InvOptParamVal => "ESME_RINVOPTPARAMVAL",
    DeliveryFailure => "ESME_RDELIVERYFAILURE",
    UnknownErr => "ESME_RUNKNOWNERR",
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Other(raw) => write!(f, "0x{raw:08X}"),
            named => f.write_str(named.mnemonic().unwrap_or_default()),
        }
    }
}
