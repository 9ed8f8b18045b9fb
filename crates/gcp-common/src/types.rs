//! Core protocol constants and closed wire value sets for GCP/RCP.

use std::fmt;

/// TCP port a GCP endpoint listens on.
pub const GCP_PORT: u16 = 8190;

/// Protocol identifier carried in the TCP encapsulation (GCP version 1).
pub const PROTOCOL_ID: u16 = 1;

/// GCP message identifiers ("GCP Message ID Parameters", updated 2018-05-09).
pub mod message_id {
    /// GCP Notify Request.
    pub const NOTIFY_REQ: u8 = 2;
    /// GCP Notify Normal Response.
    pub const NOTIFY_RES: u8 = 3;
    /// GCP Device Management (GDM) Request.
    pub const GDM_REQ: u8 = 4;
    /// GCP Device Management (GDM) Normal Response.
    pub const GDM_RES: u8 = 5;
    /// Exchange Data Structures (EDS) Request.
    pub const EDS_REQ: u8 = 6;
    /// Exchange Data Structures (EDS) Normal Response.
    pub const EDS_RES: u8 = 7;
    /// Exchange Data Registers (EDR) Request. Reserved, no structured body.
    pub const EDR_REQ: u8 = 16;
    /// Exchange Data Registers (EDR) Normal Response. Reserved.
    pub const EDR_RES: u8 = 17;
    /// Mask Write Register (MWR) Request. Reserved.
    pub const MWR_REQ: u8 = 18;
    /// Mask Write Register (MWR) Normal Response. Reserved.
    pub const MWR_RES: u8 = 19;
    /// GCP Notify Error Response.
    pub const NOTIFY_ERR: u8 = 131;
    /// GCP Device Management Error Response.
    pub const GDM_ERR: u8 = 133;
    /// Exchange Data Structures Error Response.
    pub const EDS_ERR: u8 = 135;
    /// Exchange Data Registers Error Response. Reserved.
    pub const EDR_ERR: u8 = 145;
    /// Mask Write Register Error Response. Reserved.
    pub const MWR_ERR: u8 = 147;
}

/// GCP return codes carried in error responses.
pub mod return_code {
    /// Message successful.
    pub const SUCCESS: u8 = 0;
    /// Unsupported message.
    pub const UNSUPPORTED_MSG: u8 = 1;
    /// Illegal message length.
    pub const ILLEGAL_MSG_LEN: u8 = 2;
    /// Illegal transaction id.
    pub const ILLEGAL_TRANS_ID: u8 = 3;
    /// Illegal mode.
    pub const ILLEGAL_MODE: u8 = 4;
    /// Illegal port.
    pub const ILLEGAL_PORT: u8 = 5;
    /// Illegal channel.
    pub const ILLEGAL_CHANNEL: u8 = 6;
    /// Illegal command.
    pub const ILLEGAL_CMD: u8 = 7;
    /// Illegal vendor id.
    pub const ILLEGAL_VENDOR_ID: u8 = 8;
    /// Illegal vendor index.
    pub const ILLEGAL_VENDOR_INDEX: u8 = 9;
    /// Illegal address.
    pub const ILLEGAL_ADDR: u8 = 10;
    /// Illegal data value.
    pub const ILLEGAL_DATA_VALUE: u8 = 11;
    /// Message failure.
    pub const MSG_FAIL: u8 = 12;
    /// Slave device failure.
    pub const SLAVE_DEV_FAIL: u8 = 255;
}

/// RCP operation code carried in a Sequence TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read request.
    Read,
    /// Write request.
    Write,
    /// Delete request.
    Delete,
    /// Response to a read.
    ReadResponse,
    /// Response to a write.
    WriteResponse,
    /// Response to a delete.
    DeleteResponse,
    /// Allocate-write request.
    AllocateWrite,
    /// Response to an allocate-write.
    AllocateWriteResponse,
}

impl Operation {
    /// Decodes an operation code byte. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Read),
            2 => Some(Self::Write),
            3 => Some(Self::Delete),
            4 => Some(Self::ReadResponse),
            5 => Some(Self::WriteResponse),
            6 => Some(Self::DeleteResponse),
            7 => Some(Self::AllocateWrite),
            8 => Some(Self::AllocateWriteResponse),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Delete => "Delete",
            Self::ReadResponse => "ReadResponse",
            Self::WriteResponse => "WriteResponse",
            Self::DeleteResponse => "DeleteResponse",
            Self::AllocateWrite => "AllocateWrite",
            Self::AllocateWriteResponse => "AllocateWriteResponse",
        };
        f.write_str(s)
    }
}

/// RCP response code carried alongside operation responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// No error.
    NoError,
    /// Unspecified error.
    GeneralError,
    /// The response would exceed the maximum message size.
    ResponseTooBig,
    /// The requested attribute does not exist.
    AttributeNotFound,
    /// An index value was out of range.
    BadIndex,
    /// Attempted write to a read-only attribute.
    WriteToReadOnly,
    /// The value conflicts with the object state.
    InconsistentValue,
    /// The value length is wrong.
    WrongLength,
    /// The value is wrong.
    WrongValue,
    /// A required resource is unavailable.
    ResourceUnavailable,
    /// The requester is not authorized.
    AuthorizationFailure,
    /// A mandatory attribute was missing.
    AttributeMissing,
    /// Allocation failed.
    AllocationFailure,
    /// Allocation has no owner.
    AllocationNoOwner,
    /// Error processing a UCD.
    ErrorProcessingUcd,
    /// Error processing an OCD.
    ErrorProcessingOcd,
    /// Error processing a DPD.
    ErrorProcessingDpd,
    /// The session id is already in use.
    SessionIdInUse,
    /// The referenced object does not exist.
    DoesNotExist,
}

impl ResponseCode {
    /// Decodes a response code byte. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NoError),
            1 => Some(Self::GeneralError),
            2 => Some(Self::ResponseTooBig),
            3 => Some(Self::AttributeNotFound),
            4 => Some(Self::BadIndex),
            5 => Some(Self::WriteToReadOnly),
            6 => Some(Self::InconsistentValue),
            7 => Some(Self::WrongLength),
            8 => Some(Self::WrongValue),
            9 => Some(Self::ResourceUnavailable),
            10 => Some(Self::AuthorizationFailure),
            11 => Some(Self::AttributeMissing),
            12 => Some(Self::AllocationFailure),
            13 => Some(Self::AllocationNoOwner),
            14 => Some(Self::ErrorProcessingUcd),
            15 => Some(Self::ErrorProcessingOcd),
            16 => Some(Self::ErrorProcessingDpd),
            17 => Some(Self::SessionIdInUse),
            18 => Some(Self::DoesNotExist),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoError => "NoError",
            Self::GeneralError => "GeneralError",
            Self::ResponseTooBig => "ResponseTooBig",
            Self::AttributeNotFound => "AttributeNotFound",
            Self::BadIndex => "BadIndex",
            Self::WriteToReadOnly => "WriteToReadOnly",
            Self::InconsistentValue => "InconsistentValue",
            Self::WrongLength => "WrongLength",
            Self::WrongValue => "WrongValue",
            Self::ResourceUnavailable => "ResourceUnavailable",
            Self::AuthorizationFailure => "AuthorizationFailure",
            Self::AttributeMissing => "AttributeMissing",
            Self::AllocationFailure => "AllocationFailure",
            Self::AllocationNoOwner => "AllocationNoOwner",
            Self::ErrorProcessingUcd => "ErrorProcessingUCD",
            Self::ErrorProcessingOcd => "ErrorProcessingOCD",
            Self::ErrorProcessingDpd => "ErrorProcessingDPD",
            Self::SessionIdInUse => "SessionIdInUse",
            Self::DoesNotExist => "DoesNotExist",
        };
        f.write_str(s)
    }
}

/// Notification type reported through a GeneralNotification TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// The RPD has started up.
    StartUp,
    /// Result of a redirect operation.
    RedirectResult,
    /// Result of PTP clock synchronization.
    PtpResult,
    /// Result of an auxiliary core operation.
    AuxCoreResult,
    /// An operation timed out.
    TimeOut,
    /// The RPD reconnected.
    Reconnect,
    /// GCP status of an auxiliary core.
    AuxCoreGcpStatus,
    /// Request to refresh a channel UCD.
    ChannelUcdRefreshRequest,
    /// A handover took place.
    Handover,
    /// A secure software download failure.
    SsdFailure,
}

impl NotificationType {
    /// Decodes a notification type byte. Unknown codes (including the
    /// unassigned value 6) yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::StartUp),
            2 => Some(Self::RedirectResult),
            3 => Some(Self::PtpResult),
            4 => Some(Self::AuxCoreResult),
            5 => Some(Self::TimeOut),
            7 => Some(Self::Reconnect),
            8 => Some(Self::AuxCoreGcpStatus),
            9 => Some(Self::ChannelUcdRefreshRequest),
            10 => Some(Self::Handover),
            11 => Some(Self::SsdFailure),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StartUp => "StartUpNotification",
            Self::RedirectResult => "RedirectResultNotification",
            Self::PtpResult => "PtpResultNotification",
            Self::AuxCoreResult => "AuxCoreResultNotification",
            Self::TimeOut => "TimeOutNotification",
            Self::Reconnect => "ReconnectNotification",
            Self::AuxCoreGcpStatus => "AuxCoreGcpStatusNotification",
            Self::ChannelUcdRefreshRequest => "ChannelUcdRefreshRequest",
            Self::Handover => "HandoverNotification",
            Self::SsdFailure => "SsdFailureNotification",
        };
        f.write_str(s)
    }
}

/// Administrative state of an RPD Ethernet interface (RFC 2863 ifAdminStatus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminStatus {
    /// Interface is administratively up.
    Up,
    /// Interface is administratively down.
    Down,
    /// Interface is in a test mode.
    Testing,
}

impl AdminStatus {
    /// Decodes an admin status byte. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            3 => Some(Self::Testing),
            _ => None,
        }
    }
}

impl fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Testing => "testing",
        };
        f.write_str(s)
    }
}

/// Operational state of an RPD Ethernet interface (RFC 2863 ifOperStatus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperStatus {
    /// Interface is passing packets.
    Up,
    /// Interface is down.
    Down,
    /// Interface is in a test mode.
    Testing,
    /// State cannot be determined.
    Unknown,
    /// Interface is waiting for an external event.
    Dormant,
    /// A hardware component is missing.
    NotPresent,
    /// A lower-layer interface is down.
    LowerLayerDown,
}

impl OperStatus {
    /// Decodes an operational status byte. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            3 => Some(Self::Testing),
            4 => Some(Self::Unknown),
            5 => Some(Self::Dormant),
            6 => Some(Self::NotPresent),
            7 => Some(Self::LowerLayerDown),
            _ => None,
        }
    }
}

impl fmt::Display for OperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Testing => "testing",
            Self::Unknown => "unknown",
            Self::Dormant => "dormant",
            Self::NotPresent => "notPresent",
            Self::LowerLayerDown => "lowerLayerDown",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_codes_round_trip() {
        assert_eq!(Operation::from_code(4), Some(Operation::ReadResponse));
        assert_eq!(Operation::ReadResponse.to_string(), "ReadResponse");
        assert_eq!(Operation::from_code(0), None);
        assert_eq!(Operation::from_code(9), None);
    }

    #[test]
    fn response_codes_cover_closed_set() {
        for code in 0..=18 {
            assert!(ResponseCode::from_code(code).is_some());
        }
        assert_eq!(ResponseCode::from_code(19), None);
        assert_eq!(ResponseCode::from_code(0).unwrap().to_string(), "NoError");
        assert_eq!(
            ResponseCode::from_code(14).unwrap().to_string(),
            "ErrorProcessingUCD"
        );
    }

    #[test]
    fn notification_type_skips_unassigned_code() {
        assert_eq!(
            NotificationType::from_code(1),
            Some(NotificationType::StartUp)
        );
        assert_eq!(NotificationType::from_code(6), None);
        assert_eq!(
            NotificationType::ChannelUcdRefreshRequest.to_string(),
            "ChannelUcdRefreshRequest"
        );
        assert_eq!(
            NotificationType::StartUp.to_string(),
            "StartUpNotification"
        );
    }

    #[test]
    fn interface_status_rendering() {
        assert_eq!(AdminStatus::from_code(1).unwrap().to_string(), "up");
        assert_eq!(AdminStatus::from_code(4), None);
        assert_eq!(
            OperStatus::from_code(7).unwrap().to_string(),
            "lowerLayerDown"
        );
        assert_eq!(OperStatus::from_code(6).unwrap().to_string(), "notPresent");
    }
}
