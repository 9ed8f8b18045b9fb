//! GCP message framing and typed message bodies.
//!
//! A GCP message is a 1-byte message id, a 2-byte big-endian body length,
//! and the body. Recognised ids parse into typed bodies; everything else,
//! including the reserved EDR/MWR ids, falls back to [`MessageBody::Raw`].

use crate::types::message_id;
use thiserror::Error;

/// Number of bytes in a GCP message header (id plus 16-bit length).
pub const HEADER_LEN: usize = 3;

/// Errors that can occur while parsing or encoding GCP messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// The input is shorter than the header or the body minimum requires.
    #[error("message too short: need {need} bytes, got {got}")]
    TooShort {
        /// Minimum expected byte count.
        need: usize,
        /// Actual byte count received.
        got: usize,
    },
    /// The body does not fit the 16-bit length field.
    #[error("message body too large: {len} bytes")]
    BodyTooLarge {
        /// Encoded body size.
        len: usize,
    },
}

/// A GCP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message identifier.
    pub message_id: u8,
    /// Declared body length.
    pub length: u16,
    /// Typed message body.
    pub body: MessageBody,
}

/// A GCP message body, dispatched by message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// GCP Notify Request (id 2).
    NotifyReq(NotifyReq),
    /// GCP Notify Normal Response (id 3).
    NotifyRes(NotifyRes),
    /// GCP Device Management Request (id 4).
    GdmReq(GdmCommand),
    /// GCP Device Management Normal Response (id 5).
    GdmRes(GdmCommand),
    /// Exchange Data Structures Request (id 6).
    EdsReq(EdsExchange),
    /// Exchange Data Structures Normal Response (id 7).
    EdsRes(EdsExchange),
    /// GCP Notify Error Response (id 131).
    NotifyErr(ErrorResponse),
    /// GCP Device Management Error Response (id 133).
    GdmErr(ErrorResponse),
    /// Exchange Data Structures Error Response (id 135).
    EdsErr(ErrorResponse),
    /// Fallback for unknown and reserved message ids.
    Raw(Vec<u8>),
}

/// GCP Notify Request body. The event data is an RCP TLV sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReq {
    /// Transaction identifier.
    pub transaction_id: u16,
    /// Mode flags.
    pub mode: u8,
    /// Notify status.
    pub status: u8,
    /// Event code.
    pub event_code: u32,
    /// Event data: zero or more RCP TLVs.
    pub event_data: Vec<u8>,
}

/// GCP Notify Normal Response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyRes {
    /// Transaction identifier.
    pub transaction_id: u16,
    /// Mode flags.
    pub mode: u8,
    /// Event code being acknowledged.
    pub event_code: u32,
}

/// GCP Device Management request/response body (fixed 8-byte layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdmCommand {
    /// Transaction identifier.
    pub transaction_id: u16,
    /// Mode flags.
    pub mode: u8,
    /// Port the command addresses.
    pub port: u16,
    /// Channel the command addresses.
    pub channel: u16,
    /// Device management command code.
    pub command: u8,
}

/// Exchange Data Structures request/response body. The data structures
/// field is an RCP TLV sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdsExchange {
    /// Transaction identifier.
    pub transaction_id: u16,
    /// Mode flags.
    pub mode: u8,
    /// Port the exchange addresses.
    pub port: u16,
    /// Channel the exchange addresses.
    pub channel: u16,
    /// IANA enterprise code of the vendor.
    pub vendor_id: u32,
    /// Vendor index.
    pub vendor_index: u8,
    /// Data structures: zero or more RCP TLVs.
    pub data_structures: Vec<u8>,
}

/// Error response body shared by the Notify/GDM/EDS error ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Transaction identifier of the failed request.
    pub transaction_id: u16,
    /// GCP return code.
    pub return_code: u8,
}

impl Message {
    /// Creates a message with the length field computed from the body.
    #[must_use]
    pub fn new(message_id: u8, body: MessageBody) -> Self {
        let length = body.body_len().min(usize::from(u16::MAX)) as u16;
        Self {
            message_id,
            length,
            body,
        }
    }

    /// Parses a complete GCP message, taking everything after the header
    /// as the body.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::TooShort`] when the input is smaller than
    /// the header or the body minimum of the dispatched id.
    pub fn parse(b: &[u8]) -> Result<Self, MessageError> {
        if b.len() < HEADER_LEN {
            return Err(MessageError::TooShort {
                need: HEADER_LEN,
                got: b.len(),
            });
        }
        let message_id = b[0];
        let length = u16::from_be_bytes([b[1], b[2]]);
        let body = parse_body(message_id, &b[HEADER_LEN..])?;
        Ok(Self {
            message_id,
            length,
            body,
        })
    }

    /// Parses the first GCP message of a byte stream, consuming exactly
    /// the header plus the declared body length. Returns the message and
    /// the number of bytes consumed, so back-to-back messages inside one
    /// encapsulation payload can be split.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::TooShort`] when the buffer holds less than
    /// one full message.
    pub fn parse_prefix(b: &[u8]) -> Result<(Self, usize), MessageError> {
        if b.len() < HEADER_LEN {
            return Err(MessageError::TooShort {
                need: HEADER_LEN,
                got: b.len(),
            });
        }
        let declared = usize::from(u16::from_be_bytes([b[1], b[2]]));
        let total = HEADER_LEN + declared;
        if b.len() < total {
            return Err(MessageError::TooShort {
                need: total,
                got: b.len(),
            });
        }
        let message = Self::parse(&b[..total])?;
        Ok((message, total))
    }

    /// Serializes the message, recomputing the length field from the body.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::BodyTooLarge`] when the body exceeds the
    /// 16-bit length field.
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        let body = self.body.encode();
        let Ok(length) = u16::try_from(body.len()) else {
            return Err(MessageError::BodyTooLarge { len: body.len() });
        };
        let mut out = Vec::with_capacity(HEADER_LEN + body.len());
        out.push(self.message_id);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Returns the RCP TLV bytes carried by this message, if its body
    /// carries any (Notify event data, EDS data structures).
    #[must_use]
    pub fn rcp_payload(&self) -> Option<&[u8]> {
        match &self.body {
            MessageBody::NotifyReq(p) => Some(&p.event_data),
            MessageBody::EdsReq(p) | MessageBody::EdsRes(p) => Some(&p.data_structures),
            _ => None,
        }
    }
}

impl MessageBody {
    /// Returns the encoded size of the body in bytes.
    #[must_use]
    pub fn body_len(&self) -> usize {
        match self {
            Self::NotifyReq(p) => 8 + p.event_data.len(),
            Self::NotifyRes(_) => 7,
            Self::GdmReq(_) | Self::GdmRes(_) => 8,
            Self::EdsReq(p) | Self::EdsRes(p) => 12 + p.data_structures.len(),
            Self::NotifyErr(_) | Self::GdmErr(_) | Self::EdsErr(_) => 3,
            Self::Raw(data) => data.len(),
        }
    }

    /// Serializes the body.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body_len());
        match self {
            Self::NotifyReq(p) => {
                out.extend_from_slice(&p.transaction_id.to_be_bytes());
                out.push(p.mode);
                out.push(p.status);
                out.extend_from_slice(&p.event_code.to_be_bytes());
                out.extend_from_slice(&p.event_data);
            }
            Self::NotifyRes(p) => {
                out.extend_from_slice(&p.transaction_id.to_be_bytes());
                out.push(p.mode);
                out.extend_from_slice(&p.event_code.to_be_bytes());
            }
            Self::GdmReq(p) | Self::GdmRes(p) => {
                out.extend_from_slice(&p.transaction_id.to_be_bytes());
                out.push(p.mode);
                out.extend_from_slice(&p.port.to_be_bytes());
                out.extend_from_slice(&p.channel.to_be_bytes());
                out.push(p.command);
            }
            Self::EdsReq(p) | Self::EdsRes(p) => {
                out.extend_from_slice(&p.transaction_id.to_be_bytes());
                out.push(p.mode);
                out.extend_from_slice(&p.port.to_be_bytes());
                out.extend_from_slice(&p.channel.to_be_bytes());
                out.extend_from_slice(&p.vendor_id.to_be_bytes());
                out.push(p.vendor_index);
                out.extend_from_slice(&p.data_structures);
            }
            Self::NotifyErr(p) | Self::GdmErr(p) | Self::EdsErr(p) => {
                out.extend_from_slice(&p.transaction_id.to_be_bytes());
                out.push(p.return_code);
            }
            Self::Raw(data) => out.extend_from_slice(data),
        }
        out
    }
}

fn require(b: &[u8], need: usize) -> Result<(), MessageError> {
    if b.len() < need {
        return Err(MessageError::TooShort { need, got: b.len() });
    }
    Ok(())
}

fn parse_body(id: u8, b: &[u8]) -> Result<MessageBody, MessageError> {
    let body = match id {
        message_id::NOTIFY_REQ => {
            require(b, 8)?;
            MessageBody::NotifyReq(NotifyReq {
                transaction_id: u16::from_be_bytes([b[0], b[1]]),
                mode: b[2],
                status: b[3],
                event_code: u32::from_be_bytes([b[4], b[5], b[6], b[7]]),
                event_data: b[8..].to_vec(),
            })
        }
        message_id::NOTIFY_RES => {
            require(b, 7)?;
            MessageBody::NotifyRes(NotifyRes {
                transaction_id: u16::from_be_bytes([b[0], b[1]]),
                mode: b[2],
                event_code: u32::from_be_bytes([b[3], b[4], b[5], b[6]]),
            })
        }
        message_id::GDM_REQ | message_id::GDM_RES => {
            require(b, 8)?;
            let command = GdmCommand {
                transaction_id: u16::from_be_bytes([b[0], b[1]]),
                mode: b[2],
                port: u16::from_be_bytes([b[3], b[4]]),
                channel: u16::from_be_bytes([b[5], b[6]]),
                command: b[7],
            };
            if id == message_id::GDM_REQ {
                MessageBody::GdmReq(command)
            } else {
                MessageBody::GdmRes(command)
            }
        }
        message_id::EDS_REQ | message_id::EDS_RES => {
            require(b, 12)?;
            let exchange = EdsExchange {
                transaction_id: u16::from_be_bytes([b[0], b[1]]),
                mode: b[2],
                port: u16::from_be_bytes([b[3], b[4]]),
                channel: u16::from_be_bytes([b[5], b[6]]),
                vendor_id: u32::from_be_bytes([b[7], b[8], b[9], b[10]]),
                vendor_index: b[11],
                data_structures: b[12..].to_vec(),
            };
            if id == message_id::EDS_REQ {
                MessageBody::EdsReq(exchange)
            } else {
                MessageBody::EdsRes(exchange)
            }
        }
        message_id::NOTIFY_ERR | message_id::GDM_ERR | message_id::EDS_ERR => {
            require(b, 3)?;
            let response = ErrorResponse {
                transaction_id: u16::from_be_bytes([b[0], b[1]]),
                return_code: b[2],
            };
            match id {
                message_id::NOTIFY_ERR => MessageBody::NotifyErr(response),
                message_id::GDM_ERR => MessageBody::GdmErr(response),
                _ => MessageBody::EdsErr(response),
            }
        }
        _ => MessageBody::Raw(b.to_vec()),
    };
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::return_code;

    #[test]
    fn header_requires_three_bytes() {
        assert_eq!(
            Message::parse(&[0x02, 0x00]),
            Err(MessageError::TooShort { need: 3, got: 2 })
        );
        assert_eq!(
            Message::parse(&[]),
            Err(MessageError::TooShort { need: 3, got: 0 })
        );
    }

    #[test]
    fn notify_req_round_trip() {
        let body = NotifyReq {
            transaction_id: 0x0001,
            mode: 0xc0,
            status: 1,
            event_code: 1,
            event_data: vec![0x11, 0x00, 0x00],
        };
        let msg = Message::new(message_id::NOTIFY_REQ, MessageBody::NotifyReq(body.clone()));
        assert_eq!(msg.length, 11);
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes[0], message_id::NOTIFY_REQ);
        assert_eq!(&bytes[1..3], &[0x00, 0x0b]);

        let parsed = Message::parse(&bytes).unwrap();
        assert_eq!(parsed.body, MessageBody::NotifyReq(body));
        assert_eq!(parsed.rcp_payload(), Some(&[0x11, 0x00, 0x00][..]));
    }

    #[test]
    fn notify_req_body_minimum_is_eight() {
        let short = [message_id::NOTIFY_REQ, 0x00, 0x07, 0, 1, 0, 0, 0, 0, 0];
        assert_eq!(
            Message::parse(&short),
            Err(MessageError::TooShort { need: 8, got: 7 })
        );
    }

    #[test]
    fn notify_res_round_trip() {
        let msg = Message::new(
            message_id::NOTIFY_RES,
            MessageBody::NotifyRes(NotifyRes {
                transaction_id: 7,
                mode: 0,
                event_code: 3,
            }),
        );
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes.len(), 10);
        let parsed = Message::parse(&bytes).unwrap();
        assert_eq!(parsed.body, msg.body);
        assert_eq!(parsed.rcp_payload(), None);
    }

    #[test]
    fn gdm_bodies_share_the_fixed_layout() {
        let command = GdmCommand {
            transaction_id: 9,
            mode: 0,
            port: 1,
            channel: 2,
            command: 3,
        };
        let req = Message::new(message_id::GDM_REQ, MessageBody::GdmReq(command.clone()));
        let bytes = req.encode().unwrap();
        let parsed = Message::parse(&bytes).unwrap();
        assert_eq!(parsed.body, MessageBody::GdmReq(command.clone()));

        let mut res_bytes = bytes.clone();
        res_bytes[0] = message_id::GDM_RES;
        let parsed = Message::parse(&res_bytes).unwrap();
        assert_eq!(parsed.body, MessageBody::GdmRes(command));

        let short = [message_id::GDM_REQ, 0x00, 0x04, 0, 9, 0, 1];
        assert_eq!(
            Message::parse(&short),
            Err(MessageError::TooShort { need: 8, got: 4 })
        );
    }

    #[test]
    fn eds_body_minimum_is_twelve() {
        let short = [message_id::EDS_RES, 0x00, 0x08, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            Message::parse(&short),
            Err(MessageError::TooShort { need: 12, got: 8 })
        );
    }

    #[test]
    fn error_responses_parse_for_all_three_ids() {
        for id in [
            message_id::NOTIFY_ERR,
            message_id::GDM_ERR,
            message_id::EDS_ERR,
        ] {
            let bytes = [id, 0x00, 0x03, 0x00, 0x2a, return_code::MSG_FAIL];
            let parsed = Message::parse(&bytes).unwrap();
            let expected = ErrorResponse {
                transaction_id: 0x2a,
                return_code: return_code::MSG_FAIL,
            };
            match (id, parsed.body) {
                (message_id::NOTIFY_ERR, MessageBody::NotifyErr(r))
                | (message_id::GDM_ERR, MessageBody::GdmErr(r))
                | (message_id::EDS_ERR, MessageBody::EdsErr(r)) => assert_eq!(r, expected),
                (_, other) => panic!("unexpected body {other:?}"),
            }
        }
        let short = [message_id::EDS_ERR, 0x00, 0x02, 0x00, 0x2a];
        assert_eq!(
            Message::parse(&short),
            Err(MessageError::TooShort { need: 3, got: 2 })
        );
    }

    #[test]
    fn reserved_and_unknown_ids_fall_back_to_raw() {
        for id in [
            message_id::EDR_REQ,
            message_id::EDR_RES,
            message_id::MWR_REQ,
            message_id::MWR_RES,
            message_id::EDR_ERR,
            message_id::MWR_ERR,
            200,
        ] {
            let bytes = [id, 0x00, 0x02, 0xde, 0xad];
            let parsed = Message::parse(&bytes).unwrap();
            assert_eq!(parsed.body, MessageBody::Raw(vec![0xde, 0xad]), "id {id}");
        }
    }

    #[test]
    fn prefix_parse_splits_back_to_back_messages() {
        let first = Message::new(
            message_id::NOTIFY_ERR,
            MessageBody::NotifyErr(ErrorResponse {
                transaction_id: 1,
                return_code: return_code::SUCCESS,
            }),
        );
        let second = Message::new(
            message_id::GDM_REQ,
            MessageBody::GdmReq(GdmCommand {
                transaction_id: 2,
                mode: 0,
                port: 0,
                channel: 0,
                command: 1,
            }),
        );
        let mut stream = first.encode().unwrap();
        stream.extend_from_slice(&second.encode().unwrap());

        let (msg, used) = Message::parse_prefix(&stream).unwrap();
        assert_eq!(msg.body, first.body);
        let (msg, used2) = Message::parse_prefix(&stream[used..]).unwrap();
        assert_eq!(msg.body, second.body);
        assert_eq!(used + used2, stream.len());
    }

    #[test]
    fn prefix_parse_rejects_truncated_declared_length() {
        let bytes = [message_id::NOTIFY_ERR, 0x00, 0x05, 0x00, 0x01, 0x00];
        assert_eq!(
            Message::parse_prefix(&bytes),
            Err(MessageError::TooShort { need: 8, got: 6 })
        );
    }
}
