//! TCP payload encapsulation for GCP messages.
//!
//! GCP is a messaging protocol and rides on a reliable transport; over TCP
//! every payload starts with a 7-byte header: transaction id (2 bytes),
//! protocol id (2 bytes, 1 for GCP version 1), length (2 bytes, counting
//! the unit id plus the message field), and unit id (1 byte). The message
//! field carries one or more GCP messages back to back with no framing
//! between them; each message's own header determines its size.

use crate::message::{Message, MessageError};
use crate::types::PROTOCOL_ID;
use thiserror::Error;

/// Size of the fixed encapsulation header.
pub const HEADER_LEN: usize = 7;

/// Errors that can occur while parsing or building encapsulation frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncapError {
    /// The frame is shorter than the fixed header.
    #[error("message too short: need {need} bytes, got {got}")]
    TooShort {
        /// Minimum expected byte count.
        need: usize,
        /// Actual byte count received.
        got: usize,
    },
    /// The protocol id is not GCP version 1.
    #[error("unsupported protocol id: {got}")]
    ProtocolMismatch {
        /// Protocol id found in the frame.
        got: u16,
    },
    /// The message field does not fit the 16-bit length field.
    #[error("payload too large: {len} bytes")]
    PayloadTooLarge {
        /// Message field size.
        len: usize,
    },
}

/// A TCP payload encapsulation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encapsulation {
    /// Transaction identifier; 0 means the field is ignored.
    pub transaction_id: u16,
    /// Protocol identifier; 1 for GCP version 1.
    pub protocol_id: u16,
    /// Declared length: unit id byte plus the message field.
    pub length: u16,
    /// Unit addressing within a device; default 0.
    pub unit_id: u8,
    /// One or more GCP messages, concatenated.
    pub message: Vec<u8>,
}

impl Encapsulation {
    /// Builds an outbound frame around already-encoded GCP message bytes,
    /// with transaction id and unit id zero.
    ///
    /// # Errors
    ///
    /// Returns [`EncapError::PayloadTooLarge`] when the message bytes do
    /// not fit the length field.
    pub fn for_message(message: Vec<u8>) -> Result<Self, EncapError> {
        let Ok(length) = u16::try_from(1 + message.len()) else {
            return Err(EncapError::PayloadTooLarge {
                len: message.len(),
            });
        };
        Ok(Self {
            transaction_id: 0,
            protocol_id: PROTOCOL_ID,
            length,
            unit_id: 0,
            message,
        })
    }

    /// Serializes the frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.message.len());
        out.extend_from_slice(&self.transaction_id.to_be_bytes());
        out.extend_from_slice(&self.protocol_id.to_be_bytes());
        out.extend_from_slice(&self.length.to_be_bytes());
        out.push(self.unit_id);
        out.extend_from_slice(&self.message);
        out
    }

    /// Parses an encapsulation frame.
    ///
    /// # Errors
    ///
    /// Returns [`EncapError::TooShort`] for frames under 7 bytes and
    /// [`EncapError::ProtocolMismatch`] when the protocol id is not 1.
    pub fn parse(b: &[u8]) -> Result<Self, EncapError> {
        if b.len() < HEADER_LEN {
            return Err(EncapError::TooShort {
                need: HEADER_LEN,
                got: b.len(),
            });
        }
        let protocol_id = u16::from_be_bytes([b[2], b[3]]);
        if protocol_id != PROTOCOL_ID {
            return Err(EncapError::ProtocolMismatch { got: protocol_id });
        }
        Ok(Self {
            transaction_id: u16::from_be_bytes([b[0], b[1]]),
            protocol_id,
            length: u16::from_be_bytes([b[4], b[5]]),
            unit_id: b[6],
            message: b[HEADER_LEN..].to_vec(),
        })
    }

    /// Iterates the GCP messages contained in the message field.
    #[must_use]
    pub fn messages(&self) -> MessageIter<'_> {
        MessageIter {
            rest: &self.message,
        }
    }
}

/// Iterator over the GCP messages inside an encapsulation frame.
///
/// Stops after yielding an error; a malformed message makes the rest of
/// the field unframeable.
#[derive(Debug)]
pub struct MessageIter<'a> {
    rest: &'a [u8],
}

impl Iterator for MessageIter<'_> {
    type Item = Result<Message, MessageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match Message::parse_prefix(self.rest) {
            Ok((message, used)) => {
                self.rest = &self.rest[used..];
                Some(Ok(message))
            }
            Err(err) => {
                self.rest = &[];
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ErrorResponse, MessageBody};
    use crate::types::message_id;

    #[test]
    fn round_trip() {
        let msg = vec![0x02, 0x00, 0x00];
        let frame = Encapsulation::for_message(msg.clone()).unwrap();
        assert_eq!(frame.length, 4);
        let bytes = frame.encode();
        assert_eq!(bytes.len(), HEADER_LEN + 3);
        assert_eq!(&bytes[2..4], &[0x00, 0x01]);

        let parsed = Encapsulation::parse(&bytes).unwrap();
        assert_eq!(parsed, frame);
        assert_eq!(parsed.message, msg);
    }

    #[test]
    fn frames_under_seven_bytes_are_too_short() {
        assert_eq!(
            Encapsulation::parse(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x02]),
            Err(EncapError::TooShort { need: 7, got: 6 })
        );
    }

    #[test]
    fn protocol_id_must_be_one() {
        let bytes = [0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00];
        assert_eq!(
            Encapsulation::parse(&bytes),
            Err(EncapError::ProtocolMismatch { got: 2 })
        );
    }

    #[test]
    fn iterates_back_to_back_messages() {
        let first = Message::new(
            message_id::NOTIFY_ERR,
            MessageBody::NotifyErr(ErrorResponse {
                transaction_id: 1,
                return_code: 0,
            }),
        );
        let second = Message::new(
            message_id::EDS_ERR,
            MessageBody::EdsErr(ErrorResponse {
                transaction_id: 2,
                return_code: 12,
            }),
        );
        let mut payload = first.encode().unwrap();
        payload.extend_from_slice(&second.encode().unwrap());
        let frame = Encapsulation::for_message(payload).unwrap();

        let messages: Vec<_> = frame.messages().collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].as_ref().unwrap().body, first.body);
        assert_eq!(messages[1].as_ref().unwrap().body, second.body);
    }

    #[test]
    fn iteration_stops_on_malformed_message() {
        // One good error response followed by a truncated header.
        let good = Message::new(
            message_id::NOTIFY_ERR,
            MessageBody::NotifyErr(ErrorResponse {
                transaction_id: 1,
                return_code: 0,
            }),
        );
        let mut payload = good.encode().unwrap();
        payload.extend_from_slice(&[0x02, 0x00]);
        let frame = Encapsulation::for_message(payload).unwrap();

        let messages: Vec<_> = frame.messages().collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_ok());
        assert_eq!(
            messages[1],
            Err(MessageError::TooShort { need: 3, got: 2 })
        );
    }
}
