use thiserror::Error;

/// Errors that can occur while running the GCP utility.
#[derive(Error, Debug)]
pub enum GcpError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TCP encapsulation encoding or decoding error.
    #[error("encapsulation error: {0}")]
    Encap(#[from] gcp_common::encap::EncapError),
    /// GCP message encoding or decoding error.
    #[error("message error: {0}")]
    Message(#[from] gcp_common::message::MessageError),
    /// The peer closed the connection in the middle of a frame.
    #[error("connection closed mid-frame")]
    ConnectionClosed,
}
