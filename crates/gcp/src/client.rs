use crate::error::GcpError;
use gcp_common::encap::Encapsulation;
use gcp_common::message::{Message, MessageBody, NotifyReq};
use gcp_common::types::{message_id, GCP_PORT};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::info;

/// Builds the Notify request the client sends: a random transaction id
/// and the given word as event data.
#[must_use]
pub fn notify_message(word: &str) -> Message {
    Message::new(
        message_id::NOTIFY_REQ,
        MessageBody::NotifyReq(NotifyReq {
            transaction_id: rand::random(),
            mode: 0,
            status: 0,
            event_code: 0,
            event_data: word.as_bytes().to_vec(),
        }),
    )
}

/// Dials `target` on the GCP port and sends one encapsulated Notify
/// carrying `word`.
///
/// # Errors
///
/// Returns an error when the message cannot be built or the connection
/// fails.
pub async fn send_word(target: &str, word: &str) -> Result<(), GcpError> {
    let message = notify_message(word);
    let bytes = message.encode()?;
    let frame = Encapsulation::for_message(bytes)?;

    let mut stream = TcpStream::connect((target, GCP_PORT)).await?;
    stream.write_all(&frame.encode()).await?;
    stream.flush().await?;
    info!(
        "sent {} byte Notify to {}:{}",
        frame.message.len(),
        target,
        GCP_PORT
    );
    Ok(())
}
