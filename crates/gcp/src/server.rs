use crate::config::ServerConfig;
use crate::error::GcpError;
use gcp_common::encap::{Encapsulation, HEADER_LEN};
use gcp_common::message::Message;
use gcp_common::parser::decode;
use std::io::ErrorKind;
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Accepts GCP connections and spawns one handler task per connection.
///
/// # Errors
///
/// Returns an error if the accept loop encounters an I/O failure.
pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), GcpError> {
    let local_addr = listener.local_addr().map_err(GcpError::Io)?;
    info!("server listening on {}", local_addr);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let config = config.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, config).await {
                        debug!("connection from {} closed: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("failed to accept connection: {}", e);
            }
        }
    }
}

/// Runs the accept loop until the shutdown channel fires. Used by tests
/// and by embedders that manage their own lifecycle.
///
/// # Errors
///
/// Returns an error if the accept loop encounters an I/O failure.
pub async fn run_with_shutdown(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: oneshot::Receiver<()>,
) -> Result<(), GcpError> {
    tokio::select! {
        result = run(listener, config) => result,
        _ = shutdown => {
            info!("server shutting down");
            Ok(())
        }
    }
}

/// Reads encapsulation frames off one connection until EOF, decoding and
/// reporting every GCP message they carry. Decode failures are logged and
/// the connection continues with the next frame.
async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    config: ServerConfig,
) -> Result<(), GcpError> {
    info!("serving {}", addr);
    let mut frame = vec![0u8; config.mtu.max(HEADER_LEN)];

    loop {
        let frame_len = match read_frame(&mut stream, &mut frame).await {
            Ok(Some(len)) => len,
            Ok(None) => {
                debug!("end of transmission from {}", addr);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let encap = match Encapsulation::parse(&frame[..frame_len]) {
            Ok(encap) => encap,
            Err(e) => {
                error!("failed to decode encapsulation from {}: {}", addr, e);
                continue;
            }
        };
        debug!(
            transaction_id = encap.transaction_id,
            unit_id = encap.unit_id,
            length = encap.length,
            "received frame"
        );

        for message in encap.messages() {
            match message {
                Ok(message) => info!("{}", render_message(&message)),
                Err(e) => {
                    error!("could not parse GCP message from {}: {}", addr, e);
                    break;
                }
            }
        }
    }
}

/// Reads one length-framed encapsulation frame into `buf`, growing it when
/// a frame exceeds the configured MTU. Returns `None` on a clean EOF
/// between frames.
async fn read_frame(
    stream: &mut TcpStream,
    buf: &mut Vec<u8>,
) -> Result<Option<usize>, GcpError> {
    if let Err(e) = stream.read_exact(&mut buf[..HEADER_LEN]).await {
        if e.kind() == ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(GcpError::Io(e));
    }

    // The length field counts the unit id byte plus the message field.
    let declared = usize::from(u16::from_be_bytes([buf[4], buf[5]]));
    let body_len = declared.saturating_sub(1);
    let total = HEADER_LEN + body_len;
    if total > buf.len() {
        warn!("frame of {} bytes exceeds the read buffer, growing", total);
        buf.resize(total, 0);
    }

    if body_len > 0 {
        stream
            .read_exact(&mut buf[HEADER_LEN..total])
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::UnexpectedEof {
                    GcpError::ConnectionClosed
                } else {
                    GcpError::Io(e)
                }
            })?;
    }
    Ok(Some(total))
}

/// Renders one GCP message as a report line: identifier, length, and, for
/// TLV-bearing bodies, the decoded domain tree as pretty JSON. A framing
/// error inside the TLV payload is reported alongside whatever decoded.
#[must_use]
pub fn render_message(message: &Message) -> String {
    let mut out = format!(
        "message id {} ({} byte body)",
        message.message_id, message.length
    );
    let Some(payload) = message.rcp_payload() else {
        return out;
    };

    let decoded = decode(payload);
    if let Some(err) = &decoded.error {
        out.push_str(&format!("; TLV decode error: {err}"));
    }
    if !decoded.gcp.is_empty() {
        match serde_json::to_string_pretty(&decoded.gcp) {
            Ok(json) => {
                out.push('\n');
                out.push_str(&json);
            }
            Err(e) => out.push_str(&format!("; could not render domain tree: {e}")),
        }
    }
    out
}
