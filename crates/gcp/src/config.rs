use clap::{Parser, ValueEnum};
use gcp_common::types::GCP_PORT;
use std::net::{Ipv6Addr, SocketAddr};

/// Connection mode for the utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Listen for inbound GCP connections.
    Server,
    /// Send one GCP Notify to a target.
    Client,
}

/// CLI arguments for the GCP utility.
#[derive(Parser, Debug, Clone)]
#[command(name = "gcp")]
#[command(about = "Utility for working with the Generic Control Plane protocol")]
#[command(version)]
pub struct Args {
    /// Connection mode: server or client.
    #[arg(short = 'm', long = "mode", env = "GCP_MODE")]
    pub mode: Mode,
    /// Target host for client connections.
    #[arg(short = 't', long = "target", default_value = "::1", env = "GCP_TARGET")]
    pub target: String,
    /// Word to send as Notify event data in client mode.
    #[arg(short = 'w', long = "word", default_value = "test", env = "GCP_WORD")]
    pub word: String,
    /// Per-connection read buffer size in bytes.
    #[arg(long, default_value = "1500", env = "GCP_MTU")]
    pub mtu: usize,
}

/// Runtime configuration for server mode, derived from [`Args`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on. The GCP port is fixed at 8190.
    pub listen: SocketAddr,
    /// Per-connection read buffer size in bytes.
    pub mtu: usize,
}

impl ServerConfig {
    /// Validates the configuration values are within acceptable bounds.
    /// Returns Ok(()) if valid, Err with description otherwise.
    pub fn validate(&self) -> Result<(), String> {
        // An encapsulation frame cannot exceed the header plus a 16-bit
        // length field's worth of payload.
        const MAX_MTU: usize = 7 + 65_535;
        if self.mtu < 576 {
            return Err("mtu below the IPv4 minimum reassembly size (576)".to_string());
        }
        if self.mtu > MAX_MTU {
            return Err(format!("mtu exceeds maximum frame size ({MAX_MTU} bytes)"));
        }
        Ok(())
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            listen: SocketAddr::from((Ipv6Addr::UNSPECIFIED, GCP_PORT)),
            mtu: args.mtu,
        }
    }
}
