//! Codec for the Generic Control Plane (GCP) protocol used between a CCAP
//! Core and a Remote PHY Device (RPD).
//!
//! This crate provides:
//! - Leaf value decoders for RCP TLV payloads ([`field`])
//! - The TLV frame codec and decoded node tree ([`tlv`])
//! - The context-sensitive RCP type registry ([`registry`])
//! - The recursive TLV parser and domain-tree population ([`parser`])
//! - The JSON-friendly `GCP` domain model ([`model`])
//! - GCP message framing with typed bodies ([`message`])
//! - The TCP payload encapsulation ([`encap`])
//! - Protocol constants and closed wire value sets ([`types`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod encap;
pub mod field;
pub mod message;
pub mod model;
pub mod parser;
pub mod registry;
pub mod tlv;
pub mod types;

pub use model::Gcp;
pub use parser::{decode, RcpDecode};
