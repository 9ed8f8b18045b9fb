//! Recursive descent parser for RCP TLV sequences.
//!
//! The walk advances one TLV at a time, classifying each type byte under
//! its enclosing context. Complex TLVs recurse into their value under the
//! child context; leaves decode to text and write their domain-tree slot.
//! The parser owns the [`Gcp`] root and writes into it as it walks, so
//! nodes carry no back-references.

use crate::model::{Gcp, TopLevelVariant};
use crate::registry::{
    lookup, AddrField, EnetField, IdentField, LocationField, Slot, TlvContext, TlvKind,
};
use crate::tlv::{read_header, read_value, TlvError, TlvNode, HEADER_LEN};

/// Result of decoding an RCP TLV payload.
///
/// A framing error halts the walk at the innermost failure; everything
/// decoded up to that point is kept, so siblings of a bad TLV still report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcpDecode {
    /// Decoded top-level nodes, children nested, in wire order.
    pub nodes: Vec<TlvNode>,
    /// Domain tree populated from recognised leaves.
    pub gcp: Gcp,
    /// First framing error encountered, if the walk stopped early.
    pub error: Option<TlvError>,
}

/// Decodes an RCP TLV payload rooted at the Top-Level dispatcher.
#[must_use]
pub fn decode(buf: &[u8]) -> RcpDecode {
    let mut gcp = Gcp::default();
    let mut cursor = Cursor::default();
    let (nodes, error) = walk(TlvContext::TopLevel, buf, &mut gcp, &mut cursor);
    RcpDecode { nodes, gcp, error }
}

/// Position state threaded through the walk: which top-level variant is
/// being populated and which repeating-group entries are current.
#[derive(Debug, Default)]
struct Cursor {
    variant: Option<TopLevelVariant>,
    enet: Option<usize>,
    addr: Option<usize>,
}

fn walk(
    ctx: TlvContext,
    buf: &[u8],
    gcp: &mut Gcp,
    cursor: &mut Cursor,
) -> (Vec<TlvNode>, Option<TlvError>) {
    let mut nodes = Vec::new();
    let mut i = 0usize;

    while i < buf.len() {
        let remaining = buf.len() - i;
        if remaining < HEADER_LEN {
            let err = if i == 0 {
                TlvError::ShortHeader { remaining }
            } else {
                TlvError::TrailingBytes { remaining }
            };
            return (nodes, Some(err));
        }

        let (tlv_type, declared) = match read_header(buf, i) {
            Ok(header) => header,
            Err(err) => return (nodes, Some(err)),
        };
        let value = match read_value(buf, i, declared) {
            Ok(value) => value,
            Err(err) => return (nodes, Some(err)),
        };
        let length = declared as u16;

        match lookup(ctx, tlv_type) {
            Some(spec) => match spec.kind {
                TlvKind::Complex(child_ctx) => {
                    enter_container(child_ctx, gcp, cursor);
                    if declared > HEADER_LEN {
                        let (children, err) = walk(child_ctx, value, gcp, cursor);
                        nodes.push(TlvNode {
                            name: spec.name.to_string(),
                            tlv_type,
                            length,
                            complex: true,
                            value: None,
                            raw: Vec::new(),
                            children,
                        });
                        if err.is_some() {
                            return (nodes, err);
                        }
                    } else {
                        // Too small to hold a nested TLV; degrades to a leaf.
                        nodes.push(TlvNode {
                            name: spec.name.to_string(),
                            tlv_type,
                            length,
                            complex: false,
                            value: None,
                            raw: value.to_vec(),
                            children: Vec::new(),
                        });
                    }
                }
                TlvKind::Leaf { codec, slot } => {
                    let node = match codec.decode(value) {
                        Ok(text) => {
                            apply(gcp, cursor, slot, &text);
                            TlvNode::leaf(spec.name, tlv_type, value, text)
                        }
                        // Value errors stay on the node; the walk continues.
                        Err(err) => TlvNode::leaf(spec.name, tlv_type, value, err.to_string()),
                    };
                    nodes.push(node);
                }
            },
            None => nodes.push(TlvNode::unrecognised(tlv_type, value)),
        }

        i += HEADER_LEN + declared;
    }

    (nodes, None)
}

/// Performs the domain-tree side effects of entering a complex TLV:
/// variant selection, idempotent record allocation, and opening a fresh
/// entry for the repeating groups.
fn enter_container(child_ctx: TlvContext, gcp: &mut Gcp, cursor: &mut Cursor) {
    match child_ctx {
        TlvContext::Ira => {
            cursor.variant = Some(TopLevelVariant::Ira);
            gcp.variant_mut(TopLevelVariant::Ira);
        }
        TlvContext::Rex => {
            cursor.variant = Some(TopLevelVariant::Rex);
            gcp.variant_mut(TopLevelVariant::Rex);
        }
        TlvContext::Ntf => {
            cursor.variant = Some(TopLevelVariant::Ntf);
            gcp.variant_mut(TopLevelVariant::Ntf);
        }
        TlvContext::RpdCapabilities => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                seq.capabilities_mut();
            }
        }
        TlvContext::RpdIdentification => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                seq.capabilities_mut().identification_mut();
            }
        }
        TlvContext::DeviceLocation => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                seq.capabilities_mut().location_mut();
            }
        }
        TlvContext::RpdRedirect => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                seq.redirect_mut();
            }
        }
        TlvContext::GeneralNotification => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                seq.notification_mut();
            }
        }
        TlvContext::RpdInfo => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                seq.info_mut();
            }
            cursor.enet = None;
            cursor.addr = None;
        }
        TlvContext::IfEnet => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                let info = seq.info_mut();
                info.if_enet.push(Default::default());
                cursor.enet = Some(info.if_enet.len() - 1);
            }
        }
        TlvContext::IpAddress => {
            if let Some(seq) = sequence_mut(gcp, cursor) {
                let info = seq.info_mut();
                info.ip_address.push(Default::default());
                cursor.addr = Some(info.ip_address.len() - 1);
            }
        }
        TlvContext::TopLevel | TlvContext::Sequence => {}
    }
}

fn sequence_mut<'a>(gcp: &'a mut Gcp, cursor: &Cursor) -> Option<&'a mut crate::model::Sequence> {
    let variant = cursor.variant?;
    Some(&mut gcp.variant_mut(variant).sequence)
}

/// Writes a decoded leaf value into its domain-tree slot. Later occurrences
/// of a non-repeating leaf overwrite earlier ones; the redirect list is the
/// only leaf-level repeating group and appends instead.
fn apply(gcp: &mut Gcp, cursor: &Cursor, slot: Slot, text: &str) {
    let Some(seq) = sequence_mut(gcp, cursor) else {
        return;
    };
    match slot {
        Slot::SequenceNumber => seq.sequence_number = text.to_string(),
        Slot::Operation => seq.operation = text.to_string(),
        Slot::ResponseCode => seq.response_code = text.to_string(),
        Slot::NotificationType => {
            seq.notification_mut().notification_type = text.to_string();
        }
        Slot::RedirectAddress => {
            seq.redirect_mut().redirect_ip_address.push(text.to_string());
        }
        Slot::Ident(f) => {
            let ident = seq.capabilities_mut().identification_mut();
            let dest = match f {
                IdentField::VendorName => &mut ident.vendor_name,
                IdentField::VendorId => &mut ident.vendor_id,
                IdentField::ModelNumber => &mut ident.model_number,
                IdentField::DeviceMacAddress => &mut ident.device_mac_address,
                IdentField::CurrentSwVersion => &mut ident.current_sw_version,
                IdentField::BootRomVersion => &mut ident.boot_rom_version,
                IdentField::DeviceDescription => &mut ident.device_description,
                IdentField::DeviceAlias => &mut ident.device_alias,
                IdentField::SerialNumber => &mut ident.serial_number,
                IdentField::UsBurstReceiverVendorId => &mut ident.us_burst_receiver_vendor_id,
                IdentField::UsBurstReceiverModelNumber => {
                    &mut ident.us_burst_receiver_model_number
                }
                IdentField::UsBurstReceiverDriverVersion => {
                    &mut ident.us_burst_receiver_driver_version
                }
                IdentField::UsBurstReceiverSerialNumber => {
                    &mut ident.us_burst_receiver_serial_number
                }
                IdentField::RpdRcpProtocolVersion => &mut ident.rpd_rcp_protocol_version,
                IdentField::RpdRcpSchemaVersion => &mut ident.rpd_rcp_schema_version,
                IdentField::HwRevision => &mut ident.hw_revision,
                IdentField::AssetId => &mut ident.asset_id,
                IdentField::VspSelector => &mut ident.vsp_selector,
                IdentField::CurrentSwImageLastUpdate => &mut ident.current_sw_image_last_update,
                IdentField::CurrentSwImageName => &mut ident.current_sw_image_name,
                IdentField::CurrentSwImageServer => &mut ident.current_sw_image_server,
                IdentField::CurrentSwImageIndex => &mut ident.current_sw_image_index,
            };
            *dest = text.to_string();
        }
        Slot::Location(f) => {
            let loc = seq.capabilities_mut().location_mut();
            let dest = match f {
                LocationField::Description => &mut loc.description,
                LocationField::Latitude => &mut loc.latitude,
                LocationField::Longitude => &mut loc.longitude,
            };
            *dest = text.to_string();
        }
        Slot::Enet(f) => {
            let Some(index) = cursor.enet else { return };
            let Some(entry) = seq.info_mut().if_enet.get_mut(index) else {
                return;
            };
            match f {
                EnetField::PortIndex => entry.enet_port_index = text.to_string(),
                EnetField::Name => entry.name = text.to_string(),
                EnetField::Description => entry.description = text.to_string(),
                EnetField::Type => entry.if_type = text.to_string(),
                EnetField::Alias => entry.alias = text.to_string(),
                EnetField::Mtu => entry.mtu = text.to_string(),
                EnetField::PhysAddress => entry.phys_address = text.to_string(),
                EnetField::AdminStatus => entry.admin_status = text.to_string(),
                EnetField::OperStatus => entry.oper_status = text.to_string(),
                EnetField::LastChange => entry.last_change = text.to_string(),
                EnetField::HighSpeed => entry.high_speed = text.to_string(),
                EnetField::LinkUpDownTrapEnable => {
                    entry.link_up_down_trap_enable = text.to_string();
                }
                EnetField::PromiscuousMode => entry.promiscuous_mode = text.to_string(),
                EnetField::ConnectorPresent => entry.connector_present = Some(text == "true"),
            }
        }
        Slot::Addr(f) => {
            let Some(index) = cursor.addr else { return };
            let Some(entry) = seq.info_mut().ip_address.get_mut(index) else {
                return;
            };
            match f {
                AddrField::AddrType => entry.addr_type = text.to_string(),
                AddrField::Address => entry.ip_address = text.to_string(),
                AddrField::PortIndex => entry.enet_port_index = text.to_string(),
                AddrField::Type => entry.addr_use = text.to_string(),
                AddrField::PrefixLen => entry.prefix_len = text.to_string(),
                AddrField::Origin => entry.origin = text.to_string(),
                AddrField::Status => entry.status = text.to_string(),
                AddrField::Created => entry.created = text.to_string(),
                AddrField::LastChanged => entry.last_changed = text.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::{encode_nodes, preorder};

    // NTF > Sequence > SequenceNumber(1), Operation(Write).
    fn small_ntf() -> Vec<u8> {
        vec![
            3, 0x00, 0x0c, // NTF, 12 bytes
            9, 0x00, 0x09, // Sequence, 9 bytes
            10, 0x00, 0x02, 0x00, 0x01, // SequenceNumber = 1
            11, 0x00, 0x01, 0x02, // Operation = Write
        ]
    }

    #[test]
    fn walks_nested_complex_tlvs() {
        let decoded = decode(&small_ntf());
        assert_eq!(decoded.error, None);
        assert_eq!(decoded.nodes.len(), 1);

        let names: Vec<&str> = preorder(&decoded.nodes).map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["NTF", "Sequence", "SequenceNumber", "Operation"]);

        let seq = &decoded.gcp.ntf.as_ref().unwrap().sequence;
        assert_eq!(seq.sequence_number, "1");
        assert_eq!(seq.operation, "Write");
        assert!(decoded.gcp.ira.is_none());
        assert!(decoded.gcp.rex.is_none());
    }

    #[test]
    fn flat_list_totals_match_input_length() {
        let buf = small_ntf();
        let decoded = decode(&buf);
        let top_total: usize = decoded
            .nodes
            .iter()
            .map(|n| HEADER_LEN + usize::from(n.length))
            .sum();
        assert_eq!(top_total, buf.len());

        // Each complex node's length covers its immediate children.
        for node in preorder(&decoded.nodes).filter(|n| n.complex) {
            let child_total: usize = node
                .children
                .iter()
                .map(|c| HEADER_LEN + usize::from(c.length))
                .sum();
            assert_eq!(usize::from(node.length), child_total);
        }
    }

    #[test]
    fn round_trip_is_byte_exact() {
        let buf = small_ntf();
        let decoded = decode(&buf);
        assert_eq!(encode_nodes(&decoded.nodes).unwrap(), buf);
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        let decoded = decode(&[]);
        assert!(decoded.nodes.is_empty());
        assert_eq!(decoded.error, None);
        assert!(decoded.gcp.is_empty());
    }

    #[test]
    fn truncated_value_emits_no_partial_node() {
        let decoded = decode(&[0x01, 0x00, 0x10, 0x00]);
        assert!(decoded.nodes.is_empty());
        assert_eq!(
            decoded.error,
            Some(TlvError::TruncatedValue {
                declared: 16,
                available: 1
            })
        );
    }

    #[test]
    fn trailing_bytes_after_a_node_are_an_error() {
        let mut buf = small_ntf();
        buf.extend_from_slice(&[0xaa, 0xbb]);
        let decoded = decode(&buf);
        assert_eq!(decoded.nodes.len(), 1);
        assert_eq!(decoded.error, Some(TlvError::TrailingBytes { remaining: 2 }));
        // The complete node before the residue still decoded.
        assert_eq!(
            decoded.gcp.ntf.as_ref().unwrap().sequence.sequence_number,
            "1"
        );
    }

    #[test]
    fn short_input_is_a_short_header() {
        let decoded = decode(&[0x02, 0x00]);
        assert!(decoded.nodes.is_empty());
        assert_eq!(decoded.error, Some(TlvError::ShortHeader { remaining: 2 }));
    }

    #[test]
    fn inner_framing_error_keeps_outer_partial() {
        // NTF whose Sequence claims more bytes than the NTF value holds.
        let buf = vec![
            3, 0x00, 0x05, // NTF, 5 bytes
            9, 0x00, 0x10, 0x00, 0x01, // Sequence claims 16, only 2 present
        ];
        let decoded = decode(&buf);
        assert_eq!(decoded.nodes.len(), 1);
        assert_eq!(decoded.nodes[0].name, "NTF");
        assert!(decoded.nodes[0].children.is_empty());
        assert!(matches!(
            decoded.error,
            Some(TlvError::TruncatedValue { declared: 16, .. })
        ));
    }

    #[test]
    fn unrecognised_type_becomes_raw_node() {
        // Sequence containing type 42 (unregistered), then a valid leaf.
        let buf = vec![
            3, 0x00, 0x0e, // NTF
            9, 0x00, 0x0b, // Sequence
            42, 0x00, 0x03, 0xde, 0xad, 0x00, // unknown
            10, 0x00, 0x02, 0x00, 0x07, // SequenceNumber = 7
        ];
        let decoded = decode(&buf);
        assert_eq!(decoded.error, None);
        let seq_node = &decoded.nodes[0].children[0];
        let raw = &seq_node.children[0];
        assert_eq!(raw.name, "42");
        assert!(!raw.complex);
        assert_eq!(raw.value, None);
        assert_eq!(raw.raw, vec![0xde, 0xad, 0x00]);
        // The unknown node contributed nothing to the domain tree, and the
        // sibling after it still decoded.
        assert_eq!(
            decoded.gcp.ntf.as_ref().unwrap().sequence.sequence_number,
            "7"
        );
    }

    #[test]
    fn zero_length_value_is_an_empty_leaf() {
        // RpdIdentification with an empty AssetId.
        let buf = vec![
            3, 0x00, 0x0f, //
            9, 0x00, 0x0c, //
            50, 0x00, 0x09, //
            19, 0x00, 0x06, //
            17, 0x00, 0x00, // AssetId, length 0
            42, 0x00, 0x00, // unknown, length 0
        ];
        let decoded = decode(&buf);
        assert_eq!(decoded.error, None);
        let ident_node = &decoded.nodes[0].children[0].children[0].children[0];
        assert_eq!(ident_node.name, "RpdIdentification");
        assert_eq!(ident_node.children[0].name, "AssetId");
        assert_eq!(ident_node.children[0].value.as_deref(), Some(""));
        assert_eq!(ident_node.children[0].length, 0);
    }

    #[test]
    fn small_complex_degrades_to_leaf() {
        // A Sequence (registry-complex) with a 3-byte value cannot hold a
        // nested TLV and is kept as a leaf.
        let buf = vec![
            3, 0x00, 0x06, //
            9, 0x00, 0x03, 0x01, 0x02, 0x03,
        ];
        let decoded = decode(&buf);
        assert_eq!(decoded.error, None);
        let seq_node = &decoded.nodes[0].children[0];
        assert_eq!(seq_node.name, "Sequence");
        assert!(!seq_node.complex);
        assert_eq!(seq_node.raw, vec![0x01, 0x02, 0x03]);
        // Degraded nodes still round-trip.
        assert_eq!(encode_nodes(&decoded.nodes).unwrap(), buf);
    }

    #[test]
    fn value_error_is_captured_and_walk_continues() {
        // SequenceNumber with a 3-byte value (want 2), then Operation.
        let buf = vec![
            3, 0x00, 0x0d, //
            9, 0x00, 0x0a, //
            10, 0x00, 0x03, 0x00, 0x01, 0x02, // bad length
            11, 0x00, 0x01, 0x02, // Operation = Write
        ];
        let decoded = decode(&buf);
        assert_eq!(decoded.error, None);
        let seq_node = &decoded.nodes[0].children[0];
        assert_eq!(
            seq_node.children[0].value.as_deref(),
            Some("invalid length: 3, want: 2")
        );
        let seq = &decoded.gcp.ntf.as_ref().unwrap().sequence;
        // The bad leaf wrote nothing; its sibling did.
        assert_eq!(seq.sequence_number, "");
        assert_eq!(seq.operation, "Write");
    }

    #[test]
    fn repeating_groups_append_on_container_entry() {
        // REX > Sequence > RpdInfo with two IfEnet entries and one IpAddress.
        let buf = vec![
            2, 0x00, 0x28, // REX, 40
            9, 0x00, 0x25, // Sequence, 37
            100, 0x00, 0x22, // RpdInfo, 34
            8, 0x00, 0x07, // IfEnet #1, 7
            1, 0x00, 0x01, 0x02, // EnetPortIndex = 2
            2, 0x00, 0x00, // Name, empty
            8, 0x00, 0x0b, // IfEnet #2, 11
            1, 0x00, 0x01, 0x01, // EnetPortIndex = 1
            2, 0x00, 0x04, b'v', b'b', b'h', b'0', // Name = vbh0
            15, 0x00, 0x07, // IpAddress #1, 7
            3, 0x00, 0x01, 0x04, // EnetPortIndex = 4
            5, 0x00, 0x00, // PrefixLen, empty (value error)
        ];
        let decoded = decode(&buf);
        assert_eq!(decoded.error, None);

        let info = decoded
            .gcp
            .rex
            .as_ref()
            .unwrap()
            .sequence
            .rpd_info
            .as_ref()
            .unwrap();
        assert_eq!(info.if_enet.len(), 2);
        assert_eq!(info.if_enet[0].enet_port_index, "2");
        assert_eq!(info.if_enet[0].name, "");
        assert_eq!(info.if_enet[1].enet_port_index, "1");
        assert_eq!(info.if_enet[1].name, "vbh0");
        assert_eq!(info.ip_address.len(), 1);
        assert_eq!(info.ip_address[0].enet_port_index, "4");
        assert_eq!(info.ip_address[0].prefix_len, "");
    }

    #[test]
    fn duplicate_non_repeating_leaf_overwrites() {
        let buf = vec![
            3, 0x00, 0x0d, //
            9, 0x00, 0x0a, //
            10, 0x00, 0x02, 0x00, 0x01, // SequenceNumber = 1
            10, 0x00, 0x02, 0x00, 0x05, // SequenceNumber = 5
        ];
        let decoded = decode(&buf);
        assert_eq!(
            decoded.gcp.ntf.as_ref().unwrap().sequence.sequence_number,
            "5"
        );
    }
}
