//! RCP type registry: context-sensitive classification of TLV type bytes.
//!
//! TLV type bytes are reused across contexts; type 19 is ResponseCode inside
//! a Sequence but RpdIdentification inside RpdCapabilities. The registry is
//! therefore keyed by the pair of enclosing context and type byte. For each
//! pair it yields the semantic name and either the child context to recurse
//! under (complex) or the leaf codec to run and the domain-tree slot to
//! populate (leaf).

use crate::field::{self, FieldError};
use crate::types::{AdminStatus, NotificationType, Operation, OperStatus, ResponseCode};

/// The enclosing context a TLV type byte is interpreted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvContext {
    /// Root of an RCP payload.
    TopLevel,
    /// Inside an IRA (Identification and Resource Advertising) TLV.
    Ira,
    /// Inside a REX (RCP Object Exchange) TLV.
    Rex,
    /// Inside an NTF (Notify) TLV.
    Ntf,
    /// Inside a Sequence TLV.
    Sequence,
    /// Inside an RpdCapabilities TLV.
    RpdCapabilities,
    /// Inside an RpdIdentification TLV.
    RpdIdentification,
    /// Inside a DeviceLocation TLV.
    DeviceLocation,
    /// Inside an RpdRedirect TLV.
    RpdRedirect,
    /// Inside a GeneralNotification TLV.
    GeneralNotification,
    /// Inside an RpdInfo TLV.
    RpdInfo,
    /// Inside an IfEnet interface entry.
    IfEnet,
    /// Inside an IpAddress entry.
    IpAddress,
}

/// How a leaf value decodes to the text stored on the node and in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafCodec {
    /// 1-byte unsigned integer, decimal.
    U8,
    /// 2-byte big-endian unsigned integer, decimal.
    U16,
    /// 4-byte big-endian unsigned integer, decimal.
    U32,
    /// Octet string with inclusive length bounds.
    Str {
        /// Minimum value length.
        min: usize,
        /// Maximum value length.
        max: usize,
    },
    /// 6-byte MAC address.
    Mac,
    /// 4-byte IPv4 or 16-byte IPv6 address.
    Ip,
    /// 4-byte hundredths-of-a-second counter since the Unix epoch.
    EpochCentis,
    /// RFC 2579 DateAndTime, 8 or 11 bytes.
    DateAndTime,
    /// RCP operation code.
    Operation,
    /// RCP response code.
    ResponseCode,
    /// GeneralNotification type code.
    NotificationType,
    /// Interface administrative status code.
    AdminStatus,
    /// Interface operational status code.
    OperStatus,
    /// IANA interface type, 2 bytes.
    IfType,
    /// Truth value encoded as 1 (true) or 2 (false).
    BoolWord,
    /// Interface bandwidth in units of 1,000,000 bits per second.
    HighSpeedMbps,
    /// InetAddressType: 4 bytes, the last of which selects the family.
    InetAddrType,
    /// Address usage: unicast, anycast or broadcast.
    AddrUse,
    /// Address origin (manual, dhcp, ...).
    AddrOrigin,
    /// Address status (preferred, deprecated, ...).
    AddrStatus,
}

fn single(b: &[u8]) -> Result<u8, FieldError> {
    field::u8_field(b)?;
    Ok(b[0])
}

impl LeafCodec {
    /// Runs this codec over raw value bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] when the value length or encoding violates
    /// the codec; the error's `Display` is the node placeholder.
    pub fn decode(self, b: &[u8]) -> Result<String, FieldError> {
        match self {
            Self::U8 => field::u8_field(b),
            Self::U16 => field::u16_field(b),
            Self::U32 => field::u32_field(b),
            Self::Str { min, max } => field::string_field(b, min, max),
            Self::Mac => field::mac_field(b),
            Self::Ip => field::ip_field(b),
            Self::EpochCentis => field::epoch_centis_field(b),
            Self::DateAndTime => field::date_time_field(b),
            Self::Operation => {
                let code = single(b)?;
                Ok(Operation::from_code(code)
                    .map(|o| o.to_string())
                    .unwrap_or_default())
            }
            Self::ResponseCode => {
                let code = single(b)?;
                Ok(ResponseCode::from_code(code)
                    .map_or_else(|| "Unknown Notification".to_string(), |c| c.to_string()))
            }
            Self::NotificationType => {
                let code = single(b)?;
                Ok(NotificationType::from_code(code)
                    .map(|n| n.to_string())
                    .unwrap_or_default())
            }
            Self::AdminStatus => {
                let code = single(b)?;
                Ok(AdminStatus::from_code(code)
                    .map_or_else(|| "Unknown AdminStatus".to_string(), |s| s.to_string()))
            }
            Self::OperStatus => {
                let code = single(b)?;
                Ok(OperStatus::from_code(code)
                    .map_or_else(|| "Unknown OperStatus".to_string(), |s| s.to_string()))
            }
            Self::IfType => {
                let text = field::u16_field(b)?;
                Ok(match text.as_str() {
                    "1" => "other".to_string(),
                    "6" => "ethernetCsmacd".to_string(),
                    _ => text,
                })
            }
            Self::BoolWord => {
                let code = single(b)?;
                Ok(match code {
                    1 => "true".to_string(),
                    2 => "false".to_string(),
                    other => other.to_string(),
                })
            }
            Self::HighSpeedMbps => Ok(format!("{} Mbps", field::u32_field(b)?)),
            Self::InetAddrType => {
                if b.len() != 4 {
                    return Err(FieldError::Length {
                        got: b.len(),
                        want: "4".to_string(),
                    });
                }
                Ok(match b[3] {
                    1 => "ipv4".to_string(),
                    2 => "ipv6".to_string(),
                    _ => "Unknown InetAddressType".to_string(),
                })
            }
            Self::AddrUse => {
                let code = single(b)?;
                Ok(match code {
                    1 => "unicast".to_string(),
                    2 => "anycast".to_string(),
                    3 => "broadcast".to_string(),
                    _ => "Unknown Type".to_string(),
                })
            }
            Self::AddrOrigin => {
                let code = single(b)?;
                Ok(match code {
                    1 => "other".to_string(),
                    2 => "manual".to_string(),
                    3 => "wellKnown".to_string(),
                    4 => "dhcp".to_string(),
                    5 => "routerAdv".to_string(),
                    _ => "Unknown Origin".to_string(),
                })
            }
            Self::AddrStatus => {
                let code = single(b)?;
                Ok(match code {
                    1 => "preferred".to_string(),
                    2 => "deprecated".to_string(),
                    3 => "invalid".to_string(),
                    4 => "inaccessible".to_string(),
                    5 => "unknown".to_string(),
                    6 => "tentative".to_string(),
                    7 => "duplicate".to_string(),
                    8 => "optimistic".to_string(),
                    _ => "Unknown Status".to_string(),
                })
            }
        }
    }
}

/// Field of the RpdIdentification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum IdentField {
    VendorName,
    VendorId,
    ModelNumber,
    DeviceMacAddress,
    CurrentSwVersion,
    BootRomVersion,
    DeviceDescription,
    DeviceAlias,
    SerialNumber,
    UsBurstReceiverVendorId,
    UsBurstReceiverModelNumber,
    UsBurstReceiverDriverVersion,
    UsBurstReceiverSerialNumber,
    RpdRcpProtocolVersion,
    RpdRcpSchemaVersion,
    HwRevision,
    AssetId,
    VspSelector,
    CurrentSwImageLastUpdate,
    CurrentSwImageName,
    CurrentSwImageServer,
    CurrentSwImageIndex,
}

/// Field of the DeviceLocation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LocationField {
    Description,
    Latitude,
    Longitude,
}

/// Field of one IfEnet interface entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EnetField {
    PortIndex,
    Name,
    Description,
    Type,
    Alias,
    Mtu,
    PhysAddress,
    AdminStatus,
    OperStatus,
    LastChange,
    HighSpeed,
    LinkUpDownTrapEnable,
    PromiscuousMode,
    ConnectorPresent,
}

/// Field of one IpAddress entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AddrField {
    AddrType,
    Address,
    PortIndex,
    Type,
    PrefixLen,
    Origin,
    Status,
    Created,
    LastChanged,
}

/// The domain-tree slot a decoded leaf value is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Sequence number of the enclosing variant's Sequence.
    SequenceNumber,
    /// Operation of the enclosing variant's Sequence.
    Operation,
    /// Response code of the enclosing variant's Sequence.
    ResponseCode,
    /// GeneralNotification type.
    NotificationType,
    /// Appended to the ordered list of redirect targets.
    RedirectAddress,
    /// Field of the RpdIdentification record.
    Ident(IdentField),
    /// Field of the DeviceLocation record.
    Location(LocationField),
    /// Field of the current IfEnet entry.
    Enet(EnetField),
    /// Field of the current IpAddress entry.
    Addr(AddrField),
}

/// Classification of a recognised (context, type byte) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvKind {
    /// A complex TLV whose value parses under the given child context.
    Complex(TlvContext),
    /// A leaf TLV.
    Leaf {
        /// Decoder for the value bytes.
        codec: LeafCodec,
        /// Domain-tree destination.
        slot: Slot,
    },
}

/// Registry entry for a recognised (context, type byte) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvSpec {
    /// Semantic name of the TLV under its context.
    pub name: &'static str,
    /// Complex or leaf classification.
    pub kind: TlvKind,
}

const fn complex(name: &'static str, child: TlvContext) -> TlvSpec {
    TlvSpec {
        name,
        kind: TlvKind::Complex(child),
    }
}

const fn leaf(name: &'static str, codec: LeafCodec, slot: Slot) -> TlvSpec {
    TlvSpec {
        name,
        kind: TlvKind::Leaf { codec, slot },
    }
}

const STR: LeafCodec = LeafCodec::Str { min: 0, max: 255 };

/// Looks up the classification of `tlv_type` under `ctx`.
///
/// Returns `None` for type bytes with no registry entry; the parser keeps
/// those as raw nodes.
#[must_use]
pub fn lookup(ctx: TlvContext, tlv_type: u8) -> Option<TlvSpec> {
    use self::AddrField as A;
    use self::EnetField as E;
    use self::IdentField as I;
    use self::LeafCodec as C;
    use self::LocationField as L;
    use self::TlvContext as Ctx;

    let spec = match (ctx, tlv_type) {
        (Ctx::TopLevel, 1) => complex("IRA", Ctx::Ira),
        (Ctx::TopLevel, 2) => complex("REX", Ctx::Rex),
        (Ctx::TopLevel, 3) => complex("NTF", Ctx::Ntf),

        (Ctx::Ira | Ctx::Rex | Ctx::Ntf, 9) => complex("Sequence", Ctx::Sequence),
        (Ctx::Rex, 19) => leaf("ResponseCode", C::ResponseCode, Slot::ResponseCode),

        (Ctx::Sequence, 10) => leaf("SequenceNumber", C::U16, Slot::SequenceNumber),
        (Ctx::Sequence, 11) => leaf("Operation", C::Operation, Slot::Operation),
        (Ctx::Sequence, 19) => leaf("ResponseCode", C::ResponseCode, Slot::ResponseCode),
        (Ctx::Sequence, 25) => complex("RpdRedirect", Ctx::RpdRedirect),
        (Ctx::Sequence, 50) => complex("RpdCapabilities", Ctx::RpdCapabilities),
        (Ctx::Sequence, 86) => complex("GeneralNotification", Ctx::GeneralNotification),
        (Ctx::Sequence, 100) => complex("RpdInfo", Ctx::RpdInfo),

        (Ctx::RpdCapabilities, 19) => complex("RpdIdentification", Ctx::RpdIdentification),
        (Ctx::RpdCapabilities, 24) => complex("DeviceLocation", Ctx::DeviceLocation),

        (Ctx::RpdIdentification, 1) => leaf("VendorName", STR, Slot::Ident(I::VendorName)),
        (Ctx::RpdIdentification, 2) => leaf("VendorId", C::U16, Slot::Ident(I::VendorId)),
        (Ctx::RpdIdentification, 3) => leaf("ModelNumber", STR, Slot::Ident(I::ModelNumber)),
        (Ctx::RpdIdentification, 4) => {
            leaf("DeviceMacAddress", C::Mac, Slot::Ident(I::DeviceMacAddress))
        }
        (Ctx::RpdIdentification, 5) => {
            leaf("CurrentSwVersion", STR, Slot::Ident(I::CurrentSwVersion))
        }
        (Ctx::RpdIdentification, 6) => leaf("BootRomVersion", STR, Slot::Ident(I::BootRomVersion)),
        (Ctx::RpdIdentification, 7) => {
            leaf("DeviceDescription", STR, Slot::Ident(I::DeviceDescription))
        }
        (Ctx::RpdIdentification, 8) => leaf("DeviceAlias", STR, Slot::Ident(I::DeviceAlias)),
        (Ctx::RpdIdentification, 9) => leaf("SerialNumber", STR, Slot::Ident(I::SerialNumber)),
        (Ctx::RpdIdentification, 10) => leaf(
            "UsBurstReceiverVendorId",
            C::U16,
            Slot::Ident(I::UsBurstReceiverVendorId),
        ),
        (Ctx::RpdIdentification, 11) => leaf(
            "UsBurstReceiverModelNumber",
            C::Str { min: 0, max: 16 },
            Slot::Ident(I::UsBurstReceiverModelNumber),
        ),
        (Ctx::RpdIdentification, 12) => leaf(
            "UsBurstReceiverDriverVersion",
            C::Str { min: 0, max: 16 },
            Slot::Ident(I::UsBurstReceiverDriverVersion),
        ),
        (Ctx::RpdIdentification, 13) => leaf(
            "UsBurstReceiverSerialNumber",
            C::Str { min: 0, max: 16 },
            Slot::Ident(I::UsBurstReceiverSerialNumber),
        ),
        (Ctx::RpdIdentification, 14) => leaf(
            "RpdRcpProtocolVersion",
            C::Str { min: 3, max: 32 },
            Slot::Ident(I::RpdRcpProtocolVersion),
        ),
        (Ctx::RpdIdentification, 15) => leaf(
            "RpdRcpSchemaVersion",
            C::Str { min: 5, max: 32 },
            Slot::Ident(I::RpdRcpSchemaVersion),
        ),
        (Ctx::RpdIdentification, 16) => leaf("HwRevision", STR, Slot::Ident(I::HwRevision)),
        (Ctx::RpdIdentification, 17) => leaf(
            "AssetId",
            C::Str { min: 0, max: 32 },
            Slot::Ident(I::AssetId),
        ),
        (Ctx::RpdIdentification, 18) => leaf(
            "VspSelector",
            C::Str { min: 0, max: 16 },
            Slot::Ident(I::VspSelector),
        ),
        (Ctx::RpdIdentification, 19) => leaf(
            "CurrentSwImageLastUpdate",
            C::DateAndTime,
            Slot::Ident(I::CurrentSwImageLastUpdate),
        ),
        (Ctx::RpdIdentification, 20) => leaf(
            "CurrentSwImageName",
            STR,
            Slot::Ident(I::CurrentSwImageName),
        ),
        (Ctx::RpdIdentification, 21) => leaf(
            "CurrentSwImageServer",
            C::Ip,
            Slot::Ident(I::CurrentSwImageServer),
        ),
        (Ctx::RpdIdentification, 22) => leaf(
            "CurrrentSwImageIndex",
            C::U8,
            Slot::Ident(I::CurrentSwImageIndex),
        ),

        (Ctx::DeviceLocation, 1) => leaf("Description", STR, Slot::Location(L::Description)),
        (Ctx::DeviceLocation, 2) => leaf(
            "Latitude",
            C::Str { min: 9, max: 9 },
            Slot::Location(L::Latitude),
        ),
        (Ctx::DeviceLocation, 3) => leaf(
            "Longitude",
            C::Str { min: 10, max: 10 },
            Slot::Location(L::Longitude),
        ),

        (Ctx::RpdRedirect, 1) => leaf("RedirectIpAddress", C::Ip, Slot::RedirectAddress),

        (Ctx::GeneralNotification, 1) => {
            leaf("NotificationType", C::NotificationType, Slot::NotificationType)
        }

        (Ctx::RpdInfo, 8) => complex("IfEnet", Ctx::IfEnet),
        (Ctx::RpdInfo, 15) => complex("IpAddress", Ctx::IpAddress),

        (Ctx::IfEnet, 1) => leaf("EnetPortIndex", C::U8, Slot::Enet(E::PortIndex)),
        (Ctx::IfEnet, 2) => leaf("Name", STR, Slot::Enet(E::Name)),
        (Ctx::IfEnet, 3) => leaf("Description", STR, Slot::Enet(E::Description)),
        (Ctx::IfEnet, 4) => leaf("Type", C::IfType, Slot::Enet(E::Type)),
        (Ctx::IfEnet, 5) => leaf("Alias", STR, Slot::Enet(E::Alias)),
        (Ctx::IfEnet, 6) => leaf("Mtu", C::U32, Slot::Enet(E::Mtu)),
        (Ctx::IfEnet, 7) => leaf("PhysAddress", C::Mac, Slot::Enet(E::PhysAddress)),
        (Ctx::IfEnet, 8) => leaf("AdminStatus", C::AdminStatus, Slot::Enet(E::AdminStatus)),
        (Ctx::IfEnet, 9) => leaf("OperStatus", C::OperStatus, Slot::Enet(E::OperStatus)),
        (Ctx::IfEnet, 10) => leaf("LastChange", C::EpochCentis, Slot::Enet(E::LastChange)),
        (Ctx::IfEnet, 11) => leaf("HighSpeed", C::HighSpeedMbps, Slot::Enet(E::HighSpeed)),
        (Ctx::IfEnet, 12) => leaf(
            "LinkUpDownTrapEnable",
            C::BoolWord,
            Slot::Enet(E::LinkUpDownTrapEnable),
        ),
        (Ctx::IfEnet, 13) => leaf("PromiscuousMode", C::BoolWord, Slot::Enet(E::PromiscuousMode)),
        (Ctx::IfEnet, 14) => leaf(
            "ConnectorPresent",
            C::BoolWord,
            Slot::Enet(E::ConnectorPresent),
        ),

        (Ctx::IpAddress, 1) => leaf("AddrType", C::InetAddrType, Slot::Addr(A::AddrType)),
        (Ctx::IpAddress, 2) => leaf("IpAddress", C::Ip, Slot::Addr(A::Address)),
        (Ctx::IpAddress, 3) => leaf("EnetPortIndex", C::U8, Slot::Addr(A::PortIndex)),
        (Ctx::IpAddress, 4) => leaf("Type", C::AddrUse, Slot::Addr(A::Type)),
        (Ctx::IpAddress, 5) => leaf("PrefixLen", C::U16, Slot::Addr(A::PrefixLen)),
        (Ctx::IpAddress, 6) => leaf("Origin", C::AddrOrigin, Slot::Addr(A::Origin)),
        (Ctx::IpAddress, 7) => leaf("Status", C::AddrStatus, Slot::Addr(A::Status)),
        (Ctx::IpAddress, 8) => leaf("Created", C::EpochCentis, Slot::Addr(A::Created)),
        (Ctx::IpAddress, 9) => leaf("LastChanged", C::EpochCentis, Slot::Addr(A::LastChanged)),

        _ => return None,
    };
    Some(spec)
}
