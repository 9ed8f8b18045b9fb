//! JSON-friendly GCP domain tree populated during RCP decoding.
//!
//! Field names in the serialized form are the ones consumers of the
//! protocol expect; several carry spaces, and one keeps the historical
//! `CurrrentSwImageIndex` spelling. Empty fields are omitted.

use serde::Serialize;

fn not_true(v: &Option<bool>) -> bool {
    !matches!(v, Some(true))
}

/// Selector for one of the three top-level RCP variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelVariant {
    /// Identification and Resource Advertising.
    Ira,
    /// RCP Object Exchange.
    Rex,
    /// Notify.
    Ntf,
}

/// Root of the decoded domain tree. At most one variant is populated per
/// decode of a top-level TLV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Gcp {
    /// Identification and Resource Advertising.
    #[serde(rename = "IRA", skip_serializing_if = "Option::is_none")]
    pub ira: Option<TopLevel>,
    /// RCP Object Exchange.
    #[serde(rename = "REX", skip_serializing_if = "Option::is_none")]
    pub rex: Option<TopLevel>,
    /// Notify.
    #[serde(rename = "NTF", skip_serializing_if = "Option::is_none")]
    pub ntf: Option<TopLevel>,
}

impl Gcp {
    /// Returns the given variant, allocating it on first use.
    pub fn variant_mut(&mut self, variant: TopLevelVariant) -> &mut TopLevel {
        let slot = match variant {
            TopLevelVariant::Ira => &mut self.ira,
            TopLevelVariant::Rex => &mut self.rex,
            TopLevelVariant::Ntf => &mut self.ntf,
        };
        slot.get_or_insert_with(TopLevel::default)
    }

    /// Whether no variant has been populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ira.is_none() && self.rex.is_none() && self.ntf.is_none()
    }
}

/// One top-level RCP variant; carries a single Sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopLevel {
    /// The Sequence container of this variant.
    #[serde(rename = "Sequence")]
    pub sequence: Sequence,
}

/// The Sequence container inside a top-level variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sequence {
    /// Sequence number of the enclosed operation.
    #[serde(rename = "Sequence Number", skip_serializing_if = "String::is_empty")]
    pub sequence_number: String,
    /// Operation code rendered as text.
    #[serde(rename = "Operation", skip_serializing_if = "String::is_empty")]
    pub operation: String,
    /// Capability advertisement from the RPD.
    #[serde(rename = "RPD Capabilities", skip_serializing_if = "Option::is_none")]
    pub rpd_capabilities: Option<RpdCapabilities>,
    /// Response code rendered as text.
    #[serde(rename = "Response Code", skip_serializing_if = "String::is_empty")]
    pub response_code: String,
    /// Ordered list of CCAP Cores the RPD is redirected to.
    #[serde(rename = "RPD Redirect", skip_serializing_if = "Option::is_none")]
    pub rpd_redirect: Option<RpdRedirect>,
    /// Event report from the RPD.
    #[serde(rename = "General Notification", skip_serializing_if = "Option::is_none")]
    pub general_notification: Option<GeneralNotification>,
    /// Interface and addressing details of the RPD.
    #[serde(rename = "RPD Info", skip_serializing_if = "Option::is_none")]
    pub rpd_info: Option<RpdInfo>,
}

impl Sequence {
    /// Returns the capabilities record, allocating it on first use.
    pub fn capabilities_mut(&mut self) -> &mut RpdCapabilities {
        self.rpd_capabilities.get_or_insert_with(RpdCapabilities::default)
    }

    /// Returns the redirect record, allocating it on first use.
    pub fn redirect_mut(&mut self) -> &mut RpdRedirect {
        self.rpd_redirect.get_or_insert_with(RpdRedirect::default)
    }

    /// Returns the notification record, allocating it on first use.
    pub fn notification_mut(&mut self) -> &mut GeneralNotification {
        self.general_notification
            .get_or_insert_with(GeneralNotification::default)
    }

    /// Returns the RPD info record, allocating it on first use.
    pub fn info_mut(&mut self) -> &mut RpdInfo {
        self.rpd_info.get_or_insert_with(RpdInfo::default)
    }
}

/// Set of identifying parameters and location advertised by the RPD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RpdCapabilities {
    /// Identifying parameters of the device.
    #[serde(rename = "RpdIdentification", skip_serializing_if = "Option::is_none")]
    pub rpd_identification: Option<RpdIdentification>,
    /// Installation location of the device.
    #[serde(rename = "Device Location", skip_serializing_if = "Option::is_none")]
    pub device_location: Option<DeviceLocation>,
}

impl RpdCapabilities {
    /// Returns the identification record, allocating it on first use.
    pub fn identification_mut(&mut self) -> &mut RpdIdentification {
        self.rpd_identification
            .get_or_insert_with(RpdIdentification::default)
    }

    /// Returns the location record, allocating it on first use.
    pub fn location_mut(&mut self) -> &mut DeviceLocation {
        self.device_location.get_or_insert_with(DeviceLocation::default)
    }
}

/// Identifying parameters communicated through RpdIdentification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RpdIdentification {
    /// Manufacturer name; the format is vendor proprietary.
    #[serde(rename = "VendorName", skip_serializing_if = "String::is_empty")]
    pub vendor_name: String,
    /// IANA enterprise code of the manufacturer.
    #[serde(rename = "VendorId", skip_serializing_if = "String::is_empty")]
    pub vendor_id: String,
    /// Model name and number assigned to the RPD.
    #[serde(rename = "ModelNumber", skip_serializing_if = "String::is_empty")]
    pub model_number: String,
    /// Main MAC address of the RPD.
    #[serde(rename = "DeviceMacAddress", skip_serializing_if = "String::is_empty")]
    pub device_mac_address: String,
    /// Software version currently running.
    #[serde(rename = "CurrentSwVersion", skip_serializing_if = "String::is_empty")]
    pub current_sw_version: String,
    /// BootRom version currently installed.
    #[serde(rename = "BootRomVersion", skip_serializing_if = "String::is_empty")]
    pub boot_rom_version: String,
    /// Short description selected by the manufacturer.
    #[serde(rename = "DeviceDescription", skip_serializing_if = "String::is_empty")]
    pub device_description: String,
    /// Device name assigned by the operator.
    #[serde(rename = "DeviceAlias", skip_serializing_if = "String::is_empty")]
    pub device_alias: String,
    /// Serial number of the RPD.
    #[serde(rename = "SerialNumber", skip_serializing_if = "String::is_empty")]
    pub serial_number: String,
    /// IANA enterprise code of the upstream burst receiver's manufacturer.
    #[serde(
        rename = "UsBurstReceiverVendorId",
        skip_serializing_if = "String::is_empty"
    )]
    pub us_burst_receiver_vendor_id: String,
    /// Model number of the upstream burst receiver.
    #[serde(
        rename = "UsBurstReceiverModelNumber",
        skip_serializing_if = "String::is_empty"
    )]
    pub us_burst_receiver_model_number: String,
    /// Driver version supplied by the upstream burst receiver vendor.
    #[serde(
        rename = "UsBurstReceiverDriverVersion",
        skip_serializing_if = "String::is_empty"
    )]
    pub us_burst_receiver_driver_version: String,
    /// Serial number of the upstream burst receiver.
    #[serde(
        rename = "UsBurstReceiverSerialNumber",
        skip_serializing_if = "String::is_empty"
    )]
    pub us_burst_receiver_serial_number: String,
    /// RCP protocol version supported by the RPD.
    #[serde(
        rename = "RpdRcpProtocolVersion",
        skip_serializing_if = "String::is_empty"
    )]
    pub rpd_rcp_protocol_version: String,
    /// RCP schema version supported by the RPD.
    #[serde(rename = "RpdRcpSchemaVersion", skip_serializing_if = "String::is_empty")]
    pub rpd_rcp_schema_version: String,
    /// Hardware revision of the RPD.
    #[serde(rename = "HwRevision", skip_serializing_if = "String::is_empty")]
    pub hw_revision: String,
    /// Asset tracking identifier assigned by a network manager.
    #[serde(rename = "AssetId", skip_serializing_if = "String::is_empty")]
    pub asset_id: String,
    /// Vendor-specific pre-configuration selector.
    #[serde(rename = "VspSelector", skip_serializing_if = "String::is_empty")]
    pub vsp_selector: String,
    /// When the running software image was last updated.
    #[serde(
        rename = "CurrentSwImageLastUpdate",
        skip_serializing_if = "String::is_empty"
    )]
    pub current_sw_image_last_update: String,
    /// Name of the running software image.
    #[serde(rename = "CurrentSwImageName", skip_serializing_if = "String::is_empty")]
    pub current_sw_image_name: String,
    /// Server the running software image was downloaded from.
    #[serde(
        rename = "CurrentSwImageServer",
        skip_serializing_if = "String::is_empty"
    )]
    pub current_sw_image_server: String,
    /// Which software image is currently running.
    #[serde(
        rename = "CurrrentSwImageIndex",
        skip_serializing_if = "String::is_empty"
    )]
    pub current_sw_image_index: String,
}

/// Installation location reported through DeviceLocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceLocation {
    /// Operator-specific description of where the RPD is installed.
    #[serde(
        rename = "Device Location Description",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,
    /// ISO 6709 latitude string.
    #[serde(
        rename = "Geographic Location Latitude",
        skip_serializing_if = "String::is_empty"
    )]
    pub latitude: String,
    /// ISO 6709 longitude string.
    #[serde(
        rename = "Geographic Location Longitude",
        skip_serializing_if = "String::is_empty"
    )]
    pub longitude: String,
}

/// Ordered list of CCAP Cores the RPD is redirected to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RpdRedirect {
    /// Redirect target addresses, in wire order.
    #[serde(rename = "IP Address", skip_serializing_if = "Vec::is_empty")]
    pub redirect_ip_address: Vec<String>,
}

/// Event report carried in a GeneralNotification TLV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralNotification {
    /// The specific notification being sent.
    #[serde(rename = "Type", skip_serializing_if = "String::is_empty")]
    pub notification_type: String,
}

/// Interface and addressing details reported through RpdInfo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RpdInfo {
    /// Ethernet interface entries, in wire order.
    #[serde(rename = "IfEnet", skip_serializing_if = "Vec::is_empty")]
    pub if_enet: Vec<IfEnet>,
    /// Address entries, in wire order.
    #[serde(rename = "IpAddress", skip_serializing_if = "Vec::is_empty")]
    pub ip_address: Vec<IpAddressEntry>,
}

/// One Ethernet interface entry (RFC 2863 ifTable attributes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IfEnet {
    /// Unique index of this Ethernet port.
    #[serde(rename = "Port Index", skip_serializing_if = "String::is_empty")]
    pub enet_port_index: String,
    /// Interface name.
    #[serde(rename = "Name", skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Interface description.
    #[serde(rename = "Description", skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// IANA interface type.
    #[serde(rename = "Type", skip_serializing_if = "String::is_empty")]
    pub if_type: String,
    /// Interface alias assigned by the operator.
    #[serde(rename = "Alias", skip_serializing_if = "String::is_empty")]
    pub alias: String,
    /// Largest packet size in octets.
    #[serde(rename = "MTU", skip_serializing_if = "String::is_empty")]
    pub mtu: String,
    /// Address at the protocol sub-layer, normally a MAC address.
    #[serde(rename = "Physical Address", skip_serializing_if = "String::is_empty")]
    pub phys_address: String,
    /// Administrative state.
    #[serde(rename = "Admin State", skip_serializing_if = "String::is_empty")]
    pub admin_status: String,
    /// Operational state.
    #[serde(rename = "Operational State", skip_serializing_if = "String::is_empty")]
    pub oper_status: String,
    /// Uptime at the last operational state change.
    #[serde(rename = "Last Change", skip_serializing_if = "String::is_empty")]
    pub last_change: String,
    /// Estimated bandwidth.
    #[serde(rename = "Bandwidth", skip_serializing_if = "String::is_empty")]
    pub high_speed: String,
    /// Whether link up/down traps are generated.
    #[serde(
        rename = "LinkUpDownTrapEnable",
        skip_serializing_if = "String::is_empty"
    )]
    pub link_up_down_trap_enable: String,
    /// Whether the interface accepts frames not addressed to it.
    #[serde(rename = "PromiscuousMode", skip_serializing_if = "String::is_empty")]
    pub promiscuous_mode: String,
    /// Whether the interface sublayer has a physical connector.
    #[serde(rename = "Connector Present", skip_serializing_if = "not_true")]
    pub connector_present: Option<bool>,
}

/// One address entry of the RPD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpAddressEntry {
    /// Address family of the entry.
    #[serde(rename = "Address Type", skip_serializing_if = "String::is_empty")]
    pub addr_type: String,
    /// The address the entry describes.
    #[serde(rename = "IP Address", skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    /// Index of the Ethernet port the address is bound to.
    #[serde(rename = "Port Index", skip_serializing_if = "String::is_empty")]
    pub enet_port_index: String,
    /// Kind of traffic the address can carry.
    #[serde(rename = "Type", skip_serializing_if = "String::is_empty")]
    pub addr_use: String,
    /// Prefix length associated with the address.
    #[serde(rename = "Prefix Length", skip_serializing_if = "String::is_empty")]
    pub prefix_len: String,
    /// Origin of the address.
    #[serde(rename = "Origin", skip_serializing_if = "String::is_empty")]
    pub origin: String,
    /// Status of the address.
    #[serde(rename = "Status", skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Uptime when the entry was created.
    #[serde(rename = "Created", skip_serializing_if = "String::is_empty")]
    pub created: String,
    /// Uptime when the entry was last updated.
    #[serde(rename = "Last Changed", skip_serializing_if = "String::is_empty")]
    pub last_changed: String,
}
