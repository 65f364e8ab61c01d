// ── Controllers ──

use logsweep_api::types::{ObjectInfo, PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};

/// A discovered field controller. Identity is `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    /// Display name: the last segment of the object path.
    pub name: String,
    /// Unique object path on the host.
    pub path: String,
    /// Reachability, derived from the status property at discovery time.
    pub online: bool,
    /// Full property map passed through from discovery.
    pub properties: PropertyMap,
}

impl Controller {
    /// Build a controller from resolved object info.
    ///
    /// A missing or non-numeric status property reads as offline rather
    /// than failing discovery.
    pub fn from_object(info: &ObjectInfo) -> Self {
        let online = info
            .properties
            .get("Status")
            .and_then(PropertyValue::as_i64)
            == Some(1);
        Self {
            name: path_leaf(&info.path).to_owned(),
            path: info.path.clone(),
            online,
            properties: info.properties.clone(),
        }
    }

    /// Flat projection of the identification properties, using the host's
    /// presentation values where present. Absent properties project to
    /// empty strings.
    pub fn info(&self) -> ControllerInfo {
        ControllerInfo {
            name: self.name.clone(),
            path: self.path.clone(),
            is_online: self.online,
            product_id: self.prop_text("ModelName"),
            serial_number: self.prop_text("SerialNumber"),
            firmware: self.prop_text("SoftwareVersion"),
            rstp: self.prop_text("RSTP"),
            rstp_status: self.prop_text("RSTPStatus"),
            mac_address: self.prop_text("MACAddress"),
            ip_address: self.prop_text("IPAddress"),
        }
    }

    fn prop_text(&self, name: &str) -> String {
        self.properties
            .get(name)
            .map_or_else(String::new, PropertyValue::display_text)
    }
}

/// Identification summary for one controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerInfo {
    pub name: String,
    pub path: String,
    pub is_online: bool,
    pub product_id: String,
    pub serial_number: String,
    pub firmware: String,
    pub rstp: String,
    pub rstp_status: String,
    pub mac_address: String,
    pub ip_address: String,
}

/// Last segment of a slash-separated object path.
fn path_leaf(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
