// ── Controller discovery ──
//
// Walks the host object tree: server root → BACnet interface → IP networks
// → device candidates (recursing through folders) → filtered controllers.
//
// A failure under one network only costs that network's contribution; a
// missing interface or an empty network list aborts the cycle.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::{BoxFuture, join_all};
use tracing::{debug, warn};

use logsweep_api::types::{ChildInfo, ObjectInfo, PropertyValue};
use logsweep_api::{Error as ApiError, HostApi};

use crate::config::ServiceConfig;
use crate::error::CoreError;
use crate::model::Controller;

/// Type of the BACnet interface object directly under the server root.
const BACNET_INTERFACE_TYPE: &str = "bacnet.Device";
/// Type of an IP network under the interface.
const IP_NETWORK_TYPE: &str = "bacnet.IPDataLink";
/// Folder type expanded recursively while collecting device candidates.
const FOLDER_TYPE: &str = "system.base.Folder";

/// Property a candidate must present with the configured vendor id.
const VENDOR_PROP: &str = "VendorIdentifier";
/// Property whose first two characters select the model family.
const MODEL_NAME_PROP: &str = "ModelName";

/// Discover the controller fleet under the viewer's server root.
///
/// Returns the recognized controllers sorted by path. The fatal conditions
/// (no server root, no BACnet interface, no IP networks) come back as
/// errors; everything below a network degrades to a smaller result.
pub async fn discover_controllers(
    host: &dyn HostApi,
    config: &ServiceConfig,
) -> Result<Vec<Arc<Controller>>, CoreError> {
    let root = host.resolve_server_root().await?;
    if root.is_empty() {
        return Err(CoreError::NoServerRoot);
    }

    let root_children = host.list_children(&root, false).await?;
    let interface = root_children
        .iter()
        .find(|c| c.type_name == BACNET_INTERFACE_TYPE)
        .ok_or_else(|| CoreError::NoBacnetInterface { root: root.clone() })?;

    let interface_children = host.list_children(&interface.path, false).await?;
    let networks: Vec<&ChildInfo> = interface_children
        .iter()
        .filter(|c| c.type_name == IP_NETWORK_TYPE)
        .collect();
    if networks.is_empty() {
        return Err(CoreError::NoIpNetworks {
            interface: interface.path.clone(),
        });
    }

    // One traversal per network; every branch is awaited before the flatten
    // so late folder expansions cannot be lost.
    let traversals = networks.iter().map(|n| collect_device_paths(host, &n.path));
    let mut paths = Vec::new();
    for (network, result) in networks.iter().zip(join_all(traversals).await) {
        match result {
            Ok(mut found) => paths.append(&mut found),
            Err(err) => {
                warn!(network = %network.path, error = %err, "skipping network, children listing failed");
            }
        }
    }

    let objects = match host.get_objects(&paths).await {
        Ok(map) => map,
        Err(err) => {
            warn!(error = %err, "object info batch failed, no candidates resolved");
            HashMap::new()
        }
    };

    let mut controllers: Vec<Arc<Controller>> = paths
        .iter()
        .filter_map(|path| objects.get(path))
        .filter(|info| is_recognized(info, config))
        .map(|info| Arc::new(Controller::from_object(info)))
        .collect();
    controllers.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(count = controllers.len(), "discovery complete");
    Ok(controllers)
}

/// Recursively collect non-folder children beneath `path`. Folder children
/// are expanded in parallel and each level's paths come back sorted.
fn collect_device_paths<'a>(
    host: &'a dyn HostApi,
    path: &'a str,
) -> BoxFuture<'a, Result<Vec<String>, ApiError>> {
    Box::pin(async move {
        let children = host.list_children(path, false).await?;

        let mut leaves = Vec::new();
        let mut folders = Vec::new();
        for child in children {
            if child.type_name == FOLDER_TYPE {
                folders.push(child.path);
            } else {
                leaves.push(child.path);
            }
        }

        let expansions = folders.iter().map(|f| collect_device_paths(host, f));
        for nested in join_all(expansions).await {
            leaves.extend(nested?);
        }
        leaves.sort_unstable();
        Ok(leaves)
    })
}

/// Vendor and model-family gate for discovered objects.
fn is_recognized(info: &ObjectInfo, config: &ServiceConfig) -> bool {
    let vendor = info
        .properties
        .get(VENDOR_PROP)
        .and_then(|p| p.presentation_value.as_deref());
    if vendor != Some(config.vendor_id.as_str()) {
        return false;
    }

    info.properties
        .get(MODEL_NAME_PROP)
        .and_then(PropertyValue::as_str)
        .and_then(|model| model.get(..2))
        .is_some_and(|prefix| config.model_prefixes.iter().any(|p| p == prefix))
}
