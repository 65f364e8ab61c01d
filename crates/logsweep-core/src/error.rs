// ── Core error types ──
//
// User-facing errors from logsweep-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<logsweep_api::Error>`
// impl translates transport-layer errors into one wrapped variant that
// keeps the details an operator needs.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fatal discovery errors ───────────────────────────────────────
    /// The viewer's server root resolved to nothing.
    #[error("Could not resolve the server root")]
    NoServerRoot,

    /// No BACnet interface object under the server root.
    #[error("No BACnet interface found under {root}")]
    NoBacnetInterface { root: String },

    /// The BACnet interface exposes no IP networks.
    #[error("No BACnet IP networks found under {interface}")]
    NoIpNetworks { interface: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ── Host errors (wrapped, not exposed raw) ───────────────────────
    /// A host call failed somewhere with no local recovery policy.
    #[error("Host error: {message}")]
    Host {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        transient: bool,
    },
}

impl CoreError {
    /// Returns `true` when retrying the load cycle later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Host { transient: true, .. })
    }

    /// Returns `true` for errors meaning the expected device tree is not
    /// there at all, as opposed to the host misbehaving.
    pub fn is_tree_missing(&self) -> bool {
        matches!(
            self,
            Self::NoServerRoot | Self::NoBacnetInterface { .. } | Self::NoIpNetworks { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<logsweep_api::Error> for CoreError {
    fn from(err: logsweep_api::Error) -> Self {
        let transient = err.is_transient();
        let status = match &err {
            logsweep_api::Error::Host { status, .. } => Some(*status),
            logsweep_api::Error::Transport(e) => e.status().map(u16::from),
            _ => None,
        };
        CoreError::Host {
            message: err.to_string(),
            status,
            transient,
        }
    }
}
