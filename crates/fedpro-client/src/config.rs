//! Engine and RTI configuration.
//!
//! Two layers of configuration mirror the two addresses involved: the
//! [`ClientConfig`] names the FedPro bridge endpoint the engine dials plus
//! its timeouts, while the [`RtiConfiguration`] is forwarded opaquely
//! inside the HLA `connect` payload and names the RTI behind the bridge.

use std::time::Duration;

use fedpro_core::SessionConfig;

/// Default FedPro bridge host.
pub const DEFAULT_FEDPRO_HOST: &str = "127.0.0.1";

/// Default FedPro bridge port.
pub const DEFAULT_FEDPRO_PORT: u16 = 15164;

/// Default timeout for `connect` and the session handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for handle queries and most services.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for attribute updates and interactions.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default duration of one callback-evocation pump.
pub const DEFAULT_EVOKE_DURATION: Duration = Duration::from_secs(15);

/// How callbacks are delivered to the federate ambassador.
///
/// The engine implements evoked semantics only; `Immediate` is accepted
/// and recorded but treated as advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum CallbackModel {
    /// Callbacks delivered from a background context (advisory only).
    Immediate = 0,
    /// Callbacks delivered when the host pumps `evoke_callbacks`.
    #[default]
    Evoked = 1,
}

/// Engine-level configuration: bridge endpoint, timeouts, session policy.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// FedPro bridge host to dial.
    pub fedpro_host: String,
    /// FedPro bridge port to dial.
    pub fedpro_port: u16,
    /// Heartbeat policy for the session layer.
    pub session: SessionConfig,
    /// Timeout for TCP connect, handshake, and the HLA `connect` call.
    pub connect_timeout: Duration,
    /// Timeout for handle queries and most services.
    pub call_timeout: Duration,
    /// Timeout for attribute updates and interactions.
    pub update_timeout: Duration,
    /// Advisory callback delivery model.
    pub callback_model: CallbackModel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fedpro_host: DEFAULT_FEDPRO_HOST.to_string(),
            fedpro_port: DEFAULT_FEDPRO_PORT,
            session: SessionConfig::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
            callback_model: CallbackModel::default(),
        }
    }
}

/// RTI configuration forwarded inside the HLA `connect` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtiConfiguration {
    /// RTI address `(host, port)` the bridge should reach.
    pub rti_address: (String, u16),
    /// Named RTI configuration to apply.
    pub configuration_name: String,
    /// Free-form additional settings.
    pub additional_settings: String,
}

impl Default for RtiConfiguration {
    fn default() -> Self {
        Self {
            rti_address: ("127.0.0.1".to_string(), 5000),
            configuration_name: String::new(),
            additional_settings: String::new(),
        }
    }
}

impl RtiConfiguration {
    /// Fresh default configuration.
    #[must_use]
    pub fn create_configuration() -> Self {
        Self::default()
    }

    /// Copy of this configuration with the given configuration name.
    #[must_use]
    pub fn with_configuration_name(mut self, configuration_name: impl Into<String>) -> Self {
        self.configuration_name = configuration_name.into();
        self
    }

    /// Copy of this configuration with the given RTI address.
    #[must_use]
    pub fn with_rti_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.rti_address = (host.into(), port);
        self
    }

    /// Copy of this configuration with the given additional settings.
    #[must_use]
    pub fn with_additional_settings(mut self, additional_settings: impl Into<String>) -> Self {
        self.additional_settings = additional_settings.into();
        self
    }
}
