//! FedPro client engine.
//!
//! Connects a local federate to an RTI bridge over the Federate Protocol:
//! a length-framed binary session over one TCP connection that tunnels
//! synchronous RTI-ambassador calls one way and asynchronous
//! federate-ambassador callbacks the other.
//!
//! # Architecture
//!
//! The engine is single-threaded and cooperative. One thread alternates
//! between synchronous calls entering through [`RtiAmbassador`] and
//! explicit callback pumping via [`RtiAmbassador::evoke_callbacks`]. Every
//! suspension point is a blocking frame read with a deadline; there are no
//! background workers or shared queues.
//!
//! # Components
//!
//! - [`RtiAmbassador`]: one method per HLA service, cache-first handle
//!   resolution, typed exception mapping
//! - [`FederateAmbassador`]: the callback trait hosts implement
//! - [`FedProClient`]: the protocol engine (matcher, callback queue,
//!   session driving) for advanced use
//! - [`ClientConfig`] / [`RtiConfiguration`]: bridge endpoint and RTI
//!   configuration
//!
//! # Example
//!
//! ```no_run
//! use fedpro_client::{NullFederateAmbassador, RtiAmbassador, RtiConfiguration};
//!
//! let mut rti = RtiAmbassador::new(NullFederateAmbassador);
//! let result = rti.connect(&RtiConfiguration::default())?;
//! println!("connected: {}", result.message);
//!
//! rti.create_federation_execution("MAKsimple", &["MAKsimple1516_2025.xml".to_string()])?;
//! let ball = rti.get_object_class_handle("Ball")?;
//! println!("resolved {ball}");
//! # Ok::<(), fedpro_client::RtiError>(())
//! ```

mod cache;
mod client;
mod config;
mod dispatch;
mod error;
mod federate;
mod rti;
pub mod transport;

pub use cache::HandleCache;
pub use client::FedProClient;
pub use config::{
    CallbackModel, ClientConfig, DEFAULT_CALL_TIMEOUT, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_EVOKE_DURATION, DEFAULT_FEDPRO_HOST, DEFAULT_FEDPRO_PORT, DEFAULT_UPDATE_TIMEOUT,
    RtiConfiguration,
};
pub use error::{RtiError, RtiException, TransportError};
pub use federate::{
    FederateAmbassador, FederateInternalError, FederateResult, NullFederateAmbassador,
};
pub use fedpro_core::{SessionConfig, SessionError, SessionState};
pub use fedpro_proto::payloads::calls::{
    AdditionalSettingsResult, ConfigurationResult, ResignAction,
};
pub use rti::RtiAmbassador;
