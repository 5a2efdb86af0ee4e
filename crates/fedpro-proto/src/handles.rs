//! HLA handle newtypes and value-map aliases.
//!
//! Handles are opaque byte strings naming RTI-side entities. Each handle
//! kind is a distinct newtype over an immutable byte buffer with equality
//! and hashing by content, so a `ParameterHandle` can never be passed where
//! an `AttributeHandle` is expected.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap raw handle bytes.
            #[must_use]
            pub fn new(data: impl Into<Vec<u8>>) -> Self {
                Self(data.into())
            }

            /// Raw handle bytes.
            #[must_use]
            pub fn data(&self) -> &[u8] {
                &self.0
            }

            /// A handle is valid once it carries at least one byte.
            #[must_use]
            pub fn is_valid(&self) -> bool {
                !self.0.is_empty()
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(data: Vec<u8>) -> Self {
                Self(data)
            }
        }

        impl From<&[u8]> for $name {
            fn from(data: &[u8]) -> Self {
                Self(data.to_vec())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "("))?;
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, ")")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

handle_type! {
    /// Handle naming a joined federate.
    FederateHandle
}

handle_type! {
    /// Handle naming an object class.
    ObjectClassHandle
}

handle_type! {
    /// Handle naming an attribute of an object class.
    AttributeHandle
}

handle_type! {
    /// Handle naming an interaction class.
    InteractionClassHandle
}

handle_type! {
    /// Handle naming a parameter of an interaction class.
    ParameterHandle
}

handle_type! {
    /// Handle naming a registered object instance.
    ObjectInstanceHandle
}

handle_type! {
    /// Handle naming a transportation type.
    TransportationTypeHandle
}

/// Attribute handle to encoded-value mapping, as carried by updates and
/// reflections.
pub type AttributeHandleValueMap = HashMap<AttributeHandle, Vec<u8>>;

/// Parameter handle to encoded-value mapping, as carried by interactions.
pub type ParameterHandleValueMap = HashMap<ParameterHandle, Vec<u8>>;

/// Set of attribute handles, as passed to publish/subscribe.
pub type AttributeHandleSet = HashSet<AttributeHandle>;

/// One entry of a federation-execution report callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationExecutionInformation {
    /// Name of the federation execution.
    pub federation_execution_name: String,
    /// Logical-time implementation the execution uses.
    pub logical_time_implementation_name: String,
}

/// One entry of a federation-execution-members report callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationExecutionMemberInformation {
    /// Name of the member federate.
    pub federate_name: String,
    /// Type of the member federate.
    pub federate_type: String,
}
