//! The federate-ambassador callback surface.
//!
//! Hosts implement [`FederateAmbassador`] to receive RTI callbacks. Every
//! method has a no-op default, so implementations override only what they
//! care about. A handler that returns an error makes the dispatcher answer
//! the callback with a failure response; the session continues either way.

use fedpro_proto::handles::{
    AttributeHandleValueMap, FederateHandle, FederationExecutionInformation,
    FederationExecutionMemberInformation, InteractionClassHandle, ObjectClassHandle,
    ObjectInstanceHandle, ParameterHandleValueMap, TransportationTypeHandle,
};
use thiserror::Error;

/// Error raised by a federate-ambassador callback handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("federate internal error: {reason}")]
pub struct FederateInternalError {
    /// What went wrong inside the handler.
    pub reason: String,
}

impl FederateInternalError {
    /// Build an error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Result alias for callback handlers.
pub type FederateResult = Result<(), FederateInternalError>;

/// Callbacks delivered by the RTI to the federate.
///
/// Handlers run to completion before the next callback is delivered, and
/// must not re-enter the engine; issuing an HLA call from within a handler
/// is rejected with `CallNotAllowedFromWithinCallback`.
pub trait FederateAmbassador {
    /// The connection to the RTI was lost.
    fn connection_lost(&mut self, _fault_description: &str) -> FederateResult {
        Ok(())
    }

    /// Report of currently known federation executions.
    fn report_federation_executions(
        &mut self,
        _report: &[FederationExecutionInformation],
    ) -> FederateResult {
        Ok(())
    }

    /// Report of one federation execution's member federates.
    fn report_federation_execution_members(
        &mut self,
        _federation_name: &str,
        _report: &[FederationExecutionMemberInformation],
    ) -> FederateResult {
        Ok(())
    }

    /// A queried federation execution does not exist.
    fn report_federation_execution_does_not_exist(
        &mut self,
        _federation_name: &str,
    ) -> FederateResult {
        Ok(())
    }

    /// This federate was resigned.
    fn federate_resigned(&mut self, _reason: &str) -> FederateResult {
        Ok(())
    }

    /// A requested object instance name reservation succeeded.
    fn object_instance_name_reservation_succeeded(
        &mut self,
        _object_name: &str,
    ) -> FederateResult {
        Ok(())
    }

    /// A requested object instance name reservation failed.
    fn object_instance_name_reservation_failed(&mut self, _object_name: &str) -> FederateResult {
        Ok(())
    }

    /// A remote object instance was discovered.
    fn discover_object_instance(
        &mut self,
        _object_instance: &ObjectInstanceHandle,
        _object_class: &ObjectClassHandle,
        _object_name: &str,
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        Ok(())
    }

    /// A known object instance was removed.
    fn remove_object_instance(
        &mut self,
        _object_instance: &ObjectInstanceHandle,
        _user_tag: &[u8],
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        Ok(())
    }

    /// Updated attribute values for a known object instance.
    fn reflect_attribute_values(
        &mut self,
        _object_instance: &ObjectInstanceHandle,
        _attributes: &AttributeHandleValueMap,
        _user_tag: &[u8],
        _transportation: &TransportationTypeHandle,
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        Ok(())
    }

    /// An interaction was delivered.
    fn receive_interaction(
        &mut self,
        _interaction_class: &InteractionClassHandle,
        _parameters: &ParameterHandleValueMap,
        _user_tag: &[u8],
        _transportation: &TransportationTypeHandle,
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        Ok(())
    }
}

/// Ambassador that ignores every callback. Useful for tools that only
/// issue calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFederateAmbassador;

impl FederateAmbassador for NullFederateAmbassador {}
