//! Callback dispatch: decoded `CallbackRequest` variant to the matching
//! [`FederateAmbassador`] method.
//!
//! One arm per variant; adding a variant to the union breaks this match at
//! compile time, so no callback can be silently dropped.

use fedpro_proto::payloads::callbacks::CallbackRequest;

use crate::federate::{FederateAmbassador, FederateResult};

/// Deliver one decoded callback to the ambassador.
///
/// The handler's outcome decides the `CallbackResponse` success bit.
pub(crate) fn deliver(
    callback: &CallbackRequest,
    ambassador: &mut dyn FederateAmbassador,
) -> FederateResult {
    match callback {
        CallbackRequest::ConnectionLost(body) => {
            ambassador.connection_lost(&body.fault_description)
        },
        CallbackRequest::ReportFederationExecutions(body) => {
            ambassador.report_federation_executions(&body.report)
        },
        CallbackRequest::ReportFederationExecutionMembers(body) => ambassador
            .report_federation_execution_members(&body.federation_execution_name, &body.report),
        CallbackRequest::ReportFederationExecutionDoesNotExist(body) => {
            ambassador.report_federation_execution_does_not_exist(&body.federation_execution_name)
        },
        CallbackRequest::FederateResigned(body) => {
            ambassador.federate_resigned(&body.reason_for_resign_description)
        },
        CallbackRequest::ObjectInstanceNameReservationSucceeded(body) => {
            ambassador.object_instance_name_reservation_succeeded(&body.object_instance_name)
        },
        CallbackRequest::ObjectInstanceNameReservationFailed(body) => {
            ambassador.object_instance_name_reservation_failed(&body.object_instance_name)
        },
        CallbackRequest::DiscoverObjectInstance(body) => ambassador.discover_object_instance(
            &body.object_instance,
            &body.object_class,
            &body.object_instance_name,
            &body.producing_federate,
        ),
        CallbackRequest::RemoveObjectInstance(body) => ambassador.remove_object_instance(
            &body.object_instance,
            &body.user_supplied_tag,
            &body.producing_federate,
        ),
        CallbackRequest::ReflectAttributeValues(body) => ambassador.reflect_attribute_values(
            &body.object_instance,
            &body.attribute_values,
            &body.user_supplied_tag,
            &body.transportation_type,
            &body.producing_federate,
        ),
        CallbackRequest::ReceiveInteraction(body) => ambassador.receive_interaction(
            &body.interaction_class,
            &body.parameter_values,
            &body.user_supplied_tag,
            &body.transportation_type,
            &body.producing_federate,
        ),
    }
}
