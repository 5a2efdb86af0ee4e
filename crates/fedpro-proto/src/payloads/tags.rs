//! Field-number tag constants for the payload unions.
//!
//! These numbers are the wire identity of each union variant; they prefix
//! the CBOR body as a 4-byte big-endian integer. The request/response
//! pairing is positional: each request tag in [`request`] has its matching
//! response tag in [`response`].

/// Tags of the `CallRequest` union (federate → RTI).
pub mod request {
    /// `connect` service request.
    pub const CONNECT: u32 = 1;
    /// `createFederationExecution` service request.
    pub const CREATE_FEDERATION_EXECUTION: u32 = 2;
    /// `destroyFederationExecution` service request.
    pub const DESTROY_FEDERATION_EXECUTION: u32 = 3;
    /// `listFederationExecutions` service request.
    pub const LIST_FEDERATION_EXECUTIONS: u32 = 4;
    /// `joinFederationExecution` service request.
    pub const JOIN_FEDERATION_EXECUTION: u32 = 5;
    /// `resignFederationExecution` service request.
    pub const RESIGN_FEDERATION_EXECUTION: u32 = 6;
    /// `getObjectClassHandle` service request.
    pub const GET_OBJECT_CLASS_HANDLE: u32 = 7;
    /// `getAttributeHandle` service request.
    pub const GET_ATTRIBUTE_HANDLE: u32 = 8;
    /// `getInteractionClassHandle` service request.
    pub const GET_INTERACTION_CLASS_HANDLE: u32 = 9;
    /// `getParameterHandle` service request.
    pub const GET_PARAMETER_HANDLE: u32 = 10;
    /// `publishObjectClassAttributes` service request.
    pub const PUBLISH_OBJECT_CLASS_ATTRIBUTES: u32 = 11;
    /// `unpublishObjectClass` service request.
    pub const UNPUBLISH_OBJECT_CLASS: u32 = 12;
    /// `publishInteractionClass` service request.
    pub const PUBLISH_INTERACTION_CLASS: u32 = 13;
    /// `unpublishInteractionClass` service request.
    pub const UNPUBLISH_INTERACTION_CLASS: u32 = 14;
    /// `subscribeObjectClassAttributes` service request.
    pub const SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES: u32 = 15;
    /// `unsubscribeObjectClass` service request.
    pub const UNSUBSCRIBE_OBJECT_CLASS: u32 = 16;
    /// `subscribeInteractionClass` service request.
    pub const SUBSCRIBE_INTERACTION_CLASS: u32 = 17;
    /// `unsubscribeInteractionClass` service request.
    pub const UNSUBSCRIBE_INTERACTION_CLASS: u32 = 18;
    /// `reserveObjectInstanceName` service request.
    pub const RESERVE_OBJECT_INSTANCE_NAME: u32 = 19;
    /// `registerObjectInstance` service request.
    pub const REGISTER_OBJECT_INSTANCE: u32 = 20;
    /// `deleteObjectInstance` service request.
    pub const DELETE_OBJECT_INSTANCE: u32 = 21;
    /// `sendInteraction` service request.
    pub const SEND_INTERACTION: u32 = 22;
    /// `updateAttributeValues` service request.
    pub const UPDATE_ATTRIBUTE_VALUES: u32 = 23;
}

/// Tags of the `CallResponse` union (RTI → federate).
pub mod response {
    /// RTI-side exception with name and diagnostic description.
    pub const EXCEPTION_DATA: u32 = 1;
    /// `connect` service response.
    pub const CONNECT: u32 = 2;
    /// `createFederationExecution` service response.
    pub const CREATE_FEDERATION_EXECUTION: u32 = 3;
    /// `destroyFederationExecution` service response.
    pub const DESTROY_FEDERATION_EXECUTION: u32 = 4;
    /// `listFederationExecutions` service response.
    pub const LIST_FEDERATION_EXECUTIONS: u32 = 5;
    /// `joinFederationExecution` service response.
    pub const JOIN_FEDERATION_EXECUTION: u32 = 6;
    /// `resignFederationExecution` service response.
    pub const RESIGN_FEDERATION_EXECUTION: u32 = 7;
    /// `getObjectClassHandle` service response.
    pub const GET_OBJECT_CLASS_HANDLE: u32 = 8;
    /// `getAttributeHandle` service response.
    pub const GET_ATTRIBUTE_HANDLE: u32 = 9;
    /// `getInteractionClassHandle` service response.
    pub const GET_INTERACTION_CLASS_HANDLE: u32 = 10;
    /// `getParameterHandle` service response.
    pub const GET_PARAMETER_HANDLE: u32 = 11;
    /// `publishObjectClassAttributes` service response.
    pub const PUBLISH_OBJECT_CLASS_ATTRIBUTES: u32 = 12;
    /// `unpublishObjectClass` service response.
    pub const UNPUBLISH_OBJECT_CLASS: u32 = 13;
    /// `publishInteractionClass` service response.
    pub const PUBLISH_INTERACTION_CLASS: u32 = 14;
    /// `unpublishInteractionClass` service response.
    pub const UNPUBLISH_INTERACTION_CLASS: u32 = 15;
    /// `subscribeObjectClassAttributes` service response.
    pub const SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES: u32 = 16;
    /// `unsubscribeObjectClass` service response.
    pub const UNSUBSCRIBE_OBJECT_CLASS: u32 = 17;
    /// `subscribeInteractionClass` service response.
    pub const SUBSCRIBE_INTERACTION_CLASS: u32 = 18;
    /// `unsubscribeInteractionClass` service response.
    pub const UNSUBSCRIBE_INTERACTION_CLASS: u32 = 19;
    /// `reserveObjectInstanceName` service response (synchronous ack; the
    /// outcome arrives as a name-reservation callback).
    pub const RESERVE_OBJECT_INSTANCE_NAME: u32 = 20;
    /// `registerObjectInstance` service response.
    pub const REGISTER_OBJECT_INSTANCE: u32 = 21;
    /// `deleteObjectInstance` service response.
    pub const DELETE_OBJECT_INSTANCE: u32 = 22;
    /// `sendInteraction` service response.
    pub const SEND_INTERACTION: u32 = 23;
    /// `updateAttributeValues` service response.
    pub const UPDATE_ATTRIBUTE_VALUES: u32 = 24;
}

/// Tags of the `CallbackRequest` union (RTI → federate).
pub mod callback {
    /// `connectionLost` callback.
    pub const CONNECTION_LOST: u32 = 1;
    /// `reportFederationExecutions` callback.
    pub const REPORT_FEDERATION_EXECUTIONS: u32 = 2;
    /// `reportFederationExecutionMembers` callback.
    pub const REPORT_FEDERATION_EXECUTION_MEMBERS: u32 = 3;
    /// `reportFederationExecutionDoesNotExist` callback.
    pub const REPORT_FEDERATION_EXECUTION_DOES_NOT_EXIST: u32 = 4;
    /// `federateResigned` callback.
    pub const FEDERATE_RESIGNED: u32 = 5;
    /// `objectInstanceNameReservationSucceeded` callback.
    pub const OBJECT_INSTANCE_NAME_RESERVATION_SUCCEEDED: u32 = 6;
    /// `objectInstanceNameReservationFailed` callback.
    pub const OBJECT_INSTANCE_NAME_RESERVATION_FAILED: u32 = 7;
    /// `discoverObjectInstance` callback.
    pub const DISCOVER_OBJECT_INSTANCE: u32 = 8;
    /// `removeObjectInstance` callback.
    pub const REMOVE_OBJECT_INSTANCE: u32 = 9;
    /// `reflectAttributeValues` callback.
    pub const REFLECT_ATTRIBUTE_VALUES: u32 = 10;
    /// `receiveInteraction` callback.
    pub const RECEIVE_INTERACTION: u32 = 11;
}

/// Tags of the `CallbackResponse` union (federate → RTI).
pub mod callback_response {
    /// Callback handler returned normally.
    pub const CALLBACK_SUCCEEDED: u32 = 1;
    /// Callback handler raised; delivery failed on the federate side.
    pub const CALLBACK_FAILED: u32 = 2;
}
