//! The `CallRequest` and `CallResponse` unions (federate → RTI → federate).
//!
//! Every RTI service has exactly one request variant and one response
//! variant; the façade populates exactly one variant per outbound call. The
//! response union additionally carries [`ExceptionData`], which signals an
//! RTI-side exception by name plus a diagnostic string.

use serde::{Deserialize, Serialize};

use bytes::Bytes;

use crate::{
    errors::{ProtocolError, Result},
    handles::{
        AttributeHandle, AttributeHandleValueMap, FederateHandle, InteractionClassHandle,
        ObjectClassHandle, ObjectInstanceHandle, ParameterHandle, ParameterHandleValueMap,
    },
    payloads::{decode_body, encode_tag_only, encode_tagged, split_tag, tags},
};

/// Action taken on behalf of the federate when it resigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum ResignAction {
    /// Divest all owned attributes unconditionally.
    UnconditionallyDivestAttributes = 0,
    /// Delete all owned object instances.
    DeleteObjects = 1,
    /// Cancel ownership acquisitions still pending.
    CancelPendingOwnershipAcquisitions = 2,
    /// Delete owned objects, then divest remaining attributes.
    DeleteObjectsThenDivest = 3,
    /// Cancel acquisitions, delete objects, then divest.
    CancelThenDeleteThenDivest = 4,
    /// Resign without side effects.
    #[default]
    NoAction = 5,
}

/// Outcome of applying the additional-settings string at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum AdditionalSettingsResult {
    /// Settings were not consulted.
    #[default]
    SettingsIgnored = 0,
    /// Settings could not be parsed.
    SettingsFailedToParse = 1,
    /// Settings were applied.
    SettingsApplied = 2,
}

/// Result of the `connect` service, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigurationResult {
    /// Whether the supplied RTI address was used.
    pub address_used: bool,
    /// Whether the named configuration was used.
    pub configuration_used: bool,
    /// What happened to the additional-settings string.
    pub additional_settings_result: AdditionalSettingsResult,
    /// Diagnostic message from the RTI.
    pub message: String,
}

/// RTI-side exception carried in a `CallResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionData {
    /// HLA exception name, e.g. `FederationExecutionAlreadyExists`.
    pub exception_name: String,
    /// Human-readable diagnostic supplied by the RTI.
    pub exception_description: String,
}

/// Body of the `connect` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// RTI host the bridge should reach.
    pub rti_address_host: String,
    /// RTI port the bridge should reach.
    pub rti_address_port: u16,
    /// Named RTI configuration to apply.
    pub configuration_name: String,
    /// Free-form additional settings.
    pub additional_settings: String,
}

/// Body of the `createFederationExecution` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFederationExecutionRequest {
    /// Name of the federation execution to create.
    pub federation_execution_name: String,
    /// FOM module URLs consumed at creation time.
    pub fom_modules: Vec<String>,
}

/// Body of the `destroyFederationExecution` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyFederationExecutionRequest {
    /// Name of the federation execution to destroy.
    pub federation_execution_name: String,
}

/// Body of the `joinFederationExecution` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinFederationExecutionRequest {
    /// Name of the joining federate.
    pub federate_name: String,
    /// Type descriptor of the joining federate.
    pub federate_type: String,
    /// Target federation execution.
    pub federation_execution_name: String,
    /// FOM module URLs consumed at join time.
    pub fom_modules: Vec<String>,
}

/// Body of the `resignFederationExecution` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResignFederationExecutionRequest {
    /// Resignation policy.
    pub resign_action: ResignAction,
}

/// Body of the `getObjectClassHandle` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetObjectClassHandleRequest {
    /// Fully qualified object class name.
    pub object_class_name: String,
}

/// Body of the `getAttributeHandle` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAttributeHandleRequest {
    /// Class the attribute belongs to.
    pub object_class: ObjectClassHandle,
    /// Attribute name within the class.
    pub attribute_name: String,
}

/// Body of the `getInteractionClassHandle` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetInteractionClassHandleRequest {
    /// Fully qualified interaction class name.
    pub interaction_class_name: String,
}

/// Body of the `getParameterHandle` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetParameterHandleRequest {
    /// Interaction class the parameter belongs to.
    pub interaction_class: InteractionClassHandle,
    /// Parameter name within the interaction class.
    pub parameter_name: String,
}

/// Body of the `publishObjectClassAttributes` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishObjectClassAttributesRequest {
    /// Object class to publish.
    pub object_class: ObjectClassHandle,
    /// Attributes published for the class.
    pub attributes: Vec<AttributeHandle>,
}

/// Body of the `unpublishObjectClass` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpublishObjectClassRequest {
    /// Object class to unpublish.
    pub object_class: ObjectClassHandle,
}

/// Body of the `publishInteractionClass` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishInteractionClassRequest {
    /// Interaction class to publish.
    pub interaction_class: InteractionClassHandle,
}

/// Body of the `unpublishInteractionClass` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpublishInteractionClassRequest {
    /// Interaction class to unpublish.
    pub interaction_class: InteractionClassHandle,
}

/// Body of the `subscribeObjectClassAttributes` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeObjectClassAttributesRequest {
    /// Object class to subscribe to.
    pub object_class: ObjectClassHandle,
    /// Attributes subscribed for the class.
    pub attributes: Vec<AttributeHandle>,
    /// Active (true) or passive subscription.
    pub active: bool,
}

/// Body of the `unsubscribeObjectClass` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeObjectClassRequest {
    /// Object class to unsubscribe from.
    pub object_class: ObjectClassHandle,
}

/// Body of the `subscribeInteractionClass` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeInteractionClassRequest {
    /// Interaction class to subscribe to.
    pub interaction_class: InteractionClassHandle,
}

/// Body of the `unsubscribeInteractionClass` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeInteractionClassRequest {
    /// Interaction class to unsubscribe from.
    pub interaction_class: InteractionClassHandle,
}

/// Body of the `reserveObjectInstanceName` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveObjectInstanceNameRequest {
    /// Object instance name to reserve.
    pub object_instance_name: String,
}

/// Body of the `registerObjectInstance` request.
///
/// Registration without a previously reserved name is not supported by
/// this engine; callers reserve first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterObjectInstanceRequest {
    /// Class of the new object instance.
    pub object_class: ObjectClassHandle,
    /// Reserved name for the instance.
    pub object_instance_name: String,
}

/// Body of the `deleteObjectInstance` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteObjectInstanceRequest {
    /// Instance to delete.
    pub object_instance: ObjectInstanceHandle,
    /// Opaque user tag attached to the deletion.
    pub user_supplied_tag: Vec<u8>,
}

/// Body of the `sendInteraction` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendInteractionRequest {
    /// Interaction class being sent.
    pub interaction_class: InteractionClassHandle,
    /// Parameter handle to encoded-value map.
    pub parameter_values: ParameterHandleValueMap,
    /// Opaque user tag attached to the send.
    pub user_supplied_tag: Vec<u8>,
}

/// Body of the `updateAttributeValues` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAttributeValuesRequest {
    /// Instance whose attributes are updated.
    pub object_instance: ObjectInstanceHandle,
    /// Attribute handle to encoded-value map.
    pub attribute_values: AttributeHandleValueMap,
    /// Opaque user tag attached to the update.
    pub user_supplied_tag: Vec<u8>,
}

/// The `CallRequest` union: exactly one variant per RTI service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRequest {
    /// Connect to the RTI through the bridge.
    Connect(ConnectRequest),
    /// Create a federation execution.
    CreateFederationExecution(CreateFederationExecutionRequest),
    /// Destroy a federation execution.
    DestroyFederationExecution(DestroyFederationExecutionRequest),
    /// List federation executions (report arrives as a callback).
    ListFederationExecutions,
    /// Join a federation execution.
    JoinFederationExecution(JoinFederationExecutionRequest),
    /// Resign from the joined federation execution.
    ResignFederationExecution(ResignFederationExecutionRequest),
    /// Resolve an object class name to a handle.
    GetObjectClassHandle(GetObjectClassHandleRequest),
    /// Resolve an attribute name to a handle.
    GetAttributeHandle(GetAttributeHandleRequest),
    /// Resolve an interaction class name to a handle.
    GetInteractionClassHandle(GetInteractionClassHandleRequest),
    /// Resolve a parameter name to a handle.
    GetParameterHandle(GetParameterHandleRequest),
    /// Publish attributes of an object class.
    PublishObjectClassAttributes(PublishObjectClassAttributesRequest),
    /// Unpublish an object class.
    UnpublishObjectClass(UnpublishObjectClassRequest),
    /// Publish an interaction class.
    PublishInteractionClass(PublishInteractionClassRequest),
    /// Unpublish an interaction class.
    UnpublishInteractionClass(UnpublishInteractionClassRequest),
    /// Subscribe to attributes of an object class.
    SubscribeObjectClassAttributes(SubscribeObjectClassAttributesRequest),
    /// Unsubscribe from an object class.
    UnsubscribeObjectClass(UnsubscribeObjectClassRequest),
    /// Subscribe to an interaction class.
    SubscribeInteractionClass(SubscribeInteractionClassRequest),
    /// Unsubscribe from an interaction class.
    UnsubscribeInteractionClass(UnsubscribeInteractionClassRequest),
    /// Reserve an object instance name.
    ReserveObjectInstanceName(ReserveObjectInstanceNameRequest),
    /// Register an object instance under a reserved name.
    RegisterObjectInstance(RegisterObjectInstanceRequest),
    /// Delete an object instance.
    DeleteObjectInstance(DeleteObjectInstanceRequest),
    /// Send an interaction.
    SendInteraction(SendInteractionRequest),
    /// Update attribute values of an object instance.
    UpdateAttributeValues(UpdateAttributeValuesRequest),
}

impl CallRequest {
    /// Field-number tag of the populated variant.
    #[must_use]
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Connect(_) => tags::request::CONNECT,
            Self::CreateFederationExecution(_) => tags::request::CREATE_FEDERATION_EXECUTION,
            Self::DestroyFederationExecution(_) => tags::request::DESTROY_FEDERATION_EXECUTION,
            Self::ListFederationExecutions => tags::request::LIST_FEDERATION_EXECUTIONS,
            Self::JoinFederationExecution(_) => tags::request::JOIN_FEDERATION_EXECUTION,
            Self::ResignFederationExecution(_) => tags::request::RESIGN_FEDERATION_EXECUTION,
            Self::GetObjectClassHandle(_) => tags::request::GET_OBJECT_CLASS_HANDLE,
            Self::GetAttributeHandle(_) => tags::request::GET_ATTRIBUTE_HANDLE,
            Self::GetInteractionClassHandle(_) => tags::request::GET_INTERACTION_CLASS_HANDLE,
            Self::GetParameterHandle(_) => tags::request::GET_PARAMETER_HANDLE,
            Self::PublishObjectClassAttributes(_) => {
                tags::request::PUBLISH_OBJECT_CLASS_ATTRIBUTES
            },
            Self::UnpublishObjectClass(_) => tags::request::UNPUBLISH_OBJECT_CLASS,
            Self::PublishInteractionClass(_) => tags::request::PUBLISH_INTERACTION_CLASS,
            Self::UnpublishInteractionClass(_) => tags::request::UNPUBLISH_INTERACTION_CLASS,
            Self::SubscribeObjectClassAttributes(_) => {
                tags::request::SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES
            },
            Self::UnsubscribeObjectClass(_) => tags::request::UNSUBSCRIBE_OBJECT_CLASS,
            Self::SubscribeInteractionClass(_) => tags::request::SUBSCRIBE_INTERACTION_CLASS,
            Self::UnsubscribeInteractionClass(_) => tags::request::UNSUBSCRIBE_INTERACTION_CLASS,
            Self::ReserveObjectInstanceName(_) => tags::request::RESERVE_OBJECT_INSTANCE_NAME,
            Self::RegisterObjectInstance(_) => tags::request::REGISTER_OBJECT_INSTANCE,
            Self::DeleteObjectInstance(_) => tags::request::DELETE_OBJECT_INSTANCE,
            Self::SendInteraction(_) => tags::request::SEND_INTERACTION,
            Self::UpdateAttributeValues(_) => tags::request::UPDATE_ATTRIBUTE_VALUES,
        }
    }

    /// Tag of the response variant that answers this request.
    ///
    /// The matcher uses this to recognize the reply; `ExceptionData` may
    /// answer any request.
    #[must_use]
    pub const fn response_tag(&self) -> u32 {
        match self {
            Self::Connect(_) => tags::response::CONNECT,
            Self::CreateFederationExecution(_) => tags::response::CREATE_FEDERATION_EXECUTION,
            Self::DestroyFederationExecution(_) => tags::response::DESTROY_FEDERATION_EXECUTION,
            Self::ListFederationExecutions => tags::response::LIST_FEDERATION_EXECUTIONS,
            Self::JoinFederationExecution(_) => tags::response::JOIN_FEDERATION_EXECUTION,
            Self::ResignFederationExecution(_) => tags::response::RESIGN_FEDERATION_EXECUTION,
            Self::GetObjectClassHandle(_) => tags::response::GET_OBJECT_CLASS_HANDLE,
            Self::GetAttributeHandle(_) => tags::response::GET_ATTRIBUTE_HANDLE,
            Self::GetInteractionClassHandle(_) => tags::response::GET_INTERACTION_CLASS_HANDLE,
            Self::GetParameterHandle(_) => tags::response::GET_PARAMETER_HANDLE,
            Self::PublishObjectClassAttributes(_) => {
                tags::response::PUBLISH_OBJECT_CLASS_ATTRIBUTES
            },
            Self::UnpublishObjectClass(_) => tags::response::UNPUBLISH_OBJECT_CLASS,
            Self::PublishInteractionClass(_) => tags::response::PUBLISH_INTERACTION_CLASS,
            Self::UnpublishInteractionClass(_) => tags::response::UNPUBLISH_INTERACTION_CLASS,
            Self::SubscribeObjectClassAttributes(_) => {
                tags::response::SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES
            },
            Self::UnsubscribeObjectClass(_) => tags::response::UNSUBSCRIBE_OBJECT_CLASS,
            Self::SubscribeInteractionClass(_) => tags::response::SUBSCRIBE_INTERACTION_CLASS,
            Self::UnsubscribeInteractionClass(_) => {
                tags::response::UNSUBSCRIBE_INTERACTION_CLASS
            },
            Self::ReserveObjectInstanceName(_) => tags::response::RESERVE_OBJECT_INSTANCE_NAME,
            Self::RegisterObjectInstance(_) => tags::response::REGISTER_OBJECT_INSTANCE,
            Self::DeleteObjectInstance(_) => tags::response::DELETE_OBJECT_INSTANCE,
            Self::SendInteraction(_) => tags::response::SEND_INTERACTION,
            Self::UpdateAttributeValues(_) => tags::response::UPDATE_ATTRIBUTE_VALUES,
        }
    }

    /// Service name for log messages.
    #[must_use]
    pub const fn service_name(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::CreateFederationExecution(_) => "createFederationExecution",
            Self::DestroyFederationExecution(_) => "destroyFederationExecution",
            Self::ListFederationExecutions => "listFederationExecutions",
            Self::JoinFederationExecution(_) => "joinFederationExecution",
            Self::ResignFederationExecution(_) => "resignFederationExecution",
            Self::GetObjectClassHandle(_) => "getObjectClassHandle",
            Self::GetAttributeHandle(_) => "getAttributeHandle",
            Self::GetInteractionClassHandle(_) => "getInteractionClassHandle",
            Self::GetParameterHandle(_) => "getParameterHandle",
            Self::PublishObjectClassAttributes(_) => "publishObjectClassAttributes",
            Self::UnpublishObjectClass(_) => "unpublishObjectClass",
            Self::PublishInteractionClass(_) => "publishInteractionClass",
            Self::UnpublishInteractionClass(_) => "unpublishInteractionClass",
            Self::SubscribeObjectClassAttributes(_) => "subscribeObjectClassAttributes",
            Self::UnsubscribeObjectClass(_) => "unsubscribeObjectClass",
            Self::SubscribeInteractionClass(_) => "subscribeInteractionClass",
            Self::UnsubscribeInteractionClass(_) => "unsubscribeInteractionClass",
            Self::ReserveObjectInstanceName(_) => "reserveObjectInstanceName",
            Self::RegisterObjectInstance(_) => "registerObjectInstance",
            Self::DeleteObjectInstance(_) => "deleteObjectInstance",
            Self::SendInteraction(_) => "sendInteraction",
            Self::UpdateAttributeValues(_) => "updateAttributeValues",
        }
    }

    /// Encode to envelope payload bytes: 4-byte tag + CBOR body.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if body serialization fails
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            Self::Connect(body) => encode_tagged(self.tag(), body),
            Self::CreateFederationExecution(body) => encode_tagged(self.tag(), body),
            Self::DestroyFederationExecution(body) => encode_tagged(self.tag(), body),
            Self::ListFederationExecutions => Ok(encode_tag_only(self.tag())),
            Self::JoinFederationExecution(body) => encode_tagged(self.tag(), body),
            Self::ResignFederationExecution(body) => encode_tagged(self.tag(), body),
            Self::GetObjectClassHandle(body) => encode_tagged(self.tag(), body),
            Self::GetAttributeHandle(body) => encode_tagged(self.tag(), body),
            Self::GetInteractionClassHandle(body) => encode_tagged(self.tag(), body),
            Self::GetParameterHandle(body) => encode_tagged(self.tag(), body),
            Self::PublishObjectClassAttributes(body) => encode_tagged(self.tag(), body),
            Self::UnpublishObjectClass(body) => encode_tagged(self.tag(), body),
            Self::PublishInteractionClass(body) => encode_tagged(self.tag(), body),
            Self::UnpublishInteractionClass(body) => encode_tagged(self.tag(), body),
            Self::SubscribeObjectClassAttributes(body) => encode_tagged(self.tag(), body),
            Self::UnsubscribeObjectClass(body) => encode_tagged(self.tag(), body),
            Self::SubscribeInteractionClass(body) => encode_tagged(self.tag(), body),
            Self::UnsubscribeInteractionClass(body) => encode_tagged(self.tag(), body),
            Self::ReserveObjectInstanceName(body) => encode_tagged(self.tag(), body),
            Self::RegisterObjectInstance(body) => encode_tagged(self.tag(), body),
            Self::DeleteObjectInstance(body) => encode_tagged(self.tag(), body),
            Self::SendInteraction(body) => encode_tagged(self.tag(), body),
            Self::UpdateAttributeValues(body) => encode_tagged(self.tag(), body),
        }
    }

    /// Decode from envelope payload bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortPayload` if the tag prefix is missing
    /// - `ProtocolError::UnknownTag` for tags outside the union
    /// - `ProtocolError::CborDecode` if the body does not match the variant
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (tag, body) = split_tag(payload)?;
        match tag {
            tags::request::CONNECT => Ok(Self::Connect(decode_body(body)?)),
            tags::request::CREATE_FEDERATION_EXECUTION => {
                Ok(Self::CreateFederationExecution(decode_body(body)?))
            },
            tags::request::DESTROY_FEDERATION_EXECUTION => {
                Ok(Self::DestroyFederationExecution(decode_body(body)?))
            },
            tags::request::LIST_FEDERATION_EXECUTIONS => Ok(Self::ListFederationExecutions),
            tags::request::JOIN_FEDERATION_EXECUTION => {
                Ok(Self::JoinFederationExecution(decode_body(body)?))
            },
            tags::request::RESIGN_FEDERATION_EXECUTION => {
                Ok(Self::ResignFederationExecution(decode_body(body)?))
            },
            tags::request::GET_OBJECT_CLASS_HANDLE => {
                Ok(Self::GetObjectClassHandle(decode_body(body)?))
            },
            tags::request::GET_ATTRIBUTE_HANDLE => {
                Ok(Self::GetAttributeHandle(decode_body(body)?))
            },
            tags::request::GET_INTERACTION_CLASS_HANDLE => {
                Ok(Self::GetInteractionClassHandle(decode_body(body)?))
            },
            tags::request::GET_PARAMETER_HANDLE => {
                Ok(Self::GetParameterHandle(decode_body(body)?))
            },
            tags::request::PUBLISH_OBJECT_CLASS_ATTRIBUTES => {
                Ok(Self::PublishObjectClassAttributes(decode_body(body)?))
            },
            tags::request::UNPUBLISH_OBJECT_CLASS => {
                Ok(Self::UnpublishObjectClass(decode_body(body)?))
            },
            tags::request::PUBLISH_INTERACTION_CLASS => {
                Ok(Self::PublishInteractionClass(decode_body(body)?))
            },
            tags::request::UNPUBLISH_INTERACTION_CLASS => {
                Ok(Self::UnpublishInteractionClass(decode_body(body)?))
            },
            tags::request::SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES => {
                Ok(Self::SubscribeObjectClassAttributes(decode_body(body)?))
            },
            tags::request::UNSUBSCRIBE_OBJECT_CLASS => {
                Ok(Self::UnsubscribeObjectClass(decode_body(body)?))
            },
            tags::request::SUBSCRIBE_INTERACTION_CLASS => {
                Ok(Self::SubscribeInteractionClass(decode_body(body)?))
            },
            tags::request::UNSUBSCRIBE_INTERACTION_CLASS => {
                Ok(Self::UnsubscribeInteractionClass(decode_body(body)?))
            },
            tags::request::RESERVE_OBJECT_INSTANCE_NAME => {
                Ok(Self::ReserveObjectInstanceName(decode_body(body)?))
            },
            tags::request::REGISTER_OBJECT_INSTANCE => {
                Ok(Self::RegisterObjectInstance(decode_body(body)?))
            },
            tags::request::DELETE_OBJECT_INSTANCE => {
                Ok(Self::DeleteObjectInstance(decode_body(body)?))
            },
            tags::request::SEND_INTERACTION => Ok(Self::SendInteraction(decode_body(body)?)),
            tags::request::UPDATE_ATTRIBUTE_VALUES => {
                Ok(Self::UpdateAttributeValues(decode_body(body)?))
            },
            other => Err(ProtocolError::UnknownTag { union: "CallRequest", tag: other }),
        }
    }
}

/// The `CallResponse` union: one variant per service plus `ExceptionData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResponse {
    /// RTI-side exception answering any request.
    ExceptionData(ExceptionData),
    /// `connect` result.
    Connect(ConfigurationResult),
    /// `createFederationExecution` acknowledged.
    CreateFederationExecution,
    /// `destroyFederationExecution` acknowledged.
    DestroyFederationExecution,
    /// `listFederationExecutions` acknowledged (report follows as callback).
    ListFederationExecutions,
    /// `joinFederationExecution` result: the new federate handle.
    JoinFederationExecution(FederateHandle),
    /// `resignFederationExecution` acknowledged.
    ResignFederationExecution,
    /// Resolved object class handle.
    GetObjectClassHandle(ObjectClassHandle),
    /// Resolved attribute handle.
    GetAttributeHandle(AttributeHandle),
    /// Resolved interaction class handle.
    GetInteractionClassHandle(InteractionClassHandle),
    /// Resolved parameter handle.
    GetParameterHandle(ParameterHandle),
    /// `publishObjectClassAttributes` acknowledged.
    PublishObjectClassAttributes,
    /// `unpublishObjectClass` acknowledged.
    UnpublishObjectClass,
    /// `publishInteractionClass` acknowledged.
    PublishInteractionClass,
    /// `unpublishInteractionClass` acknowledged.
    UnpublishInteractionClass,
    /// `subscribeObjectClassAttributes` acknowledged.
    SubscribeObjectClassAttributes,
    /// `unsubscribeObjectClass` acknowledged.
    UnsubscribeObjectClass,
    /// `subscribeInteractionClass` acknowledged.
    SubscribeInteractionClass,
    /// `unsubscribeInteractionClass` acknowledged.
    UnsubscribeInteractionClass,
    /// `reserveObjectInstanceName` acknowledged (outcome via callback).
    ReserveObjectInstanceName,
    /// `registerObjectInstance` result: the new instance handle.
    RegisterObjectInstance(ObjectInstanceHandle),
    /// `deleteObjectInstance` acknowledged.
    DeleteObjectInstance,
    /// `sendInteraction` acknowledged.
    SendInteraction,
    /// `updateAttributeValues` acknowledged.
    UpdateAttributeValues,
}

impl CallResponse {
    /// Field-number tag of the populated variant.
    #[must_use]
    pub const fn tag(&self) -> u32 {
        match self {
            Self::ExceptionData(_) => tags::response::EXCEPTION_DATA,
            Self::Connect(_) => tags::response::CONNECT,
            Self::CreateFederationExecution => tags::response::CREATE_FEDERATION_EXECUTION,
            Self::DestroyFederationExecution => tags::response::DESTROY_FEDERATION_EXECUTION,
            Self::ListFederationExecutions => tags::response::LIST_FEDERATION_EXECUTIONS,
            Self::JoinFederationExecution(_) => tags::response::JOIN_FEDERATION_EXECUTION,
            Self::ResignFederationExecution => tags::response::RESIGN_FEDERATION_EXECUTION,
            Self::GetObjectClassHandle(_) => tags::response::GET_OBJECT_CLASS_HANDLE,
            Self::GetAttributeHandle(_) => tags::response::GET_ATTRIBUTE_HANDLE,
            Self::GetInteractionClassHandle(_) => tags::response::GET_INTERACTION_CLASS_HANDLE,
            Self::GetParameterHandle(_) => tags::response::GET_PARAMETER_HANDLE,
            Self::PublishObjectClassAttributes => {
                tags::response::PUBLISH_OBJECT_CLASS_ATTRIBUTES
            },
            Self::UnpublishObjectClass => tags::response::UNPUBLISH_OBJECT_CLASS,
            Self::PublishInteractionClass => tags::response::PUBLISH_INTERACTION_CLASS,
            Self::UnpublishInteractionClass => tags::response::UNPUBLISH_INTERACTION_CLASS,
            Self::SubscribeObjectClassAttributes => {
                tags::response::SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES
            },
            Self::UnsubscribeObjectClass => tags::response::UNSUBSCRIBE_OBJECT_CLASS,
            Self::SubscribeInteractionClass => tags::response::SUBSCRIBE_INTERACTION_CLASS,
            Self::UnsubscribeInteractionClass => tags::response::UNSUBSCRIBE_INTERACTION_CLASS,
            Self::ReserveObjectInstanceName => tags::response::RESERVE_OBJECT_INSTANCE_NAME,
            Self::RegisterObjectInstance(_) => tags::response::REGISTER_OBJECT_INSTANCE,
            Self::DeleteObjectInstance => tags::response::DELETE_OBJECT_INSTANCE,
            Self::SendInteraction => tags::response::SEND_INTERACTION,
            Self::UpdateAttributeValues => tags::response::UPDATE_ATTRIBUTE_VALUES,
        }
    }

    /// Whether this response signals an RTI-side exception.
    #[must_use]
    pub const fn is_exception(&self) -> bool {
        matches!(self, Self::ExceptionData(_))
    }

    /// Encode to envelope payload bytes: 4-byte tag + CBOR body.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if body serialization fails
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            Self::ExceptionData(body) => encode_tagged(self.tag(), body),
            Self::Connect(body) => encode_tagged(self.tag(), body),
            Self::JoinFederationExecution(handle) => encode_tagged(self.tag(), handle),
            Self::GetObjectClassHandle(handle) => encode_tagged(self.tag(), handle),
            Self::GetAttributeHandle(handle) => encode_tagged(self.tag(), handle),
            Self::GetInteractionClassHandle(handle) => encode_tagged(self.tag(), handle),
            Self::GetParameterHandle(handle) => encode_tagged(self.tag(), handle),
            Self::RegisterObjectInstance(handle) => encode_tagged(self.tag(), handle),
            _ => Ok(encode_tag_only(self.tag())),
        }
    }

    /// Decode from envelope payload bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortPayload` if the tag prefix is missing
    /// - `ProtocolError::UnknownTag` for tags outside the union
    /// - `ProtocolError::CborDecode` if the body does not match the variant
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (tag, body) = split_tag(payload)?;
        match tag {
            tags::response::EXCEPTION_DATA => Ok(Self::ExceptionData(decode_body(body)?)),
            tags::response::CONNECT => Ok(Self::Connect(decode_body(body)?)),
            tags::response::CREATE_FEDERATION_EXECUTION => Ok(Self::CreateFederationExecution),
            tags::response::DESTROY_FEDERATION_EXECUTION => Ok(Self::DestroyFederationExecution),
            tags::response::LIST_FEDERATION_EXECUTIONS => Ok(Self::ListFederationExecutions),
            tags::response::JOIN_FEDERATION_EXECUTION => {
                Ok(Self::JoinFederationExecution(decode_body(body)?))
            },
            tags::response::RESIGN_FEDERATION_EXECUTION => Ok(Self::ResignFederationExecution),
            tags::response::GET_OBJECT_CLASS_HANDLE => {
                Ok(Self::GetObjectClassHandle(decode_body(body)?))
            },
            tags::response::GET_ATTRIBUTE_HANDLE => {
                Ok(Self::GetAttributeHandle(decode_body(body)?))
            },
            tags::response::GET_INTERACTION_CLASS_HANDLE => {
                Ok(Self::GetInteractionClassHandle(decode_body(body)?))
            },
            tags::response::GET_PARAMETER_HANDLE => {
                Ok(Self::GetParameterHandle(decode_body(body)?))
            },
            tags::response::PUBLISH_OBJECT_CLASS_ATTRIBUTES => {
                Ok(Self::PublishObjectClassAttributes)
            },
            tags::response::UNPUBLISH_OBJECT_CLASS => Ok(Self::UnpublishObjectClass),
            tags::response::PUBLISH_INTERACTION_CLASS => Ok(Self::PublishInteractionClass),
            tags::response::UNPUBLISH_INTERACTION_CLASS => Ok(Self::UnpublishInteractionClass),
            tags::response::SUBSCRIBE_OBJECT_CLASS_ATTRIBUTES => {
                Ok(Self::SubscribeObjectClassAttributes)
            },
            tags::response::UNSUBSCRIBE_OBJECT_CLASS => Ok(Self::UnsubscribeObjectClass),
            tags::response::SUBSCRIBE_INTERACTION_CLASS => Ok(Self::SubscribeInteractionClass),
            tags::response::UNSUBSCRIBE_INTERACTION_CLASS => {
                Ok(Self::UnsubscribeInteractionClass)
            },
            tags::response::RESERVE_OBJECT_INSTANCE_NAME => Ok(Self::ReserveObjectInstanceName),
            tags::response::REGISTER_OBJECT_INSTANCE => {
                Ok(Self::RegisterObjectInstance(decode_body(body)?))
            },
            tags::response::DELETE_OBJECT_INSTANCE => Ok(Self::DeleteObjectInstance),
            tags::response::SEND_INTERACTION => Ok(Self::SendInteraction),
            tags::response::UPDATE_ATTRIBUTE_VALUES => Ok(Self::UpdateAttributeValues),
            other => Err(ProtocolError::UnknownTag { union: "CallResponse", tag: other }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trip() {
        let requests = vec![
            CallRequest::Connect(ConnectRequest {
                rti_address_host: "127.0.0.1".to_string(),
                rti_address_port: 5000,
                configuration_name: "default".to_string(),
                additional_settings: String::new(),
            }),
            CallRequest::ListFederationExecutions,
            CallRequest::GetObjectClassHandle(GetObjectClassHandleRequest {
                object_class_name: "BaseEntity.Aircraft".to_string(),
            }),
            CallRequest::ResignFederationExecution(ResignFederationExecutionRequest {
                resign_action: ResignAction::DeleteObjects,
            }),
            CallRequest::UpdateAttributeValues(UpdateAttributeValuesRequest {
                object_instance: ObjectInstanceHandle::new(vec![0x01]),
                attribute_values: [(AttributeHandle::new(vec![0x07]), vec![0, 0, 0, 5])]
                    .into_iter()
                    .collect(),
                user_supplied_tag: b"tag".to_vec(),
            }),
        ];

        for request in requests {
            let payload = request.encode().expect("should encode");
            let decoded = CallRequest::decode(&payload).expect("should decode");
            assert_eq!(request, decoded);
        }
    }

    #[test]
    fn response_round_trip() {
        let responses = vec![
            CallResponse::ExceptionData(ExceptionData {
                exception_name: "FederationExecutionAlreadyExists".to_string(),
                exception_description: "X exists".to_string(),
            }),
            CallResponse::Connect(ConfigurationResult {
                address_used: true,
                configuration_used: false,
                additional_settings_result: AdditionalSettingsResult::SettingsIgnored,
                message: "ok".to_string(),
            }),
            CallResponse::GetObjectClassHandle(ObjectClassHandle::new(vec![0xAB])),
            CallResponse::JoinFederationExecution(FederateHandle::new(vec![0x10])),
            CallResponse::CreateFederationExecution,
            CallResponse::UpdateAttributeValues,
        ];

        for response in responses {
            let payload = response.encode().expect("should encode");
            let decoded = CallResponse::decode(&payload).expect("should decode");
            assert_eq!(response, decoded);
        }
    }

    #[test]
    fn request_response_tags_pair_off_by_one() {
        // Every response tag is its request tag plus one because
        // EXCEPTION_DATA occupies the first response slot.
        let request = CallRequest::GetObjectClassHandle(GetObjectClassHandleRequest {
            object_class_name: "Ball".to_string(),
        });
        assert_eq!(request.response_tag(), request.tag() + 1);
    }

    #[test]
    fn unknown_tag_rejected() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&9999u32.to_be_bytes());
        assert_eq!(
            CallRequest::decode(&payload),
            Err(ProtocolError::UnknownTag { union: "CallRequest", tag: 9999 })
        );
        assert_eq!(
            CallResponse::decode(&payload),
            Err(ProtocolError::UnknownTag { union: "CallResponse", tag: 9999 })
        );
    }

    #[test]
    fn exception_is_flagged() {
        let response = CallResponse::ExceptionData(ExceptionData {
            exception_name: "NameNotFound".to_string(),
            exception_description: String::new(),
        });
        assert!(response.is_exception());
        assert!(!CallResponse::SendInteraction.is_exception());
    }
}
