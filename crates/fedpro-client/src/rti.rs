//! The RTI-ambassador façade.
//!
//! One method per HLA service. Each method builds exactly one variant of
//! the `CallRequest` union, hands it to the engine's matcher with the
//! matching response discriminator, decodes the typed response, updates
//! the handle caches, and maps `ExceptionData` to typed errors.
//!
//! Handle queries are cache-first: a hit answers without any network
//! traffic. Fatal failures deliver `connectionLost` to the bound federate
//! ambassador, tear the transport down, and clear the caches.

use std::time::Duration;

use fedpro_proto::handles::{
    AttributeHandle, AttributeHandleSet, AttributeHandleValueMap, FederateHandle,
    InteractionClassHandle, ObjectClassHandle, ObjectInstanceHandle, ParameterHandle,
    ParameterHandleValueMap,
};
use fedpro_proto::payloads::calls::{
    CallRequest, CallResponse, ConfigurationResult, ConnectRequest,
    CreateFederationExecutionRequest, DeleteObjectInstanceRequest,
    DestroyFederationExecutionRequest, GetAttributeHandleRequest,
    GetInteractionClassHandleRequest, GetObjectClassHandleRequest, GetParameterHandleRequest,
    JoinFederationExecutionRequest, PublishInteractionClassRequest,
    PublishObjectClassAttributesRequest, RegisterObjectInstanceRequest,
    ReserveObjectInstanceNameRequest, ResignAction, ResignFederationExecutionRequest,
    SendInteractionRequest, SubscribeInteractionClassRequest,
    SubscribeObjectClassAttributesRequest, UnpublishInteractionClassRequest,
    UnpublishObjectClassRequest, UnsubscribeInteractionClassRequest,
    UnsubscribeObjectClassRequest, UpdateAttributeValuesRequest,
};
use tracing::warn;

use crate::{
    cache::HandleCache,
    client::FedProClient,
    config::{ClientConfig, RtiConfiguration},
    error::{RtiError, RtiException},
    federate::FederateAmbassador,
};

/// RTI-ambassador façade bound to one federate ambassador and one FedPro
/// connection.
pub struct RtiAmbassador<A: FederateAmbassador> {
    client: FedProClient,
    federate: A,
    cache: HandleCache,
}

impl<A: FederateAmbassador> RtiAmbassador<A> {
    /// Create an ambassador with the default engine configuration.
    pub fn new(federate: A) -> Self {
        Self::with_config(federate, ClientConfig::default())
    }

    /// Create an ambassador with an explicit engine configuration.
    pub fn with_config(federate: A, config: ClientConfig) -> Self {
        Self { client: FedProClient::new(config), federate, cache: HandleCache::new() }
    }

    /// The bound federate ambassador.
    pub fn federate(&self) -> &A {
        &self.federate
    }

    /// Mutable access to the bound federate ambassador.
    pub fn federate_mut(&mut self) -> &mut A {
        &mut self.federate
    }

    /// The underlying protocol engine.
    pub fn client(&self) -> &FedProClient {
        &self.client
    }

    /// True once the session handshake has completed.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Connect to the RTI: open the FedPro session, then issue the HLA
    /// `connect` call carrying the RTI configuration.
    ///
    /// # Errors
    ///
    /// - `RtiError::AlreadyConnected` if a session is open
    /// - Typed handshake refusals, transport failures, and RTI exceptions
    pub fn connect(
        &mut self,
        configuration: &RtiConfiguration,
    ) -> Result<ConfigurationResult, RtiError> {
        if let Err(error) = self.client.connect() {
            return Err(self.handle_failure(error));
        }

        let request = CallRequest::Connect(ConnectRequest {
            rti_address_host: configuration.rti_address.0.clone(),
            rti_address_port: configuration.rti_address.1,
            configuration_name: configuration.configuration_name.clone(),
            additional_settings: configuration.additional_settings.clone(),
        });
        let timeout = self.client.config().connect_timeout;
        match self.call(request, timeout)? {
            CallResponse::Connect(result) => Ok(result),
            other => Err(self.unexpected(other)),
        }
    }

    /// Gracefully terminate the session, close the transport, and clear
    /// the handle caches.
    pub fn disconnect(&mut self) -> Result<(), RtiError> {
        let result = self.client.terminate();
        self.cache.clear();
        result
    }

    /// Create a federation execution.
    pub fn create_federation_execution(
        &mut self,
        federation_name: &str,
        fom_modules: &[String],
    ) -> Result<(), RtiError> {
        let request = CallRequest::CreateFederationExecution(CreateFederationExecutionRequest {
            federation_execution_name: federation_name.to_string(),
            fom_modules: fom_modules.to_vec(),
        });
        match self.call_default(request)? {
            CallResponse::CreateFederationExecution => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Destroy a federation execution.
    pub fn destroy_federation_execution(&mut self, federation_name: &str) -> Result<(), RtiError> {
        let request = CallRequest::DestroyFederationExecution(DestroyFederationExecutionRequest {
            federation_execution_name: federation_name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::DestroyFederationExecution => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Request the list of federation executions. The report arrives as a
    /// `reportFederationExecutions` callback.
    pub fn list_federation_executions(&mut self) -> Result<(), RtiError> {
        match self.call_default(CallRequest::ListFederationExecutions)? {
            CallResponse::ListFederationExecutions => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Join a federation execution. Single attempt; retry policy is the
    /// caller's.
    pub fn join_federation_execution(
        &mut self,
        federate_name: &str,
        federate_type: &str,
        federation_name: &str,
        fom_modules: &[String],
    ) -> Result<FederateHandle, RtiError> {
        let request = CallRequest::JoinFederationExecution(JoinFederationExecutionRequest {
            federate_name: federate_name.to_string(),
            federate_type: federate_type.to_string(),
            federation_execution_name: federation_name.to_string(),
            fom_modules: fom_modules.to_vec(),
        });
        match self.call_default(request)? {
            CallResponse::JoinFederationExecution(handle) => Ok(handle),
            other => Err(self.unexpected(other)),
        }
    }

    /// Resign from the joined federation execution.
    pub fn resign_federation_execution(
        &mut self,
        resign_action: ResignAction,
    ) -> Result<(), RtiError> {
        let request = CallRequest::ResignFederationExecution(ResignFederationExecutionRequest {
            resign_action,
        });
        match self.call_default(request)? {
            CallResponse::ResignFederationExecution => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Resolve an object class name to its handle (cache-first).
    pub fn get_object_class_handle(&mut self, name: &str) -> Result<ObjectClassHandle, RtiError> {
        if let Some(handle) = self.cache.object_class_by_name(name) {
            return Ok(handle.clone());
        }

        let request = CallRequest::GetObjectClassHandle(GetObjectClassHandleRequest {
            object_class_name: name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::GetObjectClassHandle(handle) => {
                self.cache.insert_object_class(name.to_string(), handle.clone());
                Ok(handle)
            },
            other => Err(self.unexpected(other)),
        }
    }

    /// Resolve an attribute name within a class to its handle
    /// (cache-first).
    pub fn get_attribute_handle(
        &mut self,
        object_class: &ObjectClassHandle,
        name: &str,
    ) -> Result<AttributeHandle, RtiError> {
        if let Some(handle) = self.cache.attribute_by_name(object_class, name) {
            return Ok(handle.clone());
        }

        let request = CallRequest::GetAttributeHandle(GetAttributeHandleRequest {
            object_class: object_class.clone(),
            attribute_name: name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::GetAttributeHandle(handle) => {
                self.cache.insert_attribute(object_class, name.to_string(), handle.clone());
                Ok(handle)
            },
            other => Err(self.unexpected(other)),
        }
    }

    /// Resolve an interaction class name to its handle (cache-first).
    pub fn get_interaction_class_handle(
        &mut self,
        name: &str,
    ) -> Result<InteractionClassHandle, RtiError> {
        if let Some(handle) = self.cache.interaction_by_name(name) {
            return Ok(handle.clone());
        }

        let request = CallRequest::GetInteractionClassHandle(GetInteractionClassHandleRequest {
            interaction_class_name: name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::GetInteractionClassHandle(handle) => {
                self.cache.insert_interaction(name.to_string(), handle.clone());
                Ok(handle)
            },
            other => Err(self.unexpected(other)),
        }
    }

    /// Resolve a parameter name within an interaction class to its handle
    /// (cache-first).
    pub fn get_parameter_handle(
        &mut self,
        interaction_class: &InteractionClassHandle,
        name: &str,
    ) -> Result<ParameterHandle, RtiError> {
        if let Some(handle) = self.cache.parameter_by_name(interaction_class, name) {
            return Ok(handle.clone());
        }

        let request = CallRequest::GetParameterHandle(GetParameterHandleRequest {
            interaction_class: interaction_class.clone(),
            parameter_name: name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::GetParameterHandle(handle) => {
                self.cache.insert_parameter(interaction_class, name.to_string(), handle.clone());
                Ok(handle)
            },
            other => Err(self.unexpected(other)),
        }
    }

    /// Publish attributes of an object class.
    pub fn publish_object_class_attributes(
        &mut self,
        object_class: &ObjectClassHandle,
        attributes: &AttributeHandleSet,
    ) -> Result<(), RtiError> {
        let request = CallRequest::PublishObjectClassAttributes(
            PublishObjectClassAttributesRequest {
                object_class: object_class.clone(),
                attributes: attributes.iter().cloned().collect(),
            },
        );
        match self.call_default(request)? {
            CallResponse::PublishObjectClassAttributes => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Unpublish an object class.
    pub fn unpublish_object_class(
        &mut self,
        object_class: &ObjectClassHandle,
    ) -> Result<(), RtiError> {
        let request = CallRequest::UnpublishObjectClass(UnpublishObjectClassRequest {
            object_class: object_class.clone(),
        });
        match self.call_default(request)? {
            CallResponse::UnpublishObjectClass => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Publish an interaction class.
    pub fn publish_interaction_class(
        &mut self,
        interaction_class: &InteractionClassHandle,
    ) -> Result<(), RtiError> {
        let request = CallRequest::PublishInteractionClass(PublishInteractionClassRequest {
            interaction_class: interaction_class.clone(),
        });
        match self.call_default(request)? {
            CallResponse::PublishInteractionClass => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Unpublish an interaction class.
    pub fn unpublish_interaction_class(
        &mut self,
        interaction_class: &InteractionClassHandle,
    ) -> Result<(), RtiError> {
        let request = CallRequest::UnpublishInteractionClass(UnpublishInteractionClassRequest {
            interaction_class: interaction_class.clone(),
        });
        match self.call_default(request)? {
            CallResponse::UnpublishInteractionClass => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Subscribe to attributes of an object class.
    pub fn subscribe_object_class_attributes(
        &mut self,
        object_class: &ObjectClassHandle,
        attributes: &AttributeHandleSet,
        active: bool,
    ) -> Result<(), RtiError> {
        let request = CallRequest::SubscribeObjectClassAttributes(
            SubscribeObjectClassAttributesRequest {
                object_class: object_class.clone(),
                attributes: attributes.iter().cloned().collect(),
                active,
            },
        );
        match self.call_default(request)? {
            CallResponse::SubscribeObjectClassAttributes => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Unsubscribe from an object class.
    pub fn unsubscribe_object_class(
        &mut self,
        object_class: &ObjectClassHandle,
    ) -> Result<(), RtiError> {
        let request = CallRequest::UnsubscribeObjectClass(UnsubscribeObjectClassRequest {
            object_class: object_class.clone(),
        });
        match self.call_default(request)? {
            CallResponse::UnsubscribeObjectClass => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Subscribe to an interaction class.
    pub fn subscribe_interaction_class(
        &mut self,
        interaction_class: &InteractionClassHandle,
    ) -> Result<(), RtiError> {
        let request = CallRequest::SubscribeInteractionClass(SubscribeInteractionClassRequest {
            interaction_class: interaction_class.clone(),
        });
        match self.call_default(request)? {
            CallResponse::SubscribeInteractionClass => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Unsubscribe from an interaction class.
    pub fn unsubscribe_interaction_class(
        &mut self,
        interaction_class: &InteractionClassHandle,
    ) -> Result<(), RtiError> {
        let request =
            CallRequest::UnsubscribeInteractionClass(UnsubscribeInteractionClassRequest {
                interaction_class: interaction_class.clone(),
            });
        match self.call_default(request)? {
            CallResponse::UnsubscribeInteractionClass => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Reserve an object instance name.
    ///
    /// Returns on the synchronous acknowledgment; the reservation outcome
    /// arrives later as a name-reservation callback.
    pub fn reserve_object_instance_name(&mut self, name: &str) -> Result<(), RtiError> {
        let request = CallRequest::ReserveObjectInstanceName(ReserveObjectInstanceNameRequest {
            object_instance_name: name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::ReserveObjectInstanceName => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Register an object instance under a previously reserved name.
    pub fn register_object_instance(
        &mut self,
        object_class: &ObjectClassHandle,
        name: &str,
    ) -> Result<ObjectInstanceHandle, RtiError> {
        let request = CallRequest::RegisterObjectInstance(RegisterObjectInstanceRequest {
            object_class: object_class.clone(),
            object_instance_name: name.to_string(),
        });
        match self.call_default(request)? {
            CallResponse::RegisterObjectInstance(handle) => {
                self.cache.insert_object_instance(name.to_string(), handle.clone());
                Ok(handle)
            },
            other => Err(self.unexpected(other)),
        }
    }

    /// Delete an object instance.
    pub fn delete_object_instance(
        &mut self,
        object_instance: &ObjectInstanceHandle,
        user_tag: &[u8],
    ) -> Result<(), RtiError> {
        let request = CallRequest::DeleteObjectInstance(DeleteObjectInstanceRequest {
            object_instance: object_instance.clone(),
            user_supplied_tag: user_tag.to_vec(),
        });
        let timeout = self.client.config().update_timeout;
        match self.call(request, timeout)? {
            CallResponse::DeleteObjectInstance => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Send an interaction.
    pub fn send_interaction(
        &mut self,
        interaction_class: &InteractionClassHandle,
        parameter_values: &ParameterHandleValueMap,
        user_tag: &[u8],
    ) -> Result<(), RtiError> {
        let request = CallRequest::SendInteraction(SendInteractionRequest {
            interaction_class: interaction_class.clone(),
            parameter_values: parameter_values.clone(),
            user_supplied_tag: user_tag.to_vec(),
        });
        let timeout = self.client.config().update_timeout;
        match self.call(request, timeout)? {
            CallResponse::SendInteraction => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Update attribute values of an object instance.
    ///
    /// Fails locally with `NoAttributesProvided` on an empty map; no frame
    /// is emitted.
    pub fn update_attribute_values(
        &mut self,
        object_instance: &ObjectInstanceHandle,
        attribute_values: &AttributeHandleValueMap,
        user_tag: &[u8],
    ) -> Result<(), RtiError> {
        if attribute_values.is_empty() {
            return Err(RtiError::NoAttributesProvided);
        }

        let request = CallRequest::UpdateAttributeValues(UpdateAttributeValuesRequest {
            object_instance: object_instance.clone(),
            attribute_values: attribute_values.clone(),
            user_supplied_tag: user_tag.to_vec(),
        });
        let timeout = self.client.config().update_timeout;
        match self.call(request, timeout)? {
            CallResponse::UpdateAttributeValues => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Pump queued and inbound callbacks for at most `max_duration`,
    /// delivering them to the bound federate ambassador.
    ///
    /// Returns the number of callbacks delivered.
    pub fn evoke_callbacks(&mut self, max_duration: Duration) -> Result<usize, RtiError> {
        match self.client.evoke_callbacks(max_duration, &mut self.federate) {
            Ok(delivered) => Ok(delivered),
            Err(error) => Err(self.handle_failure(error)),
        }
    }

    /// Issue a call with the default per-service timeout and map
    /// exceptions and fatal failures.
    fn call_default(&mut self, request: CallRequest) -> Result<CallResponse, RtiError> {
        let timeout = self.client.config().call_timeout;
        self.call(request, timeout)
    }

    fn call(
        &mut self,
        request: CallRequest,
        timeout: Duration,
    ) -> Result<CallResponse, RtiError> {
        match self.client.call(request, timeout) {
            Ok(CallResponse::ExceptionData(data)) => {
                Err(RtiError::Rti(RtiException::from(data)))
            },
            Ok(response) => Ok(response),
            Err(error) => Err(self.handle_failure(error)),
        }
    }

    /// Fatal failures deliver `connectionLost`, tear the engine down, and
    /// clear the caches before the error is surfaced.
    fn handle_failure(&mut self, error: RtiError) -> RtiError {
        if error.is_fatal() {
            let reason = error.to_string();
            warn!(reason = %reason, "fatal session failure");
            if let Err(callback_error) = self.federate.connection_lost(&reason) {
                warn!(error = %callback_error, "connectionLost handler failed");
            }
            self.client.teardown();
            self.cache.clear();
        }
        error
    }

    fn unexpected(&self, actual: CallResponse) -> RtiError {
        warn!(tag = actual.tag(), "response variant does not answer the issued service");
        RtiError::UnexpectedResponse { actual: actual.tag() }
    }
}
