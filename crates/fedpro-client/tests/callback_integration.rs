//! Integration tests for callback queueing and evoked dispatch.
//!
//! Covers the interleaved-callback scenario (queued during a call, then
//! evoked), reflect/receive decoding into typed handle maps, failing
//! handlers, fatal-signal flags, and server-initiated heartbeats.

mod support;

use std::time::Duration;

use fedpro_client::{
    FederateAmbassador, FederateInternalError, FederateResult, RtiAmbassador, RtiConfiguration,
};
use fedpro_proto::handles::{
    AttributeHandle, AttributeHandleValueMap, FederateHandle, InteractionClassHandle,
    ObjectClassHandle, ObjectInstanceHandle, ParameterHandle, ParameterHandleValueMap,
    TransportationTypeHandle,
};
use fedpro_proto::payloads::callbacks::{
    CallbackRequest, CallbackResponse, DiscoverObjectInstance, FederateResigned,
    ReceiveInteraction, ReflectAttributeValues,
};
use fedpro_proto::payloads::calls::{CallRequest, CallResponse};
use fedpro_proto::MessageType;
use support::{
    accept_connect_call, accept_session, expect_call, expect_callback_response,
    expect_quiet_close, read_frame, respond, send_callback, spawn_bridge, stamped, test_config,
    write_frame,
};

/// Ambassador that records every delivery for assertions.
#[derive(Default)]
struct Recorder {
    discovered: Vec<(ObjectInstanceHandle, ObjectClassHandle, String)>,
    reflected: Vec<(ObjectInstanceHandle, AttributeHandleValueMap)>,
    interactions: Vec<(InteractionClassHandle, ParameterHandleValueMap)>,
    resigned: Vec<String>,
    fail_discoveries: bool,
}

impl FederateAmbassador for Recorder {
    fn federate_resigned(&mut self, reason: &str) -> FederateResult {
        self.resigned.push(reason.to_string());
        Ok(())
    }

    fn discover_object_instance(
        &mut self,
        object_instance: &ObjectInstanceHandle,
        object_class: &ObjectClassHandle,
        object_name: &str,
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        if self.fail_discoveries {
            return Err(FederateInternalError::new("discovery rejected"));
        }
        self.discovered.push((
            object_instance.clone(),
            object_class.clone(),
            object_name.to_string(),
        ));
        Ok(())
    }

    fn reflect_attribute_values(
        &mut self,
        object_instance: &ObjectInstanceHandle,
        attributes: &AttributeHandleValueMap,
        _user_tag: &[u8],
        _transportation: &TransportationTypeHandle,
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        self.reflected.push((object_instance.clone(), attributes.clone()));
        Ok(())
    }

    fn receive_interaction(
        &mut self,
        interaction_class: &InteractionClassHandle,
        parameters: &ParameterHandleValueMap,
        _user_tag: &[u8],
        _transportation: &TransportationTypeHandle,
        _producing_federate: &FederateHandle,
    ) -> FederateResult {
        self.interactions.push((interaction_class.clone(), parameters.clone()));
        Ok(())
    }
}

fn discover_ball() -> CallbackRequest {
    CallbackRequest::DiscoverObjectInstance(DiscoverObjectInstance {
        object_instance: ObjectInstanceHandle::new(vec![0x44]),
        object_class: ObjectClassHandle::new(vec![0xAB]),
        object_instance_name: "Ball_1".to_string(),
        producing_federate: FederateHandle::new(vec![0x10]),
    })
}

#[test]
fn callback_during_call_is_queued_then_evoked() {
    let (addr, bridge) = spawn_bridge(|mut stream| {
        accept_session(&mut stream);
        accept_connect_call(&mut stream);

        let (sequence, request) = expect_call(&mut stream);
        assert!(matches!(request, CallRequest::RegisterObjectInstance(_)));

        // A callback interleaves before the response; the matcher must
        // queue it and keep waiting
        send_callback(&mut stream, 42, &discover_ball());
        respond(
            &mut stream,
            sequence,
            &CallResponse::RegisterObjectInstance(ObjectInstanceHandle::new(vec![0x44])),
        );

        // The queued callback is answered only once evoked
        let (response_seq, response) = expect_callback_response(&mut stream);
        assert_eq!(response_seq, 42);
        assert_eq!(response, CallbackResponse::Succeeded);

        expect_quiet_close(stream);
    });

    let mut rti = RtiAmbassador::with_config(Recorder::default(), test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();

    let handle = rti
        .register_object_instance(&ObjectClassHandle::new(vec![0xAB]), "Ball_1")
        .unwrap();
    assert_eq!(handle, ObjectInstanceHandle::new(vec![0x44]));

    // Queued, not delivered: the ambassador has seen nothing yet
    assert_eq!(rti.client().queued_callback_count(), 1);
    assert!(rti.federate().discovered.is_empty());

    let delivered = rti.evoke_callbacks(Duration::from_millis(300)).unwrap();
    assert_eq!(delivered, 1);
    assert_eq!(rti.federate().discovered.len(), 1);
    assert_eq!(rti.federate().discovered[0].2, "Ball_1");
    assert_eq!(rti.client().queued_callback_count(), 0);

    drop(rti);
    bridge.join().unwrap();
}

#[test]
fn reflect_attribute_values_decodes_typed_maps() {
    let (addr, bridge) = spawn_bridge(|mut stream| {
        accept_session(&mut stream);
        accept_connect_call(&mut stream);

        send_callback(
            &mut stream,
            7,
            &CallbackRequest::ReflectAttributeValues(ReflectAttributeValues {
                object_instance: ObjectInstanceHandle::new(vec![0x01]),
                attribute_values: [(AttributeHandle::new(vec![0x07]), vec![0, 0, 0, 5])]
                    .into_iter()
                    .collect(),
                user_supplied_tag: Vec::new(),
                transportation_type: TransportationTypeHandle::new(vec![0x02]),
                producing_federate: FederateHandle::new(vec![0x10]),
            }),
        );

        let (response_seq, response) = expect_callback_response(&mut stream);
        assert_eq!(response_seq, 7);
        assert_eq!(response, CallbackResponse::Succeeded);

        expect_quiet_close(stream);
    });

    let mut rti = RtiAmbassador::with_config(Recorder::default(), test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();

    let delivered = rti.evoke_callbacks(Duration::from_millis(300)).unwrap();
    assert_eq!(delivered, 1);

    let (instance, attributes) = &rti.federate().reflected[0];
    assert_eq!(instance, &ObjectInstanceHandle::new(vec![0x01]));
    assert_eq!(
        attributes.get(&AttributeHandle::new(vec![0x07])),
        Some(&vec![0, 0, 0, 5])
    );

    drop(rti);
    bridge.join().unwrap();
}

#[test]
fn receive_interaction_decodes_parameter_map() {
    let (addr, bridge) = spawn_bridge(|mut stream| {
        accept_session(&mut stream);
        accept_connect_call(&mut stream);

        send_callback(
            &mut stream,
            9,
            &CallbackRequest::ReceiveInteraction(ReceiveInteraction {
                interaction_class: InteractionClassHandle::new(vec![0x20]),
                parameter_values: [(ParameterHandle::new(vec![0x03]), b"FuseType".to_vec())]
                    .into_iter()
                    .collect(),
                user_supplied_tag: b"tag".to_vec(),
                transportation_type: TransportationTypeHandle::new(vec![0x02]),
                producing_federate: FederateHandle::new(vec![0x10]),
            }),
        );

        let (response_seq, response) = expect_callback_response(&mut stream);
        assert_eq!(response_seq, 9);
        assert_eq!(response, CallbackResponse::Succeeded);

        expect_quiet_close(stream);
    });

    let mut rti = RtiAmbassador::with_config(Recorder::default(), test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();

    let delivered = rti.evoke_callbacks(Duration::from_millis(300)).unwrap();
    assert_eq!(delivered, 1);

    let (interaction, parameters) = &rti.federate().interactions[0];
    assert_eq!(interaction, &InteractionClassHandle::new(vec![0x20]));
    assert_eq!(
        parameters.get(&ParameterHandle::new(vec![0x03])),
        Some(&b"FuseType".to_vec())
    );

    drop(rti);
    bridge.join().unwrap();
}

#[test]
fn failing_handler_answers_with_failure() {
    let (addr, bridge) = spawn_bridge(|mut stream| {
        accept_session(&mut stream);
        accept_connect_call(&mut stream);

        send_callback(&mut stream, 11, &discover_ball());

        let (response_seq, response) = expect_callback_response(&mut stream);
        assert_eq!(response_seq, 11);
        assert_eq!(response, CallbackResponse::Failed);

        expect_quiet_close(stream);
    });

    let recorder = Recorder { fail_discoveries: true, ..Recorder::default() };
    let mut rti = RtiAmbassador::with_config(recorder, test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();

    // The failure is reported to the bridge; the pump itself succeeds
    let delivered = rti.evoke_callbacks(Duration::from_millis(300)).unwrap();
    assert_eq!(delivered, 1);
    assert!(rti.federate().discovered.is_empty());
    assert!(rti.is_connected());

    drop(rti);
    bridge.join().unwrap();
}

#[test]
fn fatal_signal_callbacks_raise_flags_and_still_queue() {
    let (addr, bridge) = spawn_bridge(|mut stream| {
        let hello = read_frame(&mut stream);
        assert_eq!(hello.message_type(), Some(MessageType::NewSession));
        write_frame(
            &mut stream,
            &stamped(
                MessageType::NewSessionStatus,
                fedpro_proto::control::SessionStatus::Success.encode(),
                1,
            ),
        );

        // Deliver the fatal signal before answering the confirming
        // heartbeat: no call expectation is pending yet
        let heartbeat = read_frame(&mut stream);
        assert_eq!(heartbeat.message_type(), Some(MessageType::Heartbeat));
        send_callback(
            &mut stream,
            2,
            &CallbackRequest::FederateResigned(FederateResigned {
                reason_for_resign_description: "resigned by RTI".to_string(),
            }),
        );
        write_frame(
            &mut stream,
            &stamped(
                MessageType::HeartbeatResponse,
                bytes::Bytes::new(),
                heartbeat.header.sequence_num(),
            ),
        );

        accept_connect_call(&mut stream);

        let (response_seq, response) = expect_callback_response(&mut stream);
        assert_eq!(response_seq, 2);
        assert_eq!(response, CallbackResponse::Succeeded);

        expect_quiet_close(stream);
    });

    let mut rti = RtiAmbassador::with_config(Recorder::default(), test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();

    // Flagged and queued, not yet delivered
    assert!(rti.client().federate_resigned_signalled());
    assert_eq!(rti.client().queued_callback_count(), 1);
    assert!(rti.federate().resigned.is_empty());

    let delivered = rti.evoke_callbacks(Duration::from_millis(300)).unwrap();
    assert_eq!(delivered, 1);
    assert_eq!(rti.federate().resigned, vec!["resigned by RTI"]);

    drop(rti);
    bridge.join().unwrap();
}

#[test]
fn server_heartbeats_are_answered_during_evoke() {
    let (addr, bridge) = spawn_bridge(|mut stream| {
        accept_session(&mut stream);
        accept_connect_call(&mut stream);

        write_frame(&mut stream, &stamped(MessageType::Heartbeat, bytes::Bytes::new(), 5));

        let reply = read_frame(&mut stream);
        assert_eq!(reply.message_type(), Some(MessageType::HeartbeatResponse));
        assert_eq!(reply.header.sequence_num(), 5);

        expect_quiet_close(stream);
    });

    let mut rti = RtiAmbassador::with_config(Recorder::default(), test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();

    let delivered = rti.evoke_callbacks(Duration::from_millis(300)).unwrap();
    assert_eq!(delivered, 0);

    drop(rti);
    bridge.join().unwrap();
}

#[test]
fn peer_close_during_evoke_delivers_connection_lost() {
    struct LostRecorder {
        lost: Vec<String>,
    }

    impl FederateAmbassador for LostRecorder {
        fn connection_lost(&mut self, fault_description: &str) -> FederateResult {
            self.lost.push(fault_description.to_string());
            Ok(())
        }
    }

    let (addr, bridge) = spawn_bridge(|mut stream| {
        accept_session(&mut stream);
        accept_connect_call(&mut stream);
        // Drop the connection with nothing in flight
        drop(stream);
    });

    let mut rti = RtiAmbassador::with_config(LostRecorder { lost: Vec::new() }, test_config(addr));
    rti.connect(&RtiConfiguration::default()).unwrap();
    bridge.join().unwrap();

    let result = rti.evoke_callbacks(Duration::from_millis(300));
    assert!(result.is_err());
    assert!(!rti.is_connected());
    assert_eq!(rti.federate().lost.len(), 1);
}
