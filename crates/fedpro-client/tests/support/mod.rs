//! Scripted mock FedPro bridge for integration tests.
//!
//! Each test spawns one bridge thread that runs a hand-written script of
//! frame exchanges against a real TCP socket, asserting on what the client
//! puts on the wire.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;
use fedpro_client::{ClientConfig, SessionConfig};
use fedpro_proto::control::SessionStatus;
use fedpro_proto::payloads::calls::{CallRequest, CallResponse};
use fedpro_proto::payloads::callbacks::{CallbackRequest, CallbackResponse};
use fedpro_proto::{Frame, MessageType};

/// Session id the mock bridge assigns.
pub const SESSION_ID: u64 = 0x0000_0000_00C0_FFEE;

/// Spawn a one-connection bridge running `script`.
pub fn spawn_bridge<F>(script: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        script(stream);
    });
    (addr, handle)
}

/// Client configuration pointing at the bridge, with test-friendly
/// timeouts.
pub fn test_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        fedpro_host: addr.ip().to_string(),
        fedpro_port: addr.port(),
        session: SessionConfig::default(),
        connect_timeout: Duration::from_secs(5),
        call_timeout: Duration::from_millis(400),
        update_timeout: Duration::from_millis(400),
        ..ClientConfig::default()
    }
}

/// Read one complete frame from the socket.
pub fn read_frame(stream: &mut TcpStream) -> Frame {
    let mut size_buf = [0u8; 4];
    stream.read_exact(&mut size_buf).unwrap();
    let size = u32::from_be_bytes(size_buf) as usize;
    assert!(size >= 24, "frame size below header minimum: {size}");

    let mut wire = vec![0u8; size];
    wire[..4].copy_from_slice(&size_buf);
    stream.read_exact(&mut wire[4..]).unwrap();
    Frame::decode(&wire).unwrap()
}

/// Write one frame to the socket.
pub fn write_frame(stream: &mut TcpStream, frame: &Frame) {
    stream.write_all(&frame.to_vec().unwrap()).unwrap();
}

/// Build a frame stamped with the bridge session id.
pub fn stamped(message_type: MessageType, payload: Bytes, sequence: u32) -> Frame {
    let mut frame = Frame::new(message_type, payload);
    frame.header.set_session_id(SESSION_ID);
    frame.header.set_sequence_num(sequence);
    frame
}

/// Serve the session handshake: `NewSession` in, `NewSessionStatus` out,
/// then answer the client's confirming heartbeat.
pub fn accept_session(stream: &mut TcpStream) {
    let hello = read_frame(stream);
    assert_eq!(hello.message_type(), Some(MessageType::NewSession));
    assert_eq!(hello.header.sequence_num(), 0);
    assert_eq!(hello.header.session_id(), 0);

    write_frame(stream, &stamped(MessageType::NewSessionStatus, SessionStatus::Success.encode(), 1));

    answer_heartbeat(stream);
}

/// Expect the client's heartbeat and answer it, echoing the sequence.
pub fn answer_heartbeat(stream: &mut TcpStream) {
    let heartbeat = read_frame(stream);
    assert_eq!(heartbeat.message_type(), Some(MessageType::Heartbeat));
    assert_eq!(heartbeat.header.session_id(), SESSION_ID);
    write_frame(
        stream,
        &stamped(MessageType::HeartbeatResponse, Bytes::new(), heartbeat.header.sequence_num()),
    );
}

/// Expect one HLA call request; returns its sequence and decoded variant.
pub fn expect_call(stream: &mut TcpStream) -> (u32, CallRequest) {
    let frame = read_frame(stream);
    assert_eq!(frame.message_type(), Some(MessageType::CallRequest));
    assert_eq!(frame.header.session_id(), SESSION_ID);
    let request = CallRequest::decode(&frame.payload).unwrap();
    (frame.header.sequence_num(), request)
}

/// Answer a call request; the response echoes the request sequence.
pub fn respond(stream: &mut TcpStream, request_seq: u32, response: &CallResponse) {
    write_frame(
        stream,
        &stamped(MessageType::CallResponse, response.encode().unwrap(), request_seq),
    );
}

/// Serve the HLA `connect` call issued by `RtiAmbassador::connect`.
pub fn accept_connect_call(stream: &mut TcpStream) {
    let (sequence, request) = expect_call(stream);
    assert!(matches!(request, CallRequest::Connect(_)), "expected connect, got {request:?}");
    respond(
        stream,
        sequence,
        &CallResponse::Connect(fedpro_proto::payloads::calls::ConfigurationResult {
            address_used: true,
            configuration_used: true,
            ..Default::default()
        }),
    );
}

/// Deliver a callback with a bridge-assigned sequence number.
pub fn send_callback(stream: &mut TcpStream, sequence: u32, callback: &CallbackRequest) {
    write_frame(
        stream,
        &stamped(MessageType::CallbackRequest, callback.encode().unwrap(), sequence),
    );
}

/// Expect a callback response; returns its sequence and outcome.
pub fn expect_callback_response(stream: &mut TcpStream) -> (u32, CallbackResponse) {
    let frame = read_frame(stream);
    assert_eq!(frame.message_type(), Some(MessageType::CallbackResponse));
    let response = CallbackResponse::decode(&frame.payload).unwrap();
    (frame.header.sequence_num(), response)
}

/// Block until the client closes the connection, asserting that no
/// further traffic arrives first.
pub fn expect_quiet_close(mut stream: TcpStream) {
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    let mut buf = [0u8; 1];
    match stream.read(&mut buf) {
        Ok(0) => {},
        Ok(n) => panic!("unexpected {n} trailing bytes from client"),
        Err(error) => panic!("bridge read failed: {error}"),
    }
}
