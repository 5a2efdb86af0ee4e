//! Blocking framed TCP transport.
//!
//! Thin I/O layer below the protocol engine: one frame per send, blocking
//! reads with a deadline. A frame read first pulls the 4-byte size field,
//! then the remaining `message_size - 4` bytes; partial reads are retried
//! until the frame completes or the deadline fires.

use std::{
    io::{Read, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

use fedpro_proto::{Frame, FrameHeader, ProtocolError};
use tracing::trace;

use crate::error::TransportError;

/// Framed transport over one TCP connection to the FedPro bridge.
#[derive(Debug)]
pub struct FramedTransport {
    stream: TcpStream,
}

impl FramedTransport {
    /// Open a TCP connection to `host:port`.
    ///
    /// Resolution may yield several addresses; each is tried with the full
    /// connect timeout until one succeeds.
    ///
    /// # Errors
    ///
    /// - `TransportError::Io` if resolution or every connect attempt fails
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, TransportError> {
        let mut last_error = None;
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    // One frame per send; coalescing would add latency to
                    // the synchronous call path.
                    stream.set_nodelay(true)?;
                    trace!(%addr, "transport connected");
                    return Ok(Self { stream });
                },
                Err(error) => last_error = Some(error),
            }
        }

        Err(last_error.map_or(TransportError::NotConnected, TransportError::Io))
    }

    /// Send one frame, all-or-nothing.
    ///
    /// # Errors
    ///
    /// - `TransportError::Protocol` if the frame exceeds the size cap
    /// - `TransportError::Io` on socket failure
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let wire = frame.to_vec()?;
        self.stream.write_all(&wire)?;
        trace!(
            message_type = ?frame.message_type(),
            sequence = frame.header.sequence_num(),
            len = wire.len(),
            "frame sent"
        );
        Ok(())
    }

    /// Read one complete frame, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// - `TransportError::Timeout` if no complete frame arrived in time
    /// - `TransportError::Closed` on peer EOF
    /// - `TransportError::Protocol` on framing violations
    /// - `TransportError::Io` on socket failure
    pub fn read_frame(&mut self, timeout: Duration) -> Result<Frame, TransportError> {
        let deadline = Instant::now().checked_add(timeout).ok_or(TransportError::Timeout {
            elapsed: timeout,
        })?;

        let mut size_buf = [0u8; 4];
        self.read_exact_by(&mut size_buf, deadline, timeout)?;

        let message_size = u32::from_be_bytes(size_buf);
        if (message_size as usize) < FrameHeader::SIZE {
            return Err(ProtocolError::ShortFrame {
                expected: FrameHeader::SIZE,
                actual: message_size as usize,
            }
            .into());
        }
        if message_size > FrameHeader::MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: message_size as usize,
                max: FrameHeader::MAX_MESSAGE_SIZE as usize,
            }
            .into());
        }

        let mut wire = vec![0u8; message_size as usize];
        wire[..4].copy_from_slice(&size_buf);
        self.read_exact_by(&mut wire[4..], deadline, timeout)?;

        let frame = Frame::decode(&wire)?;
        trace!(
            message_type = ?frame.message_type(),
            sequence = frame.header.sequence_num(),
            len = wire.len(),
            "frame received"
        );
        Ok(frame)
    }

    /// Close the connection.
    pub fn close(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }

    /// Fill `buf` completely, retrying partial reads until `deadline`.
    fn read_exact_by(
        &mut self,
        buf: &mut [u8],
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let mut filled = 0;
        while filled < buf.len() {
            let now = Instant::now();
            if now >= deadline {
                return Err(TransportError::Timeout { elapsed: timeout });
            }
            self.stream.set_read_timeout(Some(deadline - now))?;

            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => filled += n,
                Err(error)
                    if matches!(
                        error.kind(),
                        std::io::ErrorKind::WouldBlock
                            | std::io::ErrorKind::TimedOut
                            | std::io::ErrorKind::Interrupted
                    ) => {},
                Err(error) => return Err(TransportError::Io(error)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use bytes::Bytes;
    use fedpro_proto::MessageType;

    use super::*;

    #[test]
    fn send_and_read_one_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = vec![0u8; 28];
            stream.read_exact(&mut buf).unwrap();
            // Echo the frame back
            stream.write_all(&buf).unwrap();
            buf
        });

        let mut transport =
            FramedTransport::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();

        let frame = Frame::new(MessageType::NewSession, Bytes::copy_from_slice(&[0, 0, 0, 1]));
        transport.send_frame(&frame).unwrap();

        let echoed = transport.read_frame(Duration::from_secs(5)).unwrap();
        assert_eq!(echoed, frame);

        let seen = server.join().unwrap();
        assert_eq!(seen.len(), 28);
        assert_eq!(&seen[..4], &[0, 0, 0, 28]);
    }

    #[test]
    fn read_times_out_without_traffic() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // Hold the connection open without sending anything
            std::thread::sleep(Duration::from_millis(300));
            drop(stream);
        });

        let mut transport =
            FramedTransport::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();

        let result = transport.read_frame(Duration::from_millis(50));
        assert!(matches!(result, Err(TransportError::Timeout { .. })));

        server.join().unwrap();
    }

    #[test]
    fn peer_close_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let mut transport =
            FramedTransport::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();
        server.join().unwrap();

        let result = transport.read_frame(Duration::from_millis(200));
        assert!(matches!(result, Err(TransportError::Closed)));
    }

    #[test]
    fn fragmented_frame_is_reassembled() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let frame = Frame::new(MessageType::CallRequest, Bytes::copy_from_slice(&[7u8; 40]));
        let wire = frame.to_vec().unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            // Dribble the frame out in small chunks
            for chunk in wire.chunks(5) {
                stream.write_all(chunk).unwrap();
                stream.flush().unwrap();
                std::thread::sleep(Duration::from_millis(5));
            }
        });

        let mut transport =
            FramedTransport::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();

        let received = transport.read_frame(Duration::from_secs(5)).unwrap();
        assert_eq!(received, frame);

        server.join().unwrap();
    }

    #[test]
    fn undersized_length_prefix_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            // message_size of 16 is below the 24-byte header minimum
            stream.write_all(&16u32.to_be_bytes()).unwrap();
            std::thread::sleep(Duration::from_millis(100));
        });

        let mut transport =
            FramedTransport::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();

        let result = transport.read_frame(Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(TransportError::Protocol(ProtocolError::ShortFrame { .. }))
        ));

        server.join().unwrap();
    }
}
