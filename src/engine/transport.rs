//! Outbound transport seam for the encode path.

use crate::protocol::{Result, encode};

/// Transmit primitive supplied by the surrounding I/O layer.
///
/// The engine never retries; a failed send is the caller's to handle.
pub trait Transport {
    /// Send one complete wire frame on a channel.
    fn send(&self, channel: u32, frame: &[u8]) -> std::io::Result<()>;
}

/// Encode a payload and hand the wire frame to a transport.
///
/// Returns the number of bytes put on the wire.
///
/// # Errors
///
/// [`crate::Error::PayloadTooLarge`] if the payload can't fit the length
/// field, or [`crate::Error::Transport`] wrapping the send failure.
pub fn send_frame<T: Transport>(
    transport: &T,
    channel: u32,
    payload: &[u8],
    need_crc: bool,
) -> Result<usize> {
    let frame = encode(payload, need_crc)?;
    transport.send(channel, &frame)?;
    Ok(frame.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::protocol::{Error, decode};

    #[derive(Default)]
    struct CapturingTransport {
        sent: Mutex<Vec<(u32, Vec<u8>)>>,
        fail: bool,
    }

    impl Transport for CapturingTransport {
        fn send(&self, channel: u32, frame: &[u8]) -> std::io::Result<()> {
            if self.fail {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "peer gone",
                ));
            }
            self.sent.lock().unwrap().push((channel, frame.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn sends_encoded_frame() {
        let transport = CapturingTransport::default();
        let n = send_frame(&transport, 2, b"hello", true).unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 2);
        assert_eq!(sent[0].1.len(), n);
        assert_eq!(decode(&sent[0].1).unwrap(), b"hello");
    }

    #[test]
    fn send_failure_reaches_caller() {
        let transport = CapturingTransport {
            fail: true,
            ..CapturingTransport::default()
        };
        let err = send_frame(&transport, 0, b"x", false).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn oversized_payload_never_reaches_transport() {
        let transport = CapturingTransport::default();
        let payload = vec![0u8; usize::from(u16::MAX)];
        let err = send_frame(&transport, 0, &payload, true).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { .. }));
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
