//! Bounded byte queue between transport producers and the deframing worker.

use std::sync::Mutex;

/// Fixed-capacity FIFO byte ring.
///
/// The producer side ([`ByteQueue::try_write`]) may run on a different
/// thread than the worker (an I/O completion callback, for instance); both
/// sides only hold the internal lock for a bounded copy. Writes are
/// all-or-nothing: a chunk that doesn't fit is dropped in its entirety so
/// the queue never holds a torn chunk and producers never block.
#[derive(Debug)]
pub(crate) struct ByteQueue {
    inner: Mutex<Ring>,
}

#[derive(Debug)]
struct Ring {
    buf: Box<[u8]>,
    head: usize,
    len: usize,
}

impl ByteQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        Self {
            inner: Mutex::new(Ring {
                buf: vec![0u8; capacity].into_boxed_slice(),
                head: 0,
                len: 0,
            }),
        }
    }

    /// Append a whole chunk, or nothing at all if it doesn't fit.
    pub(crate) fn try_write(&self, bytes: &[u8]) -> bool {
        let mut ring = self.inner.lock().expect("byte queue mutex poisoned");
        if bytes.len() > ring.buf.len() - ring.len {
            return false;
        }

        let cap = ring.buf.len();
        let mut tail = (ring.head + ring.len) % cap;
        for &b in bytes {
            ring.buf[tail] = b;
            tail = (tail + 1) % cap;
        }
        ring.len += bytes.len();
        true
    }

    /// Bytes currently readable.
    pub(crate) fn readable(&self) -> usize {
        self.inner.lock().expect("byte queue mutex poisoned").len
    }

    /// Pop up to `dst.len()` bytes in FIFO order; returns the count moved.
    pub(crate) fn read_into(&self, dst: &mut [u8]) -> usize {
        let mut ring = self.inner.lock().expect("byte queue mutex poisoned");
        let n = dst.len().min(ring.len);
        let cap = ring.buf.len();
        for slot in dst.iter_mut().take(n) {
            *slot = ring.buf[ring.head];
            ring.head = (ring.head + 1) % cap;
        }
        ring.len -= n;
        n
    }
}
