// ABOUTME: Shared response sink collecting courier output, notes, and event writes.
// ABOUTME: Cheap to clone; every writer appends in time order under one lock.

use parking_lot::Mutex;
use std::sync::Arc;

/// The consolidated textual response of one deployment.
///
/// The coordinator, every Action, and event subscribers all append here.
/// Sequential foundation execution guarantees a single writer at any
/// instant; the lock makes interleaved subscriber writes safe regardless.
#[derive(Clone, Default)]
pub struct Transcript {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes, typically courier output.
    pub fn write(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.buf.lock().extend_from_slice(bytes);
    }

    /// Append a line of text followed by a newline.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.buf.lock();
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
    }

    /// Snapshot of the transcript so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }
}

impl std::fmt::Debug for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcript")
            .field("len", &self.buf.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_append_in_order() {
        let transcript = Transcript::new();
        transcript.write(b"pushing app\n");
        transcript.write_line("route created");
        assert_eq!(transcript.contents(), "pushing app\nroute created\n");
    }

    #[test]
    fn clones_share_the_buffer() {
        let transcript = Transcript::new();
        let clone = transcript.clone();
        clone.write(b"from the clone");
        assert_eq!(transcript.contents(), "from the clone");
    }

    #[test]
    fn empty_write_is_a_noop() {
        let transcript = Transcript::new();
        transcript.write(b"");
        assert!(transcript.is_empty());
    }
}
