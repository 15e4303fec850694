/// Bounded, incremental line framing for sink `chunk` implementations
use crate::plugin::TransportKind;
use std::collections::HashMap;
use std::sync::Mutex;

/// Default cap on the partial line kept per source.
pub const DEFAULT_MAX_PENDING: usize = 64 * 1024;

/// Default cap on the number of sources with buffered state.
pub const DEFAULT_MAX_SOURCES: usize = 1024;

#[derive(Default)]
struct SourceBuffer {
    data: Vec<u8>,
    // rest of an overlong line is dropped up to the next newline
    discarding: bool,
    last_seen: u64,
}

#[derive(Default)]
struct FramerState {
    sources: HashMap<String, SourceBuffer>,
    clock: u64,
}

/// Splits incoming bytes into newline-delimited records.
///
/// Stream data may arrive in arbitrary pieces, so the unterminated tail of
/// each source is kept until the rest of the line shows up. A line longer
/// than `max_pending` is dropped as a whole, including the part that arrives
/// after the limit was hit. At most `max_sources` sources keep state; when a
/// new one pushes past the cap, the least recently seen source is evicted.
/// Datagrams are complete records on their own and are never buffered.
///
/// `LineFramer` is `Send + Sync`; one instance can serve every connection of a
/// sink.
pub struct LineFramer {
    max_pending: usize,
    max_sources: usize,
    state: Mutex<FramerState>,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PENDING)
    }
}

impl LineFramer {
    pub fn new(max_pending: usize) -> Self {
        Self::with_limits(max_pending, DEFAULT_MAX_SOURCES)
    }

    /// `max_sources` is raised to one if zero.
    pub fn with_limits(max_pending: usize, max_sources: usize) -> Self {
        Self {
            max_pending,
            max_sources: max_sources.max(1),
            state: Mutex::new(FramerState::default()),
        }
    }

    /// Feed `data` received from `source` and return every complete record.
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped and empty records dropped.
    pub fn push(&self, source: &str, data: &[u8], kind: TransportKind) -> Vec<Vec<u8>> {
        match kind {
            TransportKind::Datagram => {
                let record = strip_terminator(data.to_vec());
                if record.is_empty() {
                    Vec::new()
                } else {
                    vec![record]
                }
            }
            TransportKind::Stream => self.push_stream(source, data),
        }
    }

    fn push_stream(&self, source: &str, data: &[u8]) -> Vec<Vec<u8>> {
        let Ok(mut guard) = self.state.lock() else {
            log::error!("Line framer state poisoned, dropping {} bytes", data.len());
            return Vec::new();
        };
        let state = &mut *guard;
        state.clock += 1;

        let mut entry = state.sources.remove(source).unwrap_or_default();
        entry.last_seen = state.clock;

        let mut data = data;
        if entry.discarding {
            match data.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    data = data.get(pos + 1..).unwrap_or_default();
                    entry.discarding = false;
                }
                None => {
                    state.sources.insert(source.to_string(), entry);
                    return Vec::new();
                }
            }
        }

        let mut buffer = std::mem::take(&mut entry.data);
        buffer.extend_from_slice(data);

        let mut records = Vec::new();
        while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
            let rest = buffer.split_off(pos + 1);
            let record = strip_terminator(std::mem::replace(&mut buffer, rest));
            if !record.is_empty() {
                records.push(record);
            }
        }

        if buffer.len() > self.max_pending {
            log::warn!(
                "Discarding line from {source}: {} unterminated bytes exceed {} byte limit",
                buffer.len(),
                self.max_pending
            );
            entry.discarding = true;
        } else {
            entry.data = buffer;
        }

        if entry.discarding || !entry.data.is_empty() {
            state.sources.insert(source.to_string(), entry);
            evict_oldest(&mut state.sources, self.max_sources);
        }

        records
    }

    /// Release the partial record kept for `source`, if any.
    ///
    /// The remains of an overlong line are never released.
    pub fn flush(&self, source: &str) -> Option<Vec<u8>> {
        let mut state = self.state.lock().ok()?;
        state
            .sources
            .remove(source)
            .filter(|entry| !entry.discarding && !entry.data.is_empty())
            .map(|entry| strip_terminator(entry.data))
    }

    /// Number of buffered bytes for `source`.
    pub fn pending(&self, source: &str) -> usize {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.sources.get(source).map(|entry| entry.data.len()))
            .unwrap_or(0)
    }

    /// Number of sources currently holding state.
    pub fn sources(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.sources.len())
            .unwrap_or(0)
    }
}

fn evict_oldest(sources: &mut HashMap<String, SourceBuffer>, max_sources: usize) {
    while sources.len() > max_sources {
        let Some(oldest) = sources
            .iter()
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(name, _)| name.clone())
        else {
            break;
        };
        if let Some(evicted) = sources.remove(&oldest) {
            log::debug!(
                "Evicting {} pending bytes of idle source {oldest}",
                evicted.data.len()
            );
        }
    }
}

fn strip_terminator(mut record: Vec<u8>) -> Vec<u8> {
    if record.last() == Some(&b'\n') {
        record.pop();
    }
    if record.last() == Some(&b'\r') {
        record.pop();
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_complete_lines_in_one_push() {
        let framer = LineFramer::default();
        let records = framer.push("a", b"one\ntwo\r\n", TransportKind::Stream);
        assert_eq!(records, vec![b"one".to_vec(), b"two".to_vec()]);
        assert_eq!(framer.pending("a"), 0);
    }

    #[test]
    fn test_partial_line_is_kept_until_completed() {
        let framer = LineFramer::default();
        assert!(framer.push("a", b"hel", TransportKind::Stream).is_empty());
        assert_eq!(framer.pending("a"), 3);

        let records = framer.push("a", b"lo\nwor", TransportKind::Stream);
        assert_eq!(records, vec![b"hello".to_vec()]);
        assert_eq!(framer.pending("a"), 3);
        assert_eq!(framer.flush("a"), Some(b"wor".to_vec()));
        assert_eq!(framer.pending("a"), 0);
        assert_eq!(framer.flush("a"), None);
    }

    #[test]
    fn test_sources_are_buffered_independently() {
        let framer = LineFramer::default();
        framer.push("a", b"from-a", TransportKind::Stream);
        let records = framer.push("b", b"from-b\n", TransportKind::Stream);

        assert_eq!(records, vec![b"from-b".to_vec()]);
        assert_eq!(framer.pending("a"), 6);
        assert_eq!(framer.pending("b"), 0);
    }

    #[test]
    fn test_empty_lines_are_dropped() {
        let framer = LineFramer::default();
        let records = framer.push("a", b"\n\r\nx\n\n", TransportKind::Stream);
        assert_eq!(records, vec![b"x".to_vec()]);
    }

    #[test]
    fn test_oversized_tail_is_discarded() {
        let framer = LineFramer::new(4);
        let records = framer.push("a", b"ok\nabcdef", TransportKind::Stream);
        assert_eq!(records, vec![b"ok".to_vec()]);
        assert_eq!(framer.pending("a"), 0);
        assert_eq!(framer.flush("a"), None);
    }

    #[test]
    fn test_overlong_line_split_across_pushes_is_dropped() {
        let framer = LineFramer::new(4);
        assert!(framer.push("a", b"abcdefgh", TransportKind::Stream).is_empty());
        assert!(framer.push("a", b"ijkl", TransportKind::Stream).is_empty());
        assert!(framer.push("a", b"-tail\n", TransportKind::Stream).is_empty());

        let records = framer.push("a", b"next\n", TransportKind::Stream);
        assert_eq!(records, vec![b"next".to_vec()]);
    }

    #[test]
    fn test_overlong_line_end_and_next_line_in_one_push() {
        let framer = LineFramer::new(4);
        framer.push("a", b"abcdefgh", TransportKind::Stream);

        let records = framer.push("a", b"-tail\nok\npa", TransportKind::Stream);
        assert_eq!(records, vec![b"ok".to_vec()]);
        assert_eq!(framer.pending("a"), 2);
    }

    #[test]
    fn test_idle_sources_are_evicted_past_the_cap() {
        let framer = LineFramer::with_limits(64, 8);
        for port in 0..1000 {
            let source = format!("10.0.0.1:{port}");
            framer.push(&source, b"unterminated partial line", TransportKind::Stream);
        }

        assert_eq!(framer.sources(), 8);
        assert_eq!(framer.pending("10.0.0.1:0"), 0);
        assert_eq!(framer.pending("10.0.0.1:999"), 25);
    }

    #[test]
    fn test_eviction_keeps_recently_seen_sources() {
        let framer = LineFramer::with_limits(64, 2);
        framer.push("old", b"a", TransportKind::Stream);
        framer.push("busy", b"b", TransportKind::Stream);
        framer.push("old", b"c", TransportKind::Stream);
        framer.push("new", b"d", TransportKind::Stream);

        assert_eq!(framer.pending("old"), 2);
        assert_eq!(framer.pending("new"), 1);
        assert_eq!(framer.pending("busy"), 0);
    }

    #[test]
    fn test_datagrams_are_not_buffered() {
        let framer = LineFramer::default();
        let records = framer.push("a", b"whole datagram\n", TransportKind::Datagram);
        assert_eq!(records, vec![b"whole datagram".to_vec()]);
        assert_eq!(framer.pending("a"), 0);

        assert!(framer.push("a", b"", TransportKind::Datagram).is_empty());
        assert!(framer.push("a", b"\r\n", TransportKind::Datagram).is_empty());
    }

    #[test]
    fn test_concurrent_sources() {
        let framer = Arc::new(LineFramer::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let framer = Arc::clone(&framer);
                thread::spawn(move || {
                    let source = format!("peer-{i}");
                    let mut count = 0;
                    for _ in 0..50 {
                        count += framer.push(&source, b"ab", TransportKind::Stream).len();
                        count += framer.push(&source, b"c\n", TransportKind::Stream).len();
                    }
                    count
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 50);
        }
    }
}
