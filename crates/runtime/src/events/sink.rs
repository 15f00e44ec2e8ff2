//! Event sinks: where the controller sends battle events.

use std::io::Write;
use std::sync::{Arc, Mutex};

use super::types::BattleEvent;

/// Receives every battle event, in order, synchronously.
///
/// Implementations must not block for long; the battle waits for `emit`.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &BattleEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: &BattleEvent) {
        (**self).emit(event);
    }
}

/// Forwards each event to every registered sink, in registration order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &BattleEvent) {
        tracing::trace!(kind = event.kind(), "battle event");
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<BattleEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BattleEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| event.kind() == kind)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &BattleEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Writes each event as one JSON object per line.
///
/// Write failures are logged and otherwise ignored; the battle never stops
/// because the log could not be written.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn emit(&self, event: &BattleEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        let written = serde_json::to_writer(&mut *writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());

        if let Err(err) = written {
            tracing::warn!(kind = event.kind(), "failed to write event log: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::CombatantId;

    fn event() -> BattleEvent {
        BattleEvent::NoAction {
            actor: CombatantId(1),
            actor_name: "Imp".into(),
        }
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let first = Arc::new(RecordingSink::new());
        let second = Arc::new(RecordingSink::new());
        let mut fanout = FanoutSink::new();
        fanout.push(first.clone());
        fanout.push(second.clone());

        fanout.emit(&event());

        assert_eq!(first.count("no_action"), 1);
        assert_eq!(second.events(), vec![event()]);
    }

    #[test]
    fn json_lines_round_trip() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.emit(&event());
        sink.emit(&event());

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: BattleEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, event());
    }
}
