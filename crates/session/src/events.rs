/// Minimal structured event for session traceability.
///
/// Core crates do not log directly; they record events here and the
/// embedding application drains them into its logger of choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Session epoch at the time the event was recorded.
    pub epoch: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, epoch: u64, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            epoch,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
