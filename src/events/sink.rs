use super::Event;

/// Receives notifications from the core. Implemented for crossbeam
/// channels and closures so hosts can pick whichever fits their loop.
pub trait EventSink {
    fn send_event(&self, event: Event);
}

impl EventSink for crossbeam::channel::Sender<Event> {
    fn send_event(&self, event: Event) {
        // A disconnected receiver is the host's choice; not an error here.
        let _ = self.send(event);
    }
}

impl<F: Fn(Event)> EventSink for F {
    fn send_event(&self, event: Event) {
        self(event);
    }
}
