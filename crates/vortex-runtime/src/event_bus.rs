//! Event bus for broadcasting simulation events to the host

/// A simple event queue that systems push to and the host drains
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events without consuming them
    pub fn pending(&self) -> &[E] {
        &self.events
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestEvent {
        Burst(u32),
        Exhausted,
    }

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(TestEvent::Burst(50));
        bus.push(TestEvent::Exhausted);

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.pending()[0], TestEvent::Burst(50));

        let events = bus.drain();
        assert_eq!(events, vec![TestEvent::Burst(50), TestEvent::Exhausted]);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_drain_clears() {
        let mut bus = EventBus::new();
        bus.push(TestEvent::Exhausted);

        let _ = bus.drain();
        let events = bus.drain();
        assert!(events.is_empty());
    }
}
