//! Page lifecycle hooks.
//!
//! Handlers are registered against a named lifecycle event and run in
//! registration order when the host fires it. Each handler sees the page's
//! element snapshot and reports what it annotated.

use crate::analyzer::AnnotationResult;
use crate::model::Element;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The page and its resources finished loading.
    Load,
    /// The document was parsed; resources may still be pending.
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&mut [Element]) -> AnnotationResult + Send>;

struct Registration {
    id: HandlerId,
    event: LifecycleEvent,
    handler: Handler,
}

#[derive(Default)]
pub struct EventHub {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, event: LifecycleEvent, handler: F) -> HandlerId
    where
        F: FnMut(&mut [Element]) -> AnnotationResult + Send + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            event,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns `false` if no handler has this id.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub fn handler_count(&self, event: LifecycleEvent) -> usize {
        self.registrations.iter().filter(|r| r.event == event).count()
    }

    /// Runs every handler registered for `event`, in registration order.
    pub fn fire(&mut self, event: LifecycleEvent, elements: &mut [Element]) -> AnnotationResult {
        let mut result = AnnotationResult::default();
        for registration in self.registrations.iter_mut().filter(|r| r.event == event) {
            result.merge((registration.handler)(elements));
        }
        result
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("handlers", &self.registrations.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnnotateOptions, Annotator, AnnotatorImpl};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fire_runs_handlers_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut hub = EventHub::new();
        for name in ["first", "second"] {
            let order = order.clone();
            hub.register(LifecycleEvent::Load, move |_| {
                order.lock().unwrap().push(name);
                AnnotationResult::default()
            });
        }

        hub.fire(LifecycleEvent::Load, &mut []);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_fire_only_matching_event() {
        let mut hub = EventHub::new();
        let annotator = AnnotatorImpl::new(AnnotateOptions::default());
        hub.register(LifecycleEvent::Load, move |els| annotator.annotate(els));

        let mut elements = vec![Element::new("p", "traffic_light_71", "90")];
        let result = hub.fire(LifecycleEvent::Ready, &mut elements);
        assert!(result.annotations.is_empty());
        assert_eq!(elements[0].class_attr(), "traffic_light_71");

        let result = hub.fire(LifecycleEvent::Load, &mut elements);
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(elements[0].class_attr(), "traffic_light_71 w3-green");
    }

    #[test]
    fn test_unregister() {
        let mut hub = EventHub::new();
        let id = hub.register(LifecycleEvent::Load, |_| AnnotationResult::default());
        assert_eq!(hub.handler_count(LifecycleEvent::Load), 1);

        assert!(hub.unregister(id));
        assert!(!hub.unregister(id));
        assert_eq!(hub.handler_count(LifecycleEvent::Load), 0);
    }
}
