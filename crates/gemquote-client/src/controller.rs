//! Intake open broadcast
//!
//! Any number of triggers may ask for the intake to open; exactly one
//! subscriber (whoever owns the intake dialog) hears about it.

use std::sync::{Arc, Mutex};

type OpenHandler = Arc<dyn Fn() + Send + Sync>;

/// Opens the intake.
pub trait IntakeController: Send + Sync {
    /// Ask the current subscriber to open the intake. A no-op with nobody subscribed.
    fn open(&self);

    /// Become the single subscriber. A later subscription replaces this one;
    /// dropping the returned guard unsubscribes.
    fn on_open(&self, handler: Box<dyn Fn() + Send + Sync>) -> Subscription;
}

#[derive(Default)]
struct Slot {
    generation: u64,
    handler: Option<OpenHandler>,
}

/// In-process [`IntakeController`]; clones share the same subscriber slot.
#[derive(Clone, Default)]
pub struct SharedIntakeController {
    slot: Arc<Mutex<Slot>>,
}

impl SharedIntakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_subscriber(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.handler.is_some())
            .unwrap_or(false)
    }
}

impl IntakeController for SharedIntakeController {
    fn open(&self) {
        // Run the handler outside the lock so it may call back into the controller.
        let handler = match self.slot.lock() {
            Ok(slot) => slot.handler.clone(),
            Err(_) => None,
        };
        match handler {
            Some(handler) => handler(),
            None => tracing::debug!("Intake open requested with no subscriber"),
        }
    }

    fn on_open(&self, handler: Box<dyn Fn() + Send + Sync>) -> Subscription {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.generation += 1;
        slot.handler = Some(Arc::from(handler));
        Subscription {
            slot: Arc::downgrade(&self.slot),
            generation: slot.generation,
        }
    }
}

/// Guard returned by [`IntakeController::on_open`].
pub struct Subscription {
    slot: std::sync::Weak<Mutex<Slot>>,
    generation: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(shared) = self.slot.upgrade() else {
            return;
        };
        let Ok(mut slot) = shared.lock() else {
            return;
        };
        // A newer subscriber already took over.
        if slot.generation == self.generation {
            slot.handler = None;
        }
    }
}

/// One affordance ("Upload a photo", "Get my price", ...) that opens the intake.
#[derive(Clone)]
pub struct IntakeTrigger {
    label: String,
    controller: Arc<dyn IntakeController>,
}

impl IntakeTrigger {
    pub fn new(label: impl Into<String>, controller: Arc<dyn IntakeController>) -> Self {
        IntakeTrigger {
            label: label.into(),
            controller,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn activate(&self) {
        tracing::debug!(trigger = %self.label, "Intake trigger activated");
        self.controller.open();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Box<dyn Fn() + Send + Sync>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handler: Box<dyn Fn() + Send + Sync> = Box::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (count, handler)
    }

    #[test]
    fn many_triggers_reach_the_single_subscriber() {
        let controller = SharedIntakeController::new();
        let (count, handler) = counter();
        let _subscription = controller.on_open(handler);

        let shared: Arc<dyn IntakeController> = Arc::new(controller.clone());
        let hero = IntakeTrigger::new("Upload a photo", shared.clone());
        let footer = IntakeTrigger::new("Join today's beta", shared);

        hero.activate();
        footer.activate();
        controller.open();

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn newer_subscriber_replaces_older() {
        let controller = SharedIntakeController::new();
        let (first, first_handler) = counter();
        let (second, second_handler) = counter();

        let old = controller.on_open(first_handler);
        let _current = controller.on_open(second_handler);
        controller.open();

        // Dropping the stale guard must not unsubscribe the current owner.
        drop(old);
        controller.open();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let controller = SharedIntakeController::new();
        let (count, handler) = counter();

        let subscription = controller.on_open(handler);
        assert!(controller.has_subscriber());
        drop(subscription);

        controller.open();
        assert!(!controller.has_subscriber());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
