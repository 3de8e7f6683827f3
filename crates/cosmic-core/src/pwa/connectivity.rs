use crate::signal::{Signal, Subscription};
use tracing::info;

/// Bridges the platform's online/offline events onto a signal.
#[derive(Clone)]
pub struct Connectivity {
    online: Signal<bool>,
}

impl Connectivity {
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: Signal::new(initially_online),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.get()
    }

    pub fn on_online(&self) {
        self.update(true);
    }

    pub fn on_offline(&self) {
        self.update(false);
    }

    pub fn subscribe(&self, listener: impl FnMut(bool) + 'static) -> Subscription {
        self.online.subscribe(listener)
    }

    fn update(&self, online: bool) {
        if self.online.set(online) {
            info!(online, "Connectivity changed");
        }
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn reports_only_real_changes() {
        let net = Connectivity::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = net.subscribe(move |online| sink.borrow_mut().push(online));

        net.on_online();
        net.on_offline();
        net.on_offline();
        net.on_online();

        assert_eq!(*seen.borrow(), vec![false, true]);
        assert!(net.is_online());
    }

    #[test]
    fn subscriber_may_flip_state_from_its_own_callback() {
        let net = Connectivity::new(false);
        let handle = net.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = net.subscribe(move |online| {
            sink.borrow_mut().push(online);
            if online {
                // Captive portal detected: immediately report offline again.
                handle.on_offline();
            }
        });

        net.on_online();
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!net.is_online());
    }

    #[test]
    fn dropped_subscription_hears_nothing() {
        let net = Connectivity::new(false);
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let sub = net.subscribe(move |_| *sink.borrow_mut() += 1);
        drop(sub);
        net.on_online();
        assert_eq!(*seen.borrow(), 0);
    }
}
