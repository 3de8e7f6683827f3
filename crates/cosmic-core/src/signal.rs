//! Push-based observable values.
//!
//! A [`Signal`] owns a current value and a list of listeners. Listeners are
//! registered with [`Signal::subscribe`], which hands back a [`Subscription`]
//! guard; dropping the guard (or calling [`Subscription::unsubscribe`])
//! removes the listener exactly once. Everything here is single-threaded and
//! synchronous: `set` runs every listener before returning.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

type Listener<T> = Rc<RefCell<dyn FnMut(T)>>;

struct SignalInner<T> {
    value: T,
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
    notifying: bool,
}

impl<T> SignalInner<T> {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// Observable value that notifies listeners when it changes.
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Copy + PartialEq + 'static> Signal<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value: initial,
                next_id: 0,
                listeners: Vec::new(),
                notifying: false,
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value
    }

    /// Store `value` and notify listeners. Returns `false` (and notifies
    /// nobody) when the value did not change.
    ///
    /// A `set` made from inside a listener only stores the value; the pass
    /// already running stops handing out the stale value and restarts with
    /// the latest one, so no listener is ever re-entered.
    pub fn set(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            if inner.notifying {
                trace!("Nested set queued behind running notification");
                return true;
            }
            inner.notifying = true;
        }

        loop {
            let (current, listeners) = {
                let inner = self.inner.borrow();
                (inner.value, inner.listeners.clone())
            };

            for (id, listener) in listeners {
                {
                    let inner = self.inner.borrow();
                    if inner.value != current {
                        break;
                    }
                    // A listener may have been removed by an earlier one in this pass.
                    if !inner.contains(id) {
                        continue;
                    }
                }
                let mut call = listener.borrow_mut();
                (*call)(current);
            }

            let mut inner = self.inner.borrow_mut();
            if inner.value == current {
                inner.notifying = false;
                return true;
            }
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id = inner.next_id.wrapping_add(1);
            let listener: Listener<T> = Rc::new(RefCell::new(listener));
            inner.listeners.push((id, listener));
            id
        };
        trace!(id, "Listener subscribed");

        let weak: Weak<RefCell<SignalInner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
                trace!(id, "Listener unsubscribed");
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Disposer returned by every subscription. Runs its release action once,
/// either explicitly or on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disposer.is_some())
            .finish()
    }
}

/// Anything that can push scroll-progress fractions to a listener.
pub trait ProgressSource {
    /// Latest progress, read once when a consumer attaches.
    fn current_progress(&self) -> f32;
    fn subscribe_progress(&self, listener: Box<dyn FnMut(f32)>) -> Subscription;
}

/// Scroll progress in `[0, 1]`, typically 0 at the top of the view.
#[derive(Clone)]
pub struct ScrollSignal {
    signal: Signal<f32>,
}

impl Default for ScrollSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSignal {
    pub fn new() -> Self {
        Self {
            signal: Signal::new(0.0),
        }
    }

    pub fn get(&self) -> f32 {
        self.signal.get()
    }

    /// Push a raw scroll fraction; see [`sanitize_progress`].
    pub fn set(&self, raw: f32) -> bool {
        self.signal.set(sanitize_progress(raw))
    }

    pub fn listener_count(&self) -> usize {
        self.signal.listener_count()
    }
}

impl ProgressSource for ScrollSignal {
    fn current_progress(&self) -> f32 {
        self.get()
    }

    fn subscribe_progress(&self, listener: Box<dyn FnMut(f32)>) -> Subscription {
        self.signal.subscribe(listener)
    }
}

/// Clamp to `[0, 1]`; non-finite input maps to the top of the view.
pub fn sanitize_progress(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
