//! Value-holding publish/subscribe cell.
//!
//! A [`Signal`] stores the current value and a set of subscriber callbacks
//! invoked synchronously on every [`Signal::emit`]. Subscribers see the
//! value produced by the mutation that triggered them; no ordering
//! guarantee beyond that is made. Callbacks run outside the internal lock,
//! so a subscriber may freely call [`Signal::get`] or subscribe again.

use std::sync::{Arc, Mutex};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct SignalInner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A reactive cell holding a current value and broadcasting updates.
pub struct Signal<T> {
    inner: Arc<Mutex<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Signal<T> {
    /// Create a signal seeded with an initial value.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SignalInner {
                value: initial,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        lock(&self.inner).value.clone()
    }

    /// Store a new value and synchronously notify every subscriber.
    pub fn emit(&self, value: T) {
        let callbacks: Vec<Callback<T>> = {
            let mut inner = lock(&self.inner);
            inner.value = value.clone();
            inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in callbacks {
            cb(&value);
        }
    }

    /// Register a subscriber. The returned guard unsubscribes on drop.
    ///
    /// The subscriber is not invoked with the current value; it only
    /// observes subsequent emissions.
    #[must_use]
    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(f)));
        Subscription {
            id,
            unsubscribe: Box::new({
                let weak = Arc::downgrade(&self.inner);
                move |id| {
                    if let Some(inner) = weak.upgrade()
                        && let Ok(mut inner) = inner.lock()
                    {
                        inner.subscribers.retain(|(sid, _)| *sid != id);
                    }
                }
            }),
        }
    }
}

fn lock<T>(inner: &Mutex<SignalInner<T>>) -> std::sync::MutexGuard<'_, SignalInner<T>> {
    // A poisoned lock only means a subscriber panicked; the value is still valid.
    inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// RAII subscription guard; dropping it removes the subscriber.
pub struct Subscription {
    id: u64,
    unsubscribe: Box<dyn FnMut(u64) + Send>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        (self.unsubscribe)(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_get_returns_latest_value() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);
        signal.emit(7);
        assert_eq!(signal.get(), 7);
    }

    #[test]
    fn test_subscribers_see_emitted_value() {
        let signal = Signal::new(0);
        let seen = Arc::new(AtomicU32::new(0));
        let _sub = signal.subscribe({
            let seen = Arc::clone(&seen);
            move |v| seen.store(*v, Ordering::SeqCst)
        });
        signal.emit(42);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let signal = Signal::new(0);
        let count = Arc::new(AtomicU32::new(0));
        let sub = signal.subscribe({
            let count = Arc::clone(&count);
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });
        signal.emit(1);
        drop(sub);
        signal.emit(2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_may_read_signal_reentrantly() {
        let signal = Signal::new(0);
        let observed = Arc::new(AtomicU32::new(0));
        let _sub = signal.subscribe({
            let signal = signal.clone();
            let observed = Arc::clone(&observed);
            move |_| observed.store(signal.get(), Ordering::SeqCst)
        });
        signal.emit(9);
        assert_eq!(observed.load(Ordering::SeqCst), 9);
    }
}
