use std::fmt::{self, Debug};
use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A reactive property that can be watched for changes.
///
/// When the value changes, all watchers are notified automatically.
/// Each watcher gets the current value immediately when subscribing.
#[derive(Clone)]
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: watch::Sender<T>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx, rx }
    }

    /// Set a new value and notify all watchers.
    ///
    /// Only updates if the value is different (requires PartialEq).
    /// Only accessible within the crate to prevent external modification.
    pub(crate) fn set(&self, new_value: T)
    where
        T: PartialEq,
    {
        let _ = self.tx.send_if_modified(|current| {
            if *current != new_value {
                *current = new_value;
                true
            } else {
                false
            }
        });
    }

    /// Replace the value and notify all watchers, even if it compares equal.
    pub(crate) fn replace(&self, new_value: T) {
        self.tx.send_replace(new_value);
    }

    /// Republish the current value unchanged.
    ///
    /// Watchers of values that live outside the channel (a player's clock,
    /// for instance) use this as their cue to re-read.
    pub(crate) fn notify(&self) {
        self.tx.send_modify(|_| {});
    }

    /// Get the current value.
    ///
    /// This is a synchronous operation that clones the current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.rx.borrow())
    }

    /// Watch for changes to this property.
    ///
    /// The stream immediately yields the current value, then yields
    /// whenever the value changes.
    pub fn watch(&self) -> impl Stream<Item = T> + Send + use<T> {
        WatchStream::new(self.rx.clone())
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

type Compute<S, T> = Arc<dyn Fn(&S) -> T + Send + Sync>;

/// A read-only view computed from another property.
///
/// Nothing is stored: the value is recomputed from the source on every
/// read and on every source notification.
pub struct DerivedProperty<S: Clone + Send + Sync + 'static, T> {
    source: Property<S>,
    compute: Compute<S, T>,
}

impl<S, T> DerivedProperty<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Send + 'static,
{
    /// Create a view of `source` through `compute`.
    pub fn new<F>(source: Property<S>, compute: F) -> Self
    where
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self {
            source,
            compute: Arc::new(compute),
        }
    }

    /// Compute the current value.
    pub fn get(&self) -> T {
        self.source.with(|value| (self.compute)(value))
    }

    /// Watch the derived value.
    ///
    /// Yields once immediately, then once per source notification.
    pub fn watch(&self) -> impl Stream<Item = T> + Send + use<S, T> {
        let compute = Arc::clone(&self.compute);
        self.source.watch().map(move |value| compute(&value))
    }
}

impl<S: Clone + Send + Sync + 'static, T> Clone for DerivedProperty<S, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<S, T> Debug for DerivedProperty<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Send + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedProperty")
            .field("value", &self.get())
            .finish()
    }
}
