//! The multicast delegate itself.

use crate::registry::{Registration, Registry};
use multicast_core::{Delegate, Queue, QueueError, Selector};
use multicast_std::queues::shared_default_queue;
use std::{
    any::TypeId,
    collections::HashSet,
    fmt,
    marker::PhantomData,
    ops::ControlFlow,
    sync::Arc,
};

/// Fans one call out to many delegates, each on its own serial queue.
///
/// `D` is the delegate protocol, usually a trait object such as
/// `dyn StreamDelegate`. Delegates are held by `Arc` and compared by
/// identity; the same delegate may be registered on several queues.
///
/// # Example
///
/// ```rust
/// use multicast::{Delegate, MulticastDelegate, Selector, ThreadQueue};
/// use std::sync::Arc;
///
/// pub trait StreamDelegate: Delegate {
///     fn did_receive(&self, _bytes: &[u8]) {}
/// }
///
/// pub const DID_RECEIVE: Selector = Selector::new("did_receive");
///
/// struct Logger;
///
/// impl Delegate for Logger {
///     fn responds_to(&self, selector: Selector) -> bool {
///         selector == DID_RECEIVE
///     }
/// }
///
/// impl StreamDelegate for Logger {
///     fn did_receive(&self, bytes: &[u8]) {
///         println!("received {} bytes", bytes.len());
///     }
/// }
///
/// let queue = ThreadQueue::new("stream").unwrap().into_queue();
/// let delegates: MulticastDelegate<dyn StreamDelegate> = MulticastDelegate::new(queue.clone());
///
/// let logger: Arc<dyn StreamDelegate> = Arc::new(Logger);
/// delegates.add_delegate(logger);
///
/// let payload = vec![1, 2, 3];
/// delegates.invoke(DID_RECEIVE, move |d| d.did_receive(&payload));
/// multicast::flush_blocking(&queue);
/// ```
pub struct MulticastDelegate<D: ?Sized + Delegate> {
    registry: Registry<D>,
    default_queue: Queue,
    name: &'static str,
}

impl<D: ?Sized + Delegate> MulticastDelegate<D> {
    /// Create an empty dispatcher whose default queue is `default_queue`.
    pub fn new(default_queue: Queue) -> Self {
        Self {
            registry: Registry::new(),
            default_queue,
            name: DEFAULT_NAME,
        }
    }

    /// Start configuring a dispatcher.
    pub fn builder() -> MulticastDelegateBuilder<D> {
        MulticastDelegateBuilder::new()
    }

    /// The queue used when a delegate is added without one.
    pub fn default_queue(&self) -> &Queue {
        &self.default_queue
    }

    /// The name this dispatcher reports in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Register `delegate` on the default queue.
    ///
    /// `None` is ignored. Adding a pair that is already registered does
    /// nothing.
    pub fn add_delegate(&self, delegate: impl Into<Option<Arc<D>>>) {
        self.add_delegate_on(delegate, &self.default_queue);
    }

    /// Register `delegate` on `queue`.
    ///
    /// `None` is ignored. Adding a pair that is already registered does
    /// nothing; adding the same delegate on another queue adds a second
    /// registration.
    pub fn add_delegate_on(&self, delegate: impl Into<Option<Arc<D>>>, queue: &Queue) {
        let Some(delegate) = delegate.into() else {
            return;
        };
        let (count, inserted) = self.registry.insert(delegate, queue.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            multicast = %self.name,
            queue = %queue.label(),
            inserted,
            count,
            "Added delegate"
        );

        #[cfg(not(feature = "tracing"))]
        let _ = (count, inserted);
    }

    /// Remove every registration of `delegate`, whatever its queue.
    pub fn remove_delegate(&self, delegate: &Arc<D>) {
        let (count, removed) = self.registry.remove_where(|r| r.is_for(delegate));
        self.log_removal("Removed delegate", removed, count);
    }

    /// Remove the registration of `delegate` on one queue.
    ///
    /// `None` means the default queue, *not* every queue: only the
    /// `(delegate, default_queue)` pair is removed and registrations on other
    /// queues stay. Use [`remove_delegate`](Self::remove_delegate) to remove
    /// the delegate everywhere.
    pub fn remove_delegate_on(&self, delegate: &Arc<D>, queue: Option<&Queue>) {
        let queue = queue.unwrap_or(&self.default_queue);
        let (count, removed) = self.registry.remove_where(|r| r.matches(delegate, queue));
        self.log_removal("Removed delegate from queue", removed, count);
    }

    /// Remove every registration.
    pub fn remove_all_delegates(&self) {
        let removed = self.registry.clear();
        self.log_removal("Removed all delegates", removed, 0);
    }

    fn log_removal(&self, message: &'static str, removed: usize, count: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(multicast = %self.name, removed, count, "{}", message);

        #[cfg(not(feature = "tracing"))]
        let _ = (message, removed, count);
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Number of registrations, counting a delegate once per queue.
    pub fn count(&self) -> usize {
        self.registry.snapshot().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.snapshot().is_empty()
    }

    /// Number of distinct delegates, whatever the number of queues each is
    /// registered on.
    pub fn count_of_delegates(&self) -> usize {
        let snapshot = self.registry.snapshot();
        snapshot
            .iter()
            .map(|r| Arc::as_ptr(r.delegate()) as *const ())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of registrations whose delegate is exactly of type `K`.
    ///
    /// Matching is on the concrete type: a `K` wrapped in another type does
    /// not count.
    pub fn count_of_kind<K: ?Sized + 'static>(&self) -> usize {
        self.count_of_type_id(TypeId::of::<K>())
    }

    /// Number of registrations whose delegate's concrete type is `type_id`.
    pub fn count_of_type_id(&self, type_id: TypeId) -> usize {
        let snapshot = self.registry.snapshot();
        snapshot
            .iter()
            .filter(|r| r.delegate().delegate_type_id() == type_id)
            .count()
    }

    /// Number of registrations whose delegate responds to `selector`.
    pub fn count_for_selector(&self, selector: Selector) -> usize {
        let snapshot = self.registry.snapshot();
        snapshot
            .iter()
            .filter(|r| r.delegate().responds_to(selector))
            .count()
    }

    /// Whether any registered delegate responds to `selector`.
    ///
    /// Same answer as `count_for_selector(selector) > 0`, but stops at the
    /// first match.
    pub fn has_delegate_that_responds_to(&self, selector: Selector) -> bool {
        let snapshot = self.registry.snapshot();
        snapshot.iter().any(|r| r.delegate().responds_to(selector))
    }

    /// A copy of the current registrations, in insertion order.
    pub fn registrations(&self) -> Vec<Registration<D>> {
        self.registry.snapshot().to_vec()
    }

    /// Visit every registration, in insertion order, on the calling thread.
    ///
    /// The visitor sees a snapshot taken when `enumerate` is called and may
    /// mutate the dispatcher freely. Returning `ControlFlow::Break(())` stops
    /// the walk.
    ///
    /// This is for diagnostics. Use [`invoke`](Self::invoke) to deliver
    /// messages.
    pub fn enumerate<F>(&self, mut visitor: F)
    where
        F: FnMut(&Arc<D>, &Queue) -> ControlFlow<()>,
    {
        let snapshot = self.registry.snapshot();
        for registration in snapshot.iter() {
            if visitor(registration.delegate(), registration.queue()).is_break() {
                break;
            }
        }
    }

    // ------------------------------------------------------------------
    // Fan-out
    // ------------------------------------------------------------------

    /// Deliver one message to every delegate that responds to `selector`.
    ///
    /// For each registration in a snapshot taken now, a task calling `call`
    /// with the delegate is enqueued on the registration's queue. Delegates
    /// that do not respond to `selector` are skipped. Arguments travel inside
    /// `call`; it is shared by all deliveries of this message.
    ///
    /// `invoke` does not wait for any delivery, collects no results and never
    /// sees a panic raised by a delegate: what happens to a failing task is
    /// up to its queue.
    ///
    /// # Ordering
    ///
    /// Deliveries on one queue run in the order they were enqueued, so
    /// successive `invoke` calls reach a given registration in call order.
    /// There is no ordering across queues or across delegates on different
    /// queues.
    ///
    /// # Removal races
    ///
    /// Membership is decided when `invoke` runs. A delegate removed after
    /// that still receives the deliveries already enqueued for it, even if
    /// they run after the removal has returned.
    ///
    /// Returns the number of deliveries enqueued.
    pub fn invoke<F>(&self, selector: Selector, call: F) -> usize
    where
        F: Fn(&D) + Send + Sync + 'static,
    {
        let snapshot = self.registry.snapshot();
        let call = Arc::new(call);
        let mut enqueued = 0;

        for registration in snapshot.iter() {
            if !registration.delegate().responds_to(selector) {
                continue;
            }
            let delegate = Arc::clone(registration.delegate());
            let call = Arc::clone(&call);
            registration.queue().dispatch(move || (*call)(&*delegate));
            enqueued += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            multicast = %self.name,
            %selector,
            registrations = snapshot.len(),
            enqueued,
            "Invoked delegates"
        );

        enqueued
    }
}

impl<D: ?Sized + Delegate> fmt::Debug for MulticastDelegate<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastDelegate")
            .field("name", &self.name)
            .field("default_queue", &self.default_queue)
            .field("registrations", &self.registry.snapshot())
            .finish()
    }
}

const DEFAULT_NAME: &str = "multicast";

// ============================================================================
// MulticastDelegateBuilder
// ============================================================================

/// Builder for [`MulticastDelegate`].
///
/// # Example
///
/// ```rust
/// use multicast::{Delegate, MulticastDelegate, ThreadQueue};
///
/// trait Observer: Delegate {}
///
/// let delegates = MulticastDelegate::<dyn Observer>::builder()
///     .name("session")
///     .default_queue(ThreadQueue::new("session").unwrap().into_queue())
///     .build()
///     .unwrap();
/// assert_eq!(delegates.name(), "session");
/// ```
pub struct MulticastDelegateBuilder<D: ?Sized> {
    default_queue: Option<Queue>,
    name: &'static str,
    _delegate: PhantomData<fn(Arc<D>)>,
}

impl<D: ?Sized + Delegate> MulticastDelegateBuilder<D> {
    /// Create a builder with no default queue and the default name.
    pub fn new() -> Self {
        Self {
            default_queue: None,
            name: DEFAULT_NAME,
            _delegate: PhantomData,
        }
    }

    /// Set the queue used when a delegate is added without one.
    pub fn default_queue(mut self, queue: Queue) -> Self {
        self.default_queue = Some(queue);
        self
    }

    /// Set the name reported in logs.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Build the dispatcher.
    ///
    /// Without an explicit default queue the process-wide
    /// [`shared_default_queue`] is used, which is spawned on first use and
    /// can fail.
    pub fn build(self) -> Result<MulticastDelegate<D>, QueueError> {
        let default_queue = match self.default_queue {
            Some(queue) => queue,
            None => shared_default_queue()?,
        };
        Ok(MulticastDelegate {
            registry: Registry::new(),
            default_queue,
            name: self.name,
        })
    }
}

impl<D: ?Sized + Delegate> Default for MulticastDelegateBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
