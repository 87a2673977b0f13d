//! # Delegate capability
//!
//! A delegate is any object that wants to hear about a producer's events.
//! Protocols are plain traits with [`Delegate`] as a supertrait:
//!
//! ```rust
//! use multicast_core::{Delegate, Selector};
//!
//! pub trait StreamDelegate: Delegate {
//!     fn did_connect(&self, _host: &str) {}
//!     fn did_receive(&self, _bytes: &[u8]) {}
//! }
//!
//! struct Printer;
//!
//! impl Delegate for Printer {
//!     fn responds_to(&self, selector: Selector) -> bool {
//!         selector.name() == "did_connect"
//!     }
//! }
//!
//! impl StreamDelegate for Printer {
//!     fn did_connect(&self, host: &str) {
//!         println!("connected to {host}");
//!     }
//! }
//! ```
//!
//! Because every protocol method must exist on the trait, implementing a
//! method is not the same as declaring interest in it. The declaration is
//! [`Delegate::responds_to`]: the dispatcher only delivers a message to
//! delegates that answer `true` for its selector.

use crate::selector::Selector;
use std::any::{TypeId, type_name};

/// An object that can receive multicast messages.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Delegate`",
    label = "missing `Delegate` implementation",
    note = "Implement `responds_to` or use `#[derive(Delegate)]` with `#[responds_to(...)]`."
)]
pub trait Delegate: Send + Sync + 'static {
    /// Whether this delegate handles the message identified by `selector`.
    fn responds_to(&self, selector: Selector) -> bool;

    /// The concrete type of this delegate.
    ///
    /// Called through a trait object this resolves to the implementing type,
    /// not the trait object type.
    fn delegate_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// The concrete type name of this delegate, for diagnostics.
    fn delegate_type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}
