//! Message identifiers.

use std::fmt;

/// Identifies one message of a delegate protocol.
///
/// A selector is the name of the protocol method it stands for. Two selectors
/// are equal when their names are equal, so a protocol can declare its
/// selectors as constants next to the trait:
///
/// ```rust
/// use multicast_core::Selector;
///
/// pub const DID_CONNECT: Selector = Selector::new("did_connect");
/// assert_eq!(DID_CONNECT, multicast_core::selector!(did_connect));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(&'static str);

impl Selector {
    /// Create a selector from a method name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The method name this selector stands for.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", self.0)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&'static str> for Selector {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

/// Build a [`Selector`] from a bare method name.
///
/// `selector!(did_connect)` is `Selector::new("did_connect")`.
#[macro_export]
macro_rules! selector {
    ($name:ident) => {
        $crate::Selector::new(stringify!($name))
    };
}
