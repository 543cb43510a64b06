//! Opaque identities handed across the host boundary.
//!
//! The core never inspects these values; they only need to be cheap to copy
//! and usable as map keys.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

opaque_id!(
    /// An entity owned by the external scene. Skeletal components are keyed
    /// by the root entity of a rigged instance.
    EntityId
);

opaque_id!(
    /// A presentation target (swap chain / surface) owned by the host.
    TargetId
);

opaque_id!(
    /// A view drawn into a presentation target.
    ViewId
);
