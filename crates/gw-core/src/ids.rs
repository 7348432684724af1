//! Strongly typed string identifiers.
//!
//! Entities and regions are named by the surrounding application (agent ids,
//! geofence ids), so the wrappers hold an owned string rather than a dense
//! index.  Both implement `Borrow<str>` so maps keyed by them can be queried
//! with a plain `&str`.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed ID wrapper around a `String`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id! {
    /// Identifier of a tracked moving entity (a field agent, a vehicle, …).
    pub struct EntityId;
}

typed_id! {
    /// Identifier of a region (geofence).  Unique within a `RegionStore`.
    pub struct RegionId;
}
