use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by every id kind.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Defines an interned identifier newtype.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                $name(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($name::intern(&s))
            }
        }
    };
}

interned_id! {
    /// Identifier of a placed component (e.g. `coil_4`).
    ComponentId
}

interned_id! {
    /// Identifier of a pin, derived from its owner (e.g. `coil_4.p1`).
    PinId
}

interned_id! {
    /// Identifier of a wire, derived from its two endpoints.
    ConnectionId
}

impl ComponentId {
    /// Generate a fresh id with a type prefix (e.g. `no_1`, `lamp_2`).
    ///
    /// The counter is process-wide, so two calls never return the same id.
    /// Callers holding a state loaded from elsewhere still check for collisions.
    pub fn with_prefix(prefix: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl PinId {
    /// Pin `ordinal` of a fixed layout: `<owner>.p<ordinal>`.
    pub fn fixed(owner: ComponentId, ordinal: usize) -> Self {
        Self::intern(&format!("{owner}.p{ordinal}"))
    }

    /// Pin `ordinal` of a rail at `revision`: `<owner>.r<revision>.p<ordinal>`.
    ///
    /// Interned strings are never freed, so each resize leaves its pin ids
    /// in the interner for the rest of the process. Layouts of the same
    /// revision reuse the same entries.
    pub fn rail(owner: ComponentId, revision: u32, ordinal: usize) -> Self {
        Self::intern(&format!("{owner}.r{revision}.p{ordinal}"))
    }
}

impl ConnectionId {
    /// Id of the wire from `start` to `end`: `<start>~<end>`.
    pub fn between(start: PinId, end: PinId) -> Self {
        Self::intern(&format!("{start}~{end}"))
    }
}
