//! Specialized collection and handle types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable key of an object inside one scene graph
    ///
    /// Keys are versioned by the slot map, so a key whose object was removed
    /// never resolves to a later occupant of the same slot.
    pub struct ObjectKey;
}

/// Epoch counter distinguishing the live scene from superseded ones
///
/// Every structural rebuild advances the generation. Anything produced for an
/// older generation (load completions, object references, loop tokens) is
/// stale and must be discarded instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any scene was built
    pub const INITIAL: Self = Self(0);

    /// The generation that supersedes this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}
