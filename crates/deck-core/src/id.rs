use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide interner backing every `ElementId`.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifier of an element on a slide, interned so it is `Copy` and
/// compares as a single integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a string as an ElementId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// The id for `s` if it has been interned already. Never grows the
    /// interner, so unknown strings from outside are cheap to reject.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(ElementId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique ID with a type prefix (e.g. `shape_1`, `textbox_2`).
    ///
    /// The numeric suffix increases in generation order across the process,
    /// so IDs created later always carry a larger suffix.
    pub fn with_prefix(prefix: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            // Skip suffixes already taken by IDs loaded from storage.
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

// ─── Time stamps ─────────────────────────────────────────────────────────

/// Last stamp handed out by `next_stamp`.
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Millisecond wall-clock stamp, strictly increasing per process.
///
/// Two calls within the same millisecond return `last + 1` rather than a
/// duplicate.
fn next_stamp() -> u64 {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Identifier of a slide. Time-based and monotonic in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(pub u64);

impl SlideId {
    pub fn next() -> Self {
        SlideId(next_stamp())
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a slide comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl CommentId {
    pub fn next() -> Self {
        CommentId(next_stamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("title_box");
        let b = ElementId::intern("title_box");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "title_box");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(ElementId::lookup("never_seen_before_id"), None);
        assert_eq!(ElementId::lookup("never_seen_before_id"), None);
        let id = ElementId::intern("looked_up_box");
        assert_eq!(ElementId::lookup("looked_up_box"), Some(id));
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = ElementId::with_prefix("shape");
        let b = ElementId::with_prefix("shape");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("shape_"));
    }

    #[test]
    fn prefixed_ids_skip_loaded_ids() {
        // An id that may collide with the counter is already interned.
        let taken = ElementId::intern("image_2");
        for _ in 0..4 {
            assert_ne!(ElementId::with_prefix("image"), taken);
        }
    }

    #[test]
    fn slide_ids_are_strictly_increasing() {
        let ids: Vec<SlideId> = (0..100).map(|_| SlideId::next()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
