//! Sharded string interner for identifiers and type names.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access
//! via per-shard locking, so a parser running on another thread can intern
//! names into the same table the loader reads from.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by local index.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(128),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        shard.map.insert("", 0);
        shard.strings.push("");
        shard
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// A shard ran out of local indices.
    #[error("interner shard {shard_idx} exceeded capacity: {count} strings, max is {max}", max = Name::MAX_LOCAL)]
    ShardOverflow { shard_idx: usize, count: usize },
}

/// Sharded string interner.
///
/// Strings are leaked on first insertion and live for the rest of the
/// process; a load session interns a bounded vocabulary (identifiers, file
/// paths, class names) so the leak is bounded as well.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards.
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with keywords and well-known names pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        let interner = Self {
            shards,
            total_count: AtomicUsize::new(1),
        };
        interner.pre_intern_well_known();
        interner
    }

    /// Compute shard for a string based on its hash.
    ///
    /// Only the last bytes are hashed: module paths share long prefixes,
    /// so their tails carry the entropy.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let bytes = s.as_bytes();
        let tail = &bytes[bytes.len().saturating_sub(8)..];
        let mut hash = 0u32;
        for &byte in tail {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        let shard_idx_u32 = shard_u32(shard_idx);
        let shard = &self.shards[shard_idx];

        if let Some(&local) = shard.read().map.get(s) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        let mut guard = shard.write();
        // Another writer may have won the race between the two locks.
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` to handle it.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()].read().strings[name.local()]
    }

    /// Find the Name of an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        let local = *self.shards[shard_idx].read().map.get(s)?;
        Some(Name::new(shard_u32(shard_idx), local))
    }

    /// Pre-intern Python keywords and the names the loader looks up by text.
    fn pre_intern_well_known(&self) {
        const WELL_KNOWN: &[&str] = &[
            // Keywords
            "and",
            "as",
            "class",
            "def",
            "del",
            "elif",
            "else",
            "for",
            "from",
            "global",
            "if",
            "import",
            "in",
            "is",
            "lambda",
            "nonlocal",
            "not",
            "or",
            "pass",
            "return",
            "while",
            "with",
            "yield",
            // Receiver and builtins
            "self",
            "cls",
            "slice",
            "object",
            "super",
            "__init__",
            // Annotation plumbing
            "DynamicAnnotation",
            "dynamicAnnotation",
        ];

        for name in WELL_KNOWN {
            self.intern(name);
        }
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner only holds the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "shard indices are bounded by NUM_SHARDS (16)"
)]
#[inline]
fn shard_u32(shard_idx: usize) -> u32 {
    shard_idx as u32
}

/// Shared interner handle for the parser, the loader and the translator.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
