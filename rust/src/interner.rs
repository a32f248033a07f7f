//! Job identifier interning.
//!
//! Maps job identifier strings to dense integer ids so that precedence sets
//! can be canonicalized, grouped and resolved with array indexing.

use rustc_hash::FxHashMap;

/// Interned job id (u32 for compact storage and fast hashing).
pub type JobIdInt = u32;

/// String interner that maps job identifiers to integers in insertion order.
#[derive(Debug, Clone)]
pub struct JobIdInterner {
    to_int: FxHashMap<String, JobIdInt>,
    from_int: Vec<String>,
}

impl JobIdInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Intern a fresh identifier.
    ///
    /// Returns `None` if the identifier is already interned, which callers
    /// treat as a duplicate job.
    pub fn insert(&mut self, s: &str) -> Option<JobIdInt> {
        if self.to_int.contains_key(s) {
            return None;
        }
        let id = self.from_int.len() as JobIdInt;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), id);
        Some(id)
    }

    /// Get the integer ID for a string, if it exists.
    #[inline]
    pub fn get(&self, s: &str) -> Option<JobIdInt> {
        self.to_int.get(s).copied()
    }

    /// Get the string for an integer ID.
    #[inline]
    pub fn resolve(&self, id: JobIdInt) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }

    /// Number of interned identifiers.
    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for JobIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut interner = JobIdInterner::with_capacity(4);

        let a = interner.insert("A").unwrap();
        let b = interner.insert("B").unwrap();

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(interner.resolve(a), Some("A"));
        assert_eq!(interner.resolve(b), Some("B"));
        assert_eq!(interner.get("B"), Some(b));
        assert_eq!(interner.get("Z"), None);
        assert_eq!(interner.resolve(7), None);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut interner = JobIdInterner::default();
        assert!(interner.is_empty());
        assert_eq!(interner.insert("A"), Some(0));
        assert_eq!(interner.insert("A"), None);
        assert_eq!(interner.len(), 1);
    }
}
