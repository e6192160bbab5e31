//! In-memory course record store
//!
//! This module provides the CourseStore component that maps course keys to
//! course records and sequential ids to course keys.
//!
//! # Uniqueness
//!
//! A key is written exactly once by `insert`. Inserting at an occupied key is
//! rejected rather than overwriting, and ids are issued strictly in sequence.

use crate::core::traits::RecordStore;
use crate::types::{Course, CourseHash, CourseIndex, MarketplaceError};
use std::collections::HashMap;

/// Course store backed by hash maps
///
/// Ids are dense (0, 1, 2, ...) so the id -> key mapping is a vector.
#[derive(Debug, Default)]
pub struct CourseStore {
    /// Map of course key to course record
    courses: HashMap<CourseHash, Course>,

    /// Course key at each sequential id
    keys: Vec<CourseHash>,
}

impl CourseStore {
    /// Create a new empty course store
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for CourseStore {
    fn insert(&mut self, key: CourseHash, course: Course) -> Result<(), MarketplaceError> {
        if self.courses.contains_key(&key) {
            return Err(MarketplaceError::KeyCollision { hash: key });
        }

        let expected = self.count();
        if course.id != expected {
            return Err(MarketplaceError::IndexOutOfSequence {
                expected,
                actual: course.id,
            });
        }

        self.courses.insert(key, course);
        self.keys.push(key);
        Ok(())
    }

    fn put(&mut self, key: CourseHash, course: Course) -> Result<(), MarketplaceError> {
        let slot = self
            .courses
            .get_mut(&key)
            .ok_or(MarketplaceError::CourseIsNotCreated { hash: key })?;
        *slot = course;
        Ok(())
    }

    fn get(&self, key: &CourseHash) -> Option<&Course> {
        self.courses.get(key)
    }

    fn key_at(&self, index: CourseIndex) -> Option<CourseHash> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.keys.get(index))
            .copied()
    }

    fn count(&self) -> CourseIndex {
        self.keys.len() as CourseIndex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CourseState, Identity, Proof};

    fn key(byte: u8) -> CourseHash {
        CourseHash::new([byte; 32])
    }

    fn course(id: CourseIndex, price: u128) -> Course {
        Course::new(id, price, Proof::new([9; 32]), Identity::new([1; 20]))
    }

    #[test]
    fn test_insert_and_retrieve_course() {
        let mut store = CourseStore::new();

        store.insert(key(1), course(0, 100)).unwrap();

        let retrieved = store.get(&key(1)).unwrap();
        assert_eq!(retrieved.id, 0);
        assert_eq!(retrieved.price, 100);
        assert_eq!(retrieved.state, CourseState::Purchased);
        assert!(store.exists(&key(1)));
        assert_eq!(store.key_at(0), Some(key(1)));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_absent_course() {
        let store = CourseStore::new();
        assert!(store.get(&key(1)).is_none());
        assert!(!store.exists(&key(1)));
        assert_eq!(store.key_at(0), None);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_insert_collision_keeps_original() {
        let mut store = CourseStore::new();
        store.insert(key(1), course(0, 100)).unwrap();

        let result = store.insert(key(1), course(1, 500));
        assert_eq!(result, Err(MarketplaceError::KeyCollision { hash: key(1) }));

        // Original record untouched, counter not advanced
        assert_eq!(store.get(&key(1)).unwrap().price, 100);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_insert_out_of_sequence_rejected() {
        let mut store = CourseStore::new();

        let result = store.insert(key(1), course(3, 100));
        assert_eq!(
            result,
            Err(MarketplaceError::IndexOutOfSequence {
                expected: 0,
                actual: 3
            })
        );
        assert!(!store.exists(&key(1)));
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut store = CourseStore::new();
        store.insert(key(1), course(0, 1)).unwrap();
        store.insert(key(2), course(1, 2)).unwrap();
        store.insert(key(3), course(2, 3)).unwrap();

        assert_eq!(store.count(), 3);
        assert_eq!(store.key_at(1), Some(key(2)));
        let order: Vec<_> = (0..store.count())
            .filter_map(|index| store.key_at(index))
            .map(|key| store.get(&key).unwrap().id)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_put_replaces_existing() {
        let mut store = CourseStore::new();
        store.insert(key(1), course(0, 100)).unwrap();

        let mut updated = store.get(&key(1)).unwrap().clone();
        updated.state = CourseState::Activated;
        store.put(key(1), updated).unwrap();

        assert_eq!(store.get(&key(1)).unwrap().state, CourseState::Activated);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_put_unknown_key_fails() {
        let mut store = CourseStore::new();
        let result = store.put(key(7), course(0, 1));
        assert_eq!(
            result,
            Err(MarketplaceError::CourseIsNotCreated { hash: key(7) })
        );
        assert_eq!(store.count(), 0);
    }
}
