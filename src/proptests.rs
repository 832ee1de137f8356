use std::collections::HashMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::RadixBag;

/// Reference multiset tracking occurrence counts per key.
#[derive(Default)]
struct Model {
    counts: HashMap<Vec<u8>, u32>,
    len: usize,
}

impl Model {
    fn insert(&mut self, key: &[u8]) -> bool {
        self.len += 1;
        let count = self.counts.entry(key.to_vec()).or_insert(0);
        *count += 1;
        *count == 1
    }

    fn remove(&mut self, key: &[u8]) -> bool {
        let Some(count) = self.counts.get_mut(key) else {
            return false;
        };
        *count -= 1;
        self.len -= 1;
        if *count == 0 {
            self.counts.remove(key);
        }
        true
    }

    fn count(&self, key: &[u8]) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

/// Actions to run against both the bag and the model.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(Key),
    Remove(Key),
    Contains(Key),
    Count(Key),
}

#[derive(Debug, Clone)]
struct Key(Vec<u8>);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // The harness alphabet: short-to-medium keys over [a-z0-9].
            "[a-z0-9]{1,50}".prop_map(|s| Key(s.into_bytes())),
            // A tiny alphabet, so removals hit present keys often and
            // prefix splits and merges pile up.
            "[ab]{1,12}".prop_map(|s| Key(s.into_bytes())),
            // Arbitrary bytes, including zero and non-ASCII.
            prop::collection::vec(any::<u8>(), 1..16).prop_map(Key),
        ]
        .boxed()
    }
}

/// Runs each action on both implementations and compares every observable.
#[derive(Default)]
struct Test {
    bag: RadixBag,
    model: Model,
}

impl Test {
    fn execute(&mut self, action: &Action) {
        match action {
            Action::Insert(key) => {
                let expected = self.model.insert(&key.0);
                assert_eq!(
                    self.bag.insert(&key.0),
                    expected,
                    "insert mismatch for {:?}",
                    key.0
                );
            }
            Action::Remove(key) => {
                let expected = self.model.remove(&key.0);
                assert_eq!(
                    self.bag.remove(&key.0),
                    expected,
                    "remove mismatch for {:?}",
                    key.0
                );
            }
            Action::Contains(key) => {
                assert_eq!(
                    self.bag.contains(&key.0),
                    self.model.count(&key.0) > 0,
                    "contains mismatch for {:?}",
                    key.0
                );
            }
            Action::Count(key) => {
                assert_eq!(
                    self.bag.count(&key.0),
                    self.model.count(&key.0),
                    "count mismatch for {:?}",
                    key.0
                );
            }
        }
        assert_eq!(self.bag.len(), self.model.len);
        assert_eq!(self.bag.is_empty(), self.model.len == 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn behaves_like_a_reference_multiset(actions in prop::collection::vec(any::<Action>(), 1..128)) {
        let mut test = Test::default();
        for action in &actions {
            test.execute(action);
        }
    }

    #[test]
    fn draining_all_occurrences_empties_the_bag(keys in prop::collection::vec(any::<Key>(), 1..32)) {
        let mut bag = RadixBag::new();
        let baseline = bag.heap_bytes();
        for key in &keys {
            bag.insert(&key.0);
        }
        for key in &keys {
            prop_assert!(bag.remove(&key.0));
        }
        prop_assert!(bag.is_empty());
        prop_assert_eq!(bag.heap_bytes(), baseline);
        for key in &keys {
            prop_assert!(!bag.contains(&key.0));
        }
    }
}
