//! Generation-counted slot storage
//!
//! Slots are reused after removal, but every reuse bumps the slot generation,
//! so a key handed out before the removal can never address the new occupant.
//! Iteration visits occupied slots in index order.

/// Stable key into a [`Slots`] table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    index: u32,
    generation: u32,
}

impl SlotKey {
    /// Slot index (only meaningful together with the generation)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot had when this key was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Table of values addressed by [`SlotKey`]
#[derive(Debug, Clone)]
pub struct Slots<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slots<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store a value and return its key
    pub fn insert(&mut self, value: T) -> SlotKey {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return SlotKey {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotKey {
            index,
            generation: 0,
        }
    }

    /// Remove the value behind `key`, if the key is still live
    pub fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        Some(value)
    }

    /// Borrow the value behind `key`
    pub fn get(&self, key: SlotKey) -> Option<&T> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Whether `key` still addresses a value
    pub fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate live values in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotKey {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut slots = Slots::new();
        let a = slots.insert("a");
        let b = slots.insert("b");

        assert_eq!(slots.get(a), Some(&"a"));
        assert_eq!(slots.get(b), Some(&"b"));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_stale_key_does_not_alias_reused_slot() {
        let mut slots = Slots::new();
        let first = slots.insert(1);
        assert_eq!(slots.remove(first), Some(1));

        let second = slots.insert(2);
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());

        assert!(!slots.contains(first));
        assert_eq!(slots.remove(first), None);
        assert_eq!(slots.get(second), Some(&2));
    }

    #[test]
    fn test_removal_leaves_other_keys_valid() {
        let mut slots = Slots::new();
        let keys: Vec<_> = (0..4).map(|i| slots.insert(i)).collect();

        slots.remove(keys[1]);
        slots.insert(10);

        assert_eq!(slots.get(keys[0]), Some(&0));
        assert_eq!(slots.get(keys[2]), Some(&2));
        assert_eq!(slots.get(keys[3]), Some(&3));
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn test_iter_in_slot_order() {
        let mut slots = Slots::new();
        let a = slots.insert('a');
        slots.insert('b');
        slots.insert('c');
        slots.remove(a);

        let values: Vec<char> = slots.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!['b', 'c']);
    }
}
