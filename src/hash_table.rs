use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Debug;
#[cfg(feature = "foldhash")]
use core::hash::BuildHasher;

/// The smallest slot count a table will ever have.
///
/// Tables start at this capacity and `shrink` never goes below it.
pub const MIN_CAPACITY: usize = 7;

/// Hash and equality behavior for keys, supplied at construction.
///
/// The table never interprets keys itself; every probe start position and
/// every key comparison goes through the `KeyOps` implementation it was
/// built with. Implementations must be consistent: keys that compare equal
/// must hash to the same value for the lifetime of the table.
pub trait KeyOps {
    /// Hashes a key to a 64-bit value.
    fn hash(&self, key: u64) -> u64;

    /// Returns `true` if two keys are the same key.
    fn equals(&self, a: u64, b: u64) -> bool;
}

/// A [`KeyOps`] built from a pair of plain functions or closures.
///
/// # Examples
///
/// ```rust
/// # use duo_hash::{FnKeyOps, HashTable};
/// #
/// let mut table = HashTable::new(FnKeyOps::new(
///     |k: u64| k.wrapping_mul(0x9E37_79B9_7F4A_7C15),
///     |a, b| a == b,
/// ));
/// table.put(3, 9);
/// assert_eq!(table.get(3), Some(9));
/// ```
#[derive(Clone)]
pub struct FnKeyOps<H, E> {
    hash: H,
    eq: E,
}

impl<H, E> FnKeyOps<H, E>
where
    H: Fn(u64) -> u64,
    E: Fn(u64, u64) -> bool,
{
    /// Wraps a hash function and an equality predicate as key behavior.
    pub fn new(hash: H, eq: E) -> Self {
        Self { hash, eq }
    }
}

impl<H, E> KeyOps for FnKeyOps<H, E>
where
    H: Fn(u64) -> u64,
    E: Fn(u64, u64) -> bool,
{
    fn hash(&self, key: u64) -> u64 {
        (self.hash)(key)
    }

    fn equals(&self, a: u64, b: u64) -> bool {
        (self.eq)(a, b)
    }
}

/// The default [`KeyOps`]: keys hashed with `foldhash`, compared with `==`.
#[cfg(feature = "foldhash")]
#[derive(Clone, Default)]
pub struct FoldKeyOps {
    state: foldhash::fast::FixedState,
}

#[cfg(feature = "foldhash")]
impl FoldKeyOps {
    /// Creates key behavior with an explicit hasher seed.
    ///
    /// Two tables built with the same seed probe identically, which is
    /// occasionally useful for reproducing a probe pattern.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: foldhash::fast::FixedState::with_seed(seed),
        }
    }
}

#[cfg(feature = "foldhash")]
impl KeyOps for FoldKeyOps {
    fn hash(&self, key: u64) -> u64 {
        self.state.hash_one(key)
    }

    fn equals(&self, a: u64, b: u64) -> bool {
        a == b
    }
}

/// One position in the slot array.
///
/// A slot only ever moves `Empty -> Occupied -> Tombstone -> Occupied`;
/// tombstones are reclaimed en masse when a resize rebuilds the array,
/// never individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Empty,
    Occupied { key: u64, value: u64 },
    Tombstone,
}

/// An open-addressing hash table from `u64` keys to `u64` values.
///
/// Collisions are resolved by double hashing: both the starting slot and
/// the probe stride are derived from the caller-supplied hash of the key,
/// so keys that collide on their starting slot still walk different probe
/// sequences. Removal is lazy — a removed slot becomes a tombstone that
/// keeps later keys in the same probe sequence reachable.
///
/// The table doubles its capacity before an insert would make it more than
/// half full, and halves it (down to [`MIN_CAPACITY`]) when a removal
/// leaves it at a quarter full or less. Both paths rebuild the slot array
/// from scratch, dropping accumulated tombstones.
///
/// # Examples
///
/// ```rust
/// # use duo_hash::{FnKeyOps, HashTable};
/// #
/// let mut table = HashTable::new(FnKeyOps::new(|k| k, |a, b| a == b));
/// table.put(1, 10);
/// table.put(2, 20);
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get(1), Some(10));
/// assert!(table.remove(2));
/// assert!(!table.contains(2));
/// ```
#[derive(Clone)]
pub struct HashTable<O> {
    slots: Box<[Slot]>,
    len: usize,
    ops: O,
}

impl<O> Debug for HashTable<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tombstones = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count();
        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("tombstones", &tombstones)
            .finish()
    }
}

#[cfg(feature = "foldhash")]
impl Default for HashTable<FoldKeyOps> {
    fn default() -> Self {
        Self::new(FoldKeyOps::default())
    }
}

impl<O> HashTable<O>
where
    O: KeyOps,
{
    /// Creates an empty table with the given key behavior.
    ///
    /// The table starts at [`MIN_CAPACITY`] slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::{FnKeyOps, HashTable, MIN_CAPACITY};
    /// #
    /// let table = HashTable::new(FnKeyOps::new(|k| k, |a, b| a == b));
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), MIN_CAPACITY);
    /// ```
    pub fn new(ops: O) -> Self {
        Self {
            slots: vec![Slot::Empty; MIN_CAPACITY].into_boxed_slice(),
            len: 0,
            ops,
        }
    }

    /// Returns the number of live entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current slot count.
    ///
    /// The capacity is always at least [`MIN_CAPACITY`] and at least twice
    /// [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts a key-value pair, overwriting the value if the key is
    /// already present.
    ///
    /// Inserting a new key increases [`len`](Self::len) by one; updating an
    /// existing key leaves it unchanged. If the table is already half full
    /// it doubles its capacity before probing.
    ///
    /// # Panics
    ///
    /// Panics if the probe walk visits every slot without finding an open
    /// one, which can only happen with a defective [`KeyOps`]
    /// implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::{FnKeyOps, HashTable};
    /// #
    /// let mut table = HashTable::new(FnKeyOps::new(|k| k, |a, b| a == b));
    /// table.put(5, 1);
    /// table.put(5, 2);
    ///
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.get(5), Some(2));
    /// ```
    pub fn put(&mut self, key: u64, value: u64) {
        // Growing at half full keeps every walk short; insert itself never
        // has to worry about running out of open slots.
        if self.len == self.capacity() / 2 {
            self.grow();
        }
        self.insert(key, value);
    }

    /// Looks up the value stored for a key.
    ///
    /// # Panics
    ///
    /// Panics if the probe walk visits every slot without reaching an empty
    /// one or a match (defective [`KeyOps`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::{FnKeyOps, HashTable};
    /// #
    /// let mut table = HashTable::new(FnKeyOps::new(|k| k, |a, b| a == b));
    /// table.put(9, 81);
    ///
    /// assert_eq!(table.get(9), Some(81));
    /// assert_eq!(table.get(8), None);
    /// ```
    pub fn get(&self, key: u64) -> Option<u64> {
        let cap = self.slots.len();
        let (mut probe, step) = self.probe_start(key);

        for _ in 0..cap {
            match self.slots[probe] {
                // The walk never skipped an empty slot to place this key,
                // so reaching one means the key is absent.
                Slot::Empty => return None,
                Slot::Occupied { key: existing, value } if self.ops.equals(key, existing) => {
                    return Some(value);
                }
                _ => {}
            }
            probe = (probe + step) % cap;
        }

        panic!(
            "lookup probed all {cap} slots without resolving; hash or equality behavior is defective"
        );
    }

    /// Returns `true` if the key has a live entry in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::{FnKeyOps, HashTable};
    /// #
    /// let mut table = HashTable::new(FnKeyOps::new(|k| k, |a, b| a == b));
    /// table.put(4, 16);
    ///
    /// assert!(table.contains(4));
    /// assert!(!table.contains(5));
    /// ```
    pub fn contains(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key's entry, returning `true` if it was present.
    ///
    /// The entry's slot becomes a tombstone so that other keys probing
    /// through it remain reachable. A successful removal that leaves the
    /// table at a quarter full or less halves the capacity; removing an
    /// absent key changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if the probe walk visits every slot without resolving
    /// (defective [`KeyOps`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::{FnKeyOps, HashTable};
    /// #
    /// let mut table = HashTable::new(FnKeyOps::new(|k| k, |a, b| a == b));
    /// table.put(6, 36);
    ///
    /// assert!(table.remove(6));
    /// assert!(!table.remove(6));
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, key: u64) -> bool {
        let cap = self.slots.len();
        let (mut probe, step) = self.probe_start(key);
        let mut outcome = None;

        for _ in 0..cap {
            match self.slots[probe] {
                Slot::Empty => {
                    outcome = Some(false);
                    break;
                }
                Slot::Occupied { key: existing, .. } if self.ops.equals(key, existing) => {
                    self.slots[probe] = Slot::Tombstone;
                    self.len -= 1;
                    outcome = Some(true);
                    break;
                }
                _ => {}
            }
            probe = (probe + step) % cap;
        }

        let Some(found) = outcome else {
            panic!(
                "removal probed all {cap} slots without resolving; hash or equality behavior is defective"
            );
        };

        if found && self.len <= self.capacity() / 4 {
            self.shrink();
        }

        found
    }

    /// Derives the starting slot and probe stride for a key.
    ///
    /// The stride `7 - (hash % 7)` lies in `1..=7`; reduced modulo the
    /// capacity it can only collapse to zero at the capacity floor, and a
    /// zero stride would pin the walk to one slot, so it is folded to
    /// `capacity - 1` there.
    fn probe_start(&self, key: u64) -> (usize, usize) {
        let cap = self.slots.len();
        let hash = self.ops.hash(key);

        let probe = (hash % cap as u64) as usize;
        let step = (7 - (hash % 7)) as usize % cap;
        let step = if step == 0 { cap - 1 } else { step };

        debug_assert!(probe < cap);
        debug_assert!(step > 0 && step < cap);
        (probe, step)
    }

    /// The probe walk shared by `put` and the resize rebuild. The caller is
    /// responsible for the grow trigger.
    ///
    /// The first tombstone seen is remembered as the insertion target, but
    /// the walk continues to the next empty slot in case the key already
    /// lives further along the sequence; stopping at the tombstone would
    /// leave two live slots for one key.
    fn insert(&mut self, key: u64, value: u64) {
        let cap = self.slots.len();
        let (mut probe, step) = self.probe_start(key);
        let mut reusable = None;

        for _ in 0..cap {
            match self.slots[probe] {
                Slot::Empty => {
                    let target = reusable.unwrap_or(probe);
                    self.slots[target] = Slot::Occupied { key, value };
                    self.len += 1;
                    return;
                }
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(probe);
                    }
                }
                Slot::Occupied { key: existing, .. } => {
                    if self.ops.equals(key, existing) {
                        self.slots[probe] = Slot::Occupied { key, value };
                        return;
                    }
                }
            }
            probe = (probe + step) % cap;
        }

        panic!(
            "insert probed all {cap} slots without finding an open one; hash or equality behavior is defective"
        );
    }

    /// Replaces the slot array with a fresh all-empty one of
    /// `new_capacity` and re-inserts every live entry in slot order.
    ///
    /// Tombstones are dropped here and nowhere else.
    fn resize(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= MIN_CAPACITY);

        let old = core::mem::replace(
            &mut self.slots,
            vec![Slot::Empty; new_capacity].into_boxed_slice(),
        );
        self.len = 0;

        for slot in old.iter() {
            if let Slot::Occupied { key, value } = *slot {
                self.insert(key, value);
            }
        }
    }

    fn grow(&mut self) {
        self.resize(self.capacity() * 2);
    }

    fn shrink(&mut self) {
        self.resize((self.capacity() / 2).max(MIN_CAPACITY));
    }

    #[cfg(test)]
    fn occupied_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count()
    }

    #[cfg(test)]
    fn tombstone_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count()
    }
}
