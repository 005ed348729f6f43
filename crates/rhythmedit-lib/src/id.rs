use std::{
    collections::hash_map,
    fmt::Debug,
    hash::{BuildHasher, Hash, Hasher},
    marker::PhantomData,
    num::NonZeroU64,
};

use ahash::{AHasher, HashMap, HashSet, RandomState};

fn new_hasher() -> AHasher {
    static RANDOM_STATE: std::sync::LazyLock<RandomState> =
        std::sync::LazyLock::new(RandomState::new);

    RANDOM_STATE.build_hasher()
}

type IdInner = NonZeroU64;

// The <T> only exists so an Id<Layer> can't be passed where an Id<HitObject> is expected.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent, bound = ""))]
pub struct Id<T = ()>(IdInner, #[cfg_attr(feature = "serde", serde(skip))] PhantomData<T>);

fn hash_to_inner(source: impl Hash) -> IdInner {
    let mut hasher = new_hasher();
    source.hash(&mut hasher);
    // zero is the only value we can't represent; nudging it is harmless
    IdInner::new(hasher.finish()).unwrap_or(IdInner::MIN)
}

impl<T> Id<T> {
    pub const fn from_raw(raw: IdInner) -> Self {
        Self(raw, PhantomData)
    }
    pub const fn raw(self) -> IdInner {
        self.0
    }

    /// Deterministic id derived from `source`. Same source, same id (within a process).
    pub fn new(source: impl Hash) -> Self {
        Self::from_raw(hash_to_inner(source))
    }

    /// A fresh id that hasn't been handed out before in this process.
    pub fn arbitrary() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::from_raw(hash_to_inner(("arbitrary", n)))
    }

    pub const fn cast<U>(self) -> Id<U> {
        Id::from_raw(self.raw())
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let full_name = std::any::type_name::<T>();
        let short_name = full_name.rsplit("::").next().unwrap_or(full_name);
        write!(f, "Id::<{short_name}>({:#x})", self.0)
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Unordered map keyed by [`Id`]. Used for collections where position doesn't matter (layers).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        transparent,
        bound(
            serialize = "V: serde::Serialize",
            deserialize = "V: serde::Deserialize<'de>"
        )
    )
)]
pub struct IdMap<T: 'static, V = T> {
    map: HashMap<Id<T>, V>,
}

impl<T, V: Clone> Clone for IdMap<T, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T, V: PartialEq> PartialEq for IdMap<T, V> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T, V> IdMap<T, V> {
    pub fn new() -> Self {
        Self {
            map: Default::default(),
        }
    }

    pub fn has(&self, id: Id<T>) -> bool {
        self.map.contains_key(&id)
    }

    pub fn get(&self, id: Id<T>) -> Option<&V> {
        self.map.get(&id)
    }
    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut V> {
        self.map.get_mut(&id)
    }
    pub fn force_get(&self, id: Id<T>) -> &V {
        match self.get(id) {
            Some(v) => v,
            None => panic!("Nonexistent id: {id:?}"),
        }
    }
    pub fn force_get_mut(&mut self, id: Id<T>) -> &mut V {
        match self.get_mut(id) {
            Some(v) => v,
            None => panic!("Nonexistent id: {id:?}"),
        }
    }
    pub fn insert(&mut self, id: Id<T>, val: V) {
        if self.map.insert(id, val).is_some() {
            panic!("tried to insert already existing id into IdMap: {id:?}");
        }
    }
    pub fn replace(&mut self, id: Id<T>, val: V) -> Option<V> {
        self.map.insert(id, val)
    }
    pub fn remove(&mut self, id: Id<T>) -> Option<V> {
        self.map.remove(&id)
    }
    pub fn take(&mut self, id: Id<T>) -> V {
        self.remove(id)
            .unwrap_or_else(|| panic!("nonexistent id: {id:?}"))
    }

    pub fn keys(&self) -> impl Iterator<Item = Id<T>> + '_ {
        self.map.keys().copied()
    }
    pub fn values(&self) -> hash_map::Values<'_, Id<T>, V> {
        self.map.values()
    }
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &V)> {
        self.map.iter().map(|(&id, v)| (id, v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T, V> Default for IdMap<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> FromIterator<(Id<T>, V)> for IdMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (Id<T>, V)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl<T, V: Debug> Debug for IdMap<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.map.fmt(f)
    }
}

pub type IdSet<T> = HashSet<Id<T>>;
