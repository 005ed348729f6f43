use std::cmp::Ordering;

use crate::{Id, IdSet};

/// Anything that lives on the timeline and has an identity.
pub trait Timed: Sized + 'static {
    fn id(&self) -> Id<Self>;
    /// Start time in milliseconds. Integer-timed entities widen losslessly.
    fn start_time_ms(&self) -> f64;
}

fn compare<T: Timed>(a: &T, b: &T) -> Ordering {
    a.start_time_ms()
        .total_cmp(&b.start_time_ms())
        .then_with(|| a.id().cmp(&b.id()))
}

/// A `Vec` kept sorted by `(start time, id)`.
///
/// The id tiebreak makes the order total, so the same set of entities always ends up in the
/// same order no matter how it was built. Removing then re-inserting something, or shifting a
/// batch forward then back, puts every element exactly where it was.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TimeOrdered<T: Timed> {
    items: Vec<T>,
}

impl<T: Timed> TimeOrdered<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn from_vec(mut items: Vec<T>) -> Self {
        items.sort_unstable_by(compare);
        Self { items }
    }

    fn insertion_point(&self, item: &T) -> usize {
        self.items
            .partition_point(|other| compare(other, item) == Ordering::Less)
    }

    /// Inserts `item` where it keeps the collection sorted and returns that index.
    pub fn insert(&mut self, item: T) -> usize {
        assert!(
            !self.contains(item.id()),
            "tried to insert already existing id into TimeOrdered: {:?}",
            item.id()
        );
        let index = self.insertion_point(&item);
        self.items.insert(index, item);
        index
    }

    pub fn insert_batch(&mut self, items: impl IntoIterator<Item = T>) {
        let items = items.into_iter();
        let (lower, _) = items.size_hint();
        if lower > 16 {
            // cheaper to append and sort once than to shift the tail for every item
            let before = self.items.len();
            self.items.extend(items);
            let mut seen = IdSet::default();
            for item in &self.items {
                assert!(
                    seen.insert(item.id()),
                    "tried to insert already existing id into TimeOrdered: {:?}",
                    item.id()
                );
            }
            if self.items.len() != before {
                self.sort();
            }
        } else {
            for item in items {
                self.insert(item);
            }
        }
    }

    pub fn remove(&mut self, id: Id<T>) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Removes everything whose id is in `ids`, returning the removed items in timeline order.
    pub fn remove_batch(&mut self, ids: &IdSet<T>) -> Vec<T> {
        if ids.is_empty() {
            return Vec::new();
        }
        let (removed, kept) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.contains(&item.id()));
        self.items = kept;
        removed
    }

    /// Runs `f` on every element whose id is in `ids`, re-sorting afterwards if `f` moved
    /// anything out of place. Returns how many elements were visited.
    pub fn update(&mut self, ids: &IdSet<T>, mut f: impl FnMut(&mut T)) -> usize {
        let mut visited = 0;
        for item in self.items.iter_mut() {
            if ids.contains(&item.id()) {
                f(item);
                visited += 1;
            }
        }
        if visited > 0 && !self.is_sorted() {
            self.sort();
        }
        visited
    }

    /// Single-element version of [`Self::update`].
    pub fn update_one<R>(&mut self, id: Id<T>, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let index = self.position(id)?;
        let result = f(&mut self.items[index]);
        if !self.is_sorted() {
            self.sort();
        }
        Some(result)
    }

    pub fn sort(&mut self) {
        self.items.sort_unstable_by(compare);
    }

    pub fn is_sorted(&self) -> bool {
        self.items
            .is_sorted_by(|a, b| compare(a, b) != Ordering::Greater)
    }

    pub fn position(&self, id: Id<T>) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
    pub fn contains(&self, id: Id<T>) -> bool {
        self.get(id).is_some()
    }

    /// The last element starting at or before `time`.
    pub fn at_or_before(&self, time: f64) -> Option<&T> {
        let index = self
            .items
            .partition_point(|item| item.start_time_ms() <= time);
        index.checked_sub(1).map(|i| &self.items[i])
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
    pub fn ids(&self) -> impl Iterator<Item = Id<T>> + '_ {
        self.items.iter().map(Timed::id)
    }
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Timed> Default for TimeOrdered<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Timed + std::fmt::Debug> std::fmt::Debug for TimeOrdered<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: Timed> FromIterator<T> for TimeOrdered<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T: Timed> IntoIterator for &'a TimeOrdered<T> {
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
