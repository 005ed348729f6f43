//! Shared plumbing for actions over time-ordered entities.

use ahash::HashMap;
use rhythmedit_lib::{Id, IdSet, TimeOrdered, Timed};
use tracing::warn;

use crate::IdList;

/// The ids of a batch plus, while the batch isn't in the map, the entities themselves.
#[derive(Clone, Debug)]
pub(crate) struct Batch<T: Timed> {
    ids: Vec<Id<T>>,
    data: Option<Vec<T>>,
}

impl<T: Timed> Batch<T> {
    pub fn with_data(data: Vec<T>) -> Self {
        Self {
            ids: data.iter().map(Timed::id).collect(),
            data: Some(data),
        }
    }
    pub fn with_ids(ids: Vec<Id<T>>) -> Self {
        Self { ids, data: None }
    }

    pub fn ids(&self) -> &[Id<T>] {
        &self.ids
    }
    pub fn id_list(&self) -> IdList<T> {
        self.ids.iter().copied().collect()
    }

    pub fn add_to(&mut self, ordered: &mut TimeOrdered<T>) {
        let data = self
            .data
            .take()
            .expect("called add_to on empty Batch");
        ordered.insert_batch(data);
    }

    /// Takes the batch out of `ordered`. Ids that aren't there are dropped from the batch so a
    /// later [`Self::add_to`] only brings back what was actually removed.
    pub fn remove_from(&mut self, ordered: &mut TimeOrdered<T>) {
        let set: IdSet<T> = self.ids.iter().copied().collect();
        let removed = ordered.remove_batch(&set);
        if removed.len() != self.ids.len() {
            warn!(
                "{} of {} {} to remove weren't found",
                self.ids.len() - removed.len(),
                self.ids.len(),
                short_type_name::<T>(),
            );
            let found: IdSet<T> = removed.iter().map(Timed::id).collect();
            self.ids.retain(|id| found.contains(id));
        }
        assert!(
            self.data.replace(removed).is_none(),
            "called remove_from on nonempty Batch"
        );
    }
}

pub(crate) fn short_type_name<T>() -> &'static str {
    let full_name = std::any::type_name::<T>();
    full_name.rsplit("::").next().unwrap_or(full_name)
}

/// Runs `f` on every element of `ordered` named in `ids`, keeping it sorted. Ids that aren't
/// there are skipped with a warning.
pub(crate) fn update_existing<T: Timed>(
    ordered: &mut TimeOrdered<T>,
    ids: &[Id<T>],
    f: impl FnMut(&mut T),
) -> usize {
    let set: IdSet<T> = ids.iter().copied().collect();
    let visited = ordered.update(&set, f);
    if visited != set.len() {
        warn!(
            "ignoring {} nonexistent {} ids",
            set.len() - visited,
            short_type_name::<T>()
        );
    }
    visited
}

/// Like [`update_existing`], but keeps whatever `f` returns for each element so it can be
/// handed back to [`restore`] later.
pub(crate) fn capture<T: Timed, V>(
    ordered: &mut TimeOrdered<T>,
    ids: &[Id<T>],
    mut f: impl FnMut(&mut T) -> V,
) -> Vec<(Id<T>, V)> {
    let mut captured = Vec::with_capacity(ids.len());
    update_existing(ordered, ids, |item| captured.push((item.id(), f(item))));
    captured
}

pub(crate) fn restore<T: Timed, V>(
    ordered: &mut TimeOrdered<T>,
    captured: &[(Id<T>, V)],
    mut f: impl FnMut(&mut T, &V),
) {
    let lookup: HashMap<Id<T>, &V> = captured.iter().map(|(id, value)| (*id, value)).collect();
    let set: IdSet<T> = lookup.keys().copied().collect();
    ordered.update(&set, |item| f(item, lookup[&item.id()]));
}

#[cfg(test)]
mod tests {
    use rhythmedit_lib::Bookmark;

    use super::*;

    #[test]
    fn remove_forgets_missing_ids() {
        let mut bookmarks = TimeOrdered::new();
        let kept = Bookmark::new(100, "kept");
        let kept_id = kept.id;
        bookmarks.insert(kept);

        let mut batch = Batch::with_ids(vec![kept_id, Id::arbitrary()]);
        batch.remove_from(&mut bookmarks);
        assert!(bookmarks.is_empty());
        assert_eq!(batch.ids(), [kept_id]);

        batch.add_to(&mut bookmarks);
        assert_eq!(bookmarks.ids().collect::<Vec<_>>(), [kept_id]);
    }
}
