use rhythmedit_lib::{HitObject, Id, IdSet, WorkingMap};
use tracing::warn;

use crate::{ActionEvent, ActionKind, EventSink, MapCommand, ordered::update_existing};

fn id_list(ids: &[Id<HitObject>]) -> crate::IdList<HitObject> {
    ids.iter().copied().collect()
}

/// Mirrors hit objects horizontally: lane `n` goes to lane `key_count - n + 1`.
///
/// Flipping twice is the identity, so undo just flips again. Objects in a lane the map doesn't
/// have are left where they are.
#[derive(Clone, Debug)]
pub struct FlipLanes {
    ids: Vec<Id<HitObject>>,
}

impl FlipLanes {
    pub fn new(ids: Vec<Id<HitObject>>) -> Self {
        Self { ids }
    }

    fn flip(&self, map: &mut WorkingMap) {
        let key_count = map.key_count;
        let mut skipped = 0;
        update_existing(&mut map.hit_objects, &self.ids, |object| {
            if (1..=key_count).contains(&object.lane) {
                object.lane = key_count + 1 - object.lane;
            } else {
                skipped += 1;
            }
        });
        if skipped > 0 {
            warn!("not flipping {skipped} hit objects outside lanes 1..={key_count}");
        }
    }
}

impl MapCommand for FlipLanes {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.flip(map);
        events.push(ActionEvent::LanesFlipped(id_list(&self.ids)));
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.flip(map);
        events.push(ActionEvent::LanesFlipped(id_list(&self.ids)));
    }

    fn kind(&self) -> ActionKind {
        ActionKind::FlipLanes
    }
}

/// Swaps two lanes for the given hit objects. Objects in neither lane stay put.
#[derive(Clone, Debug)]
pub struct SwapLanes {
    ids: Vec<Id<HitObject>>,
    lane_a: u32,
    lane_b: u32,
}

impl SwapLanes {
    pub fn new(ids: Vec<Id<HitObject>>, lane_a: u32, lane_b: u32) -> Self {
        Self {
            ids,
            lane_a,
            lane_b,
        }
    }

    fn swap(&self, map: &mut WorkingMap) {
        let (a, b) = (self.lane_a, self.lane_b);
        let lanes = 1..=map.key_count;
        if !lanes.contains(&a) || !lanes.contains(&b) {
            warn!("tried to swap lanes {a} and {b} on a {}K map", map.key_count);
            return;
        }
        update_existing(&mut map.hit_objects, &self.ids, |object| {
            if object.lane == a {
                object.lane = b;
            } else if object.lane == b {
                object.lane = a;
            }
        });
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::LanesSwapped {
            ids: id_list(&self.ids),
            lanes: (self.lane_a, self.lane_b),
        }
    }
}

impl MapCommand for SwapLanes {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.swap(map);
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.swap(map);
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::SwapLanes
    }
}

/// Reverses a selection in time.
///
/// The selection spans from the earliest start time to the latest end (or start, for regular
/// notes). Every object is reflected inside that range, so a hold `(s, e)` becomes
/// `(end - (e - start), end - (s - start))`. The reflected selection spans the same range, so
/// reversing again restores everything.
#[derive(Clone, Debug)]
pub struct ReverseHitObjects {
    ids: Vec<Id<HitObject>>,
    range: Option<(i32, i32)>,
}

impl ReverseHitObjects {
    pub fn new(ids: Vec<Id<HitObject>>) -> Self {
        Self { ids, range: None }
    }

    fn selection_range(&self, map: &WorkingMap) -> Option<(i32, i32)> {
        let set: IdSet<HitObject> = self.ids.iter().copied().collect();
        let selected = map
            .hit_objects
            .iter()
            .filter(|object| set.contains(&object.id));

        selected.fold(None, |range, object| {
            let (start, end) = range.unwrap_or((object.start_time, object.last_time()));
            Some((
                start.min(object.start_time),
                end.max(object.last_time()),
            ))
        })
    }

    fn reverse(&self, map: &mut WorkingMap) {
        let Some((start, end)) = self.range else {
            return;
        };
        update_existing(&mut map.hit_objects, &self.ids, |object| {
            let new_start = end - (object.last_time() - start);
            if object.is_long_note() {
                object.end_time = end - (object.start_time - start);
            }
            object.start_time = new_start;
        });
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::HitObjectsReversed(id_list(&self.ids))
    }
}

impl MapCommand for ReverseHitObjects {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.range.is_none() {
            self.range = self.selection_range(map);
        }
        self.reverse(map);
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.reverse(map);
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ReverseHitObjects
    }
}
