use rhythmedit_lib::{HitObject, Id, WorkingMap};
use tracing::warn;

use crate::{
    ActionEvent, ActionKind, EventSink, MapCommand,
    ordered::{Batch, capture, restore},
};

mod lanes;
mod properties;

pub use lanes::{FlipLanes, ReverseHitObjects, SwapLanes};
pub use properties::{HitObjectColorChange, HitSoundChange, MoveToLayer, MoveToTimingGroup, Resnap};

#[derive(Clone, Debug)]
pub struct HitObjectAddOrRemove {
    batch: Batch<HitObject>,
    is_removal: bool,
}

impl HitObjectAddOrRemove {
    pub fn addition(objects: Vec<HitObject>) -> Self {
        Self {
            batch: Batch::with_data(objects),
            is_removal: false,
        }
    }
    pub fn removal(ids: Vec<Id<HitObject>>) -> Self {
        Self {
            batch: Batch::with_ids(ids),
            is_removal: true,
        }
    }

    pub fn ids(&self) -> &[Id<HitObject>] {
        self.batch.ids()
    }
    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    fn event(&self) -> ActionEvent {
        if self.is_removal {
            ActionEvent::HitObjectsRemoved(self.batch.id_list())
        } else {
            ActionEvent::HitObjectsAdded(self.batch.id_list())
        }
    }
}

impl MapCommand for HitObjectAddOrRemove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.batch.remove_from(&mut map.hit_objects);
        } else {
            self.batch.add_to(&mut map.hit_objects);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.batch.add_to(&mut map.hit_objects);
        } else {
            self.batch.remove_from(&mut map.hit_objects);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::RemoveHitObjects
        } else {
            ActionKind::AddHitObjects
        }
    }
}

/// Shifts hit objects in time and across lanes. Long notes keep their length.
///
/// Lanes are clamped to `1..=key_count`. Undo puts every object back exactly where it was,
/// including holds whose tail happened to land on 0 (which reads as "not a hold").
#[derive(Clone, Debug)]
pub struct HitObjectMove {
    ids: Vec<Id<HitObject>>,
    time_offset: i32,
    lane_offset: i32,
    previous: Vec<(Id<HitObject>, Placement)>,
}

#[derive(Clone, Copy, Debug)]
struct Placement {
    start_time: i32,
    end_time: i32,
    lane: u32,
}

impl HitObjectMove {
    pub fn new(ids: Vec<Id<HitObject>>, time_offset: i32, lane_offset: i32) -> Self {
        Self {
            ids,
            time_offset,
            lane_offset,
            previous: Vec::new(),
        }
    }
    /// A move that only changes time. Global offset and the offset batch tools use this.
    pub fn offset(ids: Vec<Id<HitObject>>, time_offset: i32) -> Self {
        Self::new(ids, time_offset, 0)
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::HitObjectsMoved {
            ids: self.ids.iter().copied().collect(),
            time_offset: self.time_offset,
            lane_offset: self.lane_offset,
        }
    }
}

impl MapCommand for HitObjectMove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let (time_offset, lane_offset) = (self.time_offset, self.lane_offset);
        let max_lane = map.key_count.max(1);
        self.previous = capture(&mut map.hit_objects, &self.ids, |object| {
            let placement = Placement {
                start_time: object.start_time,
                end_time: object.end_time,
                lane: object.lane,
            };
            let was_long_note = object.is_long_note();
            object.shift(time_offset);
            if was_long_note && !object.is_long_note() {
                warn!(
                    "long note {:?} ends at 0ms after moving and reads as a regular note",
                    object.id
                );
            }
            object.lane = object.lane.saturating_add_signed(lane_offset).clamp(1, max_lane);
            placement
        });
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.hit_objects, &self.previous, |object, placement| {
            object.start_time = placement.start_time;
            object.end_time = placement.end_time;
            object.lane = placement.lane;
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::MoveHitObjects
    }
}

/// Changes where a long note ends. An end time of 0 turns it into a regular note and anything
/// else on a regular note turns it into a long note.
#[derive(Clone, Debug)]
pub struct LongNoteResize {
    id: Id<HitObject>,
    new_end: i32,
    old_end: Option<i32>,
}

impl LongNoteResize {
    pub fn new(id: Id<HitObject>, new_end: i32) -> Self {
        Self {
            id,
            new_end,
            old_end: None,
        }
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::LongNoteResized {
            id: self.id,
            old_end: self.old_end.unwrap_or(self.new_end),
            new_end: self.new_end,
        }
    }
}

impl MapCommand for LongNoteResize {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let new_end = self.new_end;
        self.old_end = map
            .hit_objects
            .update_one(self.id, |object| std::mem::replace(&mut object.end_time, new_end));
        if self.old_end.is_none() {
            warn!("tried to resize nonexistent hit object {:?}", self.id);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if let Some(old_end) = self.old_end {
            map.hit_objects
                .update_one(self.id, |object| object.end_time = old_end);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ResizeLongNote
    }
}
