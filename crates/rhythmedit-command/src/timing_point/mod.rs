use rhythmedit_lib::{Id, TimingPoint, WorkingMap};

use crate::{
    ActionEvent, ActionKind, EventSink, IdList, MapCommand,
    ordered::{Batch, capture, restore, update_existing},
};

#[derive(Clone, Debug)]
pub struct TimingPointAddOrRemove {
    batch: Batch<TimingPoint>,
    is_removal: bool,
}

impl TimingPointAddOrRemove {
    pub fn addition(points: Vec<TimingPoint>) -> Self {
        Self {
            batch: Batch::with_data(points),
            is_removal: false,
        }
    }
    pub fn removal(ids: Vec<Id<TimingPoint>>) -> Self {
        Self {
            batch: Batch::with_ids(ids),
            is_removal: true,
        }
    }

    pub fn ids(&self) -> &[Id<TimingPoint>] {
        self.batch.ids()
    }
    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    fn event(&self) -> ActionEvent {
        if self.is_removal {
            ActionEvent::TimingPointsRemoved(self.batch.id_list())
        } else {
            ActionEvent::TimingPointsAdded(self.batch.id_list())
        }
    }
}

impl MapCommand for TimingPointAddOrRemove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.batch.remove_from(&mut map.timing_points);
        } else {
            self.batch.add_to(&mut map.timing_points);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.batch.add_to(&mut map.timing_points);
        } else {
            self.batch.remove_from(&mut map.timing_points);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::RemoveTimingPoints
        } else {
            ActionKind::AddTimingPoints
        }
    }
}

/// Shifts timing points by `offset` milliseconds. Undo shifts them back by the same amount, which
/// is exact as long as times and offsets stay whole milliseconds.
#[derive(Clone, Debug)]
pub struct TimingPointOffsetBatch {
    ids: Vec<Id<TimingPoint>>,
    offset: f32,
}

impl TimingPointOffsetBatch {
    pub fn new(ids: Vec<Id<TimingPoint>>, offset: f32) -> Self {
        Self { ids, offset }
    }

    fn shift(&self, map: &mut WorkingMap, offset: f32) {
        update_existing(&mut map.timing_points, &self.ids, |point| {
            point.start_time += offset;
        });
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::TimingPointsShifted {
            ids: self.ids.iter().copied().collect(),
            offset: self.offset,
        }
    }
}

impl MapCommand for TimingPointOffsetBatch {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.shift(map, self.offset);
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.shift(map, -self.offset);
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ChangeTimingPointOffsetBatch
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum TimingPointProperty {
    StartTime(f32),
    Bpm(f32),
    Signature(u32),
    Hidden(bool),
}

impl TimingPointProperty {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::StartTime(_) => ActionKind::ChangeTimingPointStartTime,
            Self::Bpm(_) => ActionKind::ChangeTimingPointBpm,
            Self::Signature(_) => ActionKind::ChangeTimingPointSignature,
            Self::Hidden(_) => ActionKind::ChangeTimingPointHidden,
        }
    }

    /// Writes this value into `point` and returns the one it replaced.
    fn apply(self, point: &mut TimingPoint) -> Self {
        match self {
            Self::StartTime(time) => Self::StartTime(std::mem::replace(&mut point.start_time, time)),
            Self::Bpm(bpm) => Self::Bpm(std::mem::replace(&mut point.bpm, bpm)),
            Self::Signature(signature) => {
                Self::Signature(std::mem::replace(&mut point.signature, signature))
            }
            Self::Hidden(hidden) => Self::Hidden(std::mem::replace(&mut point.hidden, hidden)),
        }
    }
}

/// Sets one property to the same value on every selected timing point.
#[derive(Clone, Debug)]
pub struct TimingPointChange {
    ids: Vec<Id<TimingPoint>>,
    change: TimingPointProperty,
    previous: Vec<(Id<TimingPoint>, TimingPointProperty)>,
}

impl TimingPointChange {
    pub fn new(ids: Vec<Id<TimingPoint>>, change: TimingPointProperty) -> Self {
        Self {
            ids,
            change,
            previous: Vec::new(),
        }
    }

    fn event(&self) -> ActionEvent {
        let (ids, previous): (IdList<TimingPoint>, Vec<_>) = self.previous.iter().copied().unzip();
        ActionEvent::TimingPointsChanged {
            ids,
            change: self.change,
            previous,
        }
    }
}

impl MapCommand for TimingPointChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let change = self.change;
        self.previous = capture(&mut map.timing_points, &self.ids, |point| change.apply(point));
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.timing_points, &self.previous, |point, &previous| {
            previous.apply(point);
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        self.change.kind()
    }
}
