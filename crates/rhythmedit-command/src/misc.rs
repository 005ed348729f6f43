use rhythmedit_lib::{Bookmark, GroupId, HitObject, Id, ScrollPoint, ScrollTarget, TimingPoint, WorkingMap};

use crate::{
    ActionEvent, ActionKind, Composite, EventSink, MapCommand, bookmark::BookmarkOffsetBatch,
    hit_object::HitObjectMove, scroll::ScrollPointOffsetBatch,
    timing_point::TimingPointOffsetBatch,
};

#[derive(Clone, Debug)]
pub struct PreviewTimeChange {
    time: i32,
}

impl PreviewTimeChange {
    pub fn new(time: i32) -> Self {
        Self { time }
    }
}

impl MapCommand for PreviewTimeChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        std::mem::swap(&mut self.time, &mut map.preview_time);
        events.push(ActionEvent::PreviewTimeChanged {
            old: self.time,
            new: map.preview_time,
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        std::mem::swap(&mut self.time, &mut map.preview_time);
        events.push(ActionEvent::PreviewTimeChanged {
            old: map.preview_time,
            new: self.time,
        });
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ChangePreviewTime
    }
}

/// Everything a global offset touches, as of the first time it ran.
#[derive(Clone, Debug)]
struct OffsetTargets {
    hit_objects: Vec<Id<HitObject>>,
    timing_points: Vec<Id<TimingPoint>>,
    scroll_points: Vec<(ScrollTarget, Option<GroupId>, Vec<Id<ScrollPoint>>)>,
    bookmarks: Vec<Id<Bookmark>>,
}

impl OffsetTargets {
    fn capture(map: &WorkingMap) -> Self {
        let mut scroll_points = Vec::new();
        for (group, scroll) in map.scroll_groups() {
            for target in [ScrollTarget::Velocity, ScrollTarget::SpeedFactor] {
                let points = scroll.points(target);
                if !points.is_empty() {
                    scroll_points.push((target, group.cloned(), points.ids().collect()));
                }
            }
        }

        Self {
            hit_objects: map.hit_objects.ids().collect(),
            timing_points: map.timing_points.ids().collect(),
            scroll_points,
            bookmarks: map.bookmarks.ids().collect(),
        }
    }

    fn steps(&self, map: &WorkingMap, offset: i32) -> Composite {
        let mut steps = Composite::default()
            .with(HitObjectMove::offset(self.hit_objects.clone(), offset))
            .with(TimingPointOffsetBatch::new(
                self.timing_points.clone(),
                offset as f32,
            ));
        for (target, group, ids) in &self.scroll_points {
            steps.push(ScrollPointOffsetBatch::new(
                *target,
                group.clone(),
                ids.clone(),
                offset as f32,
            ));
        }
        steps
            .with(PreviewTimeChange::new(map.preview_time.saturating_add(offset)))
            .with(BookmarkOffsetBatch::new(self.bookmarks.clone(), offset))
    }
}

/// Shifts the whole map in time: hit objects, timing points, every SV and SSF, bookmarks and
/// the preview time.
///
/// What gets shifted is decided the first time it runs. Undo rolls back the steps that ran, in
/// reverse, so holds whose tail lands on 0ms and offsets that saturate still come back exactly.
#[derive(Clone, Debug)]
pub struct GlobalOffset {
    offset: i32,
    targets: Option<OffsetTargets>,
    applied: Option<Composite>,
}

impl GlobalOffset {
    pub fn new(offset: i32) -> Self {
        Self {
            offset,
            targets: None,
            applied: None,
        }
    }
}

impl MapCommand for GlobalOffset {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let targets = self
            .targets
            .get_or_insert_with(|| OffsetTargets::capture(map));
        let mut steps = targets.steps(map, self.offset);
        steps.execute_steps(map, events);
        self.applied = Some(steps);
        events.push(ActionEvent::OffsetApplied {
            offset: self.offset,
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.applied
            .take()
            .expect("rollback() called on GlobalOffset that never ran")
            .rollback_steps(map, events);
        events.push(ActionEvent::OffsetApplied {
            offset: self.offset,
        });
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ApplyOffset
    }
}
