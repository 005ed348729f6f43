//! Actions on scroll velocities (SV) and scroll speed factors (SSF).
//!
//! Both live in a [`ScrollGroup`](rhythmedit_lib::ScrollGroup) owned by either the global
//! timing group (`group: None`) or a named one, and every action here is told which sequence
//! ([`ScrollTarget`]) of which group it works on.

use ahash::HashMap;
use rhythmedit_lib::{GroupId, Id, IdSet, LaneMask, ScrollPoint, ScrollTarget, TimeOrdered, WorkingMap};
use tracing::warn;

use crate::{
    ActionEvent, ActionKind, EventSink, IdList, MapCommand,
    ordered::{Batch, capture, restore, update_existing},
};

fn points_mut<'a>(
    map: &'a mut WorkingMap,
    target: ScrollTarget,
    group: Option<&GroupId>,
) -> Option<&'a mut TimeOrdered<ScrollPoint>> {
    match map.scroll_group_mut(group) {
        Some(scroll) => Some(scroll.points_mut(target)),
        None => {
            warn!(
                "timing group {} doesn't exist",
                group.map_or("$global", GroupId::as_str)
            );
            None
        }
    }
}

fn id_list(ids: &[Id<ScrollPoint>]) -> IdList<ScrollPoint> {
    ids.iter().copied().collect()
}

#[derive(Clone, Debug)]
pub struct ScrollPointAddOrRemove {
    target: ScrollTarget,
    group: Option<GroupId>,
    batch: Batch<ScrollPoint>,
    is_removal: bool,
}

impl ScrollPointAddOrRemove {
    pub fn addition(target: ScrollTarget, group: Option<GroupId>, points: Vec<ScrollPoint>) -> Self {
        Self {
            target,
            group,
            batch: Batch::with_data(points),
            is_removal: false,
        }
    }
    pub fn removal(
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: Vec<Id<ScrollPoint>>,
    ) -> Self {
        Self {
            target,
            group,
            batch: Batch::with_ids(ids),
            is_removal: true,
        }
    }

    pub fn ids(&self) -> &[Id<ScrollPoint>] {
        self.batch.ids()
    }
    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    fn execute_add(&mut self, map: &mut WorkingMap) {
        if let Some(points) = points_mut(map, self.target, self.group.as_ref()) {
            self.batch.add_to(points);
        }
    }
    fn execute_remove(&mut self, map: &mut WorkingMap) {
        if let Some(points) = points_mut(map, self.target, self.group.as_ref()) {
            self.batch.remove_from(points);
        }
    }

    fn event(&self) -> ActionEvent {
        let (target, group, ids) = (self.target, self.group.clone(), self.batch.id_list());
        if self.is_removal {
            ActionEvent::ScrollPointsRemoved { target, group, ids }
        } else {
            ActionEvent::ScrollPointsAdded { target, group, ids }
        }
    }
}

impl MapCommand for ScrollPointAddOrRemove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.execute_remove(map);
        } else {
            self.execute_add(map);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.execute_add(map);
        } else {
            self.execute_remove(map);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::scroll(
                self.target,
                ActionKind::RemoveScrollVelocities,
                ActionKind::RemoveScrollSpeedFactors,
            )
        } else {
            ActionKind::scroll(
                self.target,
                ActionKind::AddScrollVelocities,
                ActionKind::AddScrollSpeedFactors,
            )
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScrollPointOffsetBatch {
    target: ScrollTarget,
    group: Option<GroupId>,
    ids: Vec<Id<ScrollPoint>>,
    offset: f32,
}

impl ScrollPointOffsetBatch {
    pub fn new(
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: Vec<Id<ScrollPoint>>,
        offset: f32,
    ) -> Self {
        Self {
            target,
            group,
            ids,
            offset,
        }
    }

    fn shift(&self, map: &mut WorkingMap, offset: f32) {
        if let Some(points) = points_mut(map, self.target, self.group.as_ref()) {
            update_existing(points, &self.ids, |point| point.start_time += offset);
        }
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::ScrollPointsShifted {
            target: self.target,
            group: self.group.clone(),
            ids: id_list(&self.ids),
            offset: self.offset,
        }
    }
}

impl MapCommand for ScrollPointOffsetBatch {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.shift(map, self.offset);
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.shift(map, -self.offset);
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::scroll(
            self.target,
            ActionKind::ChangeScrollVelocityOffsetBatch,
            ActionKind::ChangeScrollSpeedFactorOffsetBatch,
        )
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum ScrollPointProperty {
    StartTime(f32),
    Multiplier(f32),
    LaneMask(Option<LaneMask>),
}

impl ScrollPointProperty {
    /// Writes this value into `point` and returns the one it replaced.
    fn apply(self, point: &mut ScrollPoint) -> Self {
        match self {
            Self::StartTime(time) => Self::StartTime(std::mem::replace(&mut point.start_time, time)),
            Self::Multiplier(multiplier) => {
                Self::Multiplier(std::mem::replace(&mut point.multiplier, multiplier))
            }
            Self::LaneMask(mask) => Self::LaneMask(std::mem::replace(&mut point.lane_mask, mask)),
        }
    }
}

/// Sets one property to the same value on every selected point.
#[derive(Clone, Debug)]
pub struct ScrollPointChange {
    target: ScrollTarget,
    group: Option<GroupId>,
    ids: Vec<Id<ScrollPoint>>,
    change: ScrollPointProperty,
    previous: Vec<(Id<ScrollPoint>, ScrollPointProperty)>,
}

impl ScrollPointChange {
    pub fn new(
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: Vec<Id<ScrollPoint>>,
        change: ScrollPointProperty,
    ) -> Self {
        Self {
            target,
            group,
            ids,
            change,
            previous: Vec::new(),
        }
    }

    fn event(&self) -> ActionEvent {
        let (ids, previous) = self.previous.iter().copied().unzip();
        ActionEvent::ScrollPointsChanged {
            target: self.target,
            group: self.group.clone(),
            ids,
            change: self.change,
            previous,
        }
    }
}

impl MapCommand for ScrollPointChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let change = self.change;
        self.previous = match points_mut(map, self.target, self.group.as_ref()) {
            Some(points) => capture(points, &self.ids, |point| change.apply(point)),
            None => Vec::new(),
        };
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if let Some(points) = points_mut(map, self.target, self.group.as_ref()) {
            restore(points, &self.previous, |point, &previous| {
                previous.apply(point);
            });
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::scroll(
            self.target,
            ActionKind::ChangeScrollVelocities,
            ActionKind::ChangeScrollSpeedFactors,
        )
    }
}

/// Moves points into another timing group's sequence. The points can come from any group,
/// including the destination (those are left alone).
#[derive(Clone, Debug)]
pub struct ScrollPointMoveToGroup {
    target: ScrollTarget,
    ids: Vec<Id<ScrollPoint>>,
    group: Option<GroupId>,
    previous: Vec<(Id<ScrollPoint>, Option<GroupId>)>,
}

impl ScrollPointMoveToGroup {
    pub fn new(target: ScrollTarget, ids: Vec<Id<ScrollPoint>>, group: Option<GroupId>) -> Self {
        Self {
            target,
            ids,
            group,
            previous: Vec::new(),
        }
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::ScrollPointsMovedToGroup {
            target: self.target,
            ids: id_list(&self.ids),
            group: self.group.clone(),
        }
    }
}

impl MapCommand for ScrollPointMoveToGroup {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.previous.clear();
        if points_mut(map, self.target, self.group.as_ref()).is_none() {
            events.push(self.event());
            return;
        }

        let mut moving = Vec::new();
        for &id in &self.ids {
            match map.scroll_point_owner(self.target, id) {
                None => warn!("tried to move nonexistent scroll point {id:?}"),
                Some(owner) if owner == self.group => {}
                Some(owner) => {
                    let point = points_mut(map, self.target, owner.as_ref())
                        .and_then(|points| points.remove(id))
                        .expect("owner of scroll point disappeared");
                    moving.push(point);
                    self.previous.push((id, owner));
                }
            }
        }
        if let Some(destination) = points_mut(map, self.target, self.group.as_ref()) {
            destination.insert_batch(moving);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let ids: IdSet<ScrollPoint> = self.previous.iter().map(|(id, _)| *id).collect();
        let moved = match points_mut(map, self.target, self.group.as_ref()) {
            Some(destination) => destination.remove_batch(&ids),
            None => Vec::new(),
        };

        let owners: HashMap<_, _> = self.previous.iter().cloned().collect();
        for point in moved {
            let owner = &owners[&point.id];
            if let Some(points) = points_mut(map, self.target, owner.as_ref()) {
                points.insert(point);
            }
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::scroll(
            self.target,
            ActionKind::MoveScrollVelocitiesToGroup,
            ActionKind::MoveScrollSpeedFactorsToGroup,
        )
    }
}

#[cfg(test)]
mod tests {
    use rhythmedit_lib::{Color, TimingGroup};

    use super::*;

    fn map_with_group(name: &str) -> (WorkingMap, GroupId) {
        let mut map = WorkingMap::new(4);
        let group = GroupId::new(name);
        map.timing_groups
            .insert(group.clone(), TimingGroup::new(Color::WHITE));
        (map, group)
    }

    #[test]
    fn add_to_missing_group_is_a_noop() {
        let mut map = WorkingMap::new(4);
        let before = map.clone();
        let mut events = EventSink::new();

        let mut action = ScrollPointAddOrRemove::addition(
            ScrollTarget::Velocity,
            Some(GroupId::new("missing")),
            vec![ScrollPoint::new(0.0, 1.5)],
        );
        action.execute(&mut map, &mut events);
        assert_eq!(map, before);
        action.rollback(&mut map, &mut events);
        assert_eq!(map, before);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn speed_factors_and_velocities_are_separate() {
        let (mut map, group) = map_with_group("G1");
        let mut events = EventSink::new();
        let point = ScrollPoint::new(100.0, 0.5);
        let id = point.id;

        let mut action =
            ScrollPointAddOrRemove::addition(ScrollTarget::SpeedFactor, Some(group.clone()), vec![point]);
        action.execute(&mut map, &mut events);
        assert_eq!(action.kind(), ActionKind::AddScrollSpeedFactors);

        let scroll = &map.timing_groups[&group].scroll;
        assert!(scroll.speed_factors.contains(id));
        assert!(scroll.velocities.is_empty());
        assert!(map.global_scroll.speed_factors.is_empty());
    }

    #[test]
    fn change_lane_mask() {
        let mut map = WorkingMap::new(4);
        let point = ScrollPoint::new(0.0, 1.0);
        let id = point.id;
        map.global_scroll.velocities.insert(point);
        let before = map.clone();
        let mut events = EventSink::new();

        let mask = LaneMask::from_lanes([1, 2]);
        let mut action = ScrollPointChange::new(
            ScrollTarget::Velocity,
            None,
            vec![id],
            ScrollPointProperty::LaneMask(Some(mask)),
        );
        action.execute(&mut map, &mut events);
        assert_eq!(map.global_scroll.velocities.get(id).unwrap().lane_mask, Some(mask));
        action.rollback(&mut map, &mut events);
        assert_eq!(map, before);
    }

    #[test]
    fn move_between_groups_and_back() {
        let (mut map, group) = map_with_group("G1");
        let global = ScrollPoint::new(0.0, 1.0);
        let grouped = ScrollPoint::new(50.0, 2.0);
        let ids = vec![global.id, grouped.id];
        map.global_scroll.velocities.insert(global);
        map.timing_groups
            .get_mut(&group)
            .unwrap()
            .scroll
            .velocities
            .insert(grouped);
        let other = GroupId::new("G2");
        map.timing_groups
            .insert(other.clone(), TimingGroup::new(Color::WHITE));
        let before = map.clone();
        let mut events = EventSink::new();

        let mut action = ScrollPointMoveToGroup::new(ScrollTarget::Velocity, ids, Some(other.clone()));
        action.execute(&mut map, &mut events);
        assert_eq!(map.timing_groups[&other].scroll.velocities.len(), 2);
        assert!(map.global_scroll.velocities.is_empty());
        assert!(map.timing_groups[&group].scroll.velocities.is_empty());

        action.rollback(&mut map, &mut events);
        assert_eq!(map, before);
    }
}
