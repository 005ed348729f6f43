use rhythmedit_lib::{Color, GroupId, HitObject, Id, IdSet, TimingGroup, WorkingMap};
use tracing::warn;

use crate::{ActionEvent, ActionKind, EventSink, MapCommand, hit_object::MoveToTimingGroup};

/// Creates or removes a timing group, along with its scroll velocities and speed factors.
///
/// Like layers, creating a group can pull hit objects into it, and removing one sends its hit
/// objects back to the global group first.
#[derive(Clone, Debug)]
pub struct TimingGroupAddOrRemove {
    id: GroupId,
    data: Option<TimingGroup>,
    cascade: Option<MoveToTimingGroup>,
    is_removal: bool,
}

impl TimingGroupAddOrRemove {
    pub fn addition(id: GroupId, group: TimingGroup, members: Vec<Id<HitObject>>) -> Self {
        Self {
            cascade: (!members.is_empty())
                .then(|| MoveToTimingGroup::new(members, Some(id.clone()))),
            id,
            data: Some(group),
            is_removal: false,
        }
    }
    pub fn removal(id: GroupId) -> Self {
        Self {
            id,
            data: None,
            cascade: None,
            is_removal: true,
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }
    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    fn insert(&mut self, map: &mut WorkingMap) -> bool {
        let Some(group) = self.data.take() else {
            return false;
        };
        assert!(
            map.timing_groups.insert(self.id.clone(), group).is_none(),
            "tried to insert already existing timing group {}",
            self.id
        );
        true
    }

    fn take(&mut self, map: &mut WorkingMap) {
        let group = map
            .timing_groups
            .remove(&self.id)
            .unwrap_or_else(|| panic!("tried to remove nonexistent timing group {}", self.id));
        self.data = Some(group);
    }

    fn empty_and_remove(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if !map.timing_groups.contains_key(&self.id) {
            warn!("tried to remove nonexistent timing group {}", self.id);
            self.cascade = None;
            return;
        }
        let mut cascade = MoveToTimingGroup::new(map.hit_objects_in_group(Some(&self.id)), None);
        cascade.execute(map, events);
        self.cascade = Some(cascade);
        self.take(map);
    }

    fn event(&self) -> ActionEvent {
        if self.is_removal {
            ActionEvent::TimingGroupRemoved(self.id.clone())
        } else {
            ActionEvent::TimingGroupCreated(self.id.clone())
        }
    }
}

impl MapCommand for TimingGroupAddOrRemove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.empty_and_remove(map, events);
        } else {
            assert!(
                self.insert(map),
                "execute() called on empty TimingGroupAddOrRemove"
            );
            if let Some(cascade) = &mut self.cascade {
                cascade.execute(map, events);
            }
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            if self.insert(map) {
                if let Some(cascade) = &mut self.cascade {
                    cascade.rollback(map, events);
                }
            }
        } else {
            if let Some(cascade) = &mut self.cascade {
                cascade.rollback(map, events);
            }
            self.take(map);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::RemoveTimingGroup
        } else {
            ActionKind::CreateTimingGroup
        }
    }
}

#[derive(Clone, Debug)]
pub struct TimingGroupColorChange {
    id: GroupId,
    color: Color,
}

impl TimingGroupColorChange {
    pub fn new(id: GroupId, color: Color) -> Self {
        Self { id, color }
    }

    /// Returns the color the group has after swapping.
    fn swap(&mut self, map: &mut WorkingMap) -> Option<Color> {
        let Some(group) = map.timing_groups.get_mut(&self.id) else {
            warn!("tried to recolor nonexistent timing group {}", self.id);
            return None;
        };
        std::mem::swap(&mut self.color, &mut group.color);
        Some(group.color)
    }
}

impl MapCommand for TimingGroupColorChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let new = self.swap(map).unwrap_or(self.color);
        events.push(ActionEvent::TimingGroupColorChanged {
            id: self.id.clone(),
            old: self.color,
            new,
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let old = self.swap(map).unwrap_or(self.color);
        events.push(ActionEvent::TimingGroupColorChanged {
            id: self.id.clone(),
            old,
            new: self.color,
        });
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ChangeTimingGroupColor
    }
}

/// Gives a timing group a new id and points its hit objects at it.
#[derive(Clone, Debug)]
pub struct TimingGroupRename {
    old_id: GroupId,
    new_id: GroupId,
    applied: bool,
}

impl TimingGroupRename {
    pub fn new(old_id: GroupId, new_id: GroupId) -> Self {
        Self {
            old_id,
            new_id,
            applied: false,
        }
    }

    fn rename(map: &mut WorkingMap, from: &GroupId, to: &GroupId) -> bool {
        if map.timing_groups.contains_key(to) {
            warn!("can't rename timing group {from} to {to}: {to} already exists");
            return false;
        }
        let Some(group) = map.timing_groups.remove(from) else {
            warn!("tried to rename nonexistent timing group {from}");
            return false;
        };
        map.timing_groups.insert(to.clone(), group);

        let members: IdSet<HitObject> = map
            .hit_objects_in_group(Some(from))
            .into_iter()
            .collect();
        map.hit_objects
            .update(&members, |object| object.timing_group = Some(to.clone()));
        true
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::TimingGroupRenamed {
            old: self.old_id.clone(),
            new: self.new_id.clone(),
        }
    }
}

impl MapCommand for TimingGroupRename {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.applied = Self::rename(map, &self.old_id, &self.new_id);
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.applied {
            Self::rename(map, &self.new_id, &self.old_id);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::RenameTimingGroup
    }
}
