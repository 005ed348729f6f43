use ahash::HashMap;
use rhythmedit_lib::{Color, GroupId, HitObject, HitSounds, Id, IdSet, Layer, WorkingMap};
use tracing::warn;

use crate::{
    ActionEvent, ActionKind, EventSink, IdList, MapCommand,
    ordered::{capture, restore},
};

fn id_list(ids: &[Id<HitObject>]) -> IdList<HitObject> {
    ids.iter().copied().collect()
}

/// Adds or removes hit sounds. Whatever each object had before is remembered, so undo restores
/// it exactly even when the sound was already there (or already gone).
#[derive(Clone, Debug)]
pub struct HitSoundChange {
    ids: Vec<Id<HitObject>>,
    sounds: HitSounds,
    is_removal: bool,
    previous: Vec<(Id<HitObject>, HitSounds)>,
}

impl HitSoundChange {
    pub fn addition(ids: Vec<Id<HitObject>>, sounds: HitSounds) -> Self {
        Self {
            ids,
            sounds,
            is_removal: false,
            previous: Vec::new(),
        }
    }
    pub fn removal(ids: Vec<Id<HitObject>>, sounds: HitSounds) -> Self {
        Self {
            is_removal: true,
            ..Self::addition(ids, sounds)
        }
    }

    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    fn event(&self) -> ActionEvent {
        let ids = id_list(&self.ids);
        if self.is_removal {
            ActionEvent::HitSoundsRemoved {
                ids,
                sounds: self.sounds,
            }
        } else {
            ActionEvent::HitSoundsAdded {
                ids,
                sounds: self.sounds,
            }
        }
    }
}

impl MapCommand for HitSoundChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let (sounds, is_removal) = (self.sounds, self.is_removal);
        self.previous = capture(&mut map.hit_objects, &self.ids, |object| {
            let previous = object.hit_sounds;
            object.hit_sounds.set(sounds, !is_removal);
            previous
        });
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.hit_objects, &self.previous, |object, &previous| {
            object.hit_sounds = previous;
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::RemoveHitSounds
        } else {
            ActionKind::AddHitSounds
        }
    }
}

/// Overrides the color hit objects are drawn with. `None` goes back to the layer's color.
#[derive(Clone, Debug)]
pub struct HitObjectColorChange {
    ids: Vec<Id<HitObject>>,
    color: Option<Color>,
    previous: Vec<(Id<HitObject>, Option<Color>)>,
}

impl HitObjectColorChange {
    pub fn new(ids: Vec<Id<HitObject>>, color: Option<Color>) -> Self {
        Self {
            ids,
            color,
            previous: Vec::new(),
        }
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::HitObjectColorChanged {
            ids: id_list(&self.ids),
            color: self.color,
        }
    }
}

impl MapCommand for HitObjectColorChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let color = self.color;
        self.previous = capture(&mut map.hit_objects, &self.ids, |object| {
            std::mem::replace(&mut object.color, color)
        });
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.hit_objects, &self.previous, |object, &previous| {
            object.color = previous;
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ChangeHitObjectColor
    }
}

/// Puts hit objects on a layer. `None` is the default layer.
#[derive(Clone, Debug)]
pub struct MoveToLayer {
    ids: Vec<Id<HitObject>>,
    layer: Option<Id<Layer>>,
    previous: Vec<(Id<HitObject>, Option<Id<Layer>>)>,
}

impl MoveToLayer {
    pub fn new(ids: Vec<Id<HitObject>>, layer: Option<Id<Layer>>) -> Self {
        Self {
            ids,
            layer,
            previous: Vec::new(),
        }
    }

    pub fn ids(&self) -> &[Id<HitObject>] {
        &self.ids
    }
    pub const fn layer(&self) -> Option<Id<Layer>> {
        self.layer
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::MovedToLayer {
            ids: id_list(&self.ids),
            layer: self.layer,
        }
    }
}

impl MapCommand for MoveToLayer {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        match self.layer {
            Some(layer) if !map.layers.has(layer) => {
                warn!("tried to move hit objects to nonexistent layer {layer:?}");
                self.previous.clear();
            }
            layer => {
                self.previous = capture(&mut map.hit_objects, &self.ids, |object| {
                    std::mem::replace(&mut object.layer, layer)
                });
            }
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.hit_objects, &self.previous, |object, &previous| {
            object.layer = previous;
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::MoveToLayer
    }
}

/// Puts hit objects in a timing group. `None` is the global group.
#[derive(Clone, Debug)]
pub struct MoveToTimingGroup {
    ids: Vec<Id<HitObject>>,
    group: Option<GroupId>,
    previous: Vec<(Id<HitObject>, Option<GroupId>)>,
}

impl MoveToTimingGroup {
    pub fn new(ids: Vec<Id<HitObject>>, group: Option<GroupId>) -> Self {
        Self {
            ids,
            group,
            previous: Vec::new(),
        }
    }

    pub fn ids(&self) -> &[Id<HitObject>] {
        &self.ids
    }
    pub fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::MovedToTimingGroup {
            ids: id_list(&self.ids),
            group: self.group.clone(),
        }
    }
}

impl MapCommand for MoveToTimingGroup {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        match &self.group {
            Some(group) if !map.timing_groups.contains_key(group) => {
                warn!("tried to move hit objects to nonexistent timing group {group}");
                self.previous.clear();
            }
            group => {
                self.previous = capture(&mut map.hit_objects, &self.ids, |object| {
                    std::mem::replace(&mut object.timing_group, group.clone())
                });
            }
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.hit_objects, &self.previous, |object, previous| {
            object.timing_group = previous.clone();
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::MoveToTimingGroup
    }
}

/// Snaps hit objects to the nearest `1 / divisor` beat of the timing point governing each one.
///
/// A long note whose tail would snap onto (or before) its head, or onto 0ms where it would stop
/// being a long note, keeps its original length instead. If even that lands on 0ms the hold isn't
/// snapped at all.
#[derive(Clone, Debug)]
pub struct Resnap {
    ids: Vec<Id<HitObject>>,
    divisor: u32,
    previous: Vec<(Id<HitObject>, (i32, i32))>,
}

impl Resnap {
    pub fn new(ids: Vec<Id<HitObject>>, divisor: u32) -> Self {
        Self {
            ids,
            divisor,
            previous: Vec::new(),
        }
    }

    fn snapped_times(&self, map: &WorkingMap) -> HashMap<Id<HitObject>, (i32, i32)> {
        let set: IdSet<HitObject> = self.ids.iter().copied().collect();
        map.hit_objects
            .iter()
            .filter(|object| set.contains(&object.id))
            .map(|object| {
                let start = map.snap_time(object.start_time, self.divisor);
                if !object.is_long_note() {
                    return (object.id, (start, object.end_time));
                }
                let length = object.end_time.saturating_sub(object.start_time);
                let end = [
                    map.snap_time(object.end_time, self.divisor),
                    start.saturating_add(length),
                ]
                .into_iter()
                .find(|&end| end > start && end != 0);
                match end {
                    Some(end) => (object.id, (start, end)),
                    None => (object.id, (object.start_time, object.end_time)),
                }
            })
            .collect()
    }
}

impl MapCommand for Resnap {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let snapped = self.snapped_times(map);
        self.previous = capture(&mut map.hit_objects, &self.ids, |object| {
            let (start, end) = snapped[&object.id];
            (
                std::mem::replace(&mut object.start_time, start),
                std::mem::replace(&mut object.end_time, end),
            )
        });
        events.push(ActionEvent::HitObjectsResnapped {
            ids: id_list(&self.ids),
            divisor: self.divisor,
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.hit_objects, &self.previous, |object, &(start, end)| {
            object.start_time = start;
            object.end_time = end;
        });
        events.push(ActionEvent::HitObjectsResnapped {
            ids: id_list(&self.ids),
            divisor: self.divisor,
        });
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ResnapHitObjects
    }
}
