use ahash::HashMap;
use anyhow::ensure;

use crate::{
    Bookmark, GroupId, HitObject, Id, IdMap, Layer, ScrollGroup, ScrollPoint, ScrollTarget,
    TimeOrdered, Timed, TimingGroup, TimingPoint,
};

/// The map being edited.
///
/// Everything in here is owned by a single editing session. Once an action manager owns the
/// session, every mutation goes through an action, so these fields are only ever written by
/// `rhythmedit-command`.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkingMap {
    /// Number of lanes. Lanes are numbered `1..=key_count`.
    pub key_count: u32,
    pub hit_objects: TimeOrdered<HitObject>,
    pub timing_points: TimeOrdered<TimingPoint>,
    /// Scroll velocities and speed factors of the global timing group.
    pub global_scroll: ScrollGroup,
    pub bookmarks: TimeOrdered<Bookmark>,
    pub layers: IdMap<Layer>,
    pub timing_groups: HashMap<GroupId, TimingGroup>,
    /// Where song select starts playing the audio, in milliseconds.
    pub preview_time: i32,
}

impl WorkingMap {
    pub fn new(key_count: u32) -> Self {
        Self {
            key_count,
            hit_objects: TimeOrdered::new(),
            timing_points: TimeOrdered::new(),
            global_scroll: ScrollGroup::new(),
            bookmarks: TimeOrdered::new(),
            layers: IdMap::new(),
            timing_groups: HashMap::default(),
            preview_time: 0,
        }
    }

    pub fn scroll_group(&self, group: Option<&GroupId>) -> Option<&ScrollGroup> {
        match group {
            None => Some(&self.global_scroll),
            Some(id) => self.timing_groups.get(id).map(|group| &group.scroll),
        }
    }
    pub fn scroll_group_mut(&mut self, group: Option<&GroupId>) -> Option<&mut ScrollGroup> {
        match group {
            None => Some(&mut self.global_scroll),
            Some(id) => self.timing_groups.get_mut(id).map(|group| &mut group.scroll),
        }
    }

    /// Every scroll group, global one first. Named groups come in no particular order.
    pub fn scroll_groups(&self) -> impl Iterator<Item = (Option<&GroupId>, &ScrollGroup)> {
        std::iter::once((None, &self.global_scroll)).chain(
            self.timing_groups
                .iter()
                .map(|(id, group)| (Some(id), &group.scroll)),
        )
    }

    /// Which scroll group currently holds the point, if any does.
    pub fn scroll_point_owner(
        &self,
        target: ScrollTarget,
        id: Id<ScrollPoint>,
    ) -> Option<Option<GroupId>> {
        self.scroll_groups()
            .find(|(_, group)| group.points(target).contains(id))
            .map(|(owner, _)| owner.cloned())
    }

    /// The timing point in effect at `time`. Before the first timing point, that's the first one.
    pub fn timing_point_at(&self, time: f64) -> Option<&TimingPoint> {
        self.timing_points
            .at_or_before(time)
            .or_else(|| self.timing_points.first())
    }

    /// Snaps `time` to the nearest `1 / divisor` beat of whatever timing point governs it.
    pub fn snap_time(&self, time: i32, divisor: u32) -> i32 {
        match self.timing_point_at(time as f64) {
            Some(point) => point.snap(time, divisor),
            None => time,
        }
    }

    pub fn hit_objects_in_layer(&self, layer: Option<Id<Layer>>) -> Vec<Id<HitObject>> {
        self.hit_objects
            .iter()
            .filter(|object| object.layer == layer)
            .map(|object| object.id)
            .collect()
    }

    pub fn hit_objects_in_group(&self, group: Option<&GroupId>) -> Vec<Id<HitObject>> {
        self.hit_objects
            .iter()
            .filter(|object| object.timing_group.as_ref() == group)
            .map(|object| object.id)
            .collect()
    }

    /// Checks the invariants every action has to preserve: all time-keyed sequences are sorted,
    /// every hit object sits in a lane that exists, and every hit object points at a layer and
    /// timing group that exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        fn check_sorted<T: Timed>(what: &str, ordered: &TimeOrdered<T>) -> anyhow::Result<()> {
            ensure!(ordered.is_sorted(), "{what} are not sorted by start time");
            Ok(())
        }

        check_sorted("hit objects", &self.hit_objects)?;
        check_sorted("timing points", &self.timing_points)?;
        check_sorted("bookmarks", &self.bookmarks)?;
        for (owner, group) in self.scroll_groups() {
            let name = owner.map_or("$global", GroupId::as_str);
            check_sorted(&format!("scroll velocities of {name}"), &group.velocities)?;
            check_sorted(&format!("scroll speed factors of {name}"), &group.speed_factors)?;
        }

        for object in &self.hit_objects {
            ensure!(
                (1..=self.key_count).contains(&object.lane),
                "hit object {:?} at {}ms is in lane {} of a {}K map",
                object.id,
                object.start_time,
                object.lane,
                self.key_count
            );
            if let Some(layer) = object.layer {
                ensure!(
                    self.layers.has(layer),
                    "hit object {:?} at {}ms references nonexistent layer {layer:?}",
                    object.id,
                    object.start_time
                );
            }
            if let Some(group) = &object.timing_group {
                ensure!(
                    self.timing_groups.contains_key(group),
                    "hit object {:?} at {}ms references nonexistent timing group {group}",
                    object.id,
                    object.start_time
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn empty_map_is_valid() {
        WorkingMap::new(4).validate().unwrap();
    }

    #[test]
    fn lane_outside_key_count_is_invalid() {
        let mut map = WorkingMap::new(4);
        map.hit_objects.insert(HitObject::note(0, 4));
        map.validate().unwrap();

        map.hit_objects.insert(HitObject::note(100, 0));
        let err = map.validate().unwrap_err();
        assert!(err.to_string().contains("lane 0 of a 4K map"), "{err}");
    }

    #[test]
    fn dangling_layer_is_invalid() {
        let mut map = WorkingMap::new(4);
        let mut object = HitObject::note(0, 1);
        object.layer = Some(Id::arbitrary());
        map.hit_objects.insert(object);

        let err = map.validate().unwrap_err();
        assert!(err.to_string().contains("nonexistent layer"), "{err}");
    }

    #[test]
    fn dangling_timing_group_is_invalid() {
        let mut map = WorkingMap::new(4);
        let mut object = HitObject::note(0, 1);
        object.timing_group = Some(GroupId::new("G1"));
        map.hit_objects.insert(object);
        assert!(map.validate().is_err());

        map.timing_groups
            .insert(GroupId::new("G1"), TimingGroup::new(Color::WHITE));
        map.validate().unwrap();
    }

    #[test]
    fn scroll_point_owner() {
        let mut map = WorkingMap::new(4);
        let group_id = GroupId::new("G1");
        let mut group = TimingGroup::new(Color::WHITE);
        let point = ScrollPoint::new(100.0, 2.0);
        let point_id = point.id;
        group.scroll.velocities.insert(point);
        map.timing_groups.insert(group_id.clone(), group);

        assert_eq!(
            map.scroll_point_owner(ScrollTarget::Velocity, point_id),
            Some(Some(group_id))
        );
        assert_eq!(
            map.scroll_point_owner(ScrollTarget::SpeedFactor, point_id),
            None
        );
    }

    #[test]
    fn snap_uses_governing_timing_point() {
        let mut map = WorkingMap::new(4);
        assert_eq!(map.snap_time(123, 4), 123);

        map.timing_points.insert(TimingPoint::new(0.0, 120.0));
        map.timing_points.insert(TimingPoint::new(1000.0, 60.0));
        // 120 bpm: 500ms beats
        assert_eq!(map.snap_time(740, 1), 500);
        // 60 bpm from 1000ms: 1000ms beats
        assert_eq!(map.snap_time(1740, 1), 2000);
        assert_eq!(map.snap_time(1240, 1), 1000);
    }
}
