#![allow(dead_code)]

use rhythmedit_command::{ActionManager, EditorAction, HistoryConfig};
use rhythmedit_lib::{
    Bookmark, Color, GroupId, HitObject, HitSounds, Id, Layer, ScrollPoint, TimingGroup,
    TimingPoint, WorkingMap,
};

pub fn kicks() -> Id<Layer> {
    Id::new("Kicks")
}
pub fn drums() -> Id<Layer> {
    Id::new("Drums")
}
pub fn verse() -> GroupId {
    GroupId::new("Verse")
}

/// A small 4K map with a bit of everything: two timing points, two layers, a named timing
/// group with its own SVs, global SVs and SSFs, bookmarks, a hold note and two notes on the same
/// timestamp.
pub fn sample_map() -> WorkingMap {
    let mut map = WorkingMap::new(4);
    map.preview_time = 1200;

    map.timing_points
        .insert_batch([TimingPoint::new(0.0, 120.0), TimingPoint::new(1000.0, 140.0)]);

    map.layers
        .insert(kicks(), Layer::new("Kicks", Color::rgb(200, 60, 60)));
    map.layers
        .insert(drums(), Layer::new("Drums", Color::rgb(60, 60, 200)));

    let mut group = TimingGroup::new(Color::rgb(60, 200, 60));
    group
        .scroll
        .velocities
        .insert_batch([ScrollPoint::new(0.0, 1.0), ScrollPoint::new(2400.0, 0.75)]);
    map.timing_groups.insert(verse(), group);

    map.global_scroll
        .velocities
        .insert_batch([ScrollPoint::new(0.0, 1.0), ScrollPoint::new(1500.0, 2.0)]);
    map.global_scroll
        .speed_factors
        .insert(ScrollPoint::new(800.0, 1.25));

    let mut kick = HitObject::note(1000, 1);
    kick.layer = Some(kicks());
    kick.hit_sounds = HitSounds::FINISH;
    let hold = HitObject::long_note(1500, 2000, 2);
    let mut snare = HitObject::note(2000, 3);
    snare.layer = Some(drums());
    snare.hit_sounds = HitSounds::CLAP;
    let mut in_verse = HitObject::note(2500, 4);
    in_verse.timing_group = Some(verse());
    let mut second_kick = HitObject::note(3000, 1);
    second_kick.layer = Some(kicks());
    let chord = HitObject::note(3000, 4);
    map.hit_objects
        .insert_batch([kick, hold, snare, in_verse, second_kick, chord]);

    map.bookmarks
        .insert_batch([Bookmark::new(500, "intro"), Bookmark::new(2500, "verse")]);

    map.validate().expect("sample map is invalid");
    map
}

pub fn manager() -> ActionManager {
    ActionManager::with_config(sample_map(), HistoryConfig::new().set_validate(true))
}

pub fn all_hit_objects(map: &WorkingMap) -> Vec<Id<HitObject>> {
    map.hit_objects.ids().collect()
}

pub fn hit_objects_at(map: &WorkingMap, time: i32) -> Vec<Id<HitObject>> {
    map.hit_objects
        .iter()
        .filter(|object| object.start_time == time)
        .map(|object| object.id)
        .collect()
}

pub fn hold_note(map: &WorkingMap) -> Id<HitObject> {
    map.hit_objects
        .iter()
        .find(|object| object.is_long_note())
        .map(|object| object.id)
        .expect("sample map has a hold note")
}

/// Performs `action` on the sample map, then checks that undo restores the map, redo gets back to
/// exactly what perform produced, and undo works again after that. Returns the manager with the
/// action undone.
pub fn assert_round_trip(action: impl Into<EditorAction>) -> ActionManager {
    let mut manager = manager();
    assert_round_trip_on(&mut manager, action);
    manager
}

pub fn assert_round_trip_on(manager: &mut ActionManager, action: impl Into<EditorAction>) {
    let before = manager.map().clone();

    manager.perform(action);
    manager.map().validate().unwrap();
    let after = manager.map().clone();

    assert!(manager.undo());
    assert_eq!(*manager.map(), before, "undo didn't restore the map");
    assert!(manager.redo());
    assert_eq!(*manager.map(), after, "redo didn't reproduce perform");
    assert!(manager.undo());
    assert_eq!(*manager.map(), before, "second undo didn't restore the map");
}
