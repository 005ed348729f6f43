//! Every action family undoes back to the map it started from and redoes to exactly what the
//! first perform produced.

mod common;

use rhythmedit_command::{
    Composite,
    bookmark::{BookmarkAddOrRemove, BookmarkEdit, BookmarkOffsetBatch},
    hit_object::{
        FlipLanes, HitObjectAddOrRemove, HitObjectColorChange, HitObjectMove, HitSoundChange, LongNoteResize,
        MoveToLayer, MoveToTimingGroup, Resnap, ReverseHitObjects, SwapLanes,
    },
    layer::{LayerAddOrRemove, LayerChange, LayerMerge},
    misc::{GlobalOffset, PreviewTimeChange},
    scroll::{
        ScrollPointAddOrRemove, ScrollPointChange, ScrollPointMoveToGroup, ScrollPointOffsetBatch,
        ScrollPointProperty,
    },
    timing_group::{TimingGroupAddOrRemove, TimingGroupColorChange, TimingGroupRename},
    timing_point::{TimingPointAddOrRemove, TimingPointChange, TimingPointOffsetBatch, TimingPointProperty},
};
use rhythmedit_lib::{
    Bookmark, Color, GroupId, HitObject, HitSounds, Id, LaneMask, Layer, ScrollPoint,
    ScrollTarget, TimingGroup, TimingPoint, WorkingMap,
};

const TARGETS: [ScrollTarget; 2] = [ScrollTarget::Velocity, ScrollTarget::SpeedFactor];

fn scroll_ids(map: &WorkingMap, target: ScrollTarget, group: Option<&GroupId>) -> Vec<Id<ScrollPoint>> {
    map.scroll_group(group)
        .map(|group| group.points(target).ids().collect())
        .unwrap_or_default()
}

#[test]
fn hit_objects() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    let all = common::all_hit_objects(&map);
    let hold = common::hold_note(&map);

    common::assert_round_trip_on(&mut manager, HitObjectAddOrRemove::addition(vec![
        HitObject::note(1000, 2),
        HitObject::long_note(3500, 4000, 3),
    ]));
    common::assert_round_trip_on(&mut manager, HitObjectAddOrRemove::removal(all.clone()));
    common::assert_round_trip_on(&mut manager, HitObjectAddOrRemove::removal(vec![hold]));
    // everything collapsing onto one timestamp still orders deterministically
    common::assert_round_trip_on(&mut manager, HitObjectMove::new(all.clone(), -700, 1));
    common::assert_round_trip_on(&mut manager, HitObjectMove::offset(vec![hold], 1000));
    common::assert_round_trip_on(&mut manager, LongNoteResize::new(hold, 2750));
    common::assert_round_trip_on(&mut manager, FlipLanes::new(all.clone()));
    common::assert_round_trip_on(&mut manager, SwapLanes::new(all.clone(), 1, 4));
    common::assert_round_trip_on(&mut manager, ReverseHitObjects::new(all.clone()));
    common::assert_round_trip_on(&mut manager, Resnap::new(all.clone(), 3));
    common::assert_round_trip_on(&mut manager, HitSoundChange::addition(all.clone(), HitSounds::WHISTLE));
    common::assert_round_trip_on(&mut manager, HitSoundChange::removal(all.clone(), HitSounds::CLAP));
    common::assert_round_trip_on(&mut manager, HitObjectColorChange::new(all.clone(), Some(Color::WHITE)));
    common::assert_round_trip_on(&mut manager, HitObjectColorChange::new(all.clone(), None));
    common::assert_round_trip_on(&mut manager, MoveToLayer::new(all.clone(), Some(common::drums())));
    common::assert_round_trip_on(&mut manager, MoveToLayer::new(all.clone(), None));
    common::assert_round_trip_on(&mut manager, MoveToTimingGroup::new(all.clone(), Some(common::verse())));
    common::assert_round_trip_on(&mut manager, MoveToTimingGroup::new(all, None));
}

#[test]
fn swap_lanes_only_touches_the_two_lanes() {
    let mut manager = common::manager();
    let all = common::all_hit_objects(manager.map());
    let snare = common::hit_objects_at(manager.map(), 2000)[0];

    manager.perform(SwapLanes::new(all, 1, 4));
    let lanes: Vec<_> = manager.map().hit_objects.iter().map(|o| o.lane).collect();
    assert_eq!(manager.map().hit_objects.get(snare).unwrap().lane, 3);
    assert_eq!(lanes.iter().filter(|&&lane| lane == 1).count(), 2);
    assert_eq!(lanes.iter().filter(|&&lane| lane == 4).count(), 2);
}

#[test]
fn resizing_a_plain_note_makes_a_hold() {
    let mut manager = common::manager();
    let before = manager.map().clone();
    let kick = common::hit_objects_at(manager.map(), 1000)[0];

    manager.perform(LongNoteResize::new(kick, 1200));
    assert!(manager.map().hit_objects.get(kick).unwrap().is_long_note());
    manager.undo();
    assert!(!manager.map().hit_objects.get(kick).unwrap().is_long_note());
    assert_eq!(*manager.map(), before);
}

#[test]
fn timing_points() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    let ids: Vec<_> = map.timing_points.ids().collect();

    common::assert_round_trip_on(&mut manager, TimingPointAddOrRemove::addition(vec![TimingPoint::new(
        2000.0, 180.0,
    )]));
    common::assert_round_trip_on(&mut manager, TimingPointAddOrRemove::removal(ids.clone()));
    common::assert_round_trip_on(&mut manager, TimingPointOffsetBatch::new(ids.clone(), 12.5));
    common::assert_round_trip_on(&mut manager, TimingPointChange::new(
        vec![ids[0]],
        TimingPointProperty::StartTime(1500.0),
    ));
    common::assert_round_trip_on(&mut manager, TimingPointChange::new(
        ids.clone(),
        TimingPointProperty::Bpm(200.0),
    ));
    common::assert_round_trip_on(&mut manager, TimingPointChange::new(
        ids.clone(),
        TimingPointProperty::Signature(3),
    ));
    common::assert_round_trip_on(&mut manager, TimingPointChange::new(ids, TimingPointProperty::Hidden(true)));
}

#[test]
fn scroll_points() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    for target in TARGETS {
        for group in [None, Some(common::verse())] {
            let ids = scroll_ids(&map, target, group.as_ref());

            common::assert_round_trip_on(&mut manager, ScrollPointAddOrRemove::addition(
                target,
                group.clone(),
                vec![ScrollPoint::new(1750.0, 0.5), ScrollPoint::new(0.0, 3.0)],
            ));
            common::assert_round_trip_on(&mut manager, ScrollPointAddOrRemove::removal(
                target,
                group.clone(),
                ids.clone(),
            ));
            common::assert_round_trip_on(&mut manager, ScrollPointOffsetBatch::new(
                target,
                group.clone(),
                ids.clone(),
                -250.0,
            ));
            common::assert_round_trip_on(&mut manager, ScrollPointChange::new(
                target,
                group.clone(),
                ids.clone(),
                ScrollPointProperty::Multiplier(0.25),
            ));
            common::assert_round_trip_on(&mut manager, ScrollPointChange::new(
                target,
                group.clone(),
                ids.clone(),
                ScrollPointProperty::StartTime(600.0),
            ));
            common::assert_round_trip_on(&mut manager, ScrollPointChange::new(
                target,
                group.clone(),
                ids.clone(),
                ScrollPointProperty::LaneMask(Some(LaneMask::from_lanes([1, 3]))),
            ));

            let elsewhere = match group {
                Some(_) => None,
                None => Some(common::verse()),
            };
            common::assert_round_trip_on(&mut manager, ScrollPointMoveToGroup::new(target, ids, elsewhere));
        }
    }
}

#[test]
fn move_scroll_points_between_groups() {
    let mut manager = common::manager();
    let verse = common::verse();
    let global = scroll_ids(manager.map(), ScrollTarget::Velocity, None);
    assert_eq!(global.len(), 2);

    manager.perform(ScrollPointMoveToGroup::new(
        ScrollTarget::Velocity,
        global.clone(),
        Some(verse.clone()),
    ));
    assert!(scroll_ids(manager.map(), ScrollTarget::Velocity, None).is_empty());
    let in_verse = scroll_ids(manager.map(), ScrollTarget::Velocity, Some(&verse));
    assert_eq!(in_verse.len(), 4);
    for id in &global {
        assert!(in_verse.contains(id));
    }

    manager.undo();
    assert_eq!(scroll_ids(manager.map(), ScrollTarget::Velocity, None), global);
}

#[test]
fn bookmarks() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    let ids: Vec<_> = map.bookmarks.ids().collect();

    common::assert_round_trip_on(&mut manager, BookmarkAddOrRemove::addition(vec![
        Bookmark::new(500, "same time"),
        Bookmark::new(4000, "outro"),
    ]));
    common::assert_round_trip_on(&mut manager, BookmarkAddOrRemove::removal(ids.clone()));
    common::assert_round_trip_on(&mut manager, BookmarkOffsetBatch::new(ids.clone(), 2500));
    common::assert_round_trip_on(&mut manager, BookmarkEdit::new(ids[1], "chorus"));
    common::assert_round_trip_on(&mut manager, BookmarkEdit::new(ids[0], ""));
}

#[test]
fn layers() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    let all = common::all_hit_objects(&map);
    let (kicks, drums) = (common::kicks(), common::drums());

    common::assert_round_trip_on(&mut manager, LayerAddOrRemove::addition(
        Id::new("Cymbals"),
        Layer::new("Cymbals", Color::rgb(220, 220, 40)),
        Vec::new(),
    ));
    common::assert_round_trip_on(&mut manager, LayerAddOrRemove::addition(
        Id::new("Everything"),
        Layer::new("Everything", Color::WHITE),
        all,
    ));
    common::assert_round_trip_on(&mut manager, LayerAddOrRemove::removal(kicks));
    common::assert_round_trip_on(&mut manager, LayerChange::rename(drums, "Snares"));
    common::assert_round_trip_on(&mut manager, LayerChange::recolor(drums, Color::rgb(1, 2, 3)));
    common::assert_round_trip_on(&mut manager, LayerChange::set_hidden(kicks, true));
    common::assert_round_trip_on(&mut manager, LayerMerge::new(drums, kicks));
}

#[test]
fn removing_a_layer_frees_its_members() {
    let mut manager = common::manager();
    let kicks = common::kicks();
    let members = manager.map().hit_objects_in_layer(Some(kicks));

    manager.perform(LayerAddOrRemove::removal(kicks));
    assert!(!manager.map().layers.has(kicks));
    for &id in &members {
        assert_eq!(manager.map().hit_objects.get(id).unwrap().layer, None);
    }
    manager.map().validate().unwrap();

    manager.undo();
    assert_eq!(manager.map().hit_objects_in_layer(Some(kicks)), members);
}

#[test]
fn merging_a_layer_into_itself_does_nothing() {
    let mut manager = common::manager();
    let before = manager.map().clone();
    manager.perform(LayerMerge::new(common::kicks(), common::kicks()));
    assert_eq!(*manager.map(), before);
    manager.undo();
    assert_eq!(*manager.map(), before);
}

#[test]
fn timing_groups() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    let all = common::all_hit_objects(&map);
    let verse = common::verse();

    common::assert_round_trip_on(&mut manager, TimingGroupAddOrRemove::addition(
        GroupId::new("Bridge"),
        TimingGroup::default(),
        Vec::new(),
    ));
    common::assert_round_trip_on(&mut manager, TimingGroupAddOrRemove::addition(
        GroupId::new("Bridge"),
        TimingGroup::new(Color::rgb(10, 20, 30)),
        all,
    ));
    common::assert_round_trip_on(&mut manager, TimingGroupAddOrRemove::removal(verse.clone()));
    common::assert_round_trip_on(&mut manager, TimingGroupColorChange::new(verse.clone(), Color::WHITE));
    common::assert_round_trip_on(&mut manager, TimingGroupRename::new(verse, GroupId::new("Chorus")));
}

#[test]
fn renaming_a_group_follows_its_members() {
    let mut manager = common::manager();
    let verse = common::verse();
    let chorus = GroupId::new("Chorus");
    let members = manager.map().hit_objects_in_group(Some(&verse));
    assert_eq!(members.len(), 1);

    manager.perform(TimingGroupRename::new(verse.clone(), chorus.clone()));
    assert!(!manager.map().timing_groups.contains_key(&verse));
    assert_eq!(manager.map().hit_objects_in_group(Some(&chorus)), members);
    manager.map().validate().unwrap();
}

#[test]
fn renaming_onto_an_existing_group_does_nothing() {
    let mut manager = common::manager();
    manager.perform(TimingGroupAddOrRemove::addition(
        GroupId::new("Bridge"),
        TimingGroup::default(),
        Vec::new(),
    ));
    let before = manager.map().clone();

    manager.perform(TimingGroupRename::new(common::verse(), GroupId::new("Bridge")));
    assert_eq!(*manager.map(), before);
    manager.undo();
    assert_eq!(*manager.map(), before);
}

#[test]
fn map_wide() {
    common::assert_round_trip(PreviewTimeChange::new(-1));
    common::assert_round_trip(PreviewTimeChange::new(1200));
    common::assert_round_trip(GlobalOffset::new(250));
    common::assert_round_trip(GlobalOffset::new(-40));
}

#[test]
fn global_offset_onto_a_hold_tail() {
    let mut manager = common::manager();
    let hold = common::hold_note(manager.map());
    let end = manager.map().hit_objects.get(hold).unwrap().end_time;

    common::assert_round_trip_on(&mut manager, GlobalOffset::new(-end));
    let restored = manager.map().hit_objects.get(hold).unwrap();
    assert_eq!((restored.start_time, restored.end_time), (1500, 2000));
}

#[test]
fn moving_past_the_edge_lane_comes_back() {
    let mut manager = common::manager();
    let snare = common::hit_objects_at(manager.map(), 2000)[0];

    common::assert_round_trip_on(&mut manager, HitObjectMove::new(vec![snare], 0, -5));
    manager.perform(HitObjectMove::new(vec![snare], 0, -5));
    assert_eq!(manager.map().hit_objects.get(snare).unwrap().lane, 1);
    manager.undo();
    assert_eq!(manager.map().hit_objects.get(snare).unwrap().lane, 3);
}

#[test]
fn global_offset_moves_everything() {
    let mut manager = common::manager();
    let before = manager.map().clone();

    manager.perform(GlobalOffset::new(100));
    let map = manager.map();
    assert_eq!(map.preview_time, before.preview_time + 100);
    for (moved, original) in map.hit_objects.iter().zip(before.hit_objects.iter()) {
        assert_eq!(moved.start_time, original.start_time + 100);
    }
    for (moved, original) in map.bookmarks.iter().zip(before.bookmarks.iter()) {
        assert_eq!(moved.start_time, original.start_time + 100);
    }
    for (moved, original) in map.timing_points.iter().zip(before.timing_points.iter()) {
        assert_eq!(moved.start_time, original.start_time + 100.0);
    }
    let speed_factors = &map.global_scroll.speed_factors;
    assert_eq!(speed_factors.first().unwrap().start_time, 900.0);
    let verse = map.scroll_group(Some(&common::verse())).unwrap();
    assert_eq!(verse.velocities.last().unwrap().start_time, 2500.0);

    manager.undo();
    assert_eq!(*manager.map(), before);
}

#[test]
fn composite_of_mixed_families() {
    let mut manager = common::manager();
    let map = manager.map().clone();
    let note = HitObject::note(4000, 1);
    let note_id = note.id;
    let bookmark = map.bookmarks.first().unwrap().id;

    let edit = Composite::default()
        .with(HitObjectAddOrRemove::addition(vec![note]))
        .with(MoveToLayer::new(vec![note_id], Some(common::kicks())))
        .with(LayerChange::rename(common::kicks(), "Low end"))
        .with(BookmarkOffsetBatch::new(vec![bookmark], 100))
        .with(TimingGroupRename::new(common::verse(), GroupId::new("Chorus")))
        .with(GlobalOffset::new(-30));
    common::assert_round_trip_on(&mut manager, edit);
    common::assert_round_trip_on(&mut manager, Composite::default());
}
