//! Target resolution over characters, resource nodes, and dropped items.
//!
//! Resolution runs as a pure query in strict priority order: living
//! characters first, then aimed resource nodes, then dropped items. Within a
//! pass the closest candidate wins; passes never mix, so a character in range
//! always beats a closer item.
use bevy::prelude::*;

use super::components::{TargetInfo, TargetKind};

/// Closest candidate inside `radius`, compared on squared distance. The
/// returned snapshot carries the exact distance for display.
pub fn closest_within<I>(
    origin: Vec3,
    radius: f32,
    kind: TargetKind,
    candidates: I,
) -> Option<TargetInfo>
where
    I: IntoIterator<Item = (Entity, Vec3)>,
{
    let radius_sq = radius * radius;
    let mut best: Option<(Entity, Vec3, f32)> = None;

    for (entity, position) in candidates {
        let distance_sq = origin.distance_squared(position);
        if distance_sq > radius_sq {
            continue;
        }
        if best.is_none_or(|(_, _, current)| distance_sq < current) {
            best = Some((entity, position, distance_sq));
        }
    }

    best.map(|(entity, anchor, distance_sq)| TargetInfo {
        entity,
        kind,
        anchor,
        distance: distance_sq.sqrt(),
    })
}

/// Closest candidate inside `radius` that also lies within the aim cone:
/// the planar direction to the candidate must align with `facing` at least
/// by `min_alignment` (a cosine).
pub fn closest_facing_within<I>(
    origin: Vec3,
    facing: Vec3,
    radius: f32,
    min_alignment: f32,
    kind: TargetKind,
    candidates: I,
) -> Option<TargetInfo>
where
    I: IntoIterator<Item = (Entity, Vec3)>,
{
    let planar_facing = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();

    let aligned = candidates.into_iter().filter(|(_, position)| {
        let to_candidate =
            Vec3::new(position.x - origin.x, 0.0, position.z - origin.z).normalize_or_zero();
        // A candidate directly on top of the player always qualifies.
        to_candidate == Vec3::ZERO || planar_facing.dot(to_candidate) >= min_alignment
    });

    closest_within(origin, radius, kind, aligned)
}

/// Resolves the single best target, or `None` when nothing qualifies.
///
/// Characters are matched on proximity alone so they stay easy to approach;
/// resource nodes additionally require the player to face them.
pub fn resolve_target<C, R, D>(
    origin: Vec3,
    facing: Vec3,
    radius: f32,
    min_alignment: f32,
    characters: C,
    resources: R,
    items: D,
) -> Option<TargetInfo>
where
    C: IntoIterator<Item = (Entity, Vec3)>,
    R: IntoIterator<Item = (Entity, Vec3)>,
    D: IntoIterator<Item = (Entity, Vec3)>,
{
    closest_within(origin, radius, TargetKind::Character, characters)
        .or_else(|| {
            closest_facing_within(
                origin,
                facing,
                radius,
                min_alignment,
                TargetKind::Resource,
                resources,
            )
        })
        .or_else(|| closest_within(origin, radius, TargetKind::Item, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn character_in_range_beats_closer_item() {
        let ids = entities(2);
        let npc = (ids[0], Vec3::new(0.0, 0.0, 1.0));
        let item = (ids[1], Vec3::new(0.0, 0.0, 0.2));

        let resolved = resolve_target(
            Vec3::ZERO,
            Vec3::NEG_Z,
            3.0,
            0.5,
            [npc],
            std::iter::empty(),
            [item],
        )
        .expect("target");

        assert_eq!(resolved.kind, TargetKind::Character);
        assert_eq!(resolved.entity, ids[0]);
        assert!((resolved.distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn npc_at_one_unit_beats_item_at_two() {
        let ids = entities(2);
        let resolved = resolve_target(
            Vec3::ZERO,
            Vec3::NEG_Z,
            3.0,
            0.5,
            [(ids[0], Vec3::new(1.0, 0.0, 0.0))],
            std::iter::empty(),
            [(ids[1], Vec3::new(2.0, 0.0, 0.0))],
        )
        .expect("target");

        assert_eq!(resolved.entity, ids[0]);
        assert_eq!(resolved.kind, TargetKind::Character);
    }

    #[test]
    fn closest_candidate_wins_within_a_pass() {
        let ids = entities(3);
        let resolved = closest_within(
            Vec3::ZERO,
            5.0,
            TargetKind::Character,
            [
                (ids[0], Vec3::new(3.0, 0.0, 0.0)),
                (ids[1], Vec3::new(1.0, 0.0, 0.5)),
                (ids[2], Vec3::new(2.0, 0.0, 0.0)),
            ],
        )
        .expect("target");

        assert_eq!(resolved.entity, ids[1]);
    }

    #[test]
    fn out_of_range_candidates_resolve_to_none() {
        let ids = entities(1);
        let resolved = closest_within(
            Vec3::ZERO,
            2.0,
            TargetKind::Item,
            [(ids[0], Vec3::new(0.0, 0.0, 5.0))],
        );
        assert!(resolved.is_none());
    }

    #[test]
    fn resource_behind_the_player_is_not_aimed_at() {
        let ids = entities(1);
        let behind = (ids[0], Vec3::new(0.0, 0.0, 2.0));

        let resolved = closest_facing_within(
            Vec3::ZERO,
            Vec3::NEG_Z,
            3.0,
            0.64,
            TargetKind::Resource,
            [behind],
        );
        assert!(resolved.is_none());

        let ahead = (ids[0], Vec3::new(0.0, 0.0, -2.0));
        let resolved = closest_facing_within(
            Vec3::ZERO,
            Vec3::NEG_Z,
            3.0,
            0.64,
            TargetKind::Resource,
            [ahead],
        )
        .expect("target");
        assert_eq!(resolved.kind, TargetKind::Resource);
    }

    #[test]
    fn items_resolve_only_when_higher_passes_are_empty() {
        let ids = entities(1);
        let resolved = resolve_target(
            Vec3::ZERO,
            Vec3::NEG_Z,
            3.0,
            0.5,
            std::iter::empty(),
            std::iter::empty(),
            [(ids[0], Vec3::new(0.5, 0.0, 0.0))],
        )
        .expect("target");

        assert_eq!(resolved.kind, TargetKind::Item);
    }
}
