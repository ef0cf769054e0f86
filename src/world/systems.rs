//! Systems spawning the scene and its interactable population.
use std::time::Duration;

use bevy::{
    math::primitives::{Cuboid, Cylinder, Plane3d, Sphere},
    prelude::*,
};

use crate::{
    interaction::components::{DroppedItem, Interactable, ResourceNode, RespawnPolicy},
    inventory::ItemKind,
    world::components::{PrimarySun, WorldCamera},
};

const GROUND_SCALE: f32 = 80.0;
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 14.0, 18.0);

/// Spawns the ground plane, sun, and scene camera.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(96, 132, 88),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(12.0, 28.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
    ));

    let mut camera_transform = Transform::from_translation(CAMERA_POSITION);
    camera_transform.look_at(Vec3::ZERO, Vec3::Y);
    commands.spawn((Camera3d::default(), camera_transform, WorldCamera));
}

/// Spawns the gatherable resource nodes.
pub fn spawn_resource_nodes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let trunk_mesh = meshes.add(Mesh::from(Cylinder::new(0.25, 2.2)));
    let boulder_mesh = meshes.add(Mesh::from(Sphere::new(0.7)));
    let bush_mesh = meshes.add(Mesh::from(Sphere::new(0.45)));

    let trunk_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(120, 86, 54),
        ..default()
    });
    let boulder_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(128, 128, 136),
        perceptual_roughness: 0.95,
        ..default()
    });
    let bush_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(90, 40, 60),
        ..default()
    });

    commands.spawn((
        Mesh3d(trunk_mesh.clone()),
        MeshMaterial3d(trunk_material.clone()),
        Transform::from_xyz(-4.0, 1.1, -2.0),
        Interactable::with_prompt("Press E to chop wood"),
        ResourceNode {
            yields: ItemKind::Wood,
            gather_duration: Duration::from_millis(2000),
            policy: RespawnPolicy::Respawn {
                delay: Duration::from_secs(25),
            },
        },
        Name::new("Birch Stand"),
    ));

    commands.spawn((
        Mesh3d(trunk_mesh),
        MeshMaterial3d(trunk_material),
        Transform::from_xyz(5.5, 1.1, -6.0),
        Interactable::with_prompt("Press E to chop wood"),
        ResourceNode {
            yields: ItemKind::Wood,
            gather_duration: Duration::from_millis(2000),
            policy: RespawnPolicy::Respawn {
                delay: Duration::from_secs(25),
            },
        },
        Name::new("Pine Stand"),
    ));

    commands.spawn((
        Mesh3d(boulder_mesh),
        MeshMaterial3d(boulder_material),
        Transform::from_xyz(2.0, 0.6, 4.5),
        Interactable::with_prompt("Press E to mine stone"),
        ResourceNode {
            yields: ItemKind::Stone,
            gather_duration: Duration::from_millis(3000),
            policy: RespawnPolicy::Respawn {
                delay: Duration::from_secs(40),
            },
        },
        Name::new("Boulder"),
    ));

    commands.spawn((
        Mesh3d(bush_mesh),
        MeshMaterial3d(bush_material),
        Transform::from_xyz(-2.5, 0.45, 6.0),
        Interactable::with_prompt("Press E to pick berries"),
        ResourceNode {
            yields: ItemKind::Berries,
            gather_duration: Duration::from_millis(1500),
            policy: RespawnPolicy::SingleUse,
        },
        Name::new("Berry Bush"),
    ));
}

/// Scatters a few dropped items near the spawn area.
pub fn spawn_dropped_items(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let item_mesh = meshes.add(Mesh::from(Cuboid::new(0.3, 0.3, 0.3)));

    let drops = [
        (ItemKind::Mushroom, 2, Vec3::new(1.5, 0.15, 7.5), Color::srgb_u8(210, 190, 150)),
        (ItemKind::Stone, 1, Vec3::new(-1.0, 0.15, 9.0), Color::srgb_u8(140, 140, 150)),
    ];

    for (kind, count, position, color) in drops {
        commands.spawn((
            Mesh3d(item_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                ..default()
            })),
            Transform::from_translation(position),
            Interactable::unlabelled(),
            DroppedItem { kind, count },
            Name::new(format!("Dropped {}", kind.label())),
        ));
    }
}
