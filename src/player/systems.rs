//! Player spawning, movement, and input sampling systems.
use bevy::{math::primitives::Capsule3d, prelude::*};

use crate::{
    core::plugin::SimulationPause,
    inventory::Inventory,
    player::components::{InteractInput, Player, PlayerMotion},
};

const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 8.0);
const PLAYER_SPEED: f32 = 3.5;

/// Spawns the player avatar with an empty inventory.
pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut transform = Transform::from_translation(PLAYER_SPAWN);
    transform.look_to(Vec3::NEG_Z, Vec3::Y);

    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Capsule3d::new(0.35, 1.1)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(222, 206, 170),
            ..default()
        })),
        transform,
        Player,
        Inventory::default(),
        Name::new("Player"),
    ));
}

/// Samples the interact key into the one-shot input flag.
pub fn read_interact_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<InteractInput>) {
    input.refresh(keyboard.just_pressed(KeyCode::KeyE));
}

/// Moves the avatar on the ground plane with WASD, facing the travel
/// direction. Held still while the simulation is paused.
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    pause: Res<SimulationPause>,
    time: Res<Time>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    if pause.is_paused() {
        return;
    }

    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += Vec3::NEG_Z;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction += Vec3::Z;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction += Vec3::NEG_X;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += Vec3::X;
    }

    if direction.length_squared() == 0.0 {
        return;
    }

    let direction = direction.normalize();
    transform.translation += direction * PLAYER_SPEED * time.delta_secs();
    transform.look_to(direction, Vec3::Y);
}

/// Updates the planar velocity estimate from this tick's displacement.
pub fn track_player_motion(
    time: Res<Time>,
    mut motion: ResMut<PlayerMotion>,
    query: Query<&Transform, With<Player>>,
) {
    let Ok(transform) = query.single() else {
        return;
    };
    motion.observe(transform.translation, time.delta_secs());
}
