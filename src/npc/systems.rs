//! Systems for NPC spawning and wander behavior.
use std::f32::consts::TAU;

use bevy::{math::primitives::Capsule3d, prelude::*};
use rand::Rng;

use crate::{
    core::plugin::SimulationClock,
    interaction::components::Interactable,
    npc::components::{InConversation, NpcActor, NpcHook, NpcIdGenerator, Vitality, Wander},
};

const ARRIVAL_EPSILON: f32 = 0.05;

/// Spawns the settlement's NPCs with their interaction hooks.
pub fn spawn_npcs(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut id_generator: ResMut<NpcIdGenerator>,
) {
    let prototypes = [
        (
            "Maren",
            "a wary herbalist who trades remedies for gossip",
            NpcHook::Converse,
            Color::srgb_u8(196, 104, 88),
            Vec3::new(4.0, 1.0, 2.5),
        ),
        (
            "Edwin",
            "the settlement warden, blunt but fair",
            NpcHook::Converse,
            Color::srgb_u8(96, 144, 204),
            Vec3::new(-3.5, 1.0, 5.0),
        ),
        (
            "Tolly",
            "a tired fisher with no patience for small talk",
            NpcHook::Remark("Not now. The nets will not mend themselves.".to_string()),
            Color::srgb_u8(132, 188, 112),
            Vec3::new(6.0, 1.0, -3.0),
        ),
    ];

    for (name, persona, hook, color, position) in prototypes {
        let id = id_generator.next_id();

        commands.spawn((
            Mesh3d(meshes.add(Mesh::from(Capsule3d::new(0.3, 1.0)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                ..default()
            })),
            Transform::from_translation(position),
            NpcActor::new(id, name, persona, hook),
            Vitality::default(),
            Interactable::with_prompt(format!("Press E to talk to {}", name)),
            Wander::new(position, 3.0, 0.8, 7.0),
            Name::new(format!("{} ({})", name, id)),
        ));
    }
}

/// Walks idle NPCs between random points near home.
///
/// Actors in conversation are skipped entirely; their decision timer is
/// rescheduled by the chat systems when the exchange ends.
pub fn wander_npcs(
    clock: Res<SimulationClock>,
    mut query: Query<(&mut Transform, &mut Wander), (With<NpcActor>, Without<InConversation>)>,
) {
    let delta = clock.last_scaled_delta();
    if delta.is_zero() {
        return;
    }

    let mut rng = rand::thread_rng();
    for (mut transform, mut wander) in query.iter_mut() {
        if wander.decision.tick(delta).just_finished() && wander.destination.is_none() {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(0.5..wander.range.max(0.6));
            let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * distance;
            wander.destination = Some(wander.home + offset);
        }

        let Some(destination) = wander.destination else {
            continue;
        };

        let here = transform.translation;
        let to_goal = Vec3::new(destination.x - here.x, 0.0, destination.z - here.z);
        if to_goal.length() <= ARRIVAL_EPSILON {
            wander.destination = None;
            continue;
        }

        let step = wander.speed * delta.as_secs_f32();
        let motion = to_goal.clamp_length_max(step);
        transform.translation += motion;
        transform.look_to(to_goal, Vec3::Y);
    }
}
