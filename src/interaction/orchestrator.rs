//! Per-tick composition of targeting, prompting, and interact dispatch.
//!
//! Exactly one mode governs a tick: an open chat session owns the frame, an
//! active gather runs exclusively in its own system, and only otherwise does
//! normal targeting run. The interact press is consumed at most once per tick
//! whichever branch runs.
use bevy::prelude::*;

use crate::{
    chat::{events::ChatOpenRequest, session::ChatSession},
    inventory::Inventory,
    journal::{JournalAction, JournalEvent},
    npc::components::{NpcActor, NpcHook, Vitality},
    player::components::{InteractInput, Player, PlayerMotion},
    ui::prompt::PromptSurface,
};

use super::{
    components::{
        CurrentTarget, DroppedItem, Interactable, PickupCooldown, ResourceNode, TargetInfo,
        TargetKind,
    },
    config::InteractionSettings,
    gather::GatherAction,
    targeting::resolve_target,
};

const PICKUP_FULL_NOTICE: &str = "Cannot pick up: inventory full.";

const fn generic_prompt(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Character => "Press E to talk",
        TargetKind::Resource => "Press E to gather",
        TargetKind::Item => "Press E to pick up",
    }
}

/// Runs the targeting branch of the tick: resolve, update the prompt on
/// change, and dispatch a fresh interact press on the held target.
#[allow(clippy::too_many_arguments)]
pub fn orchestrate_interactions(
    mut commands: Commands,
    settings: Res<InteractionSettings>,
    chat: Res<ChatSession>,
    mut gather: ResMut<GatherAction>,
    mut input: ResMut<InteractInput>,
    mut current: ResMut<CurrentTarget>,
    mut prompt: ResMut<PromptSurface>,
    mut motion: ResMut<PlayerMotion>,
    mut journal: MessageWriter<JournalEvent>,
    mut chat_requests: MessageWriter<ChatOpenRequest>,
    players: Query<&Transform, With<Player>>,
    npcs: Query<(Entity, &Transform, &Interactable, &Vitality, &NpcActor)>,
    resources: Query<(Entity, &Transform, &Interactable, &ResourceNode)>,
    mut items: Query<
        (Entity, &Transform, &Interactable, &mut DroppedItem),
        Without<PickupCooldown>,
    >,
    mut inventories: Query<&mut Inventory, With<Player>>,
) {
    // Chat owns the modal frame.
    if chat.is_open() {
        input.take();
        prompt.hide();
        return;
    }

    // An active gather runs exclusively; it consumes the press itself.
    if gather.is_active() {
        return;
    }

    let Ok(player_transform) = players.single() else {
        return;
    };
    let origin = player_transform.translation;
    let facing = player_transform.forward().as_vec3();

    let resolved = resolve_target(
        origin,
        facing,
        settings.interaction_radius,
        settings.aim_alignment,
        npcs.iter()
            .filter(|(_, _, interactable, vitality, _)| interactable.enabled && vitality.alive)
            .map(|(entity, transform, ..)| (entity, transform.translation)),
        resources
            .iter()
            .filter(|(_, _, interactable, _)| interactable.enabled)
            .map(|(entity, transform, ..)| (entity, transform.translation)),
        items
            .iter()
            .filter(|(_, _, interactable, _)| interactable.enabled)
            .map(|(entity, transform, ..)| (entity, transform.translation)),
    );

    if current.differs_from(resolved.as_ref()) {
        match &resolved {
            Some(info) => {
                let text = prompt_text(info, &npcs, &resources, &items);
                prompt.show(text, None);
            }
            None => prompt.hide(),
        }
    }
    current.0 = resolved;

    if !input.take() {
        return;
    }
    let Some(info) = current.get().copied() else {
        return;
    };

    match info.kind {
        TargetKind::Character => {
            let Ok((_, _, _, _, actor)) = npcs.get(info.entity) else {
                return;
            };
            match &actor.hook {
                NpcHook::Converse => {
                    chat_requests.write(ChatOpenRequest { npc: info.entity });
                }
                NpcHook::Remark(line) => {
                    prompt.show(line.clone(), Some(settings.notice_duration));
                    journal.write(
                        JournalEvent::new(actor.name.clone(), JournalAction::Spoke, line.clone())
                            .with_target("Player"),
                    );
                }
            }
        }
        TargetKind::Resource => {
            let Ok((_, _, _, node)) = resources.get(info.entity) else {
                return;
            };
            // The action must not start pre-cancelled by this tick's stride.
            motion.rebase(origin);
            gather.begin(info.entity, node.yields, node.gather_duration);
            prompt.lock_for_gather();
            prompt.show(GatherAction::progress_label(node.yields, 0.0), None);
        }
        TargetKind::Item => {
            let Ok(mut inventory) = inventories.single_mut() else {
                return;
            };
            let Ok((_, _, _, mut item)) = items.get_mut(info.entity) else {
                return;
            };

            let outcome = inventory.add(item.kind, item.count);
            if outcome.accepted_none() {
                // Failed attempts are throttled; the target stays held so the
                // player can retry once the cooldown elapses.
                commands
                    .entity(info.entity)
                    .insert(PickupCooldown::new(settings.pickup_retry_cooldown));
                prompt.show(PICKUP_FULL_NOTICE, Some(settings.notice_duration));
                return;
            }

            journal.write(
                JournalEvent::new(
                    "Player",
                    JournalAction::Collected,
                    format!("Picked up {} {}.", outcome.added, item.kind.label()),
                )
                .with_location(info.anchor),
            );

            if outcome.accepted_all() {
                commands.entity(info.entity).despawn();
                current.clear();
                prompt.hide();
            } else {
                item.count -= outcome.added;
                commands
                    .entity(info.entity)
                    .insert(PickupCooldown::new(settings.pickup_retry_cooldown));
                prompt.show(PICKUP_FULL_NOTICE, Some(settings.notice_duration));
            }
        }
    }
}

fn prompt_text(
    info: &TargetInfo,
    npcs: &Query<(Entity, &Transform, &Interactable, &Vitality, &NpcActor)>,
    resources: &Query<(Entity, &Transform, &Interactable, &ResourceNode)>,
    items: &Query<(Entity, &Transform, &Interactable, &mut DroppedItem), Without<PickupCooldown>>,
) -> String {
    let configured = match info.kind {
        TargetKind::Character => npcs
            .get(info.entity)
            .ok()
            .and_then(|(_, _, interactable, _, _)| interactable.prompt.clone()),
        TargetKind::Resource => resources
            .get(info.entity)
            .ok()
            .and_then(|(_, _, interactable, _)| interactable.prompt.clone()),
        TargetKind::Item => items
            .get(info.entity)
            .ok()
            .and_then(|(_, _, interactable, _)| interactable.prompt.clone()),
    };

    configured.unwrap_or_else(|| generic_prompt(info.kind).to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        core::plugin::SimulationClock,
        interaction::{
            components::{NodeRespawn, RespawnPolicy},
            gather::{advance_gather_action, tick_node_respawns, tick_pickup_cooldowns},
        },
        inventory::ItemKind,
        npc::components::{NpcActor, NpcHook, NpcId},
    };

    fn build_app() -> App {
        let mut app = App::new();
        app.insert_resource(SimulationClock::new(1.0));
        app.init_resource::<Time>();
        app.init_resource::<ChatSession>();
        app.init_resource::<CurrentTarget>();
        app.init_resource::<GatherAction>();
        app.init_resource::<InteractInput>();
        app.init_resource::<PlayerMotion>();
        app.init_resource::<PromptSurface>();
        app.insert_resource(InteractionSettings::default());
        app.add_message::<JournalEvent>();
        app.add_message::<ChatOpenRequest>();
        app.add_systems(
            Update,
            (
                tick_pickup_cooldowns,
                orchestrate_interactions,
                advance_gather_action,
                tick_node_respawns,
            )
                .chain(),
        );
        app
    }

    fn spawn_player(app: &mut App, position: Vec3) -> Entity {
        let mut transform = Transform::from_translation(position);
        transform.look_to(Vec3::NEG_Z, Vec3::Y);
        app.world_mut()
            .spawn((transform, Player, Inventory::default()))
            .id()
    }

    fn spawn_npc(app: &mut App, position: Vec3, hook: NpcHook) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_translation(position),
                NpcActor::new(NpcId::new(1), "Maren", "a wary herbalist", hook),
                Vitality::default(),
                Interactable::with_prompt("Press E to talk to Maren"),
            ))
            .id()
    }

    fn spawn_node(app: &mut App, position: Vec3, policy: RespawnPolicy) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_translation(position),
                Interactable::with_prompt("Press E to chop wood"),
                ResourceNode {
                    yields: ItemKind::Wood,
                    gather_duration: Duration::from_millis(2000),
                    policy,
                },
                Visibility::default(),
            ))
            .id()
    }

    fn spawn_item(app: &mut App, position: Vec3, count: u32) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_translation(position),
                Interactable::unlabelled(),
                DroppedItem {
                    kind: ItemKind::Berries,
                    count,
                },
            ))
            .id()
    }

    fn press_interact(app: &mut App) {
        app.world_mut().resource_mut::<InteractInput>().refresh(true);
    }

    fn tick(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(Duration::from_millis(millis));
        app.update();
    }

    fn prompt_text_of(app: &App) -> Option<String> {
        app.world()
            .resource::<PromptSurface>()
            .text()
            .map(str::to_string)
    }

    fn wood_count(app: &mut App) -> u32 {
        let mut query = app.world_mut().query::<&Inventory>();
        query
            .single(app.world())
            .expect("player inventory")
            .count_of(ItemKind::Wood)
    }

    #[test]
    fn character_in_range_outranks_closer_item() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let npc = spawn_npc(&mut app, Vec3::new(0.0, 0.0, -1.0), NpcHook::Converse);
        spawn_item(&mut app, Vec3::new(0.0, 0.0, -0.4), 1);

        tick(&mut app, 0);

        let current = app.world().resource::<CurrentTarget>();
        let info = current.get().expect("resolved target");
        assert_eq!(info.kind, TargetKind::Character);
        assert_eq!(info.entity, npc);
        assert_eq!(
            prompt_text_of(&app).as_deref(),
            Some("Press E to talk to Maren")
        );
    }

    #[test]
    fn npc_at_one_unit_beats_item_at_two_units() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let npc = spawn_npc(&mut app, Vec3::new(1.0, 0.0, 0.0), NpcHook::Converse);
        spawn_item(&mut app, Vec3::new(2.0, 0.0, 0.0), 1);

        tick(&mut app, 0);

        let current = app.world().resource::<CurrentTarget>();
        assert_eq!(current.get().expect("target").entity, npc);
    }

    #[test]
    fn losing_the_target_clears_prompt_and_holds_nothing() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let npc = spawn_npc(&mut app, Vec3::new(0.0, 0.0, -1.0), NpcHook::Converse);

        tick(&mut app, 0);
        assert!(app.world().resource::<CurrentTarget>().get().is_some());

        app.world_mut().entity_mut(npc).despawn();
        tick(&mut app, 0);

        assert!(app.world().resource::<CurrentTarget>().get().is_none());
        assert_eq!(prompt_text_of(&app), None);
    }

    #[test]
    fn gather_runs_to_completion_with_progress_readout() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let node = spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::Respawn {
                delay: Duration::from_secs(20),
            },
        );

        press_interact(&mut app);
        tick(&mut app, 0);
        assert!(app.world().resource::<GatherAction>().is_active());
        assert_eq!(
            prompt_text_of(&app).as_deref(),
            Some("Gathering wood... (0%)")
        );

        tick(&mut app, 1000);
        assert_eq!(
            prompt_text_of(&app).as_deref(),
            Some("Gathering wood... (50%)")
        );

        tick(&mut app, 1000);
        assert!(!app.world().resource::<GatherAction>().is_active());
        assert_eq!(wood_count(&mut app), 1);
        assert!(app.world().resource::<CurrentTarget>().get().is_none());

        // The node is depleted and scheduled to respawn.
        assert!(!app.world().get::<Interactable>(node).unwrap().enabled);
        assert!(app.world().get::<NodeRespawn>(node).is_some());
    }

    #[test]
    fn completed_gather_does_not_credit_twice() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::Respawn {
                delay: Duration::from_secs(20),
            },
        );

        press_interact(&mut app);
        tick(&mut app, 0);
        tick(&mut app, 2000);
        assert_eq!(wood_count(&mut app), 1);

        tick(&mut app, 2000);
        assert_eq!(wood_count(&mut app), 1);
    }

    #[test]
    fn second_interact_press_cancels_instead_of_stacking() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::SingleUse,
        );

        press_interact(&mut app);
        tick(&mut app, 0);
        assert!(app.world().resource::<GatherAction>().is_active());

        press_interact(&mut app);
        tick(&mut app, 500);

        assert!(!app.world().resource::<GatherAction>().is_active());
        assert_eq!(wood_count(&mut app), 0);
        assert_eq!(prompt_text_of(&app).as_deref(), Some("Gathering cancelled."));
    }

    #[test]
    fn movement_above_epsilon_cancels_without_yield() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::SingleUse,
        );

        press_interact(&mut app);
        tick(&mut app, 0);

        app.world_mut()
            .resource_mut::<PlayerMotion>()
            .set_velocity(Vec3::new(4.0, 0.0, 0.0));
        tick(&mut app, 100);

        assert!(!app.world().resource::<GatherAction>().is_active());
        assert_eq!(wood_count(&mut app), 0);
        assert_eq!(prompt_text_of(&app).as_deref(), Some("Gathering cancelled."));
    }

    #[test]
    fn vanished_node_cancels_silently() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let node = spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::SingleUse,
        );

        press_interact(&mut app);
        tick(&mut app, 0);

        app.world_mut().entity_mut(node).despawn();
        tick(&mut app, 500);

        assert!(!app.world().resource::<GatherAction>().is_active());
        assert_eq!(wood_count(&mut app), 0);
        assert_eq!(prompt_text_of(&app), None);
    }

    #[test]
    fn full_inventory_leaves_node_untouched() {
        let mut app = build_app();
        let player = spawn_player(&mut app, Vec3::ZERO);
        app.world_mut()
            .entity_mut(player)
            .insert(Inventory::with_capacity(1, 4));
        {
            let mut inventory = app.world_mut().get_mut::<Inventory>(player).unwrap();
            inventory.add(ItemKind::Stone, 4);
        }
        let node = spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::Respawn {
                delay: Duration::from_secs(20),
            },
        );

        press_interact(&mut app);
        tick(&mut app, 0);
        tick(&mut app, 2000);

        assert_eq!(wood_count(&mut app), 0);
        assert!(app.world().get::<Interactable>(node).unwrap().enabled);
        assert!(app.world().get::<NodeRespawn>(node).is_none());
        assert_eq!(
            prompt_text_of(&app).as_deref(),
            Some("Cannot gather: inventory full.")
        );
    }

    #[test]
    fn depleted_node_respawns_after_delay() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let node = spawn_node(
            &mut app,
            Vec3::new(0.0, 0.0, -1.5),
            RespawnPolicy::Respawn {
                delay: Duration::from_secs(20),
            },
        );

        press_interact(&mut app);
        tick(&mut app, 0);
        tick(&mut app, 2000);
        assert!(!app.world().get::<Interactable>(node).unwrap().enabled);

        tick(&mut app, 20_000);
        assert!(app.world().get::<Interactable>(node).unwrap().enabled);
        assert!(app.world().get::<NodeRespawn>(node).is_none());
    }

    #[test]
    fn item_pickup_collects_and_clears_the_target() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let item = spawn_item(&mut app, Vec3::new(0.0, 0.0, -1.0), 3);

        tick(&mut app, 0);
        press_interact(&mut app);
        tick(&mut app, 0);

        let mut query = app.world_mut().query::<&Inventory>();
        let inventory = query.single(app.world()).expect("inventory");
        assert_eq!(inventory.count_of(ItemKind::Berries), 3);
        assert!(app.world().get_entity(item).is_err());
        assert!(app.world().resource::<CurrentTarget>().get().is_none());
    }

    #[test]
    fn failed_pickup_throttles_but_keeps_the_target() {
        let mut app = build_app();
        let player = spawn_player(&mut app, Vec3::ZERO);
        app.world_mut()
            .entity_mut(player)
            .insert(Inventory::with_capacity(1, 4));
        {
            let mut inventory = app.world_mut().get_mut::<Inventory>(player).unwrap();
            inventory.add(ItemKind::Stone, 4);
        }
        let item = spawn_item(&mut app, Vec3::new(0.0, 0.0, -1.0), 2);

        tick(&mut app, 0);
        press_interact(&mut app);
        tick(&mut app, 0);

        assert!(app.world().get::<PickupCooldown>(item).is_some());
        assert!(app.world().get_entity(item).is_ok());
        assert_eq!(
            prompt_text_of(&app).as_deref(),
            Some("Cannot pick up: inventory full.")
        );
    }

    #[test]
    fn open_chat_suppresses_targeting_and_consumes_the_press() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let npc = spawn_npc(&mut app, Vec3::new(0.0, 0.0, -1.0), NpcHook::Converse);

        app.world_mut()
            .resource_mut::<ChatSession>()
            .open(npc);
        app.world_mut()
            .resource_mut::<PromptSurface>()
            .show("leftover", None);

        press_interact(&mut app);
        tick(&mut app, 0);

        assert_eq!(prompt_text_of(&app), None);
        assert!(!app.world().resource::<InteractInput>().is_armed());
        assert!(!app.world().resource::<GatherAction>().is_active());
    }

    #[test]
    fn remark_hook_shows_a_timed_line() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        spawn_npc(
            &mut app,
            Vec3::new(0.0, 0.0, -1.0),
            NpcHook::Remark("Not now.".to_string()),
        );

        tick(&mut app, 0);
        press_interact(&mut app);
        tick(&mut app, 0);

        assert_eq!(prompt_text_of(&app).as_deref(), Some("Not now."));
    }

    #[test]
    fn dead_characters_are_never_targeted() {
        let mut app = build_app();
        spawn_player(&mut app, Vec3::ZERO);
        let npc = spawn_npc(&mut app, Vec3::new(0.0, 0.0, -1.0), NpcHook::Converse);
        app.world_mut()
            .entity_mut(npc)
            .insert(Vitality { alive: false });

        tick(&mut app, 0);
        assert!(app.world().resource::<CurrentTarget>().get().is_none());
    }
}
