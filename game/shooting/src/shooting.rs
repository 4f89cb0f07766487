//! The player shooting engine.
//!
//! Accumulates the controlled gun's cooldown every frame and, when the fire
//! action is held, the game is not paused, and the cooldown has elapsed,
//! fires one probe along the gun's ray. A hit on a target delivers damage to
//! the target's damage bus; anything else is a miss.
//!
//! The engine also watches two death signals. The player's releases the
//! controlled gun. Each target's publishes the target's type on the kill bus
//! for scoring and spawning engines.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use engine_component::Entity;
use engine_node::{AnyNode, NodeDescriptor, NodesDb};
use engine_observable::{EventBus, SubscriptionId};
use engine_probe::{Probe, ProbeError, ProbeHit};
use engine_runtime::{Engine, FrameSignals, NodeRoutes, Tickable};
use game_components::{DamageInfo, TargetType};
use tracing::{debug, info};

use crate::config::ShootingConfig;
use crate::nodes::{PlayerGunNode, PlayerNode, PlayerTargetNode};

/// Where the engine is in its firing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootingState {
    /// No gun to control.
    Idle,
    /// The gun's timer is below its threshold.
    Cooldown,
    /// The timer has reached its threshold; the next held fire action shoots.
    ReadyToFire,
}

/// Outcome of one shot, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// Damage went to `target` at `point`.
    Hit { target: Entity, point: engine_math::Vec3 },
    /// Nothing was hit, or the hit was not a live target.
    Miss,
}

type Controlled = Rc<RefCell<Option<PlayerGunNode>>>;

/// Fires the controlled player gun and publishes kills.
pub struct PlayerShootingEngine {
    routes: Rc<NodeRoutes<Self>>,
    nodes_db: Rc<NodesDb>,
    probe: Rc<dyn Probe>,
    signals: FrameSignals,
    config: ShootingConfig,
    kills: EventBus<TargetType>,
    controlled: Controlled,
    player_subscriptions: HashMap<Entity, SubscriptionId>,
    target_subscriptions: HashMap<Entity, SubscriptionId>,
}

impl PlayerShootingEngine {
    pub const NAME: &'static str = "player_shooting";

    /// Create a new engine casting through `probe`.
    #[must_use]
    pub fn new(
        nodes_db: Rc<NodesDb>,
        probe: Rc<dyn Probe>,
        signals: FrameSignals,
        config: ShootingConfig,
    ) -> Self {
        Self {
            routes: Rc::new(
                NodeRoutes::new(Self::NAME)
                    .route::<PlayerTargetNode>(Self::add_target, Self::remove_target)
                    .route::<PlayerGunNode>(Self::add_gun, Self::remove_gun)
                    .route::<PlayerNode>(Self::add_player, Self::remove_player),
            ),
            nodes_db,
            probe,
            signals,
            config,
            kills: EventBus::new(),
            controlled: Rc::default(),
            player_subscriptions: HashMap::new(),
            target_subscriptions: HashMap::new(),
        }
    }

    /// Bus publishing the type of every target that dies while tracked.
    #[must_use]
    pub fn kills(&self) -> EventBus<TargetType> {
        self.kills.clone()
    }

    #[must_use]
    pub fn state(&self) -> ShootingState {
        match &*self.controlled.borrow() {
            None => ShootingState::Idle,
            Some(node) => {
                let gun = node.gun.borrow();
                if gun.timer() < gun.time_between_bullets() {
                    ShootingState::Cooldown
                } else {
                    ShootingState::ReadyToFire
                }
            }
        }
    }

    /// The entity whose gun is controlled, if any.
    #[must_use]
    pub fn controlled_entity(&self) -> Option<Entity> {
        self.controlled.borrow().as_ref().map(|node| node.entity)
    }

    fn add_gun(&mut self, node: &PlayerGunNode) {
        debug!(entity = node.entity.id(), "controlling gun");
        *self.controlled.borrow_mut() = Some(node.clone());
    }

    fn remove_gun(&mut self, node: &PlayerGunNode) {
        let mut controlled = self.controlled.borrow_mut();
        if controlled.as_ref().is_some_and(|c| c.entity == node.entity) {
            debug!(entity = node.entity.id(), "released gun");
            *controlled = None;
        }
    }

    fn add_player(&mut self, node: &PlayerNode) {
        let controlled = Rc::downgrade(&self.controlled);
        let id = node
            .health
            .borrow()
            .is_dead()
            .subscribe(move |entity, dead| on_player_dead(&controlled, entity, *dead));
        self.player_subscriptions.insert(node.entity, id);
    }

    fn remove_player(&mut self, node: &PlayerNode) {
        if let Some(id) = self.player_subscriptions.remove(&node.entity) {
            node.health.borrow().is_dead().unsubscribe(id);
        }
    }

    fn add_target(&mut self, node: &PlayerTargetNode) {
        let nodes_db = Rc::downgrade(&self.nodes_db);
        let kills = self.kills.clone();
        let id = node
            .health
            .borrow()
            .is_dead()
            .subscribe(move |entity, dead| on_target_dead(&nodes_db, &kills, entity, *dead));
        self.target_subscriptions.insert(node.entity, id);
    }

    fn remove_target(&mut self, node: &PlayerTargetNode) {
        if let Some(id) = self.target_subscriptions.remove(&node.entity) {
            node.health.borrow().is_dead().unsubscribe(id);
        }
    }

    /// Reset the cooldown and fire one probe.
    ///
    /// No component borrow is held while damage is dispatched, so damage
    /// handlers may freely touch the gun or the target.
    fn shoot(&self, node: &PlayerGunNode) -> Result<ShotOutcome, ProbeError> {
        let (ray, range, damage_per_shot) = {
            let mut gun = node.gun.borrow_mut();
            gun.set_timer(0.0);
            (gun.shoot_ray(), gun.range(), gun.damage_per_shot())
        };

        let mask = self.config.probe_mask();
        let hit = self.probe.cast(ray, range, mask);
        if let Some(hit) = &hit {
            hit.validate(mask)?;
        }

        let target_hit = node.hit.borrow().target_hit();
        let Some((target, point)) = hit.and_then(|hit| self.resolve_target(&hit)) else {
            target_hit.set_value(false);
            return Ok(ShotOutcome::Miss);
        };

        let bus = target.damage.borrow().damage_received();
        bus.dispatch(&mut DamageInfo::new(damage_per_shot, point));
        node.gun.borrow_mut().set_last_target_position(point);
        target_hit.set_value(true);

        Ok(ShotOutcome::Hit {
            target: target.entity,
            point,
        })
    }

    /// Only enemy-layer hits on an entity with a target node count.
    fn resolve_target(&self, hit: &ProbeHit) -> Option<(PlayerTargetNode, engine_math::Vec3)> {
        if hit.layer != self.config.enemy_layer {
            return None;
        }
        let target = self.nodes_db.try_query_node::<PlayerTargetNode>(hit.entity?)?;
        Some((target, hit.point))
    }
}

fn on_player_dead(controlled: &Weak<RefCell<Option<PlayerGunNode>>>, entity: Entity, dead: bool) {
    if !dead {
        return;
    }
    if let Some(controlled) = controlled.upgrade() {
        info!(player = entity.id(), "player died, releasing gun");
        controlled.borrow_mut().take();
    }
}

fn on_target_dead(
    nodes_db: &Weak<NodesDb>,
    kills: &EventBus<TargetType>,
    entity: Entity,
    dead: bool,
) {
    if !dead {
        return;
    }
    let Some(nodes_db) = nodes_db.upgrade() else {
        return;
    };
    let target = nodes_db.query_node::<PlayerTargetNode>(entity);
    let mut target_type = target.target_type.borrow().target_type();
    info!(target = entity.id(), %target_type, "target killed");
    kills.dispatch(&mut target_type);
}

impl Engine for PlayerShootingEngine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn accepted_nodes(&self) -> Vec<NodeDescriptor> {
        self.routes.accepted()
    }

    fn add(&mut self, node: &AnyNode) {
        let routes = Rc::clone(&self.routes);
        routes.add(self, node);
    }

    fn remove(&mut self, node: &AnyNode) {
        let routes = Rc::clone(&self.routes);
        routes.remove(self, node);
    }

    fn as_tickable(&mut self) -> Option<&mut dyn Tickable> {
        Some(self)
    }
}

impl Tickable for PlayerShootingEngine {
    fn tick(&mut self, delta: f32) -> anyhow::Result<()> {
        let Some(node) = self.controlled.borrow().clone() else {
            return Ok(());
        };

        let ready = {
            let mut gun = node.gun.borrow_mut();
            let threshold = gun.time_between_bullets();
            let timer = (gun.timer() + delta).min(threshold);
            gun.set_timer(timer);
            timer >= threshold
        };

        if ready && self.signals.primary_action() && !self.signals.paused() {
            let outcome = self.shoot(&node)?;
            debug!(
                frame = self.signals.frame(),
                gun = node.entity.id(),
                ?outcome,
                "fired"
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for PlayerShootingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerShootingEngine")
            .field("state", &self.state())
            .field("controlled", &self.controlled_entity())
            .field("config", &self.config)
            .field("players", &self.player_subscriptions.len())
            .field("targets", &self.target_subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use engine_component::ComponentSet;
    use engine_math::Vec3;
    use engine_probe::{CollisionLayer, LayerMask};
    use engine_runtime::{EnginesRoot, FrameInput};
    use game_components::{
        DamageEventComponent, GunAttributesComponent, GunHitTargetComponent, GunSettings,
        HealthComponent, PlayerGun, PlayerHealth,
    };

    use super::*;
    use crate::nodes::player_descriptor;

    /// Returns the same hit for every cast.
    #[derive(Default)]
    struct FixedProbe {
        hit: Cell<Option<ProbeHit>>,
        casts: Cell<u32>,
        last_mask: Cell<LayerMask>,
    }

    impl Probe for FixedProbe {
        fn cast(&self, _ray: engine_math::Ray, _max: f32, mask: LayerMask) -> Option<ProbeHit> {
            self.casts.set(self.casts.get() + 1);
            self.last_mask.set(mask);
            self.hit.get()
        }
    }

    struct Rig {
        root: EnginesRoot,
        probe: Rc<FixedProbe>,
        gun: Rc<RefCell<PlayerGun>>,
        body: Rc<RefCell<PlayerHealth>>,
        player: Entity,
    }

    impl Rig {
        fn new(time_between_bullets: f32) -> Self {
            let mut root = EnginesRoot::new();
            let probe = Rc::new(FixedProbe::default());
            root.add_engine(PlayerShootingEngine::new(
                root.nodes_db(),
                probe.clone(),
                root.signals(),
                ShootingConfig::default(),
            ))
            .unwrap();

            let player = root.reserve_entity();
            let gun = Rc::new(RefCell::new(PlayerGun::new(
                player,
                GunSettings {
                    time_between_bullets,
                    ..GunSettings::default()
                },
            )));
            let body = Rc::new(RefCell::new(PlayerHealth::new(player)));
            let components = ComponentSet::new()
                .with::<dyn GunAttributesComponent>(gun.clone())
                .with::<dyn GunHitTargetComponent>(gun.clone())
                .with::<dyn HealthComponent>(body.clone())
                .with::<dyn DamageEventComponent>(body.clone());
            root.build_entity_with(player, &player_descriptor(), &components)
                .unwrap();

            Self {
                root,
                probe,
                gun,
                body,
                player,
            }
        }

        fn fire(&mut self, delta: f32) -> anyhow::Result<()> {
            self.root.tick(delta, FrameInput::firing())
        }
    }

    #[test]
    fn test_idle_without_gun() {
        let mut root = EnginesRoot::new();
        let probe = Rc::new(FixedProbe::default());
        let engine = PlayerShootingEngine::new(
            root.nodes_db(),
            probe.clone(),
            root.signals(),
            ShootingConfig::default(),
        );
        assert_eq!(engine.state(), ShootingState::Idle);
        root.add_engine(engine).unwrap();

        root.tick(1.0, FrameInput::firing()).unwrap();
        assert_eq!(probe.casts.get(), 0);
    }

    #[test]
    fn test_timer_saturates_at_threshold() {
        let mut rig = Rig::new(0.25);
        rig.root.tick(10.0, FrameInput::default()).unwrap();
        assert_eq!(rig.gun.borrow().timer(), 0.25);
        assert_eq!(rig.probe.casts.get(), 0);

        rig.fire(0.0).unwrap();
        assert_eq!(rig.probe.casts.get(), 1);
        assert_eq!(rig.gun.borrow().timer(), 0.0);
    }

    #[test]
    fn test_pause_blocks_firing() {
        let mut rig = Rig::new(0.1);
        let paused = FrameInput {
            primary_action: true,
            paused: true,
        };
        rig.root.tick(1.0, paused).unwrap();
        rig.root.tick(1.0, paused).unwrap();
        assert_eq!(rig.probe.casts.get(), 0);
        assert_eq!(rig.gun.borrow().timer(), 0.1);
    }

    #[test]
    fn test_probes_both_layers_within_range() {
        let mut rig = Rig::new(0.1);
        rig.fire(0.1).unwrap();
        assert_eq!(rig.probe.last_mask.get(), ShootingConfig::default().probe_mask());
        assert!(!rig.gun.borrow().target_hit().value());
    }

    #[test]
    fn test_malformed_hit_fails_tick() {
        let mut rig = Rig::new(0.1);
        rig.probe.hit.set(Some(ProbeHit {
            point: Vec3::new(f32::NAN, 0.0, 0.0),
            entity: None,
            layer: ShootingConfig::default().enemy_layer,
        }));
        let err = rig.fire(0.1).unwrap_err();
        assert!(err.to_string().contains(PlayerShootingEngine::NAME));
        assert!(err.root_cause().to_string().contains("not finite"));

        rig.probe.hit.set(Some(ProbeHit {
            point: Vec3::ZERO,
            entity: None,
            layer: CollisionLayer::new(3).unwrap(),
        }));
        assert!(rig.fire(0.1).is_err());
    }

    #[test]
    fn test_player_death_releases_gun() {
        let mut rig = Rig::new(0.1);
        let is_dead = rig.body.borrow().is_dead();

        is_dead.set_value(false);
        rig.fire(0.1).unwrap();
        assert_eq!(rig.probe.casts.get(), 1);

        is_dead.set_value(true);
        rig.fire(0.1).unwrap();
        rig.fire(0.1).unwrap();
        assert_eq!(rig.probe.casts.get(), 1);

        // The player entity is still alive; only control was released.
        assert!(rig.root.nodes_db().contains_entity(rig.player));
    }
}
