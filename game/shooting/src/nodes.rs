//! Node types used by the shooting and damage engines, and the entity
//! descriptors that build them.

use engine_component::{ComponentMeta, ComponentRef, ComponentSet, Entity};
use engine_node::{EntityDescriptor, Node};
use game_components::{
    DamageEventComponent, GunAttributesComponent, GunHitTargetComponent, HealthComponent,
    TargetTypeComponent,
};

/// The gun the player controls.
#[derive(Clone)]
pub struct PlayerGunNode {
    pub entity: Entity,
    pub gun: ComponentRef<dyn GunAttributesComponent>,
    pub hit: ComponentRef<dyn GunHitTargetComponent>,
}

impl Node for PlayerGunNode {
    fn type_name() -> &'static str {
        "PlayerGunNode"
    }

    fn required_components() -> Vec<ComponentMeta> {
        vec![
            ComponentMeta::of::<dyn GunAttributesComponent>(),
            ComponentMeta::of::<dyn GunHitTargetComponent>(),
        ]
    }

    fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
        Some(Self {
            entity,
            gun: components.get()?,
            hit: components.get()?,
        })
    }

    fn entity(&self) -> Entity {
        self.entity
    }
}

/// The player's own body, watched for death.
#[derive(Clone)]
pub struct PlayerNode {
    pub entity: Entity,
    pub health: ComponentRef<dyn HealthComponent>,
}

impl Node for PlayerNode {
    fn type_name() -> &'static str {
        "PlayerNode"
    }

    fn required_components() -> Vec<ComponentMeta> {
        vec![ComponentMeta::of::<dyn HealthComponent>()]
    }

    fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
        Some(Self {
            entity,
            health: components.get()?,
        })
    }

    fn entity(&self) -> Entity {
        self.entity
    }
}

/// Something the player can shoot and kill.
#[derive(Clone)]
pub struct PlayerTargetNode {
    pub entity: Entity,
    pub health: ComponentRef<dyn HealthComponent>,
    pub damage: ComponentRef<dyn DamageEventComponent>,
    pub target_type: ComponentRef<dyn TargetTypeComponent>,
}

impl Node for PlayerTargetNode {
    fn type_name() -> &'static str {
        "PlayerTargetNode"
    }

    fn required_components() -> Vec<ComponentMeta> {
        vec![
            ComponentMeta::of::<dyn HealthComponent>(),
            ComponentMeta::of::<dyn DamageEventComponent>(),
            ComponentMeta::of::<dyn TargetTypeComponent>(),
        ]
    }

    fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
        Some(Self {
            entity,
            health: components.get()?,
            damage: components.get()?,
            target_type: components.get()?,
        })
    }

    fn entity(&self) -> Entity {
        self.entity
    }
}

/// Anything with health that takes damage events.
#[derive(Clone)]
pub struct DamageableNode {
    pub entity: Entity,
    pub health: ComponentRef<dyn HealthComponent>,
    pub damage: ComponentRef<dyn DamageEventComponent>,
}

impl Node for DamageableNode {
    fn type_name() -> &'static str {
        "DamageableNode"
    }

    fn required_components() -> Vec<ComponentMeta> {
        vec![
            ComponentMeta::of::<dyn HealthComponent>(),
            ComponentMeta::of::<dyn DamageEventComponent>(),
        ]
    }

    fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
        Some(Self {
            entity,
            health: components.get()?,
            damage: components.get()?,
        })
    }

    fn entity(&self) -> Entity {
        self.entity
    }
}

/// Player: a controllable gun on a damageable body.
///
/// Players and enemies share capabilities, so they are built strictly from
/// these descriptors; open composition would give an enemy a `PlayerNode`.
#[must_use]
pub fn player_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("player")
        .with_node::<PlayerNode>()
        .with_node::<PlayerGunNode>()
        .with_node::<DamageableNode>()
}

/// Enemy: a damageable, classified target.
#[must_use]
pub fn enemy_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("enemy")
        .with_node::<PlayerTargetNode>()
        .with_node::<DamageableNode>()
}
