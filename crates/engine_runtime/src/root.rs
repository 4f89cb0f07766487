//! The composition root.
//!
//! [`EnginesRoot`] owns the node database, the registered engines, the
//! scheduler, and the entity allocator. Entities are built and torn down only
//! through it, so every node it stores has been announced to the interested
//! engines and every node it discards has been withdrawn from them.

use std::collections::HashSet;
use std::rc::Rc;

use engine_component::{ComponentSet, Entity, EntityAllocator};
use engine_node::{AnyNode, EntityDescriptor, NodesDb};
use tracing::{debug, info, warn};

use crate::commands::EntityCommands;
use crate::engine::Engine;
use crate::error::RuntimeError;
use crate::registry::EngineRegistry;
use crate::scheduler::Scheduler;
use crate::signals::{FrameInput, FrameSignals};

/// Owns engines and entities for one game session.
#[derive(Debug)]
pub struct EnginesRoot {
    db: Rc<NodesDb>,
    registry: EngineRegistry,
    scheduler: Scheduler,
    commands: EntityCommands,
    allocator: EntityAllocator,
    /// Reserved IDs that have not been released yet, built or not.
    live: HashSet<Entity>,
}

impl Default for EnginesRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl EnginesRoot {
    /// Create a new root with no engines and no entities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            db: Rc::new(NodesDb::new()),
            registry: EngineRegistry::new(),
            scheduler: Scheduler::new(FrameSignals::new()),
            commands: EntityCommands::new(),
            allocator: EntityAllocator::new(),
            live: HashSet::new(),
        }
    }

    /// Shared handle to the node database, for engines that query it.
    #[must_use]
    pub fn nodes_db(&self) -> Rc<NodesDb> {
        Rc::clone(&self.db)
    }

    /// Handle for requesting deferred entity removal.
    #[must_use]
    pub fn commands(&self) -> EntityCommands {
        self.commands.clone()
    }

    /// Handle onto the per-frame input.
    #[must_use]
    pub fn signals(&self) -> FrameSignals {
        self.scheduler.signals().clone()
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.scheduler.frame()
    }

    #[must_use]
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Register an engine.
    ///
    /// Its accepted node types are registered with the node database, and
    /// every node of those types that already exists is handed to it.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateEngine`] if the name is taken.
    pub fn add_engine<E: Engine + 'static>(&mut self, engine: E) -> Result<usize, RuntimeError> {
        let index = self.registry.register(Box::new(engine))?;
        let accepted = self
            .registry
            .info(index)
            .map(|info| info.accepted.clone())
            .unwrap_or_default();

        let mut replayed = 0;
        for descriptor in accepted {
            let type_id = descriptor.type_id();
            self.db.register(descriptor);
            for node in self.db.nodes_of_type(type_id) {
                self.registry.notify_add_to(index, &node);
                replayed += 1;
            }
        }
        if replayed > 0 {
            debug!(index, replayed, "caught engine up with existing nodes");
        }
        Ok(index)
    }

    /// Reserve an entity ID so components and dispatchers can be keyed by it
    /// before the entity is built.
    pub fn reserve_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.live.insert(entity);
        entity
    }

    /// Build every registered node type the components satisfy and announce
    /// the nodes to the engines that accept them.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownEntity`] if the ID was not reserved here, or a
    /// [`RuntimeError::Node`] from composition or storage. On error nothing
    /// is stored and no engine is notified.
    pub fn build_entity(
        &mut self,
        entity: Entity,
        components: &ComponentSet,
    ) -> Result<Vec<AnyNode>, RuntimeError> {
        self.check_reserved(entity)?;
        let nodes = self.db.compose(entity, components)?;
        self.store_and_announce(entity, nodes)
    }

    /// Build exactly the node types listed by `descriptor`.
    ///
    /// # Errors
    ///
    /// As [`build_entity`](Self::build_entity); additionally a missing
    /// capability is reported as [`engine_node::NodeError::MissingComponent`].
    pub fn build_entity_with(
        &mut self,
        entity: Entity,
        descriptor: &EntityDescriptor,
        components: &ComponentSet,
    ) -> Result<Vec<AnyNode>, RuntimeError> {
        self.check_reserved(entity)?;
        let nodes = self.db.compose_with(entity, descriptor, components)?;
        self.store_and_announce(entity, nodes)
    }

    fn check_reserved(&self, entity: Entity) -> Result<(), RuntimeError> {
        if self.live.contains(&entity) {
            Ok(())
        } else {
            Err(RuntimeError::UnknownEntity(entity))
        }
    }

    fn store_and_announce(
        &mut self,
        entity: Entity,
        nodes: Vec<AnyNode>,
    ) -> Result<Vec<AnyNode>, RuntimeError> {
        self.db.insert(entity, nodes.clone())?;
        for node in &nodes {
            self.registry.notify_add(node);
        }
        debug!(entity = entity.id(), nodes = nodes.len(), "entity built");
        Ok(nodes)
    }

    /// Tear an entity down immediately: engines see `remove` for each node in
    /// reverse composition order, then the nodes are discarded and the ID is
    /// released. A reserved but never built entity just has its ID released.
    /// Any queued removal of the entity is withdrawn before the ID can be
    /// reused.
    ///
    /// Do not call this from inside a tick; engines use [`EntityCommands`].
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownEntity`] if the entity is neither stored nor
    /// reserved.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<(), RuntimeError> {
        if self.db.contains_entity(entity) {
            let nodes = self.db.nodes_of(entity);
            for node in nodes.iter().rev() {
                self.registry.notify_remove(node);
            }
            self.db.remove(entity)?;
        } else if !self.live.contains(&entity) {
            return Err(RuntimeError::UnknownEntity(entity));
        }

        self.commands.cancel(entity);
        if self.live.remove(&entity) {
            self.allocator.release(entity);
        }
        debug!(entity = entity.id(), "entity removed");
        Ok(())
    }

    /// Apply every queued removal, including removals queued by engines while
    /// reacting to earlier ones. Returns the number of entities removed.
    pub fn flush_removals(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let batch = self.commands.take();
            if batch.is_empty() {
                break;
            }
            for entity in batch {
                match self.remove_entity(entity) {
                    Ok(()) => removed += 1,
                    Err(err) => warn!(entity = entity.id(), %err, "dropping queued removal"),
                }
            }
        }
        removed
    }

    /// Run one frame, then flush removals requested during it.
    ///
    /// Removals are flushed even when an engine fails.
    ///
    /// # Errors
    ///
    /// The first engine error of the frame.
    pub fn tick(&mut self, delta: f32, input: FrameInput) -> anyhow::Result<()> {
        let result = self
            .scheduler
            .run_frame(self.registry.engines_mut(), delta, input);
        let removed = self.flush_removals();
        if removed > 0 {
            info!(frame = self.scheduler.frame(), removed, "flushed entity removals");
        }
        result
    }

    /// Number of built entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.db.entity_count()
    }

    /// Number of reserved IDs not yet released.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn engine_count(&self) -> usize {
        self.registry.engine_count()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use engine_component::{Component, ComponentMeta, ComponentRef};
    use engine_node::{Node, NodeDescriptor, NodeError};
    use engine_observable::{DispatcherOnSet, SubscriptionId};

    use super::*;
    use crate::engine::Tickable;
    use crate::routes::NodeRoutes;

    trait LifeComponent: Component {
        fn is_dead(&self) -> DispatcherOnSet<bool>;
    }
    trait LabelComponent: Component {
        fn label(&self) -> &'static str;
    }

    struct Creature {
        is_dead: DispatcherOnSet<bool>,
    }
    impl Component for Creature {}
    impl LifeComponent for Creature {
        fn is_dead(&self) -> DispatcherOnSet<bool> {
            self.is_dead.clone()
        }
    }
    impl LabelComponent for Creature {
        fn label(&self) -> &'static str {
            "creature"
        }
    }

    #[derive(Clone)]
    struct LifeNode {
        entity: Entity,
        life: ComponentRef<dyn LifeComponent>,
    }

    impl Node for LifeNode {
        fn type_name() -> &'static str {
            "LifeNode"
        }
        fn required_components() -> Vec<ComponentMeta> {
            vec![ComponentMeta::of::<dyn LifeComponent>()]
        }
        fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
            Some(Self {
                entity,
                life: components.get()?,
            })
        }
        fn entity(&self) -> Entity {
            self.entity
        }
    }

    #[derive(Clone)]
    struct LabelNode {
        entity: Entity,
        _label: ComponentRef<dyn LabelComponent>,
    }

    impl Node for LabelNode {
        fn type_name() -> &'static str {
            "LabelNode"
        }
        fn required_components() -> Vec<ComponentMeta> {
            vec![ComponentMeta::of::<dyn LabelComponent>()]
        }
        fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
            Some(Self {
                entity,
                _label: components.get()?,
            })
        }
        fn entity(&self) -> Entity {
            self.entity
        }
    }

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Subscribes to each creature's death and queues its removal.
    struct Reaper {
        routes: Rc<NodeRoutes<Self>>,
        commands: EntityCommands,
        journal: Journal,
        subscriptions: HashMap<Entity, SubscriptionId>,
    }

    impl Reaper {
        fn new(commands: EntityCommands, journal: &Journal) -> Self {
            Self {
                routes: Rc::new(
                    NodeRoutes::new("reaper")
                        .route::<LifeNode>(Self::add_life, Self::remove_life)
                        .route::<LabelNode>(Self::add_label, Self::remove_label),
                ),
                commands,
                journal: Rc::clone(journal),
                subscriptions: HashMap::new(),
            }
        }

        fn add_life(&mut self, node: &LifeNode) {
            let commands = self.commands.clone();
            let id = node.life.borrow().is_dead().subscribe(move |entity, dead| {
                if *dead {
                    commands.remove(entity);
                }
            });
            self.subscriptions.insert(node.entity, id);
            self.journal.borrow_mut().push(format!("+life {}", node.entity.id()));
        }

        fn remove_life(&mut self, node: &LifeNode) {
            if let Some(id) = self.subscriptions.remove(&node.entity) {
                node.life.borrow().is_dead().unsubscribe(id);
            }
            self.journal.borrow_mut().push(format!("-life {}", node.entity.id()));
        }

        fn add_label(&mut self, node: &LabelNode) {
            self.journal.borrow_mut().push(format!("+label {}", node.entity.id()));
        }

        fn remove_label(&mut self, node: &LabelNode) {
            self.journal.borrow_mut().push(format!("-label {}", node.entity.id()));
        }
    }

    impl Engine for Reaper {
        fn name(&self) -> &'static str {
            "reaper"
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
    }

    struct Failing;

    impl Engine for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn as_tickable(&mut self) -> Option<&mut dyn Tickable> {
            Some(self)
        }
    }

    impl Tickable for Failing {
        fn tick(&mut self, _delta: f32) -> anyhow::Result<()> {
            anyhow::bail!("broken")
        }
    }

    fn spawn_creature(root: &mut EnginesRoot) -> (Entity, Rc<RefCell<Creature>>) {
        let entity = root.reserve_entity();
        let creature = Rc::new(RefCell::new(Creature {
            is_dead: DispatcherOnSet::new(entity, false),
        }));
        let components = ComponentSet::new()
            .with::<dyn LifeComponent>(creature.clone())
            .with::<dyn LabelComponent>(creature.clone());
        root.build_entity(entity, &components).unwrap();
        (entity, creature)
    }

    #[test]
    fn test_add_remove_round_trip() {
        let journal = Journal::default();
        let mut root = EnginesRoot::new();
        root.add_engine(Reaper::new(root.commands(), &journal)).unwrap();

        let (entity, creature) = spawn_creature(&mut root);
        let is_dead = creature.borrow().is_dead();
        assert_eq!(is_dead.subscriber_count(), 1);
        assert_eq!(root.entity_count(), 1);

        root.remove_entity(entity).unwrap();

        assert_eq!(is_dead.subscriber_count(), 0);
        assert_eq!(root.entity_count(), 0);
        assert_eq!(root.live_count(), 0);
        assert!(root.nodes_db().try_query_node::<LifeNode>(entity).is_none());
        assert_eq!(
            *journal.borrow(),
            vec!["+life 1", "+label 1", "-label 1", "-life 1"]
        );
    }

    #[test]
    fn test_removal_deferred_to_frame_end() {
        let journal = Journal::default();
        let mut root = EnginesRoot::new();
        root.add_engine(Reaper::new(root.commands(), &journal)).unwrap();
        let (entity, creature) = spawn_creature(&mut root);

        let is_dead = creature.borrow().is_dead();
        is_dead.set_value(true);
        is_dead.set_value(true);
        assert!(root.commands().is_pending(entity));
        assert_eq!(root.commands().len(), 1);
        assert!(root.nodes_db().contains_entity(entity));

        root.tick(0.1, FrameInput::default()).unwrap();
        assert!(!root.nodes_db().contains_entity(entity));
        assert!(root.commands().is_empty());
    }

    #[test]
    fn test_late_engine_sees_existing_nodes() {
        let journal = Journal::default();
        let mut root = EnginesRoot::new();
        root.nodes_db().register_node::<LifeNode>();
        root.nodes_db().register_node::<LabelNode>();
        let (entity, _creature) = spawn_creature(&mut root);

        root.add_engine(Reaper::new(root.commands(), &journal)).unwrap();

        assert_eq!(*journal.borrow(), vec!["+life 1", "+label 1"]);
        assert_eq!(entity, Entity::from_raw(1));
    }

    #[test]
    fn test_unsatisfied_node_types_skipped() {
        let journal = Journal::default();
        let mut root = EnginesRoot::new();
        root.add_engine(Reaper::new(root.commands(), &journal)).unwrap();

        let entity = root.reserve_entity();
        let creature = Rc::new(RefCell::new(Creature {
            is_dead: DispatcherOnSet::new(entity, false),
        }));
        let nodes = root
            .build_entity(
                entity,
                &ComponentSet::new().with::<dyn LabelComponent>(creature),
            )
            .unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(*journal.borrow(), vec!["+label 1"]);
    }

    #[test]
    fn test_strict_build_reports_missing_capability() {
        let journal = Journal::default();
        let mut root = EnginesRoot::new();
        root.add_engine(Reaper::new(root.commands(), &journal)).unwrap();

        let entity = root.reserve_entity();
        let creature = Rc::new(RefCell::new(Creature {
            is_dead: DispatcherOnSet::new(entity, false),
        }));
        let descriptor = EntityDescriptor::new("creature")
            .with_node::<LabelNode>()
            .with_node::<LifeNode>();
        let err = root
            .build_entity_with(
                entity,
                &descriptor,
                &ComponentSet::new().with::<dyn LabelComponent>(creature),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Node(NodeError::MissingComponent { node: "LifeNode", .. })
        ));
        assert!(journal.borrow().is_empty());
        assert_eq!(root.entity_count(), 0);

        // The reservation survives a failed build and can be released.
        root.remove_entity(entity).unwrap();
        assert_eq!(root.live_count(), 0);
    }

    #[test]
    fn test_unknown_entities_rejected() {
        let mut root = EnginesRoot::new();
        let stranger = Entity::from_raw(42);
        assert!(matches!(
            root.build_entity(stranger, &ComponentSet::new()),
            Err(RuntimeError::UnknownEntity(_))
        ));
        assert!(matches!(
            root.remove_entity(stranger),
            Err(RuntimeError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_released_ids_are_reused() {
        let mut root = EnginesRoot::new();
        let first = root.reserve_entity();
        root.build_entity(first, &ComponentSet::new()).unwrap();
        root.remove_entity(first).unwrap();
        assert_eq!(root.reserve_entity(), first);
    }

    #[test]
    fn test_direct_removal_withdraws_queued_request() {
        let journal = Journal::default();
        let mut root = EnginesRoot::new();
        root.add_engine(Reaper::new(root.commands(), &journal)).unwrap();

        let (old, creature) = spawn_creature(&mut root);
        creature.borrow().is_dead().set_value(true);
        assert!(root.commands().is_pending(old));

        root.remove_entity(old).unwrap();
        assert!(root.commands().is_empty());

        let (new, _creature) = spawn_creature(&mut root);
        assert_eq!(new, old);

        root.tick(0.1, FrameInput::default()).unwrap();
        assert!(root.nodes_db().contains_entity(new));
        assert!(root.nodes_db().try_query_node::<LifeNode>(new).is_some());
        assert_eq!(root.live_count(), 1);
    }

    #[test]
    fn test_tick_error_still_flushes() {
        let mut root = EnginesRoot::new();
        root.add_engine(Failing).unwrap();
        let entity = root.reserve_entity();
        root.build_entity(entity, &ComponentSet::new()).unwrap();
        root.commands().remove(entity);

        let err = root.tick(0.1, FrameInput::default()).unwrap_err();
        assert!(err.to_string().contains("failing"));
        assert_eq!(root.entity_count(), 0);
        assert_eq!(root.frame(), 1);
    }

    #[test]
    fn test_duplicate_engine_rejected() {
        let mut root = EnginesRoot::new();
        root.add_engine(Failing).unwrap();
        assert!(matches!(
            root.add_engine(Failing),
            Err(RuntimeError::DuplicateEngine("failing"))
        ));
        assert_eq!(root.engine_count(), 1);
    }
}
