//! Entity component system with component-set driven system membership.

use derive_more::{Deref, DerefMut};
use hecs::{Component, EntityRef};

use crate::{prelude::*, Action};

/// Which side a creature is on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ActorKind {
    Player,
    Monster,
}

/// Creature stat block.
///
/// Player and monster are variants of the same component, a query for
/// `ComponentKind::Actor` matches either one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub strength: i32,
    pub endurance: i32,
    pub agility: i32,
    pub luck: i32,
}

/// Grid position of an entity on the level.
///
/// Only movable through `Entity::place` and `Entity::unplace`, which keep
/// the level's occupancy flags in sync.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deref)]
pub struct Position(pub(crate) IVec2);

/// Current hit points, can dip below zero until the dead are reaped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deref, DerefMut)]
pub struct Health(pub i32);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Viewshed {
    pub range: i32,
    /// Needs a field of view recompute.
    pub dirty: bool,
    /// Level indices of the cells seen on the last recompute.
    pub visible: HashSet<usize>,
}

impl Viewshed {
    pub fn new(range: i32) -> Self {
        Viewshed {
            range,
            dirty: true,
            visible: Default::default(),
        }
    }

    pub fn can_see(&self, idx: usize) -> bool {
        self.visible.contains(&idx)
    }
}

/// The next thing the entity is going to do, if decided.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deref, DerefMut)]
pub struct ActionQueue(pub Option<Action>);

/// Component tags that systems declare their requirements with.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComponentKind {
    /// Any `Actor`.
    Actor,
    /// `Actor` of kind `Player`.
    Player,
    /// `Actor` of kind `Monster`.
    Monster,
    Position,
    Health,
    Viewshed,
    ActionQueue,
}

impl ComponentKind {
    pub fn is_present(self, e: &EntityRef) -> bool {
        let actor_kind = || e.get::<&Actor>().map(|a| a.kind);

        match self {
            ComponentKind::Actor => e.has::<Actor>(),
            ComponentKind::Player => actor_kind() == Some(ActorKind::Player),
            ComponentKind::Monster => {
                actor_kind() == Some(ActorKind::Monster)
            }
            ComponentKind::Position => e.has::<Position>(),
            ComponentKind::Health => e.has::<Health>(),
            ComponentKind::Viewshed => e.has::<Viewshed>(),
            ComponentKind::ActionQueue => e.has::<ActionQueue>(),
        }
    }
}

/// Per-turn logic run over every entity that has the required components.
pub trait System {
    /// Components an entity must have to be updated by this system.
    fn requires(&self) -> &'static [ComponentKind];

    /// Update the system's member entities.
    ///
    /// `entities` is a snapshot taken before the update started, entities
    /// destroyed during the update stay alive until the pass is over.
    fn update(&mut self, r: &mut Runtime, entities: &[Entity]);
}

struct SystemSlot {
    // Empty while the system is checked out for an update.
    system: Option<Box<dyn System>>,
    requires: Vec<ComponentKind>,
    members: IndexSet<Entity>,
}

/// Entity component system. Stores all the data of game entities and keeps
/// track of which entities each system operates on.
#[derive(Default)]
pub(crate) struct Ecs {
    world: hecs::World,
    // Live entities in creation order.
    entities: IndexSet<Entity>,
    systems: Vec<SystemSlot>,
    doomed: Vec<Entity>,
}

impl Ecs {
    pub fn add_entity(&mut self) -> Entity {
        let e = Entity(self.world.spawn(()));
        self.entities.insert(e);
        self.refresh(e);
        e
    }

    pub fn contains(&self, e: Entity) -> bool {
        self.entities.contains(&e)
    }

    /// Attach a component, replacing any earlier one of the same type.
    pub fn add_component<T: Component>(&mut self, e: Entity, c: T) {
        if self.world.insert_one(*e, c).is_err() {
            log::debug!("Ecs::add_component: {e} no longer exists");
            return;
        }
        self.refresh(e);
    }

    pub fn remove_component<T: Component>(&mut self, e: Entity) -> Option<T> {
        if !self.contains(e) {
            log::debug!("Ecs::remove_component: {e} no longer exists");
            return None;
        }
        let ret = self.world.remove_one::<T>(*e).ok();
        self.refresh(e);
        ret
    }

    pub fn get_components(&self, e: Entity) -> Option<EntityRef<'_>> {
        self.world.entity(*e).ok()
    }

    /// Iterate entities that have a component matching `kind`, in creation
    /// order.
    pub fn get_all_components(
        &self,
        kind: ComponentKind,
    ) -> impl Iterator<Item = (Entity, EntityRef<'_>)> + '_ {
        self.entities.iter().filter_map(move |&e| {
            let c = self.get_components(e)?;
            kind.is_present(&c).then_some((e, c))
        })
    }

    pub fn has(&self, e: Entity, kind: ComponentKind) -> bool {
        self.get_components(e)
            .is_some_and(|c| kind.is_present(&c))
    }

    pub fn get<T: Component>(&self, e: Entity) -> Option<hecs::Ref<'_, T>> {
        self.world.get::<&T>(*e).ok()
    }

    pub fn get_mut<T: Component>(&mut self, e: Entity) -> Option<&mut T> {
        self.world.query_one_mut::<&mut T>(*e).ok()
    }

    /// Register a system and enroll every existing entity that matches it.
    pub fn add_system(&mut self, system: impl System + 'static) {
        let requires = system.requires().to_vec();
        let members = self
            .entities
            .iter()
            .copied()
            .filter(|&e| requires.iter().all(|&k| self.has(e, k)))
            .collect();

        self.systems.push(SystemSlot {
            system: Some(Box::new(system)),
            requires,
            members,
        });
    }

    /// Remove the entity from every system and delete its data.
    pub fn destroy_entity(&mut self, e: Entity) {
        if !self.entities.shift_remove(&e) {
            log::debug!("Ecs::destroy_entity: {e} no longer exists");
            return;
        }

        for slot in self.systems.iter_mut() {
            slot.members.shift_remove(&e);
        }

        // Was checked to be in `entities`, so hecs must have it too.
        let _ = self.world.despawn(*e);
    }

    /// Schedule the entity to be destroyed at the end of the current
    /// systems pass.
    pub fn queue_destroy(&mut self, e: Entity) {
        if !self.doomed.contains(&e) {
            self.doomed.push(e);
        }
    }

    /// Destroy every entity queued for destruction, returns the ones that
    /// were destroyed.
    pub fn flush_destroyed(&mut self) -> Vec<Entity> {
        let doomed = std::mem::take(&mut self.doomed);
        for &e in &doomed {
            self.destroy_entity(e);
        }
        doomed
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Take the system out of its slot along with a snapshot of its member
    /// list so it can be run against the runtime that owns this ECS.
    pub fn checkout_system(
        &mut self,
        i: usize,
    ) -> Option<(Box<dyn System>, Vec<Entity>)> {
        let slot = self.systems.get_mut(i)?;
        let system = slot.system.take()?;
        Some((system, slot.members.iter().copied().collect()))
    }

    pub fn return_system(&mut self, i: usize, system: Box<dyn System>) {
        if let Some(slot) = self.systems.get_mut(i) {
            slot.system = Some(system);
        }
    }

    #[cfg(test)]
    pub(crate) fn members(&self, i: usize) -> Vec<Entity> {
        self.systems[i].members.iter().copied().collect()
    }

    /// Re-evaluate the entity's membership in every system.
    fn refresh(&mut self, e: Entity) {
        let Ok(c) = self.world.entity(*e) else {
            return;
        };

        for slot in self.systems.iter_mut() {
            if slot.requires.iter().all(|k| k.is_present(&c)) {
                slot.members.insert(e);
            } else {
                slot.members.shift_remove(&e);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Dummy(&'static [ComponentKind]);

    impl System for Dummy {
        fn requires(&self) -> &'static [ComponentKind] {
            self.0
        }

        fn update(&mut self, _r: &mut Runtime, _entities: &[Entity]) {}
    }

    fn dummy(requires: &'static [ComponentKind]) -> Dummy {
        Dummy(requires)
    }

    fn monster() -> Actor {
        Actor {
            kind: ActorKind::Monster,
            strength: 5,
            endurance: 5,
            agility: 5,
            luck: 5,
        }
    }

    #[test]
    fn membership_follows_components() {
        let mut ecs = Ecs::default();
        ecs.add_system(dummy(&[
            ComponentKind::Position,
            ComponentKind::Health,
        ]));

        let e = ecs.add_entity();
        assert!(ecs.members(0).is_empty());

        ecs.add_component(e, Position(ivec2(1, 1)));
        assert!(ecs.members(0).is_empty());

        ecs.add_component(e, Health(10));
        assert_eq!(ecs.members(0), vec![e]);

        assert_eq!(ecs.remove_component::<Health>(e), Some(Health(10)));
        assert!(ecs.members(0).is_empty());
        assert_eq!(ecs.remove_component::<Health>(e), None);
    }

    #[test]
    fn late_system_backfills() {
        let mut ecs = Ecs::default();
        let a = ecs.add_entity();
        let b = ecs.add_entity();
        let c = ecs.add_entity();
        ecs.add_component(a, Health(1));
        ecs.add_component(c, Health(2));
        let _ = b;

        ecs.add_system(dummy(&[ComponentKind::Health]));
        assert_eq!(ecs.members(0), vec![a, c]);
    }

    #[test]
    fn polymorphic_actor() {
        let mut ecs = Ecs::default();
        ecs.add_system(dummy(&[ComponentKind::Actor]));
        ecs.add_system(dummy(&[ComponentKind::Player]));
        ecs.add_system(dummy(&[ComponentKind::Monster]));

        let p = ecs.add_entity();
        ecs.add_component(
            p,
            Actor {
                kind: ActorKind::Player,
                ..monster()
            },
        );
        let m = ecs.add_entity();
        ecs.add_component(m, monster());

        assert_eq!(ecs.members(0), vec![p, m]);
        assert_eq!(ecs.members(1), vec![p]);
        assert_eq!(ecs.members(2), vec![m]);

        let actors: Vec<Entity> = ecs
            .get_all_components(ComponentKind::Actor)
            .map(|(e, _)| e)
            .collect();
        assert_eq!(actors, vec![p, m]);

        let monsters: Vec<Entity> = ecs
            .get_all_components(ComponentKind::Monster)
            .map(|(e, _)| e)
            .collect();
        assert_eq!(monsters, vec![m]);
        assert!(ecs.has(p, ComponentKind::Player));
        assert!(!ecs.has(p, ComponentKind::Monster));
    }

    #[test]
    fn destroy() {
        let mut ecs = Ecs::default();
        ecs.add_system(dummy(&[ComponentKind::Health]));
        let e = ecs.add_entity();
        ecs.add_component(e, Health(3));
        assert_eq!(ecs.members(0), vec![e]);

        ecs.destroy_entity(e);
        assert!(!ecs.contains(e));
        assert!(ecs.members(0).is_empty());
        assert!(ecs.get_components(e).is_none());

        // Operations on the dead are no-ops.
        ecs.add_component(e, Health(5));
        assert!(ecs.members(0).is_empty());
        assert!(ecs.get::<Health>(e).is_none());
        assert_eq!(ecs.remove_component::<Health>(e), None);
        ecs.destroy_entity(e);
    }

    #[test]
    fn deferred_destroy() {
        let mut ecs = Ecs::default();
        let a = ecs.add_entity();
        let b = ecs.add_entity();

        ecs.queue_destroy(a);
        ecs.queue_destroy(a);
        assert!(ecs.contains(a));

        assert_eq!(ecs.flush_destroyed(), vec![a]);
        assert!(!ecs.contains(a));
        assert!(ecs.contains(b));
        assert!(ecs.flush_destroyed().is_empty());
    }

    #[test]
    fn component_access() {
        let mut ecs = Ecs::default();
        let e = ecs.add_entity();
        ecs.add_component(e, Health(4));

        if let Some(h) = ecs.get_mut::<Health>(e) {
            **h -= 6;
        }
        assert_eq!(ecs.get::<Health>(e).map(|h| h.0), Some(-2));
        assert!(ecs.get::<Viewshed>(e).is_none());
    }

    #[test]
    fn checkout() {
        let mut ecs = Ecs::default();
        ecs.add_system(dummy(&[]));
        let e = ecs.add_entity();

        let (system, members) = ecs.checkout_system(0).unwrap();
        assert_eq!(members, vec![e]);
        // Can't check out twice.
        assert!(ecs.checkout_system(0).is_none());
        ecs.return_system(0, system);
        assert!(ecs.checkout_system(0).is_some());
        assert!(ecs.checkout_system(1).is_none());
    }
}
