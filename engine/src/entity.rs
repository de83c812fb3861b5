//! Generic entity logic.
use std::fmt;

use derive_more::Deref;
use hecs::Component;

use crate::{ecs::*, prelude::*};

// Dummy wrapper so we can write impls for it directly instead of deriving a
// trait for hecs::Entity and writing every fn signature twice.
/// Game entity identifier datatype. All the actual contents live in the ECS.
#[derive(
    Copy, Clone, Hash, Eq, Ord, PartialEq, PartialOrd, Debug, Deref,
)]
pub struct Entity(pub(crate) hecs::Entity);

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.id())
    }
}

impl Entity {
    /// Get a copy of a component the entity is known to have.
    ///
    /// Panics if the component is missing, systems should only ask for the
    /// components they require.
    pub fn get<T>(&self, r: &impl AsRef<Runtime>) -> T
    where
        T: Component + Clone,
    {
        match self.try_get(r) {
            Some(c) => c,
            None => panic!(
                "{self}: missing {} component",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Get a copy of a component that the entity may or may not have.
    pub fn try_get<T>(&self, r: &impl AsRef<Runtime>) -> Option<T>
    where
        T: Component + Clone,
    {
        let r = r.as_ref();
        r.ecs.get::<T>(*self).map(|c| (*c).clone())
    }

    pub fn has(&self, r: &impl AsRef<Runtime>, kind: ComponentKind) -> bool {
        let r = r.as_ref();
        r.ecs.has(*self, kind)
    }

    pub(crate) fn set<T: Component>(
        &self,
        r: &mut impl AsMut<Runtime>,
        val: T,
    ) {
        let r = r.as_mut();
        r.ecs.add_component(*self, val);
    }

    /// Access a component using a closure.
    ///
    /// Use for complex components that aren't just atomic values.
    pub(crate) fn with<T: Component, U>(
        &self,
        r: &impl AsRef<Runtime>,
        f: impl FnOnce(&T) -> U,
    ) -> U {
        let r = r.as_ref();
        match r.ecs.get::<T>(*self) {
            Some(c) => f(&*c),
            None => panic!(
                "{self}: missing {} component",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Access and mutate a component using a closure.
    pub(crate) fn with_mut<T: Component, U>(
        &self,
        r: &mut impl AsMut<Runtime>,
        f: impl FnOnce(&mut T) -> U,
    ) -> U {
        let r = r.as_mut();
        match r.ecs.get_mut::<T>(*self) {
            Some(c) => f(c),
            None => panic!(
                "{self}: missing {} component",
                std::any::type_name::<T>()
            ),
        }
    }

    pub fn is_alive(&self, r: &impl AsRef<Runtime>) -> bool {
        let r = r.as_ref();
        r.ecs.contains(*self)
    }

    pub fn is_player(&self, r: &impl AsRef<Runtime>) -> bool {
        self.has(r, ComponentKind::Player)
    }

    pub fn pos(&self, r: &impl AsRef<Runtime>) -> Option<IVec2> {
        self.try_get::<Position>(r).map(|p| *p)
    }

    /// Move the entity to a new position on the level.
    ///
    /// Unblocks the old cell and blocks the new one in the same step, an
    /// entity without a position yet gets one.
    pub fn place(&self, r: &mut impl AsMut<Runtime>, pos: IVec2) {
        let r = r.as_mut();
        if !self.is_alive(r) {
            log::debug!("Entity::place: {self} no longer exists");
            return;
        }

        match r.ecs.get_mut::<Position>(*self) {
            Some(p) => {
                let old = p.0;
                p.0 = pos;
                r.level.unblock(old);
            }
            None => r.ecs.add_component(*self, Position(pos)),
        }
        r.level.block(pos);
    }

    /// Take the entity off the level and free up its cell.
    pub fn unplace(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        if let Some(Position(p)) = r.ecs.remove_component::<Position>(*self)
        {
            r.level.unblock(p);
        }
    }

    /// Display character.
    pub fn glyph(&self, r: &impl AsRef<Runtime>) -> char {
        self.try_get::<Actor>(r).map_or('?', |a| a.glyph())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MAP: &str = "
        #####
        #@..#
        #...#
        #####";

    #[test]
    fn placement_blocks() {
        let mut r = Runtime::fixture(MAP);
        let e = r.ecs.add_entity();

        assert_eq!(e.pos(&r), None);
        e.place(&mut r, ivec2(2, 1));
        assert_eq!(e.pos(&r), Some(ivec2(2, 1)));
        assert!(r.level().is_blocked(ivec2(2, 1)));

        e.place(&mut r, ivec2(3, 2));
        assert!(!r.level().is_blocked(ivec2(2, 1)));
        assert!(r.level().is_blocked(ivec2(3, 2)));

        e.unplace(&mut r);
        assert_eq!(e.pos(&r), None);
        assert!(!r.level().is_blocked(ivec2(3, 2)));
    }

    #[test]
    fn component_access() {
        let mut r = Runtime::fixture(MAP);
        let e = r.ecs.add_entity();
        e.set(&mut r, Health(7));

        assert_eq!(e.get::<Health>(&r), Health(7));
        e.with_mut(&mut r, |h: &mut Health| **h -= 2);
        assert_eq!(e.with(&r, |h: &Health| h.0), 5);
        assert_eq!(e.try_get::<Viewshed>(&r), None);
        assert!(e.has(&r, ComponentKind::Health));
        assert!(!e.is_player(&r));
        assert_eq!(e.glyph(&r), '?');
    }

    #[test]
    #[should_panic]
    fn missing_component_panics() {
        let mut r = Runtime::fixture(MAP);
        let e = r.ecs.add_entity();
        let _ = e.get::<Health>(&r);
    }
}
