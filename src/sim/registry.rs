//! Entity registry
//!
//! Platforms, enemies and power-ups live in generational arenas keyed by
//! `EntityId`. Ids stay valid until the entity is removed; a stale id simply
//! misses, so every removal is idempotent. Removal releases the renderer
//! sprite before the record is dropped.

use glam::Vec2;

use super::presenter::{Presenter, release_quietly};
use super::state::{Enemy, EnemyKind, Platform, PlatformKind, PowerUp};

/// Stable id of a registry entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena with O(1) insert, lookup and removal
#[derive(Debug, Clone)]
pub struct Store<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Store<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            EntityId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            EntityId {
                index,
                generation: 0,
            }
        }
    }

    /// Remove and return the entity; `None` if the id is absent or stale
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_mut())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| {
                (
                    EntityId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    v,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.value.as_mut().map(|v| {
                (
                    EntityId {
                        index: i as u32,
                        generation,
                    },
                    v,
                )
            })
        })
    }

    /// Ids matching a predicate (collected so the store can be mutated after)
    pub fn ids_where(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, v)| pred(*v))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Live collections for one run
#[derive(Debug, Default)]
pub struct Registry {
    platforms: Store<Platform>,
    enemies: Store<Enemy>,
    power_ups: Store<PowerUp>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_platform(
        &mut self,
        presenter: &mut dyn Presenter,
        kind: PlatformKind,
        pos: Vec2,
        direction: i8,
    ) -> EntityId {
        let handle = presenter.spawn(kind.sprite(), pos);
        self.platforms
            .insert(Platform::new(kind, pos, direction, handle))
    }

    pub fn add_enemy(
        &mut self,
        presenter: &mut dyn Presenter,
        kind: EnemyKind,
        pos: Vec2,
    ) -> EntityId {
        let handle = presenter.spawn(kind.sprite(), pos);
        self.enemies.insert(Enemy::new(kind, pos, handle))
    }

    pub fn add_power_up(
        &mut self,
        presenter: &mut dyn Presenter,
        pos: Vec2,
        duration_ms: u32,
    ) -> EntityId {
        let handle = presenter.spawn(super::presenter::Sprite::PowerUp, pos);
        self.power_ups
            .insert(PowerUp::invincibility(pos, duration_ms, handle))
    }

    /// Returns whether anything was removed
    pub fn remove_platform(&mut self, presenter: &mut dyn Presenter, id: EntityId) -> bool {
        let Some(handle) = self.platforms.get(id).map(|p| p.handle) else {
            return false;
        };
        release_quietly(presenter, handle);
        self.platforms.remove(id).is_some()
    }

    pub fn remove_enemy(&mut self, presenter: &mut dyn Presenter, id: EntityId) -> bool {
        let Some(handle) = self.enemies.get(id).map(|e| e.handle) else {
            return false;
        };
        release_quietly(presenter, handle);
        self.enemies.remove(id).is_some()
    }

    pub fn remove_power_up(&mut self, presenter: &mut dyn Presenter, id: EntityId) -> bool {
        let Some(handle) = self.power_ups.get(id).map(|p| p.handle) else {
            return false;
        };
        release_quietly(presenter, handle);
        self.power_ups.remove(id).is_some()
    }

    pub fn platforms(&self) -> &Store<Platform> {
        &self.platforms
    }

    pub fn enemies(&self) -> &Store<Enemy> {
        &self.enemies
    }

    pub fn power_ups(&self) -> &Store<PowerUp> {
        &self.power_ups
    }

    pub(crate) fn platforms_mut(&mut self) -> &mut Store<Platform> {
        &mut self.platforms
    }

    pub(crate) fn enemies_mut(&mut self) -> &mut Store<Enemy> {
        &mut self.enemies
    }

    /// Release every sprite and empty all collections
    pub fn clear(&mut self, presenter: &mut dyn Presenter) {
        for (_, p) in self.platforms.iter() {
            release_quietly(presenter, p.handle);
        }
        for (_, e) in self.enemies.iter() {
            release_quietly(presenter, e.handle);
        }
        for (_, p) in self.power_ups.iter() {
            release_quietly(presenter, p.handle);
        }
        self.platforms = Store::new();
        self.enemies = Store::new();
        self.power_ups = Store::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::presenter::RecordingPresenter;

    #[test]
    fn test_store_reuses_slots_with_new_generation() {
        let mut store = Store::new();
        let a = store.insert("a");
        let b = store.insert("b");
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove(a), Some("a"));
        assert_eq!(store.remove(a), None);
        assert!(!store.contains(a));

        let c = store.insert("c");
        assert_ne!(a, c);
        assert_eq!(store.get(a), None);
        assert_eq!(store.get(c), Some(&"c"));
        assert_eq!(store.get(b), Some(&"b"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut store = Store::new();
        let ids: Vec<_> = (0..5).map(|i| store.insert(i)).collect();
        store.remove(ids[1]);
        store.remove(ids[3]);
        let live: Vec<_> = store.iter().map(|(_, v)| *v).collect();
        assert_eq!(live, vec![0, 2, 4]);
        assert_eq!(store.ids_where(|v| *v >= 2), vec![ids[2], ids[4]]);
    }

    #[test]
    fn test_removal_releases_sprite_once() {
        let mut presenter = RecordingPresenter::new();
        let mut registry = Registry::new();
        let id = registry.add_platform(&mut presenter, PlatformKind::Normal, Vec2::ZERO, 0);
        let handle = registry.platforms().get(id).unwrap().handle;
        assert!(presenter.is_live(handle));

        assert!(registry.remove_platform(&mut presenter, id));
        assert!(!registry.remove_platform(&mut presenter, id));
        assert!(!presenter.is_live(handle));
        assert_eq!(presenter.releases_of(handle), 1);
    }

    #[test]
    fn test_failed_release_still_removes() {
        let mut presenter = RecordingPresenter::new();
        presenter.reject_releases = true;
        let mut registry = Registry::new();
        let id = registry.add_enemy(&mut presenter, EnemyKind::Alien, Vec2::ZERO);
        assert!(registry.remove_enemy(&mut presenter, id));
        assert!(registry.enemies().is_empty());
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut presenter = RecordingPresenter::new();
        let mut registry = Registry::new();
        registry.add_platform(&mut presenter, PlatformKind::Moving, Vec2::ZERO, 1);
        registry.add_enemy(&mut presenter, EnemyKind::Ufo, Vec2::ZERO);
        registry.add_power_up(&mut presenter, Vec2::ZERO, 2000);
        assert_eq!(presenter.live_count(), 3);

        registry.clear(&mut presenter);
        assert_eq!(presenter.live_count(), 0);
        assert!(registry.platforms().is_empty());
        assert!(registry.enemies().is_empty());
        assert!(registry.power_ups().is_empty());
    }
}
