use std::any::{type_name, TypeId};

use crate::dispatch::Subscriber;
use crate::reactive::{Reactive, ReactiveStore};
use crate::storage::NotificationKind;
use crate::{Component, ComponentStore, Entity};

use super::World;

impl World {
    /// Starts tracking changes to `T`, baselined on the store's current
    /// contents. Tracking an already tracked type does nothing.
    pub fn track_changes<T: Component + Clone>(&mut self) {
        self.reactive_slot::<T>();
    }

    /// Change tracking view for `T`, tracking it first if needed.
    pub fn reactive<T: Component + Clone>(&mut self) -> Reactive<'_, T> {
        let slot = self.reactive_slot::<T>();
        let id = self.register::<T>();

        let tracker = self.reactives[slot]
            .as_any_mut()
            .downcast_mut::<ReactiveStore<T>>()
            .expect("Failed to downcast reactive tracker for component type");
        let store = self.storages[id.index()]
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .expect("Failed to downcast storage for component type");

        Reactive::new(tracker, store)
    }

    /// Starts a new observation window on every tracker.
    pub fn update_reactive(&mut self) {
        for tracker in &mut self.reactives {
            tracker.update(&self.storages);
        }
    }

    /// Calls `f` for every entity whose `T` differs from the tracker's
    /// baseline, without allocating. The store stays locked for the walk.
    pub fn for_each_changed<T, F>(&mut self, mut f: F)
    where
        T: Component + Clone + PartialEq,
        F: FnMut(&mut World, Entity),
    {
        let slot = self.reactive_slot::<T>();
        let id = self.register::<T>();
        self.begin_session(&[id]);

        let count = self.store::<T>(id).len();
        for index in 0..count {
            let store = self.store::<T>(id);
            let Some(entity) = store.entities().get(index).copied() else {
                break;
            };
            let changed = self.reactives[slot]
                .as_any()
                .downcast_ref::<ReactiveStore<T>>()
                .is_some_and(|tracker| tracker.is_changed(entity, store));
            if changed && self.is_entity_active(entity) {
                f(self, entity);
            }
        }

        self.end_session(&[id]);
    }

    fn reactive_slot<T: Component + Clone>(&mut self) -> usize {
        let type_id = TypeId::of::<T>();
        if let Some(slot) = self.reactive_slots.get(&type_id) {
            return *slot;
        }

        let id = self.register::<T>();
        let tracker = ReactiveStore::new(self.store::<T>(id));
        let slot = self.reactives.len();
        self.reactives.push(Box::new(tracker));
        self.reactive_slots.insert(type_id, slot);

        for kind in [NotificationKind::Added, NotificationKind::Removed] {
            self.dispatcher.subscribe(id, kind, Subscriber::Reactive(slot));
        }

        tracing::debug!(component = type_name::<T>(), slot, "reactive tracker registered");
        slot
    }
}
