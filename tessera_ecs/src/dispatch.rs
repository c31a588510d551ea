//! Explicit subscription lists from store notifications to their consumers.

use crate::component::ComponentId;
use crate::group::GroupId;
use crate::storage::{Notification, NotificationKind};

/// Who receives a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subscriber {
    /// A group that re-evaluates its matcher for the entity.
    Group(GroupId),
    /// A reactive tracker, by its slot in the world.
    Reactive(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub kind: NotificationKind,
    pub subscriber: Subscriber,
}

/// Per-component subscription lists, delivered in subscription order.
#[derive(Debug, Default)]
pub struct Dispatcher {
    by_component: Vec<Vec<Subscription>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription unless an identical one already exists.
    pub fn subscribe(
        &mut self,
        component: ComponentId,
        kind: NotificationKind,
        subscriber: Subscriber,
    ) {
        let index = component.index();
        if index >= self.by_component.len() {
            self.by_component.resize_with(index + 1, Vec::new);
        }

        let subscription = Subscription { kind, subscriber };
        let list = &mut self.by_component[index];
        if !list.contains(&subscription) {
            list.push(subscription);
        }
    }

    pub fn subscriptions(&self, component: ComponentId) -> &[Subscription] {
        self.by_component
            .get(component.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Subscribers interested in `notification`, in subscription order.
    pub fn recipients(
        &self,
        component: ComponentId,
        notification: Notification,
    ) -> impl Iterator<Item = Subscriber> + '_ {
        let kind = notification.kind();
        self.subscriptions(component)
            .iter()
            .filter(move |subscription| subscription.kind == kind)
            .map(|subscription| subscription.subscriber)
    }
}
