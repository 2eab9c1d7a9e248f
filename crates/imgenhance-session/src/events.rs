// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session change notifications and the observer registry that fans them out.

use std::sync::Arc;

use imgenhance_core::{ImageId, ParamName, SessionState, SubscriptionId};
use serde::Serialize;

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new source image replaced whatever was loaded before.
    ImageLoaded {
        image_id: ImageId,
        width: u32,
        height: u32,
    },
    /// The session went back to having no image.
    ImageCleared,
    /// A parameter was set; `value` is the clamped value actually stored.
    ParamChanged { name: ParamName, value: f32 },
    /// All parameters went back to their defaults.
    ParamsReset,
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    RenderCompleted {
        image_id: ImageId,
        generation: u64,
        sha256: String,
    },
    RenderFailed { generation: u64, error: String },
    Exported { file_name: String, sha256: String },
}

type Observer = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Subscribers to session events, notified in subscription order.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(SubscriptionId, Observer)>,
}

impl ObserverRegistry {
    pub fn subscribe(&mut self, observer: impl Fn(&SessionEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.observers.push((id, Arc::new(observer)));
        id
    }

    /// Remove a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn emit(&self, event: &SessionEvent) {
        for (_, observer) in &self.observers {
            observer(event);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
