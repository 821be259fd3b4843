//! In-memory views driving the screens: every known event, and the liked ones.

use serde::{Deserialize, Serialize};

use crate::event::{Event, NaturalKey};

/// Screens that show events. Logging out is an action, not a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeTab {
    Discover,
    MyEvents,
}

#[derive(Debug, Clone, Default)]
pub struct EventFeed {
    all: Vec<Event>,
    liked: Vec<Event>,
}

impl EventFeed {
    /// Replace both views with a fresh snapshot. Liked events are derived
    /// from the snapshot.
    pub fn load(&mut self, events: Vec<Event>) {
        self.liked = events.iter().filter(|e| e.liked).cloned().collect();
        self.all = events;
    }

    pub fn all(&self) -> &[Event] {
        &self.all
    }

    pub fn liked(&self) -> &[Event] {
        &self.liked
    }

    pub fn view(&self, tab: HomeTab) -> &[Event] {
        match tab {
            HomeTab::Discover => self.all(),
            HomeTab::MyEvents => self.liked(),
        }
    }

    pub fn contains(&self, key: &NaturalKey) -> bool {
        self.all.iter().any(|e| e.has_key(key))
    }

    pub fn get(&self, key: &NaturalKey) -> Option<&Event> {
        self.all.iter().find(|e| e.has_key(key))
    }

    /// Append events fetched from the remote store.
    pub fn append(&mut self, events: &[Event]) {
        for event in events {
            self.upsert(event.clone());
        }
    }

    /// Replace the event with the same natural key in place, or append it.
    /// Keeps the liked view in step with the event's liked flag.
    pub fn upsert(&mut self, event: Event) {
        let key = event.key();

        match self.all.iter().position(|e| e.has_key(&key)) {
            Some(index) => self.all[index] = event.clone(),
            None => self.all.push(event.clone()),
        }

        if event.liked {
            match self.liked.iter().position(|e| e.has_key(&key)) {
                Some(index) => self.liked[index] = event,
                None => self.liked.push(event),
            }
        } else {
            self.liked.retain(|e| !e.has_key(&key));
        }
    }

    /// Drop the event from both views. Returns whether it was present.
    pub fn remove(&mut self, key: &NaturalKey) -> bool {
        let before = self.all.len();
        self.all.retain(|e| !e.has_key(key));
        self.liked.retain(|e| !e.has_key(key));
        before != self.all.len()
    }
}
