//! In-memory store used by tests and `STORE=memory` development runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Event, EventFilter, Preferences, RsvpCheck, User};
use crate::database::repository::{
    DbResult, EventRepository, RsvpOutcome, UpdateOutcome, UserRepository,
};

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> DbResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate(user.email));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.email.cmp(&b.email)));
        Ok(all)
    }

    async fn update_preferences(&self, id: Uuid, preferences: Preferences) -> DbResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.preferences.0 = preferences;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_admin(&self, email: &str, is_admin: bool) -> DbResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.values_mut().find(|u| u.email == email).map(|user| {
            user.is_admin = is_admin;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut events: Vec<Event>) -> Vec<Event> {
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        events
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> DbResult<Event> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &EventFilter) -> DbResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(Self::sorted(
            events.values().filter(|e| filter.matches(e)).cloned().collect(),
        ))
    }

    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(Self::sorted(
            events.values().filter(|e| e.is_registered(user_id)).cloned().collect(),
        ))
    }

    async fn update(&self, event: &Event) -> DbResult<UpdateOutcome> {
        let mut events = self.events.write().await;
        let Some(stored) = events.get_mut(&event.id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        let registered = stored.registered_users.len();
        if registered > event.capacity.max(0) as usize {
            return Ok(UpdateOutcome::CapacityBelowRegistrations { registered });
        }

        let registered_users = std::mem::take(&mut stored.registered_users);
        *stored = Event {
            registered_users,
            created_at: stored.created_at,
            created_by: stored.created_by,
            ..event.clone()
        };
        Ok(UpdateOutcome::Updated(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        Ok(self.events.write().await.remove(&id).is_some())
    }

    async fn register_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DbResult<Option<RsvpOutcome>> {
        // The write lock spans the check and the append.
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(&event_id) else {
            return Ok(None);
        };

        let outcome = match event.check_rsvp(user_id, now) {
            RsvpCheck::AlreadyRegistered => RsvpOutcome::AlreadyRegistered(event.clone()),
            RsvpCheck::DeadlinePassed => RsvpOutcome::DeadlinePassed(event.clone()),
            RsvpCheck::Full => RsvpOutcome::Full(event.clone()),
            RsvpCheck::Open => {
                event.registered_users.push(user_id);
                event.updated_at = now;
                RsvpOutcome::Added(event.clone())
            }
        };
        Ok(Some(outcome))
    }

    async fn unregister_user(&self, event_id: Uuid, user_id: Uuid) -> DbResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.get_mut(&event_id).map(|event| {
            if event.is_registered(user_id) {
                event.registered_users.retain(|id| *id != user_id);
                event.updated_at = Utc::now();
            }
            event.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewEvent;
    use serde_json::json;

    fn event(capacity: i32) -> Event {
        let input: NewEvent = serde_json::from_value(json!({
            "title": "Poetry Night",
            "date": "2030-03-03",
            "time": "20:00",
            "location": "Cafe",
            "description": "Open reading",
            "category": "cultural",
            "capacity": capacity,
        }))
        .unwrap();
        Event::from_new(input, None)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        let a = User::new("A".into(), "same@campus.edu".into(), "h".into(), Preferences::default());
        let b = User::new("B".into(), "SAME@campus.edu".into(), "h".into(), Preferences::default());
        repo.create(a).await.unwrap();
        assert!(matches!(repo.create(b).await, Err(DatabaseError::Duplicate(_))));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_respects_capacity() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(event(1)).await.unwrap();
        let now = Utc::now();

        let first = repo.register_user(created.id, Uuid::new_v4(), now).await.unwrap();
        assert!(matches!(first, Some(RsvpOutcome::Added(_))));

        let second = repo.register_user(created.id, Uuid::new_v4(), now).await.unwrap();
        match second {
            Some(RsvpOutcome::Full(e)) => assert_eq!(e.registered_users.len(), 1),
            other => panic!("expected Full, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_unknown_event_is_none() {
        let repo = InMemoryEventRepository::new();
        let outcome = repo.register_user(Uuid::new_v4(), Uuid::new_v4(), Utc::now()).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn update_keeps_stored_registrations() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(event(3)).await.unwrap();
        let member = Uuid::new_v4();
        repo.register_user(created.id, member, Utc::now()).await.unwrap();

        // `created` is stale: it has no registrations.
        let mut edited = created.clone();
        edited.title = "Poetry Night II".into();
        match repo.update(&edited).await.unwrap() {
            UpdateOutcome::Updated(e) => {
                assert_eq!(e.title, "Poetry Night II");
                assert_eq!(e.registered_users, vec![member]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_rejects_capacity_below_registrations() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(event(2)).await.unwrap();
        repo.register_user(created.id, Uuid::new_v4(), Utc::now()).await.unwrap();
        repo.register_user(created.id, Uuid::new_v4(), Utc::now()).await.unwrap();

        let mut edited = created.clone();
        edited.capacity = 1;
        assert_eq!(
            repo.update(&edited).await.unwrap(),
            UpdateOutcome::CapacityBelowRegistrations { registered: 2 }
        );
    }

    #[tokio::test]
    async fn list_for_user_only_returns_registered_events() {
        let repo = InMemoryEventRepository::new();
        let a = repo.create(event(5)).await.unwrap();
        repo.create(event(5)).await.unwrap();
        let member = Uuid::new_v4();
        repo.register_user(a.id, member, Utc::now()).await.unwrap();

        let mine = repo.list_for_user(member).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a.id);
    }
}
