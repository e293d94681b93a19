use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{Event, EventChanges, EventFilter, EventView, NewEvent, UserSummary};
use crate::database::{EventRepository, RsvpOutcome, UpdateOutcome, UserRepository};

use super::{ServiceError, ServiceResult};

/// Outcome of an RSVP change, echoed back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct RsvpResult {
    pub message: &'static str,
    pub event: EventView,
}

/// Event catalogue and RSVP rules.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserRepository>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { events, users }
    }

    pub async fn list_events(&self, filter: &EventFilter) -> ServiceResult<Vec<EventView>> {
        let events = self.events.list(filter).await?;
        self.with_creators(events).await
    }

    pub async fn get_event(&self, id: Uuid) -> ServiceResult<EventView> {
        let event = self.find(id).await?;
        let mut views = self.with_creators(vec![event]).await?;
        views.pop().ok_or(ServiceError::EventNotFound)
    }

    pub async fn create_event(&self, input: NewEvent, created_by: Uuid) -> ServiceResult<EventView> {
        let event = self.events.create(Event::from_new(input, Some(created_by))).await?;
        info!(event_id = %event.id, created_by = %created_by, "event created");
        Ok(event.into())
    }

    /// Applies a partial edit. Capacity may not drop below the current registrations.
    pub async fn update_event(&self, id: Uuid, changes: EventChanges) -> ServiceResult<EventView> {
        let mut event = self.find(id).await?;
        event.apply(changes);

        match self.events.update(&event).await? {
            UpdateOutcome::Updated(event) => {
                info!(event_id = %id, "event updated");
                Ok(event.into())
            }
            UpdateOutcome::NotFound => Err(ServiceError::EventNotFound),
            UpdateOutcome::CapacityBelowRegistrations { registered } => {
                Err(ServiceError::CapacityBelowRegistrations { registered })
            }
        }
    }

    pub async fn delete_event(&self, id: Uuid) -> ServiceResult<()> {
        if !self.events.delete(id).await? {
            return Err(ServiceError::EventNotFound);
        }
        info!(event_id = %id, "event deleted");
        Ok(())
    }

    /// Registers the user. Registering twice succeeds without a second entry.
    pub async fn rsvp(&self, event_id: Uuid, user_id: Uuid) -> ServiceResult<RsvpResult> {
        let outcome = self
            .events
            .register_user(event_id, user_id, Utc::now())
            .await?
            .ok_or(ServiceError::EventNotFound)?;

        match outcome {
            RsvpOutcome::Added(event) => {
                info!(event_id = %event_id, user_id = %user_id, "rsvp added");
                Ok(RsvpResult {
                    message: "RSVP successful",
                    event: event.into(),
                })
            }
            RsvpOutcome::AlreadyRegistered(event) => Ok(RsvpResult {
                message: "Already registered for this event",
                event: event.into(),
            }),
            RsvpOutcome::DeadlinePassed(_) => {
                warn!(event_id = %event_id, user_id = %user_id, "rsvp after deadline");
                Err(ServiceError::DeadlinePassed)
            }
            RsvpOutcome::Full(_) => {
                warn!(event_id = %event_id, user_id = %user_id, "rsvp on full event");
                Err(ServiceError::EventFull)
            }
        }
    }

    /// Removes the user's registration if there is one.
    pub async fn cancel_rsvp(&self, event_id: Uuid, user_id: Uuid) -> ServiceResult<RsvpResult> {
        let event = self
            .events
            .unregister_user(event_id, user_id)
            .await?
            .ok_or(ServiceError::EventNotFound)?;

        info!(event_id = %event_id, user_id = %user_id, "rsvp cancelled");
        Ok(RsvpResult {
            message: "RSVP cancelled successfully",
            event: event.into(),
        })
    }

    pub async fn events_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<EventView>> {
        let events = self.events.list_for_user(user_id).await?;
        self.with_creators(events).await
    }

    async fn find(&self, id: Uuid) -> ServiceResult<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::EventNotFound)
    }

    /// Resolves `createdBy` to creator summaries with one batched lookup.
    /// Creators that no longer exist are left out.
    async fn with_creators(&self, events: Vec<Event>) -> ServiceResult<Vec<EventView>> {
        let mut ids: Vec<Uuid> = events.iter().filter_map(|e| e.created_by).collect();
        ids.sort_unstable();
        ids.dedup();

        let creators: HashMap<Uuid, UserSummary> = self
            .users
            .find_many(&ids)
            .await?
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect();

        Ok(events
            .into_iter()
            .map(|event| {
                let creator = event.created_by.and_then(|id| creators.get(&id).cloned());
                EventView::new(event, creator)
            })
            .collect())
    }
}
