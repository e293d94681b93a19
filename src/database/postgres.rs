use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Event, EventFilter, Preferences, RsvpCheck, User};
use crate::database::repository::{
    DbResult, EventRepository, RsvpOutcome, UpdateOutcome, UserRepository,
};

const USER_COLUMNS: &str =
    "id, full_name, email, password_hash, preferences, is_admin, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, title, date, time, location, description, category, capacity, \
     is_private, registration_deadline, created_by, registered_users, created_at, updated_at";

/// Attempts at the conditional append before giving up under contention.
const RSVP_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> DbResult<User> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.preferences)
            .bind(user.is_admin)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, user.email.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, email");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn update_preferences(&self, id: Uuid, preferences: Preferences) -> DbResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET preferences = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(Json(preferences))
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_admin(&self, email: &str, is_admin: bool) -> DbResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET is_admin = $2, updated_at = now() WHERE email = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(is_admin)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> DbResult<()> {
        crate::database::DatabaseManager::health_check(&self.pool).await
    }
}

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: Event) -> DbResult<Event> {
        let sql = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.description)
            .bind(&event.category)
            .bind(event.capacity)
            .bind(event.is_private)
            .bind(event.registration_deadline)
            .bind(event.created_by)
            .bind(&event.registered_users)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, filter: &EventFilter) -> DbResult<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::date IS NULL OR date >= $2) \
             ORDER BY date, time"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.from_date)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE $1 = ANY(registered_users) ORDER BY date, time"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> DbResult<UpdateOutcome> {
        let sql = format!(
            "UPDATE events SET title = $2, date = $3, time = $4, location = $5, description = $6, \
                 category = $7, capacity = $8, is_private = $9, registration_deadline = $10, \
                 updated_at = now() \
             WHERE id = $1 AND cardinality(registered_users) <= $8 \
             RETURNING {EVENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.description)
            .bind(&event.category)
            .bind(event.capacity)
            .bind(event.is_private)
            .bind(event.registration_deadline)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(updated) = updated {
            return Ok(UpdateOutcome::Updated(updated));
        }

        Ok(match self.find_by_id(event.id).await? {
            None => UpdateOutcome::NotFound,
            Some(current) => UpdateOutcome::CapacityBelowRegistrations {
                registered: current.registered_users.len(),
            },
        })
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn register_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DbResult<Option<RsvpOutcome>> {
        // The guard lives in the WHERE clause so two requests cannot both take the last seat.
        let sql = format!(
            "UPDATE events SET registered_users = array_append(registered_users, $2), updated_at = $3 \
             WHERE id = $1 \
               AND NOT ($2 = ANY(registered_users)) \
               AND cardinality(registered_users) < capacity \
               AND (registration_deadline IS NULL OR registration_deadline >= $3) \
             RETURNING {EVENT_COLUMNS}"
        );

        for _ in 0..RSVP_ATTEMPTS {
            let appended = sqlx::query_as::<_, Event>(&sql)
                .bind(event_id)
                .bind(user_id)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(event) = appended {
                return Ok(Some(RsvpOutcome::Added(event)));
            }

            let Some(current) = self.find_by_id(event_id).await? else {
                return Ok(None);
            };

            match current.check_rsvp(user_id, now) {
                RsvpCheck::AlreadyRegistered => return Ok(Some(RsvpOutcome::AlreadyRegistered(current))),
                RsvpCheck::DeadlinePassed => return Ok(Some(RsvpOutcome::DeadlinePassed(current))),
                RsvpCheck::Full => return Ok(Some(RsvpOutcome::Full(current))),
                // A seat opened between the update and the read; try again.
                RsvpCheck::Open => continue,
            }
        }

        Err(DatabaseError::QueryError(format!(
            "RSVP for event {event_id} did not settle after {RSVP_ATTEMPTS} attempts"
        )))
    }

    #[instrument(skip(self))]
    async fn unregister_user(&self, event_id: Uuid, user_id: Uuid) -> DbResult<Option<Event>> {
        let sql = format!(
            "UPDATE events SET registered_users = array_remove(registered_users, $2), \
                 updated_at = CASE WHEN $2 = ANY(registered_users) THEN now() ELSE updated_at END \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
