//! Postgres-backed record store.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DuplicateField, SignupStore, StoreError};
use crate::contact::{ContactMessage, NewContactMessage};
use crate::signup::{NewSignup, SignupRecord};

const INSERT_SIGNUP_SQL: &str = "\
    INSERT INTO waitlist (id, first_name, last_name, email, phone, source) \
    VALUES ($1, $2, $3, $4, $5, $6) \
    RETURNING id, first_name, last_name, email, phone, source, created_at";

const LIST_SIGNUPS_SQL: &str = "\
    SELECT id, first_name, last_name, email, phone, source, created_at \
    FROM waitlist ORDER BY created_at, id";

const INSERT_CONTACT_SQL: &str = "\
    INSERT INTO contact_messages (id, name, email, subject, message, ip_address, user_agent) \
    VALUES ($1, $2, $3, $4, $5, $6, $7) \
    RETURNING id, name, email, subject, message, ip_address, user_agent, \
              is_spam, is_read, created_at";

// The conditional upsert is the whole concurrency story for the daily cap:
// one statement, one winner per unit of quota, no read-modify-write window.
const RESERVE_SEND_SQL: &str = "\
    INSERT INTO email_send_log (day, sent) VALUES ($1, 1) \
    ON CONFLICT (day) DO UPDATE SET sent = email_send_log.sent + 1 \
    WHERE email_send_log.sent < $2 \
    RETURNING sent";

/// Production [`SignupStore`] on a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to Postgres and apply pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SignupStore for PgStore {
    async fn insert(&self, signup: &NewSignup) -> Result<SignupRecord, StoreError> {
        let result = sqlx::query_as::<_, SignupRecord>(INSERT_SIGNUP_SQL)
            .bind(Uuid::new_v4())
            .bind(&signup.first_name)
            .bind(&signup.last_name)
            .bind(&signup.email)
            .bind(&signup.phone)
            .bind(&signup.source)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(record) => Ok(record),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let field = match db.constraint() {
                    Some(name) if name.contains("phone") => DuplicateField::Phone,
                    _ => DuplicateField::Email,
                };
                Err(StoreError::Duplicate(field))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<SignupRecord>, StoreError> {
        let records = sqlx::query_as::<_, SignupRecord>(LIST_SIGNUPS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_contact(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, StoreError> {
        let stored = sqlx::query_as::<_, ContactMessage>(INSERT_CONTACT_SQL)
            .bind(Uuid::new_v4())
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.subject)
            .bind(&message.message)
            .bind(&message.ip_address)
            .bind(&message.user_agent)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn try_reserve_send(&self, day: NaiveDate, cap: u32) -> Result<bool, StoreError> {
        if cap == 0 {
            return Ok(false);
        }
        // i64 so a cap above i32::MAX cannot wrap negative in the comparison.
        let reserved: Option<i32> = sqlx::query_scalar(RESERVE_SEND_SQL)
            .bind(day)
            .bind(i64::from(cap))
            .fetch_optional(&self.pool)
            .await?;
        Ok(reserved.is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
