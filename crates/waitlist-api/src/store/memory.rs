//! In-memory store used by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{DuplicateField, SignupStore, StoreError};
use crate::contact::{ContactMessage, NewContactMessage};
use crate::signup::{NewSignup, SignupRecord};

/// In-memory [`SignupStore`].
///
/// Enforces the same uniqueness rules as the Postgres schema behind a
/// single lock, so concurrent identical inserts still see exactly one
/// winner.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    signups: Vec<SignupRecord>,
    contacts: Vec<ContactMessage>,
    send_log: HashMap<NaiveDate, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignupStore for MemoryStore {
    async fn insert(&self, signup: &NewSignup) -> Result<SignupRecord, StoreError> {
        let mut inner = self.inner.lock().await;

        // Values are already normalized, so equality is the uniqueness test.
        let email_taken = inner.signups.iter().any(|r| r.email == signup.email);
        let phone_taken = inner.signups.iter().any(|r| r.phone == signup.phone);
        let duplicate = match (email_taken, phone_taken) {
            (true, true) => Some(DuplicateField::EmailAndPhone),
            (true, false) => Some(DuplicateField::Email),
            (false, true) => Some(DuplicateField::Phone),
            (false, false) => None,
        };
        if let Some(field) = duplicate {
            return Err(StoreError::Duplicate(field));
        }

        let record = SignupRecord {
            id: Uuid::new_v4(),
            first_name: signup.first_name.clone(),
            last_name: signup.last_name.clone(),
            email: signup.email.clone(),
            phone: signup.phone.clone(),
            source: signup.source.clone(),
            created_at: Utc::now(),
        };
        inner.signups.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<SignupRecord>, StoreError> {
        Ok(self.inner.lock().await.signups.clone())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().await.signups.len() as i64)
    }

    async fn insert_contact(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, StoreError> {
        let stored = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name.clone(),
            email: message.email.clone(),
            subject: message.subject.clone(),
            message: message.message.clone(),
            ip_address: message.ip_address.clone(),
            user_agent: message.user_agent.clone(),
            is_spam: false,
            is_read: false,
            created_at: Utc::now(),
        };
        self.inner.lock().await.contacts.push(stored.clone());
        Ok(stored)
    }

    async fn try_reserve_send(&self, day: NaiveDate, cap: u32) -> Result<bool, StoreError> {
        if cap == 0 {
            return Ok(false);
        }
        let mut inner = self.inner.lock().await;
        let sent = inner.send_log.entry(day).or_insert(0);
        if *sent < cap {
            *sent += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, phone: &str) -> NewSignup {
        NewSignup {
            first_name: Some("Ada".into()),
            last_name: Some("Obi".into()),
            email: email.into(),
            phone: phone.into(),
            source: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let store = MemoryStore::new();
        store
            .insert(&signup("a@b.com", "+2348012345678"))
            .await
            .unwrap();
        store
            .insert(&signup("c@d.com", "+2348012345679"))
            .await
            .unwrap();

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email, "a@b.com");
        assert_eq!(records[1].email, "c@d.com");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = MemoryStore::new();
        store
            .insert(&signup("a@b.com", "+2348012345678"))
            .await
            .unwrap();

        let err = store
            .insert(&signup("a@b.com", "+2348099999999"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate(DuplicateField::Email)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_phone() {
        let store = MemoryStore::new();
        store
            .insert(&signup("a@b.com", "+2348012345678"))
            .await
            .unwrap();

        let err = store
            .insert(&signup("z@y.com", "+2348012345678"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate(DuplicateField::Phone)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_both_fields() {
        let store = MemoryStore::new();
        store
            .insert(&signup("a@b.com", "+2348012345678"))
            .await
            .unwrap();

        let err = store
            .insert(&signup("a@b.com", "+2348012345678"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate(DuplicateField::EmailAndPhone)
        ));
    }

    #[tokio::test]
    async fn test_no_record_persisted_on_conflict() {
        let store = MemoryStore::new();
        store
            .insert(&signup("a@b.com", "+2348012345678"))
            .await
            .unwrap();
        let _ = store.insert(&signup("a@b.com", "+2348012345678")).await;
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reserve_send_respects_cap() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        assert!(store.try_reserve_send(day, 2).await.unwrap());
        assert!(store.try_reserve_send(day, 2).await.unwrap());
        assert!(!store.try_reserve_send(day, 2).await.unwrap());

        // A new day starts a fresh counter.
        let next = day.succ_opt().unwrap();
        assert!(store.try_reserve_send(next, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_send_large_cap() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        assert!(store.try_reserve_send(day, u32::MAX).await.unwrap());
        assert!(store.try_reserve_send(day, u32::MAX).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_send_zero_cap() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert!(!store.try_reserve_send(day, 0).await.unwrap());
    }
}
