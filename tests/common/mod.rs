//! Hand-written doubles for the store and phone service capability traits,
//! so the schema can be exercised without MongoDB or network access.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

use rolodex::error::{ContactError, ContactResult};
use rolodex::phone_api::{PhoneApi, PhoneValidation, WorldTime};
use rolodex::store::{ContactRecord, ContactStore, NewContact, ValidatedUpdate};

/// In-memory contact store with the same uniqueness behavior the unique
/// phone index gives the MongoDB store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ContactRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Direct record inspection for assertions on stored (non-exposed)
    /// fields such as `timezone`.
    pub fn record_by_phone(&self, phone: &str) -> Option<ContactRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.phone == phone)
            .cloned()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> ContactResult<Option<ContactRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> ContactResult<Option<ContactRecord>> {
        Ok(self.record_by_phone(phone))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> ContactResult<Vec<ContactRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> ContactResult<Vec<ContactRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn phone_exists(&self, phone: &str) -> ContactResult<bool> {
        Ok(self.record_by_phone(phone).is_some())
    }

    async fn insert(&self, contact: NewContact) -> ContactResult<ContactRecord> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.phone == contact.phone) {
            return Err(ContactError::PhoneTaken(contact.phone));
        }
        let record = ContactRecord {
            id: ObjectId::new(),
            name: contact.name,
            phone: contact.phone,
            country: contact.country,
            timezone: contact.timezone,
            contacts: contact.contacts,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update_name(&self, id: ObjectId, name: &str) -> ContactResult<Option<ContactRecord>> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.name = name.to_string();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_validated(
        &self,
        id: ObjectId,
        update: ValidatedUpdate,
    ) -> ContactResult<Option<ContactRecord>> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.id != id && r.phone == update.phone) {
            return Err(ContactError::PhoneConflict(update.phone));
        }
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                if let Some(name) = update.name {
                    record.name = name;
                }
                record.phone = update.phone;
                record.country = update.country;
                record.timezone = update.timezone;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ObjectId) -> ContactResult<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}

/// Canned phone service responses.
pub struct StubPhoneApi {
    pub valid: bool,
    pub country: String,
    pub timezones: Vec<String>,
    pub datetime: String,
    /// Simulate a non-success HTTP status from the upstream service.
    pub upstream_failure: bool,
}

impl Default for StubPhoneApi {
    fn default() -> Self {
        Self {
            valid: true,
            country: "US".to_string(),
            timezones: vec!["America/New_York".to_string()],
            datetime: "2024-01-01T00:00:00".to_string(),
            upstream_failure: false,
        }
    }
}

#[async_trait]
impl PhoneApi for StubPhoneApi {
    async fn validate_number(&self, _number: &str) -> ContactResult<PhoneValidation> {
        if self.upstream_failure {
            return Err(ContactError::UpstreamStatus(
                reqwest::StatusCode::BAD_GATEWAY,
            ));
        }
        Ok(PhoneValidation {
            is_valid: self.valid,
            country: self.country.clone(),
            timezones: self.timezones.clone(),
        })
    }

    async fn current_time(&self, _timezone: &str) -> ContactResult<WorldTime> {
        if self.upstream_failure {
            return Err(ContactError::UpstreamStatus(
                reqwest::StatusCode::BAD_GATEWAY,
            ));
        }
        Ok(WorldTime {
            datetime: self.datetime.clone(),
        })
    }
}
