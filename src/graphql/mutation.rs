use async_graphql::{Context, Object, Result, ID};
use log::info;
use std::sync::Arc;

use super::types::{parse_id, parse_ids, Contact};
use crate::error::ContactError;
use crate::phone_api::PhoneApi;
use crate::store::{ContactStore, NewContact, ValidatedUpdate};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Delete a contact by id. Returns true iff exactly one record was
    /// removed, so a repeat delete reports false. References held by other
    /// contacts are not cleaned up.
    async fn delete_contact(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let store = ctx.data::<Arc<dyn ContactStore>>()?;
        let oid = parse_id(&id)?;
        let deleted = store.delete(oid).await?;
        info!("deleteContact {}: removed={}", id.as_str(), deleted);
        Ok(deleted)
    }

    /// Create a contact. The phone must be unused and pass upstream
    /// validation; `country` and `timezone` are derived from the validation
    /// response. Every referenced id must name an existing contact.
    async fn add_contacts(
        &self,
        ctx: &Context<'_>,
        name: String,
        phone: String,
        contacts: Option<Vec<ID>>,
    ) -> Result<Contact> {
        let store = ctx.data::<Arc<dyn ContactStore>>()?;
        let phone_api = ctx.data::<Arc<dyn PhoneApi>>()?;

        if store.phone_exists(&phone).await? {
            return Err(ContactError::PhoneTaken(phone).into());
        }

        let validation = phone_api.validate_number(&phone).await?;
        if !validation.is_valid {
            return Err(ContactError::InvalidPhone(phone).into());
        }
        // First candidate timezone wins; a valid response without one is
        // useless to us and treated as not valid.
        let timezone = validation
            .timezones
            .first()
            .cloned()
            .ok_or_else(|| ContactError::InvalidPhone(phone.clone()))?;

        let references = parse_ids(&contacts.unwrap_or_default())?;
        let existing = store.find_by_ids(&references).await?;
        if existing.len() != references.len() {
            return Err(ContactError::MissingReferences.into());
        }

        let record = store
            .insert(NewContact {
                name,
                phone,
                country: validation.country,
                timezone,
                contacts: references,
            })
            .await?;
        info!("addContacts: created {} ({})", record.id.to_hex(), record.name);
        Ok(Contact::new(record))
    }

    /// Update a contact's name, phone, or both. A phone change is
    /// revalidated upstream; a phone already registered to a different
    /// contact is rejected outright. An unchanged phone skips revalidation.
    async fn update_contact(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<Contact> {
        let store = ctx.data::<Arc<dyn ContactStore>>()?;
        let phone_api = ctx.data::<Arc<dyn PhoneApi>>()?;

        if name.is_none() && phone.is_none() {
            return Err(ContactError::NoUpdateField.into());
        }
        let oid = parse_id(&id)?;

        let phone = match phone {
            Some(phone) => phone,
            None => {
                let name = name.ok_or(ContactError::NoUpdateField)?;
                let record = store
                    .update_name(oid, &name)
                    .await?
                    .ok_or_else(|| ContactError::NotFound(id.to_string()))?;
                info!("updateContact {}: name only", id.as_str());
                return Ok(Contact::new(record));
            }
        };

        match store.find_by_phone(&phone).await? {
            Some(owner) if owner.id != oid => Err(ContactError::PhoneConflict(phone).into()),
            Some(owner) => {
                // The phone already belongs to this contact, so only the
                // name can change; no revalidation needed.
                match name {
                    Some(name) => {
                        let record = store
                            .update_name(oid, &name)
                            .await?
                            .ok_or_else(|| ContactError::NotFound(id.to_string()))?;
                        Ok(Contact::new(record))
                    }
                    None => Ok(Contact::new(owner)),
                }
            }
            None => {
                let validation = phone_api.validate_number(&phone).await?;
                if !validation.is_valid {
                    return Err(ContactError::InvalidPhone(phone).into());
                }
                let timezone = validation
                    .timezones
                    .first()
                    .cloned()
                    .ok_or_else(|| ContactError::InvalidPhone(phone.clone()))?;

                let record = store
                    .update_validated(
                        oid,
                        ValidatedUpdate {
                            name,
                            phone,
                            country: validation.country,
                            timezone,
                        },
                    )
                    .await?
                    .ok_or_else(|| ContactError::NotFound(id.to_string()))?;
                info!("updateContact {}: phone revalidated", id.as_str());
                Ok(Contact::new(record))
            }
        }
    }
}
