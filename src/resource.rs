use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// A persisted Fakturoid entity with its own collection endpoint.
///
/// An instance without an id is unsaved and can only be created; one with an
/// id can be updated or deleted. [`Fakturoid::save`](crate::Fakturoid::save)
/// uses [`Resource::id`] to choose between POST and PATCH.
pub trait Resource: Serialize + DeserializeOwned {
    /// Collection path under `accounts/{slug}/`, e.g. `"invoices"`.
    const COLLECTION: &'static str;

    /// Server-assigned identifier, `None` until the entity is created.
    fn id(&self) -> Option<u64>;

    /// JSON body sent on create and update.
    fn payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Called on every instance decoded from a server response.
    fn mark_loaded(&mut self) {}
}

pub(crate) fn member_path<R: Resource>(id: u64) -> String {
    format!("{}/{}", R::COLLECTION, id)
}
