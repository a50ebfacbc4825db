//! CRUD operations for each record collection

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::error::Result;
use crate::models::{
    Contact, ContactDraft, Interaction, InteractionDraft, Record, ResourceKind, Restaurant,
    RestaurantDraft, Saved, User, UserDraft,
};

use super::client::decode;
use super::{ApiClient, RequestDescriptor};

/// Ties a collection path to its record and draft types
pub trait ApiResource: Send + Sync + 'static {
    const KIND: ResourceKind;
    type Record: DeserializeOwned + Record + Clone + Send;
    type Draft: Serialize + Sync;
}

pub struct Restaurants;
pub struct Contacts;
pub struct Interactions;
pub struct Users;

impl ApiResource for Restaurants {
    const KIND: ResourceKind = ResourceKind::Restaurants;
    type Record = Restaurant;
    type Draft = RestaurantDraft;
}

impl ApiResource for Contacts {
    const KIND: ResourceKind = ResourceKind::Contacts;
    type Record = Contact;
    type Draft = ContactDraft;
}

impl ApiResource for Interactions {
    const KIND: ResourceKind = ResourceKind::Interactions;
    type Record = Interaction;
    type Draft = InteractionDraft;
}

impl ApiResource for Users {
    const KIND: ResourceKind = ResourceKind::Users;
    type Record = User;
    type Draft = UserDraft;
}

/// Operations on one collection, borrowed from an [`ApiClient`]
pub struct ResourceApi<'a, R> {
    client: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: ApiResource> ResourceApi<'a, R> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", R::KIND.path(), id)
    }

    pub async fn list(&self) -> Result<Vec<R::Record>> {
        let fallback = format!("Failed to fetch {}", R::KIND.plural());
        self.client
            .fetch(RequestDescriptor::get(R::KIND.path()), &fallback)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<R::Record> {
        let fallback = format!("Failed to fetch {}", R::KIND.singular());
        self.client
            .fetch(RequestDescriptor::get(Self::item_path(id)), &fallback)
            .await
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<Saved<R::Record>> {
        let fallback = format!("Failed to save {}", R::KIND.singular());
        let request = RequestDescriptor::post(R::KIND.path(), draft)?;
        let body = self.client.execute(request, &fallback).await?;
        saved_from_body(&body, &fallback)
    }

    pub async fn update(&self, id: i64, draft: &R::Draft) -> Result<Saved<R::Record>> {
        let fallback = format!("Failed to save {}", R::KIND.singular());
        let request = RequestDescriptor::put(Self::item_path(id), draft)?;
        let body = self.client.execute(request, &fallback).await?;
        saved_from_body(&body, &fallback)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let fallback = format!("Failed to delete {}", R::KIND.singular());
        self.client
            .send(RequestDescriptor::delete(Self::item_path(id)), &fallback)
            .await
    }
}

impl ResourceApi<'_, Users> {
    /// Users the given account may see. The server scopes the set by role.
    pub async fn visible_to(&self, current_user_id: i64) -> Result<Vec<User>> {
        self.client
            .fetch(
                RequestDescriptor::get(format!("/api/users/roles/{}", current_user_id)),
                "Failed to fetch users",
            )
            .await
    }
}

fn saved_from_body<T: DeserializeOwned>(body: &[u8], context: &str) -> Result<Saved<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Saved::Ack {
            message: None,
            id: None,
        });
    }
    decode(body, context)
}

impl ApiClient {
    pub fn resource<R: ApiResource>(&self) -> ResourceApi<'_, R> {
        ResourceApi::new(self)
    }

    pub fn restaurants(&self) -> ResourceApi<'_, Restaurants> {
        self.resource()
    }

    pub fn contacts(&self) -> ResourceApi<'_, Contacts> {
        self.resource()
    }

    pub fn interactions(&self) -> ResourceApi<'_, Interactions> {
        self.resource()
    }

    pub fn users(&self) -> ResourceApi<'_, Users> {
        self.resource()
    }
}
