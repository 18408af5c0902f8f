//! Generic entity service
//!
//! CRUD calls against one REST resource, parameterized over the entity shape.

use std::marker::PhantomData;

use lookout_core::domain::{Entity, EntityType};
use lookout_core::dto::page::{DeletedEntity, FindAllRequest, Page, PageRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::ApiClient;
use crate::error::{ClientError, Result};
use crate::resource::{Resource, page_query};
use crate::transport::{ApiRequest, Method};

/// Typed access to one REST resource
#[derive(Debug, Clone)]
pub struct EntityService<E> {
    client: ApiClient,
    resource: Resource,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityService<E> {
    /// Service for a top-level resource
    pub fn new(client: ApiClient) -> Self {
        Self::with_resource(client, Resource::new(E::KIND))
    }

    /// Service whose lists and creations are nested under `parent`
    pub fn nested(client: ApiClient, parent: EntityType) -> Self {
        Self::with_resource(client, Resource::nested(E::KIND, parent))
    }

    fn with_resource(client: ApiClient, resource: Resource) -> Self {
        Self {
            client,
            resource,
            _entity: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch a single entity
    pub async fn get_one(&self, id: Uuid) -> Result<E> {
        let url = self.resource.item_url(self.client.root(), id);
        self.client.send_json(ApiRequest::new(Method::Get, url)).await
    }

    /// Fetch one page
    pub async fn get_page(&self, request: &PageRequest) -> Result<Page<E>> {
        let url = self
            .resource
            .collection_url(self.client.root(), request.parent_id);
        let request = ApiRequest::new(Method::Get, url).with_query(page_query(request));

        self.client.send_json(request).await
    }

    /// Fetch every matching entity
    ///
    /// Asks for the total with `count=0`, then fetches everything as one page.
    /// The second request is skipped when there is nothing to fetch.
    pub async fn find_all(&self, request: &FindAllRequest) -> Result<Page<E>> {
        let counted: Page<E> = self.get_page(&request.to_page(0)).await?;

        if counted.total == 0 {
            debug!(resource = %self.resource.kind, "count query reported no entities");
            return Ok(Page::empty());
        }

        let count = u32::try_from(counted.total).map_err(|_| {
            ClientError::InvalidRequest(format!(
                "{} {} entities exceed a single page",
                counted.total, self.resource.kind
            ))
        })?;

        self.get_page(&request.to_page(count)).await
    }

    /// Create an entity, optionally under a parent
    ///
    /// Readonly fields are stripped from the body.
    pub async fn create<B>(&self, parent_id: Option<Uuid>, body: &B) -> Result<E>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resource.collection_url(self.client.root(), parent_id);
        let body = request_body(body, E::readonly_fields(), false)?;

        self.client
            .send_json(ApiRequest::new(Method::Post, url).with_body(body))
            .await
    }

    /// Update an entity from its full representation
    ///
    /// The body omits `id` and every readonly field.
    pub async fn update(&self, entity: &E) -> Result<E> {
        self.patch(entity.id(), entity).await
    }

    /// Send a partial update
    pub async fn patch<B>(&self, id: Uuid, body: &B) -> Result<E>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resource.item_url(self.client.root(), id);
        let body = request_body(body, E::readonly_fields(), true)?;

        self.client
            .send_json(ApiRequest::new(Method::Patch, url).with_body(body))
            .await
    }

    /// Delete an entity; the API's empty reply is mapped to its id
    pub async fn delete(&self, id: Uuid) -> Result<DeletedEntity> {
        let url = self.resource.item_url(self.client.root(), id);
        self.client
            .send_empty(ApiRequest::new(Method::Delete, url))
            .await?;

        Ok(DeletedEntity { id })
    }
}

/// Serialize a body and drop the named keys
fn request_body<B>(body: &B, readonly: &[&str], strip_id: bool) -> Result<Value>
where
    B: Serialize + ?Sized,
{
    let mut value = serde_json::to_value(body)?;

    if let Value::Object(fields) = &mut value {
        for key in readonly {
            fields.remove(*key);
        }
        if strip_id {
            fields.remove("id");
        }
    }

    Ok(value)
}
