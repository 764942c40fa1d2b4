use tonic::{Request, Response, Status};
use tracing::debug;

use super::convert::parse_uuid;
use super::messages::{
    CreateRequest, CreateResponse, DeleteRequest, Empty, GetAllRequest, GetAllResponse,
    GetRequest, GetResponse, UpdateRequest,
};
use super::ufo_service_server::UfoService;
use crate::domain::{SightingInfo, SightingPatch};
use crate::store::{InMemoryStore, ListQuery, RecordStore, StoreError};

impl From<StoreError> for Status {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Status::not_found(err.to_string()),
            StoreError::InvalidArgument(_) => Status::invalid_argument(err.to_string()),
            StoreError::Conflict { .. } => Status::already_exists(err.to_string()),
            StoreError::LockPoisoned(_) => Status::internal(err.to_string()),
        }
    }
}

/// gRPC handler that implements the generated `UfoService` trait over a
/// sighting store. Shares the store with the HTTP transport.
#[derive(Debug, Clone)]
pub struct UfoHandler {
    store: InMemoryStore<SightingInfo>,
}

impl UfoHandler {
    pub fn new(store: InMemoryStore<SightingInfo>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl UfoService for UfoHandler {
    async fn create(
        &self,
        request: Request<CreateRequest>,
    ) -> Result<Response<CreateResponse>, Status> {
        let info = request
            .into_inner()
            .info
            .ok_or_else(|| Status::invalid_argument("info is required"))?;
        let id = self.store.create(SightingInfo::try_from(info)?)?;

        Ok(Response::new(CreateResponse {
            uuid: id.to_string(),
        }))
    }

    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let id = parse_uuid(&request.into_inner().uuid)?;
        let record = self.store.get(&id)?;

        Ok(Response::new(GetResponse {
            sighting: Some((&record).into()),
        }))
    }

    async fn get_all(
        &self,
        request: Request<GetAllRequest>,
    ) -> Result<Response<GetAllResponse>, Status> {
        let query = ListQuery {
            include_deleted: request.into_inner().include_deleted,
        };
        let sightings: Vec<_> = self.store.list(&query)?.iter().map(Into::into).collect();
        debug!(count = sightings.len(), ?query, "listed sightings");

        Ok(Response::new(GetAllResponse {
            total_count: sightings.len() as u64,
            sightings,
        }))
    }

    async fn update(&self, request: Request<UpdateRequest>) -> Result<Response<Empty>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.uuid)?;
        let update_info = req
            .update_info
            .ok_or_else(|| Status::invalid_argument("update_info is required"))?;
        self.store.update(&id, SightingPatch::try_from(update_info)?)?;

        Ok(Response::new(Empty {}))
    }

    async fn delete(&self, request: Request<DeleteRequest>) -> Result<Response<Empty>, Status> {
        let id = parse_uuid(&request.into_inner().uuid)?;
        self.store.delete(&id)?;

        Ok(Response::new(Empty {}))
    }
}
