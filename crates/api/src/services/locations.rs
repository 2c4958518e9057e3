//! Client sites.

use std::sync::Arc;

use domain::models::location::{
    CreateLocationRequest, Location, LocationQuery, UpdateLocationRequest,
};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use validator::Validate;

pub struct LocationService {
    store: Arc<dyn WorkforceStore>,
}

impl LocationService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateLocationRequest,
    ) -> Result<Location, DomainError> {
        authorize(caller, Resource::Location, Action::Create)?;
        request.validate()?;

        let location = self.store.insert_location(request.into_new_location()).await?;
        tracing::info!(
            location_id = location.id,
            client_id = location.client_id,
            "Location created"
        );
        Ok(location)
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<Location, DomainError> {
        authorize(caller, Resource::Location, Action::Read)?;
        self.store
            .find_location(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Location"))
    }

    pub async fn list(
        &self,
        caller: &Caller,
        query: LocationQuery,
    ) -> Result<Vec<Location>, DomainError> {
        authorize(caller, Resource::Location, Action::Read)?;
        Ok(self.store.list_locations(query.client_id).await?)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateLocationRequest,
    ) -> Result<Location, DomainError> {
        authorize(caller, Resource::Location, Action::Update)?;
        request.validate()?;

        let location = self.store.update_location(id, request.into()).await?;
        tracing::info!(location_id = location.id, updated_by = caller.user_id, "Location updated");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, caller, client_request, location_request, memory_store};
    use crate::services::ClientService;
    use domain::models::role::RoleName;

    #[tokio::test]
    async fn test_location_requires_existing_client() {
        let service = LocationService::new(memory_store());
        let err = service
            .create(&admin(), location_request(77, "Ghost Site"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound("Client".to_string()));
    }

    #[tokio::test]
    async fn test_coordinates_must_be_in_range() {
        let store = memory_store();
        let client = ClientService::new(store.clone())
            .create(&admin(), client_request("Geo Corp"))
            .await
            .unwrap();
        let service = LocationService::new(store);

        let mut request = location_request(client.id, "North Pole Plus");
        request.latitude = Some(91.0);
        assert!(matches!(
            service.create(&admin(), request).await,
            Err(DomainError::Validation(_))
        ));

        let mut request = location_request(client.id, "Date Line Plus");
        request.longitude = Some(-180.5);
        assert!(matches!(
            service.create(&admin(), request).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_client() {
        let store = memory_store();
        let clients = ClientService::new(store.clone());
        let first = clients.create(&admin(), client_request("First Co")).await.unwrap();
        let second = clients.create(&admin(), client_request("Second Co")).await.unwrap();

        let service = LocationService::new(store);
        service.create(&admin(), location_request(first.id, "Gate A")).await.unwrap();
        service.create(&admin(), location_request(first.id, "Gate B")).await.unwrap();
        service.create(&admin(), location_request(second.id, "Lobby")).await.unwrap();

        let reader = caller(RoleName::Guard);
        let all = service.list(&reader, LocationQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let filtered = service
            .list(
                &reader,
                LocationQuery {
                    client_id: Some(first.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|l| l.client_id == first.id));
    }

    #[tokio::test]
    async fn test_moving_location_to_unknown_client_fails() {
        let store = memory_store();
        let client = ClientService::new(store.clone())
            .create(&admin(), client_request("Mover Co"))
            .await
            .unwrap();
        let service = LocationService::new(store);
        let location = service
            .create(&admin(), location_request(client.id, "Dock"))
            .await
            .unwrap();

        let err = service
            .update(
                &admin(),
                location.id,
                UpdateLocationRequest {
                    client_id: Some(9_999),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound("Client".to_string()));
    }
}
