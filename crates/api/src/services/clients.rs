//! Clients and their contracts.

use std::sync::Arc;

use domain::models::client::{
    check_contract_period, Client, ClientDetail, CreateClientRequest, UpdateClientRequest,
};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use validator::Validate;

pub struct ClientService {
    store: Arc<dyn WorkforceStore>,
}

impl ClientService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateClientRequest,
    ) -> Result<Client, DomainError> {
        authorize(caller, Resource::Client, Action::Create)?;
        request.validate()?;
        check_contract_period(request.contract_start, request.contract_end)?;

        let client = self.store.insert_client(request.into_new_client()).await?;
        tracing::info!(client_id = client.id, "Client created");
        Ok(client)
    }

    /// The client with all of its locations.
    pub async fn get(&self, caller: &Caller, id: i64) -> Result<ClientDetail, DomainError> {
        authorize(caller, Resource::Client, Action::Read)?;
        let client = self
            .store
            .find_client(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client"))?;
        let locations = self.store.list_locations(Some(client.id)).await?;
        Ok(ClientDetail { client, locations })
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<Client>, DomainError> {
        authorize(caller, Resource::Client, Action::Read)?;
        Ok(self.store.list_clients().await?)
    }

    /// The contract period is checked against the merged result, so moving
    /// only the end date before the stored start is rejected.
    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateClientRequest,
    ) -> Result<Client, DomainError> {
        authorize(caller, Resource::Client, Action::Update)?;
        request.validate()?;

        let current = self
            .store
            .find_client(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client"))?;
        check_contract_period(
            request.contract_start.or(current.contract_start),
            request.contract_end.or(current.contract_end),
        )?;

        let client = self.store.update_client(id, request.into()).await?;
        tracing::info!(client_id = client.id, updated_by = caller.user_id, "Client updated");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, caller, client_request, date, memory_store};
    use domain::models::client::ClientStatus;
    use domain::models::role::RoleName;

    #[tokio::test]
    async fn test_create_and_get_client_with_locations() {
        let store = memory_store();
        let service = ClientService::new(store.clone());
        let client = service.create(&admin(), client_request("Acme Corp")).await.unwrap();
        assert_eq!(client.status, ClientStatus::Active);

        let detail = service.get(&caller(RoleName::Guard), client.id).await.unwrap();
        assert_eq!(detail.client.id, client.id);
        assert!(detail.locations.is_empty());
    }

    #[tokio::test]
    async fn test_contract_end_before_start_rejected() {
        let service = ClientService::new(memory_store());
        let mut request = client_request("Backwards Ltd");
        request.contract_start = Some(date(2024, 6, 1));
        request.contract_end = Some(date(2024, 1, 1));
        assert!(matches!(
            service.create(&admin(), request).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_update_checks_merged_period() {
        let service = ClientService::new(memory_store());
        let mut request = client_request("Period Co");
        request.contract_start = Some(date(2024, 3, 1));
        let client = service.create(&admin(), request).await.unwrap();

        let err = service
            .update(
                &admin(),
                client.id,
                UpdateClientRequest {
                    contract_end: Some(date(2024, 2, 1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let updated = service
            .update(
                &caller(RoleName::ChiefOfStaff),
                client.id,
                UpdateClientRequest {
                    contract_end: Some(date(2025, 2, 28)),
                    status: Some(ClientStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.contract_end, Some(date(2025, 2, 28)));
        assert_eq!(updated.status, ClientStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_contact_email_rejected() {
        let service = ClientService::new(memory_store());
        let mut request = client_request("Mail Co");
        request.contact_email = "not-an-email".to_string();
        assert!(matches!(
            service.create(&admin(), request).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_guard_cannot_create_client() {
        let service = ClientService::new(memory_store());
        assert!(matches!(
            service.create(&caller(RoleName::Guard), client_request("Nope Inc")).await,
            Err(DomainError::Authorization(_))
        ));
    }
}
