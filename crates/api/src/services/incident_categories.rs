use std::sync::Arc;

use domain::models::incident::{CreateIncidentCategoryRequest, IncidentCategory};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use validator::Validate;

pub struct IncidentCategoryService {
    store: Arc<dyn WorkforceStore>,
}

impl IncidentCategoryService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateIncidentCategoryRequest,
    ) -> Result<IncidentCategory, DomainError> {
        authorize(caller, Resource::IncidentCategory, Action::Create)?;
        request.validate()?;

        let category = self.store.insert_incident_category(request.into()).await?;
        tracing::info!(category_id = category.id, name = %category.name, "Incident category created");
        Ok(category)
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<IncidentCategory>, DomainError> {
        authorize(caller, Resource::IncidentCategory, Action::Read)?;
        Ok(self.store.list_incident_categories().await?)
    }
}
