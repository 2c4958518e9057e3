//! Incident reports with photo evidence.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domain::models::incident::{
    CategorySummary, CreateIncidentRequest, Incident, IncidentPriority, IncidentQuery,
    IncidentPatch, IncidentStatus, IncidentView, NewIncident, PhotoUpload, UpdateIncidentRequest,
};
use domain::models::location::LocationSummary;
use domain::models::user::UserSummary;
use domain::services::{
    authorize, check_transition, is_allowed, validate_photo_batch, Action, Caller, PhotoLimits,
    Resource,
};
use domain::{DomainError, PhotoStore, StoredPhoto, WorkforceStore};
use shared::crypto::content_addressed_name;
use validator::Validate;

use crate::middleware::metrics::record_incident_reported;

pub struct IncidentService {
    store: Arc<dyn WorkforceStore>,
    photos: Arc<dyn PhotoStore>,
    limits: PhotoLimits,
}

impl IncidentService {
    pub fn new(
        store: Arc<dyn WorkforceStore>,
        photos: Arc<dyn PhotoStore>,
        limits: PhotoLimits,
    ) -> Self {
        Self {
            store,
            photos,
            limits,
        }
    }

    /// Files an incident on behalf of the caller.
    ///
    /// The whole photo batch is checked before anything is written. Photos are
    /// stored first, then the incident and its photo rows are inserted in one
    /// store operation; if that fails, files written by this call are removed.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateIncidentRequest,
        uploads: Vec<PhotoUpload>,
    ) -> Result<IncidentView, DomainError> {
        authorize(caller, Resource::Incident, Action::Create)?;
        request.validate()?;
        validate_photo_batch(&uploads, &self.limits)?;

        let priority = match (request.priority, request.category_id) {
            (Some(priority), _) => priority,
            (None, Some(category_id)) => self
                .store
                .find_incident_category(category_id)
                .await?
                .map(|c| IncidentPriority::from(c.priority))
                .ok_or_else(|| DomainError::not_found("Incident category"))?,
            (None, None) => IncidentPriority::default(),
        };

        let new_incident = NewIncident {
            reported_by: caller.user_id,
            location_id: request.location_id,
            category_id: request.category_id,
            title: request.title,
            description: request.description,
            date: request.date.unwrap_or_else(Utc::now),
            status: IncidentStatus::default(),
            priority,
            latitude: request.latitude,
            longitude: request.longitude,
        };

        let stored = self.store_photos(&uploads).await?;
        let urls = stored.iter().map(|p| p.url.clone()).collect();

        let (incident, photos) = match self
            .store
            .insert_incident_with_photos(new_incident, urls)
            .await
        {
            Ok(inserted) => inserted,
            Err(err) => {
                self.discard(&stored).await;
                return Err(err.into());
            }
        };

        record_incident_reported(photos.len());
        tracing::info!(
            incident_id = incident.id,
            reported_by = incident.reported_by,
            priority = incident.priority.as_str(),
            photo_count = photos.len(),
            "Incident reported"
        );
        self.respond(incident).await
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<IncidentView, DomainError> {
        authorize(caller, Resource::Incident, Action::Read)?;
        let incident = self
            .store
            .find_incident(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Incident"))?;
        self.respond(incident).await
    }

    /// Newest first. Filters apply in the order reporter, location, status.
    pub async fn list(
        &self,
        caller: &Caller,
        query: IncidentQuery,
    ) -> Result<Vec<IncidentView>, DomainError> {
        authorize(caller, Resource::Incident, Action::Read)?;

        let incidents = self.store.list_incidents(query.into()).await?;
        if incidents.is_empty() {
            return Ok(Vec::new());
        }

        let reporters: HashMap<i64, UserSummary> = self
            .store
            .list_users()
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();
        let locations: HashMap<i64, LocationSummary> = self
            .store
            .list_locations(None)
            .await?
            .iter()
            .map(|l| (l.id, LocationSummary::from(l)))
            .collect();
        let categories: HashMap<i64, CategorySummary> = self
            .store
            .list_incident_categories()
            .await?
            .iter()
            .map(|c| (c.id, CategorySummary::from(c)))
            .collect();

        let mut views = Vec::with_capacity(incidents.len());
        for incident in incidents {
            let photos = self.store.list_incident_photos(incident.id).await?;
            views.push(IncidentView {
                reporter: reporters.get(&incident.reported_by).cloned(),
                location: incident.location_id.and_then(|id| locations.get(&id).cloned()),
                category: incident.category_id.and_then(|id| categories.get(&id).cloned()),
                photos,
                incident,
            });
        }
        Ok(views)
    }

    /// Status changes follow the lifecycle unless the caller may override it.
    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateIncidentRequest,
    ) -> Result<IncidentView, DomainError> {
        authorize(caller, Resource::Incident, Action::Update)?;
        request.validate()?;

        let mut patch = IncidentPatch::from(request);
        if let Some(next) = patch.status {
            let current = self
                .store
                .find_incident(id)
                .await?
                .ok_or_else(|| DomainError::not_found("Incident"))?;
            check_transition(
                current.status,
                next,
                is_allowed(caller.role, Resource::Incident, Action::OverrideTransition),
            )?;
            patch.expected_status = Some(current.status);
        }

        let incident = self.store.update_incident(id, patch).await?;
        tracing::info!(
            incident_id = incident.id,
            status = incident.status.as_str(),
            updated_by = caller.user_id,
            "Incident updated"
        );
        self.respond(incident).await
    }

    async fn store_photos(&self, uploads: &[PhotoUpload]) -> Result<Vec<StoredPhoto>, DomainError> {
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = content_addressed_name(&upload.bytes, upload.file_name.as_deref());
            match self.photos.store(&name, &upload.bytes).await {
                Ok(photo) => stored.push(photo),
                Err(err) => {
                    self.discard(&stored).await;
                    return Err(err.into());
                }
            }
        }
        Ok(stored)
    }

    /// Removes files this call wrote. Files that already existed may back
    /// photos of other incidents and are left alone.
    async fn discard(&self, stored: &[StoredPhoto]) {
        for photo in stored.iter().filter(|p| p.newly_written) {
            if let Err(err) = self.photos.remove(&photo.url).await {
                tracing::warn!(url = %photo.url, error = %err, "Failed to remove orphaned photo");
            }
        }
    }

    async fn respond(&self, incident: Incident) -> Result<IncidentView, DomainError> {
        let reporter = self.store.find_user(incident.reported_by).await?;
        let location = match incident.location_id {
            Some(id) => self.store.find_location(id).await?,
            None => None,
        };
        let category = match incident.category_id {
            Some(id) => self.store.find_incident_category(id).await?,
            None => None,
        };
        let photos = self.store.list_incident_photos(incident.id).await?;

        Ok(IncidentView {
            reporter: reporter.as_ref().map(UserSummary::from),
            location: location.as_ref().map(LocationSummary::from),
            category: category.as_ref().map(CategorySummary::from),
            photos,
            incident,
        })
    }
}
