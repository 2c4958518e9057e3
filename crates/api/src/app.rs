use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::PhotoLimits;
use domain::{PhotoStore, WorkforceStore};
use shared::jwt::{JwtConfig, JwtError};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{
    attendance, auth, clients, dashboard, guards, health, incident_categories, incidents,
    locations, schedules, shifts, users,
};
use crate::services::{
    AttendanceService, AuthService, ClientService, DashboardService, GuardService,
    IncidentCategoryService, IncidentService, LocationService, ScheduleService, ShiftService,
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WorkforceStore>,
    pub photos: Arc<dyn PhotoStore>,
    pub jwt: Arc<JwtConfig>,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store.clone(), self.jwt.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone())
    }

    pub fn guards(&self) -> GuardService {
        GuardService::new(self.store.clone())
    }

    pub fn clients(&self) -> ClientService {
        ClientService::new(self.store.clone())
    }

    pub fn locations(&self) -> LocationService {
        LocationService::new(self.store.clone())
    }

    pub fn shifts(&self) -> ShiftService {
        ShiftService::new(self.store.clone())
    }

    pub fn schedules(&self) -> ScheduleService {
        ScheduleService::new(self.store.clone())
    }

    pub fn attendance(&self) -> AttendanceService {
        AttendanceService::new(self.store.clone())
    }

    pub fn incident_categories(&self) -> IncidentCategoryService {
        IncidentCategoryService::new(self.store.clone())
    }

    pub fn incidents(&self) -> IncidentService {
        IncidentService::new(self.store.clone(), self.photos.clone(), self.photo_limits())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.store.clone())
    }

    pub fn photo_limits(&self) -> PhotoLimits {
        PhotoLimits {
            max_photos: self.config.uploads.max_photos,
            max_photo_bytes: self.config.uploads.max_photo_bytes,
        }
    }
}

/// Builds the router. Fails only when the JWT key material is unusable.
pub fn create_app(
    config: Config,
    store: Arc<dyn WorkforceStore>,
    photos: Arc<dyn PhotoStore>,
) -> Result<Router, JwtError> {
    let config = Arc::new(config);
    let jwt = Arc::new(config.jwt.signer()?);

    // Rate limiting is disabled when rate_limit_per_minute is 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        store,
        photos,
        jwt,
        config: config.clone(),
        rate_limiter,
    };

    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated API. Each handler extracts the caller; the rate limiter
    // keys on the user id carried by the bearer token.
    let protected_routes = Router::new()
        .route("/api/auth/user", get(auth::current_user))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id", get(users::get_user).patch(users::update_user))
        .route("/api/guards", get(guards::list_guards).post(guards::create_guard))
        .route(
            "/api/guards/:id",
            get(guards::get_guard).patch(guards::update_guard),
        )
        .route(
            "/api/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/api/clients/:id",
            get(clients::get_client).patch(clients::update_client),
        )
        .route(
            "/api/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/api/locations/:id",
            get(locations::get_location).patch(locations::update_location),
        )
        .route("/api/shifts", get(shifts::list_shifts).post(shifts::create_shift))
        .route(
            "/api/shifts/:id",
            get(shifts::get_shift).patch(shifts::update_shift),
        )
        .route(
            "/api/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route(
            "/api/schedules/:id",
            get(schedules::get_schedule).patch(schedules::update_schedule),
        )
        .route(
            "/api/attendance",
            get(attendance::list_attendance).post(attendance::create_attendance),
        )
        .route(
            "/api/attendance/:id",
            get(attendance::get_attendance).patch(attendance::update_attendance),
        )
        .route(
            "/api/incident-categories",
            get(incident_categories::list_categories).post(incident_categories::create_category),
        )
        .route(
            "/api/incidents",
            get(incidents::list_incidents).post(incidents::create_incident),
        )
        .route(
            "/api/incidents/:id",
            get(incidents::get_incident).patch(incidents::update_incident),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/activities", get(dashboard::activities))
        .route("/api/dashboard/performance", get(dashboard::performance))
        .route("/api/dashboard/shifts", get(dashboard::upcoming_shifts))
        .route("/api/dashboard/map", get(dashboard::map))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let body_limit = config.server.max_body_size;

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service(
            &config.uploads.public_prefix,
            ServeDir::new(&config.uploads.dir),
        )
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
