//! PharmaFlow - pharmacy storefront order service

use anyhow::Result;
use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pharmaflow::domain::aggregates::order::{Order, OrderStatus};
use pharmaflow::domain::aggregates::product::{Category, Product};
use pharmaflow::domain::events::OrderEvent;
use pharmaflow::error::Error;
use pharmaflow::service::{CheckoutRequest, OrderService, TrackingInfo};
use pharmaflow::store::{PgStore, ProductFilter};

#[derive(Clone)]
struct AppState {
    svc: OrderService<PgStore>,
    nats: Option<async_nats::Client>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&std::env::var("DATABASE_URL")?)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match std::env::var("NATS_URL") {
        Ok(url) => async_nats::connect(&url).await.ok(),
        Err(_) => None,
    };

    let state = AppState {
        svc: OrderService::new(PgStore::new(db)),
        nats,
    };

    let app = Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "healthy", "service": "pharmaflow"})) }),
        )
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/orders", get(list_orders).post(create_order))
        .route("/api/v1/orders/:id", get(get_order))
        .route("/api/v1/orders/:id/tracking", get(get_tracking))
        .route("/api/v1/orders/:id/status", patch(update_order_status))
        .route("/api/v1/orders/:id/cancel", patch(cancel_order))
        .route("/api/v1/admin/orders", get(admin_list_orders))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8083".to_string());
    tracing::info!("pharmaflow listening on 0.0.0.0:{}", port);
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?,
        app,
    )
    .await?;
    Ok(())
}

// ---- identity (issued upstream; this service trusts the gateway headers) ----

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Customer,
    Admin,
}

struct AuthUser {
    id: Uuid,
    role: Role,
}

impl AuthUser {
    fn require_admin(&self) -> Result<(), ApiError> {
        if self.role != Role::Admin {
            return Err(ApiError {
                status: StatusCode::FORBIDDEN,
                message: "access denied, admin only".to_string(),
            });
        }
        Ok(())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(ApiError {
                status: StatusCode::UNAUTHORIZED,
                message: "authentication required".to_string(),
            })?;
        let role = match parts.headers.get("x-user-role").and_then(|v| v.to_str().ok()) {
            Some("admin") => Role::Admin,
            _ => Role::Customer,
        };
        Ok(AuthUser { id, role })
    }
}

// ---- error surface ----

struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::EmptyCart | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::ProductNotFound(_) | Error::OrderNotFound(_) | Error::CategoryNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Error::InsufficientStock { .. } | Error::PriceChanged { .. } | Error::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Error::IllegalState { .. } | Error::InvalidTransition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %e, "request failed");
            return Self {
                status,
                message: "internal server error".to_string(),
            };
        }
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"message": self.message})),
        )
            .into_response()
    }
}

async fn publish_event(state: &AppState, event: &OrderEvent) {
    let Some(client) = &state.nats else { return };
    match serde_json::to_vec(event) {
        Ok(payload) => {
            if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
                tracing::warn!(error = %e, subject = event.subject(), "failed to publish event");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
    }
}

// ---- catalog ----

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u32>,
    per_page: Option<u32>,
    category: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct PaginatedResponse<T> {
    data: Vec<T>,
    total: i64,
    page: u32,
}

async fn list_products(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Result<Json<PaginatedResponse<Product>>, ApiError> {
    let filter = ProductFilter {
        category: p.category,
        search: p.search,
        include_inactive: false,
        page: p.page.unwrap_or(1).max(1),
        per_page: p.per_page.unwrap_or(20).min(100),
    };
    let page = s.svc.list_products(&filter).await?;
    Ok(Json(PaginatedResponse {
        data: page.items,
        total: page.total,
        page: page.page,
    }))
}

async fn get_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(s.svc.get_product(id).await?))
}

async fn list_categories(State(s): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(s.svc.list_categories().await?))
}

// ---- orders ----

async fn create_order(
    State(s): State<AppState>,
    user: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = s.svc.place_order(user.id, req).await?;
    publish_event(
        &s,
        &OrderEvent::Placed {
            order_id: order.id,
            order_number: order.order_number.to_string(),
            user_id: order.user_id,
            total_amount: order.total_amount,
        },
    )
    .await;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(
    State(s): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(s.svc.orders_for_user(user.id).await?))
}

async fn get_order(
    State(s): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(s.svc.order_for_user(id, user.id).await?))
}

async fn get_tracking(
    State(s): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackingInfo>, ApiError> {
    Ok(Json(s.svc.tracking(id, user.id).await?))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
    tracking_number: Option<String>,
}

async fn update_order_status(
    State(s): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    user.require_admin()?;
    let order = s.svc.set_status(id, req.status, req.tracking_number).await?;
    let event = if order.status == OrderStatus::Cancelled {
        OrderEvent::Cancelled {
            order_id: order.id,
            order_number: order.order_number.to_string(),
        }
    } else {
        OrderEvent::StatusChanged {
            order_id: order.id,
            status: order.status,
        }
    };
    publish_event(&s, &event).await;
    Ok(Json(order))
}

async fn cancel_order(
    State(s): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = s.svc.cancel_order(id, user.id).await?;
    publish_event(
        &s,
        &OrderEvent::Cancelled {
            order_id: order.id,
            order_number: order.order_number.to_string(),
        },
    )
    .await;
    Ok(Json(order))
}

async fn admin_list_orders(
    State(s): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    user.require_admin()?;
    Ok(Json(s.svc.all_orders().await?))
}
