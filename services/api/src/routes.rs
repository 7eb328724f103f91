//! API service routes
//!
//! Every route is reachable both at the root and under `/api`. Stored
//! payment screenshots are served from `/uploads`.

use auth::{Operation, guarded};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

pub mod catalog;
pub mod contact;
pub mod health;
pub mod orders;
pub mod reviews;

/// Room for the text fields that travel next to the screenshot
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the full application router
pub fn create_router(state: AppState) -> Router {
    let routes = api_routes(state.clone()).merge(auth::routes::create_router(state.auth.clone()));
    let uploads = ServeDir::new(state.orders.uploads().root());

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn api_routes(state: AppState) -> Router {
    let auth = state.auth.clone();
    let upload_limit = state.orders.uploads().max_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/orders",
            guarded(
                post(orders::create_order).layer(DefaultBodyLimit::max(upload_limit)),
                &auth,
                Operation::CreateOrder,
            )
            .merge(guarded(
                get(orders::list_all_orders),
                &auth,
                Operation::ListAllOrders,
            )),
        )
        .route(
            "/orders/my-orders",
            guarded(get(orders::list_my_orders), &auth, Operation::ListOwnOrders),
        )
        .route(
            "/orders/:id/status",
            guarded(put(orders::set_order_status), &auth, Operation::SetOrderStatus),
        )
        .route(
            "/services",
            get(catalog::list_services).merge(guarded(
                post(catalog::create_service),
                &auth,
                Operation::CreateService,
            )),
        )
        .route(
            "/services/:id",
            guarded(put(catalog::update_service), &auth, Operation::UpdateService).merge(guarded(
                delete(catalog::delete_service),
                &auth,
                Operation::DeleteService,
            )),
        )
        .route(
            "/reviews",
            get(reviews::list_approved_reviews).merge(post(reviews::submit_review)),
        )
        .route(
            "/reviews/all",
            guarded(get(reviews::list_all_reviews), &auth, Operation::ListAllReviews),
        )
        .route(
            "/reviews/:id",
            guarded(put(reviews::moderate_review), &auth, Operation::ModerateReview).merge(guarded(
                delete(reviews::delete_review),
                &auth,
                Operation::DeleteReview,
            )),
        )
        .route(
            "/contact",
            post(contact::submit_message).merge(guarded(
                get(contact::list_messages),
                &auth,
                Operation::ListContactMessages,
            )),
        )
        .with_state(state)
}
