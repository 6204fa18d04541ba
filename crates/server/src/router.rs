use super::{handlers, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/manuals",
            get(handlers::list_manuals_handler).post(handlers::create_manual_handler),
        )
        .route("/api/manuals/{id}", delete(handlers::delete_manual_handler))
        .route(
            "/api/products",
            get(handlers::list_products_handler).post(handlers::create_product_handler),
        )
        .route(
            "/api/products/{id}",
            delete(handlers::delete_product_handler),
        )
        .route(
            "/api/scenarios",
            get(handlers::list_scenarios_handler).post(handlers::create_scenario_handler),
        )
        .route(
            "/api/scenarios/{id}",
            delete(handlers::delete_scenario_handler),
        )
        .route(
            "/api/precedents",
            get(handlers::list_precedents_handler).post(handlers::create_precedent_handler),
        )
        .route(
            "/api/precedents/{id}",
            delete(handlers::delete_precedent_handler),
        )
        .route("/api/suggest", post(handlers::suggest_handler))
        .route("/api/experiences", get(handlers::list_experiences_handler))
        .route("/api/chats", get(handlers::list_chats_handler))
        .route(
            "/api/chats/{id}/messages",
            get(handlers::list_chat_messages_handler),
        )
        .route(
            "/api/chats/{id}/send",
            post(handlers::send_chat_message_handler),
        )
        .route("/webhook/line", post(handlers::line_webhook_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
