//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing).

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static segments take priority over `{hotel_id}`.
    let api_v1 = Router::new()
        // Hotels
        .route(
            "/hotels",
            get(handlers::list_hotels).post(handlers::create_hotel),
        )
        .route(
            "/hotels/one-free-room",
            get(handlers::hotels_with_one_free_room),
        )
        .route("/hotels/residents", get(handlers::hotel_residents))
        .route(
            "/hotels/{hotel_id}",
            get(handlers::get_hotel).delete(handlers::delete_hotel),
        )
        .route("/hotels/{hotel_id}/like", post(handlers::like_hotel))
        .route("/hotels/{hotel_id}/dislike", post(handlers::dislike_hotel))
        .route(
            "/hotels/{hotel_id}/rooms",
            get(handlers::list_hotel_rooms).post(handlers::create_room),
        )
        // Rooms
        .route("/rooms", get(handlers::room_availability))
        .route("/rooms/{room_id}", delete(handlers::delete_room))
        // Users
        .route("/users", post(handlers::create_user))
        .route("/users/{user_id}", delete(handlers::delete_user))
        // Reservations
        .route("/reservations", post(handlers::create_reservation))
        .route(
            "/reservations/{reservation_id}",
            get(handlers::get_reservation).delete(handlers::delete_reservation),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
