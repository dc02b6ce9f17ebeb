//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer in [`crate::db::services`].

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateRoomRequest, DateQuery, FreeRoomHotelsResponse, HealthResponse, HotelListResponse,
    ResidentsQuery, ResidentsResponse, RoomAvailabilityResponse, RoomListResponse, StayQuery,
};
use super::error::AppError;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::state::AppState;
use crate::api::{
    Hotel, HotelId, NewHotel, NewReservation, NewRoom, NewUser, Reservation, ReservationId, Room,
    RoomId, User, UserId,
};
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers that create a resource.
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Hotels
// =============================================================================

/// GET /v1/hotels
pub async fn list_hotels(State(state): State<AppState>) -> HandlerResult<HotelListResponse> {
    let hotels = db_services::list_hotels(state.repository.as_ref()).await?;
    Ok(Json(hotels.into()))
}

/// POST /v1/hotels
pub async fn create_hotel(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewHotel>,
) -> CreatedResult<Hotel> {
    let hotel = db_services::create_hotel(state.repository.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

/// GET /v1/hotels/{hotel_id}
pub async fn get_hotel(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
) -> HandlerResult<Hotel> {
    let hotel = db_services::get_hotel(state.repository.as_ref(), HotelId::new(hotel_id)).await?;
    Ok(Json(hotel))
}

/// DELETE /v1/hotels/{hotel_id}
pub async fn delete_hotel(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_hotel(state.repository.as_ref(), HotelId::new(hotel_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/hotels/{hotel_id}/like
pub async fn like_hotel(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    db_services::like(state.repository.as_ref(), HotelId::new(hotel_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/hotels/{hotel_id}/dislike
pub async fn dislike_hotel(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    db_services::dislike(state.repository.as_ref(), HotelId::new(hotel_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/hotels/one-free-room?date=YYYY-MM-DD
pub async fn hotels_with_one_free_room(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateQuery>,
) -> HandlerResult<FreeRoomHotelsResponse> {
    let hotels =
        db_services::get_hotels_with_one_free_room(state.repository.as_ref(), query.date).await?;
    Ok(Json(FreeRoomHotelsResponse {
        date: query.date,
        hotels,
    }))
}

/// GET /v1/hotels/residents?title=...[&date=YYYY-MM-DD]
pub async fn hotel_residents(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ResidentsQuery>,
) -> HandlerResult<ResidentsResponse> {
    let date = query.date.unwrap_or_else(db_services::today);
    let users =
        db_services::get_users_living_in_on(state.repository.as_ref(), &query.title, date).await?;
    Ok(Json(ResidentsResponse {
        title: query.title,
        date,
        users,
    }))
}

// =============================================================================
// Rooms
// =============================================================================

/// GET /v1/hotels/{hotel_id}/rooms
pub async fn list_hotel_rooms(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
) -> HandlerResult<RoomListResponse> {
    let rooms =
        db_services::list_rooms_for_hotel(state.repository.as_ref(), HotelId::new(hotel_id))
            .await?;
    Ok(Json(rooms.into()))
}

/// POST /v1/hotels/{hotel_id}/rooms
pub async fn create_room(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
    ApiJson(request): ApiJson<CreateRoomRequest>,
) -> CreatedResult<Room> {
    let room = db_services::create_room(
        state.repository.as_ref(),
        NewRoom::new(HotelId::new(hotel_id), request.title),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /v1/rooms?move_in=YYYY-MM-DD&move_out=YYYY-MM-DD
///
/// Every room, flagged `sold_out` when a reservation overlaps the stay.
pub async fn room_availability(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StayQuery>,
) -> HandlerResult<RoomAvailabilityResponse> {
    if query.move_out < query.move_in {
        return Err(AppError::BadRequest(format!(
            "move_out {} is before move_in {}",
            query.move_out, query.move_in
        )));
    }

    let rooms =
        db_services::get_rooms(state.repository.as_ref(), query.move_in, query.move_out).await?;
    Ok(Json(RoomAvailabilityResponse {
        move_in: query.move_in,
        move_out: query.move_out,
        rooms,
    }))
}

/// DELETE /v1/rooms/{room_id}
pub async fn delete_room(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_room(state.repository.as_ref(), RoomId::new(room_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Users
// =============================================================================

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewUser>,
) -> CreatedResult<User> {
    let user = db_services::create_user(state.repository.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /v1/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_user(state.repository.as_ref(), UserId::new(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Reservations
// =============================================================================

/// POST /v1/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewReservation>,
) -> CreatedResult<Reservation> {
    let reservation = db_services::create_reservation(state.repository.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /v1/reservations/{reservation_id}
pub async fn get_reservation(
    State(state): State<AppState>,
    ApiPath(reservation_id): ApiPath<i64>,
) -> HandlerResult<Reservation> {
    let reservation = db_services::get_reservation(
        state.repository.as_ref(),
        ReservationId::new(reservation_id),
    )
    .await?;
    Ok(Json(reservation))
}

/// DELETE /v1/reservations/{reservation_id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    ApiPath(reservation_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_reservation(
        state.repository.as_ref(),
        ReservationId::new(reservation_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
