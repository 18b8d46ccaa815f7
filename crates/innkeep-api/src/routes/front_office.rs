use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use innkeep_core::model::{
    AvailabilityQuery, Guest, GuestFilter, GuestPatch, NewGuest, NewReservation, NewRoom,
    NewRoomType, Reservation, ReservationFilter, ReservationPatch, Room, RoomFilter, RoomPatch,
    RoomStatus, RoomType, RoomTypePatch,
};
use innkeep_engine::commands::reservations::{self, CheckOutSummary};
use innkeep_engine::commands::rooms::{self, AvailableRoom, RoomStatusBoard};
use innkeep_engine::commands::guests;
use serde::Deserialize;

use super::{created, OnDate, ReasonBody};
use crate::error::ApiResult;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/room-types", get(list_room_types).post(create_room_type))
        .route(
            "/room-types/:id",
            get(get_room_type).put(update_room_type).delete(delete_room_type),
        )
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/availability", get(availability))
        .route("/rooms/status-board", get(status_board))
        .route("/rooms/:id", get(get_room).put(update_room).delete(delete_room))
        .route("/rooms/:id/status", put(set_room_status))
        .route("/guests", get(list_guests).post(create_guest))
        .route("/guests/:id", get(get_guest).put(update_guest).delete(delete_guest))
        .route("/guests/:id/stays", get(guest_stays))
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route("/reservations/arrivals", get(arrivals))
        .route("/reservations/departures", get(departures))
        .route("/reservations/in-house", get(in_house))
        .route("/reservations/:id", get(get_reservation).put(update_reservation))
        .route("/reservations/:id/check-in", post(check_in))
        .route("/reservations/:id/check-out", post(check_out))
        .route("/reservations/:id/cancel", post(cancel))
        .route("/reservations/:id/no-show", post(no_show))
}

// room types

async fn list_room_types(State(state): State<AppState>) -> ApiResult<Json<Vec<RoomType>>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_type_list(conn)).await?))
}

async fn create_room_type(
    State(state): State<AppState>,
    Json(input): Json<NewRoomType>,
) -> ApiResult<(StatusCode, Json<RoomType>)> {
    Ok(created(state.with_conn(move |conn| rooms::room_type_create(conn, input)).await?))
}

async fn get_room_type(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<RoomType>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_type_get(conn, &id)).await?))
}

async fn update_room_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RoomTypePatch>,
) -> ApiResult<Json<RoomType>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_type_update(conn, &id, patch)).await?))
}

async fn delete_room_type(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| rooms::room_type_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// rooms

async fn list_rooms(
    State(state): State<AppState>,
    Query(filter): Query<RoomFilter>,
) -> ApiResult<Json<Vec<Room>>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_list(conn, &filter)).await?))
}

async fn create_room(
    State(state): State<AppState>,
    Json(input): Json<NewRoom>,
) -> ApiResult<(StatusCode, Json<Room>)> {
    Ok(created(state.with_conn(move |conn| rooms::room_create(conn, input)).await?))
}

async fn get_room(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Room>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_get(conn, &id)).await?))
}

async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RoomPatch>,
) -> ApiResult<Json<Room>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_update(conn, &id, patch)).await?))
}

async fn delete_room(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| rooms::room_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct StatusBody {
    status: RoomStatus,
}

async fn set_room_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> ApiResult<Json<Room>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_set_status(conn, &id, body.status)).await?))
}

async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<Vec<AvailableRoom>>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_availability(conn, &query)).await?))
}

async fn status_board(State(state): State<AppState>) -> ApiResult<Json<RoomStatusBoard>> {
    Ok(Json(state.with_conn(move |conn| rooms::room_status_board(conn)).await?))
}

// guests

async fn list_guests(
    State(state): State<AppState>,
    Query(filter): Query<GuestFilter>,
) -> ApiResult<Json<Vec<Guest>>> {
    Ok(Json(state.with_conn(move |conn| guests::guest_list(conn, &filter)).await?))
}

async fn create_guest(
    State(state): State<AppState>,
    Json(input): Json<NewGuest>,
) -> ApiResult<(StatusCode, Json<Guest>)> {
    Ok(created(state.with_conn(move |conn| guests::guest_create(conn, input)).await?))
}

async fn get_guest(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Guest>> {
    Ok(Json(state.with_conn(move |conn| guests::guest_get(conn, &id)).await?))
}

async fn update_guest(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<GuestPatch>,
) -> ApiResult<Json<Guest>> {
    Ok(Json(state.with_conn(move |conn| guests::guest_update(conn, &id, patch)).await?))
}

async fn delete_guest(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| guests::guest_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn guest_stays(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Vec<Reservation>>> {
    Ok(Json(state.with_conn(move |conn| guests::guest_stay_history(conn, &id)).await?))
}

// reservations

async fn list_reservations(
    State(state): State<AppState>,
    Query(filter): Query<ReservationFilter>,
) -> ApiResult<Json<Vec<Reservation>>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_list(conn, &filter)).await?))
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(input): Json<NewReservation>,
) -> ApiResult<(StatusCode, Json<Reservation>)> {
    Ok(created(state.with_conn(move |conn| reservations::reservation_create(conn, input)).await?))
}

async fn get_reservation(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Reservation>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_get(conn, &id)).await?))
}

async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ReservationPatch>,
) -> ApiResult<Json<Reservation>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_update(conn, &id, patch)).await?))
}

async fn arrivals(State(state): State<AppState>, Query(on): Query<OnDate>) -> ApiResult<Json<Vec<Reservation>>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_arrivals(conn, on.date())).await?))
}

async fn departures(State(state): State<AppState>, Query(on): Query<OnDate>) -> ApiResult<Json<Vec<Reservation>>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_departures(conn, on.date())).await?))
}

async fn in_house(State(state): State<AppState>) -> ApiResult<Json<Vec<Reservation>>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_in_house(conn)).await?))
}

async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
) -> ApiResult<Json<Reservation>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_check_in(conn, &id, on.date())).await?))
}

async fn check_out(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
) -> ApiResult<Json<CheckOutSummary>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_check_out(conn, &id, on.date())).await?))
}

async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> ApiResult<Json<Reservation>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_cancel(conn, &id, body.reason)).await?))
}

async fn no_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
) -> ApiResult<Json<Reservation>> {
    Ok(Json(state.with_conn(move |conn| reservations::reservation_no_show(conn, &id, on.date())).await?))
}
