use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::notification::NotificationCategory;
use crate::models::trade::ReservationStatus;
use crate::pagination::Page;
use crate::services::notifier::Notifier;
use crate::services::schools::ClubService;
use crate::services::trade::{CreateListingRequest, ReserveRequest, TradeFilter, TradeService};
use crate::services::InventoryService;

async fn ensure_club_admin(pool: &PgPool, user: &AuthUser, club_id: i64) -> AppResult<()> {
    if user.is_admin() || ClubService::is_admin(pool, club_id, user.id).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only admins of the owning club can manage its listings".to_string(),
        ))
    }
}

/// GET /trade/listings
pub async fn list_listings(
    pool: web::Data<PgPool>,
    query: web::Query<TradeFilter>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner();
    let (items, total) = TradeService::list(&pool, &filter).await?;
    let (page, size) = crate::pagination::clamp(filter.page, filter.size);
    Ok(super::ok(Page::new(items, page, size, total)))
}

/// POST /trade/listings
pub async fn create_listing(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateListingRequest>,
) -> AppResult<HttpResponse> {
    let req = req.into_inner();
    let item = InventoryService::get(&pool, req.inventory_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("inventory item not found".to_string()))?;
    ensure_club_admin(&pool, &user, item.club_id).await?;
    let listing = TradeService::create_listing(&pool, req).await?;
    Ok(super::created(listing))
}

/// GET /trade/listings/{id}
pub async fn get_listing(pool: web::Data<PgPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let detail = TradeService::get_detail(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;
    Ok(super::ok(detail))
}

/// GET /trade/listings/{id}/reservations
pub async fn list_reservations(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let listing_id = path.into_inner();
    let club_id = TradeService::listing_club_id(&pool, listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;
    ensure_club_admin(&pool, &user, club_id).await?;
    let reservations = TradeService::list_reservations(&pool, listing_id).await?;
    Ok(super::ok(reservations))
}

/// POST /trade/listings/{id}/reservations
///
/// Creating a reservation asks the owning club to check the item over, so
/// each of its admins gets an ITEM_CHECK notification.
pub async fn create_reservation(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<ReserveRequest>,
) -> AppResult<HttpResponse> {
    let listing_id = path.into_inner();
    let club_id = TradeService::listing_club_id(&pool, listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;

    let reservation =
        TradeService::create_reservation(&pool, listing_id, user.id, req.into_inner()).await?;

    let admins = ClubService::admin_ids(&pool, club_id).await?;
    notifier
        .notify_each(
            &admins,
            NotificationCategory::ItemCheck,
            "A new reservation request arrived for one of your listings.",
            Some(listing_id),
            None,
        )
        .await;

    Ok(super::created(reservation))
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub status: ReservationStatus,
}

/// PATCH /trade/reservations/{id}
///
/// Status changes are decided by the owning club; the reserving user gets a
/// TRADE_STATUS notification either way.
pub async fn update_reservation(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<UpdateReservationRequest>,
) -> AppResult<HttpResponse> {
    let reservation_id = path.into_inner();
    let reservation = TradeService::get_reservation(&pool, reservation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("reservation not found".to_string()))?;
    let club_id = TradeService::listing_club_id(&pool, reservation.listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;
    ensure_club_admin(&pool, &user, club_id).await?;

    let status = req.into_inner().status;
    let updated = TradeService::set_reservation_status(&pool, reservation_id, status).await?;

    let message = match status {
        ReservationStatus::Confirmed => "Your reservation was confirmed.",
        ReservationStatus::Canceled => "Your reservation was canceled.",
        ReservationStatus::Pending => "Your reservation is pending again.",
    };
    if let Err(e) = notifier
        .notify_user(
            updated.user_id,
            NotificationCategory::TradeStatus,
            message,
            Some(updated.listing_id),
            None,
        )
        .await
    {
        tracing::warn!("reservation status notification failed: {e}");
    }

    Ok(super::ok(updated))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trade")
            .route("/listings", web::get().to(list_listings))
            .route("/listings", web::post().to(create_listing))
            .route("/listings/{id}", web::get().to(get_listing))
            .route("/listings/{id}/reservations", web::get().to(list_reservations))
            .route("/listings/{id}/reservations", web::post().to(create_reservation))
            .route("/reservations/{id}", web::patch().to(update_reservation)),
    );
}
