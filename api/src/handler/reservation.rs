use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use kernel::model::id::ReservationId;
use kernel::model::reservation::event::{CreateReservation, DeleteReservation, UpdateReservation};
use kernel::model::reservation::Reservation;
use kernel::notifier::{RequirementNotice, RequirementNotifier};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::extractor::AuthorizedUser;
use crate::model::reservation::{
    CreateReservationRequest, ReservationListQuery, ReservationResponse, ReservationsResponse,
    UpdateReservationRequest, UpdateReservationRequestWithId,
};

pub async fn show_reservation_list(
    _user: AuthorizedUser,
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    let reservations = match query.room_id {
        Some(room_id) => {
            registry
                .reservation_repository()
                .find_confirmed_by_room_id(room_id)
                .await?
        }
        None => registry.reservation_repository().find_confirmed_all().await?,
    };
    Ok(Json(reservations.into()))
}

pub async fn register_reservation(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let event = CreateReservation::try_from(req)?;
    let reservation = registry.reservation_repository().create(event).await?;

    // The booking is committed at this point; the facilities notice rides on
    // a detached task so the caller never waits on it.
    dispatch_requirement_notice(registry.requirement_notifier(), &reservation);

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

pub async fn update_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let event =
        UpdateReservation::try_from(UpdateReservationRequestWithId::new(reservation_id, req))?;
    let reservation = registry.reservation_repository().update(event).await?;
    Ok(Json(reservation.into()))
}

pub async fn delete_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .reservation_repository()
        .delete(DeleteReservation::new(reservation_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fire-and-forget notification for reservations that carry requirements.
/// Delivery failures are logged and never reach the reservation result.
fn dispatch_requirement_notice(notifier: Arc<dyn RequirementNotifier>, reservation: &Reservation) {
    if reservation.requirements.is_empty() {
        return;
    }
    let notice = RequirementNotice::new(
        reservation.title.clone(),
        reservation.room.name.clone(),
        reservation.period.start(),
        reservation.period.end(),
        reservation.responsible.clone(),
        reservation.requirements.clone(),
    );
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(notice).await {
            tracing::warn!(error = %e, "failed to deliver requirement notice");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use kernel::model::id::{ReservationId, RoomId};
    use kernel::model::reservation::{
        ReservationPeriod, ReservationRoom, ReservationStatus,
    };
    use shared::error::AppError;

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<RequirementNotice>>,
    }

    #[async_trait]
    impl RequirementNotifier for RecordingNotifier {
        async fn notify(&self, notice: RequirementNotice) -> AppResult<()> {
            self.notices.lock().unwrap().push(notice);
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl RequirementNotifier for FailingNotifier {
        async fn notify(&self, _notice: RequirementNotice) -> AppResult<()> {
            Err(AppError::ExternalServiceError("provider is down".into()))
        }
    }

    fn reservation(requirements: &str) -> Reservation {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        Reservation {
            id: ReservationId::new(),
            room: ReservationRoom {
                room_id: RoomId::new(),
                name: "Sala SUM".into(),
            },
            title: "Meeting".into(),
            responsible: "Alice".into(),
            period: ReservationPeriod::new(start, end).unwrap(),
            requirements: requirements.into(),
            status: ReservationStatus::Confirmed,
        }
    }

    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn dispatch_sends_exactly_one_notice_with_the_booking_details() {
        let notifier = Arc::new(RecordingNotifier::default());
        dispatch_requirement_notice(notifier.clone(), &reservation("Need projector"));
        settle().await;

        let notices = notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Meeting");
        assert_eq!(notices[0].room_name, "Sala SUM");
        assert_eq!(notices[0].responsible, "Alice");
        assert_eq!(notices[0].requirements, "Need projector");
    }

    #[tokio::test]
    async fn dispatch_skips_reservations_without_requirements() {
        let notifier = Arc::new(RecordingNotifier::default());
        dispatch_requirement_notice(notifier.clone(), &reservation(""));
        settle().await;

        assert!(notifier.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notifier_failure_stays_on_the_detached_task() {
        // Nothing to assert beyond "does not panic or propagate": the
        // spawned task logs the failure and ends.
        dispatch_requirement_notice(Arc::new(FailingNotifier), &reservation("Need projector"));
        settle().await;
    }
}
