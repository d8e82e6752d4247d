use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString};

use crate::model::id::{ReservationId, RoomId};

pub mod event;

/// A half-open booking interval `[start, end)`.
///
/// Construction enforces `start < end`, so every value of this type is a
/// valid interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReservationPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(AppError::InvalidInterval)
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Half-open interval overlap: touching boundaries do not collide.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug)]
pub struct Reservation {
    pub id: ReservationId,
    pub room: ReservationRoom,
    pub title: String,
    pub responsible: String,
    pub period: ReservationPeriod,
    pub requirements: String,
    pub status: ReservationStatus,
}

/// Room reference data joined onto a reservation for display.
#[derive(Debug, Clone)]
pub struct ReservationRoom {
    pub room_id: RoomId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn period_rejects_inverted_and_empty_intervals() {
        assert!(matches!(
            ReservationPeriod::new(at(12, 0), at(10, 0)),
            Err(AppError::InvalidInterval)
        ));
        assert!(matches!(
            ReservationPeriod::new(at(10, 0), at(10, 0)),
            Err(AppError::InvalidInterval)
        ));
        assert!(ReservationPeriod::new(at(10, 0), at(12, 0)).is_ok());
    }

    #[test]
    fn overlap_detects_partial_and_contained_intervals() {
        let base = ReservationPeriod::new(at(10, 0), at(12, 0)).unwrap();
        let partial = ReservationPeriod::new(at(11, 0), at(13, 0)).unwrap();
        let contained = ReservationPeriod::new(at(10, 30), at(11, 30)).unwrap();
        let identical = ReservationPeriod::new(at(10, 0), at(12, 0)).unwrap();

        assert!(base.overlaps(&partial));
        assert!(partial.overlaps(&base));
        assert!(base.overlaps(&contained));
        assert!(contained.overlaps(&base));
        assert!(base.overlaps(&identical));
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        let morning = ReservationPeriod::new(at(10, 0), at(12, 0)).unwrap();
        let afternoon = ReservationPeriod::new(at(12, 0), at(13, 0)).unwrap();
        let earlier = ReservationPeriod::new(at(9, 0), at(10, 0)).unwrap();

        assert!(!morning.overlaps(&afternoon));
        assert!(!afternoon.overlaps(&morning));
        assert!(!morning.overlaps(&earlier));
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(ReservationStatus::Confirmed.to_string(), "confirmed");
        assert_eq!(
            "cancelled".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Cancelled
        );
        assert!("returned".parse::<ReservationStatus>().is_err());
    }
}
