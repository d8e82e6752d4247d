use std::sync::Arc;

use adapter::repository::memory::InMemoryReservationRepository;
use chrono::{DateTime, TimeZone, Utc};
use kernel::model::id::{ReservationId, RoomId};
use kernel::model::reservation::event::{CreateReservation, DeleteReservation, UpdateReservation};
use kernel::model::room::Room;
use kernel::repository::reservation::ReservationRepository;
use shared::error::AppError;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

async fn repo_with_room(name: &str) -> (Arc<InMemoryReservationRepository>, RoomId) {
    let repo = Arc::new(InMemoryReservationRepository::new());
    let room_id = RoomId::new();
    repo.insert_room(Room {
        id: room_id,
        name: name.into(),
    })
    .await;
    (repo, room_id)
}

fn booking(
    room_id: RoomId,
    title: &str,
    responsible: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CreateReservation {
    CreateReservation::new(room_id, title, responsible, start, end, None).unwrap()
}

#[tokio::test]
async fn overlapping_create_is_rejected_and_touching_boundary_accepted() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    repo.create(booking(room_id, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();

    let conflict = repo
        .create(booking(room_id, "Standup", "Bob", at(11, 0), at(11, 30)))
        .await;
    assert!(matches!(conflict, Err(AppError::SlotConflict)));

    // [12:00, 13:00) touches [10:00, 12:00) without overlapping.
    repo.create(booking(room_id, "Lunch", "Carol", at(12, 0), at(13, 0)))
        .await
        .unwrap();

    let confirmed = repo.find_confirmed_all().await.unwrap();
    assert_eq!(confirmed.len(), 2);
}

#[tokio::test]
async fn failed_create_leaves_the_collection_unchanged() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    let kept = repo
        .create(booking(room_id, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();

    let conflict = repo
        .create(booking(room_id, "Clash", "Bob", at(10, 30), at(11, 0)))
        .await;
    assert!(matches!(conflict, Err(AppError::SlotConflict)));

    let unknown_room = repo
        .create(booking(RoomId::new(), "Orphan", "Bob", at(14, 0), at(15, 0)))
        .await;
    assert!(matches!(unknown_room, Err(AppError::EntityNotFound(_))));

    let confirmed = repo.find_confirmed_all().await.unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, kept.id);
    assert_eq!(confirmed[0].title, "Meeting");
}

#[tokio::test]
async fn update_does_not_conflict_with_its_own_interval() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    let reservation = repo
        .create(booking(room_id, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();

    // Same interval as before: must not be flagged as overlapping itself.
    let same = UpdateReservation::new(
        reservation.id,
        room_id,
        "Meeting",
        at(10, 0),
        at(12, 0),
        None,
    )
    .unwrap();
    repo.update(same).await.unwrap();

    // Shrinking inside its own prior interval succeeds too.
    let shrunk = UpdateReservation::new(
        reservation.id,
        room_id,
        "Meeting",
        at(10, 30),
        at(11, 30),
        None,
    )
    .unwrap();
    let updated = repo.update(shrunk).await.unwrap();
    assert_eq!(updated.period.start(), at(10, 30));
    assert_eq!(updated.responsible, "Alice");
}

#[tokio::test]
async fn update_into_an_occupied_slot_is_rejected_without_mutation() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    repo.create(booking(room_id, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();
    let movable = repo
        .create(booking(room_id, "Review", "Bob", at(13, 0), at(14, 0)))
        .await
        .unwrap();

    let clash =
        UpdateReservation::new(movable.id, room_id, "Review", at(11, 0), at(13, 0), None).unwrap();
    assert!(matches!(repo.update(clash).await, Err(AppError::SlotConflict)));

    let untouched = repo.find_by_id(movable.id).await.unwrap().unwrap();
    assert_eq!(untouched.period.start(), at(13, 0));
    assert_eq!(untouched.period.end(), at(14, 0));
}

#[tokio::test]
async fn update_of_a_missing_reservation_reports_not_found() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    let event = UpdateReservation::new(
        ReservationId::new(),
        room_id,
        "Ghost",
        at(10, 0),
        at(11, 0),
        None,
    )
    .unwrap();
    assert!(matches!(
        repo.update(event).await,
        Err(AppError::EntityNotFound(_))
    ));
}

#[tokio::test]
async fn update_can_move_a_reservation_to_a_free_room() {
    let (repo, sum) = repo_with_room("Sala SUM").await;
    let sae = RoomId::new();
    repo.insert_room(Room {
        id: sae,
        name: "Sala SAE".into(),
    })
    .await;

    let reservation = repo
        .create(booking(sum, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();

    let moved = UpdateReservation::new(
        reservation.id,
        sae,
        "Meeting",
        at(10, 0),
        at(12, 0),
        Some("Need projector"),
    )
    .unwrap();
    let updated = repo.update(moved).await.unwrap();
    assert_eq!(updated.room.name, "Sala SAE");
    assert_eq!(updated.requirements, "Need projector");

    // The old slot is free again.
    repo.create(booking(sum, "Backfill", "Bob", at(10, 0), at(12, 0)))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_is_an_idempotent_ack() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    let reservation = repo
        .create(booking(room_id, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();

    repo.delete(DeleteReservation::new(reservation.id))
        .await
        .unwrap();
    assert!(repo.find_by_id(reservation.id).await.unwrap().is_none());

    // Second delete of the same id, and a delete of a never-seen id, both
    // succeed as no-ops.
    repo.delete(DeleteReservation::new(reservation.id))
        .await
        .unwrap();
    repo.delete(DeleteReservation::new(ReservationId::new()))
        .await
        .unwrap();

    // And the slot can be rebooked.
    repo.create(booking(room_id, "Rebooked", "Bob", at(10, 0), at(12, 0)))
        .await
        .unwrap();
}

#[tokio::test]
async fn list_filters_by_room() {
    let (repo, sum) = repo_with_room("Sala SUM").await;
    let sae = RoomId::new();
    repo.insert_room(Room {
        id: sae,
        name: "Sala SAE".into(),
    })
    .await;

    repo.create(booking(sum, "Meeting", "Alice", at(10, 0), at(12, 0)))
        .await
        .unwrap();
    repo.create(booking(sae, "Workshop", "Bob", at(10, 0), at(12, 0)))
        .await
        .unwrap();

    let all = repo.find_confirmed_all().await.unwrap();
    assert_eq!(all.len(), 2);

    let only_sum = repo.find_confirmed_by_room_id(sum).await.unwrap();
    assert_eq!(only_sum.len(), 1);
    assert_eq!(only_sum[0].title, "Meeting");
    assert_eq!(only_sum[0].room.name, "Sala SUM");
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_for_the_same_slot_admit_exactly_one() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    for _ in 0..20 {
        let a = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.create(booking(room_id, "First", "Alice", at(10, 0), at(12, 0)))
                    .await
            })
        };
        let b = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.create(booking(room_id, "Second", "Bob", at(11, 0), at(13, 0)))
                    .await
            })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "exactly one of the racers may book the slot");
        for result in [a, b] {
            match result {
                Ok(r) => repo.delete(DeleteReservation::new(r.id)).await.unwrap(),
                Err(e) => assert!(matches!(e, AppError::SlotConflict)),
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_in_different_rooms_both_succeed() {
    let (repo, sum) = repo_with_room("Sala SUM").await;
    let sae = RoomId::new();
    repo.insert_room(Room {
        id: sae,
        name: "Sala SAE".into(),
    })
    .await;

    let a = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            repo.create(booking(sum, "Meeting", "Alice", at(10, 0), at(12, 0)))
                .await
        })
    };
    let b = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            repo.create(booking(sae, "Workshop", "Bob", at(10, 0), at(12, 0)))
                .await
        })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert_eq!(repo.find_confirmed_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn no_pair_of_confirmed_reservations_overlaps_after_a_mixed_workload() {
    let (repo, room_id) = repo_with_room("Sala SUM").await;

    // Mixed sequence of creates and updates; failures are expected and
    // ignored, only the surviving state matters.
    let slots = [
        (9, 10),
        (9, 11),
        (10, 12),
        (11, 12),
        (12, 14),
        (13, 15),
        (14, 16),
    ];
    let mut created = Vec::new();
    for (i, (s, e)) in slots.iter().enumerate() {
        let event = booking(
            room_id,
            &format!("Slot {i}"),
            "Alice",
            at(*s as u32, 0),
            at(*e as u32, 0),
        );
        if let Ok(r) = repo.create(event).await {
            created.push(r.id);
        }
    }
    for id in &created {
        let event =
            UpdateReservation::new(*id, room_id, "Shifted", at(9, 0), at(17, 0), None).unwrap();
        let _ = repo.update(event).await;
    }

    let confirmed = repo.find_confirmed_all().await.unwrap();
    for (i, a) in confirmed.iter().enumerate() {
        for b in confirmed.iter().skip(i + 1) {
            assert!(
                !a.period.overlaps(&b.period),
                "reservations {} and {} overlap",
                a.id,
                b.id
            );
        }
    }
}
