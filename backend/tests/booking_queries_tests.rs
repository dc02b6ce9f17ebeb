//! Availability, residency and feedback behaviour against the in-memory store.

mod support;

use chrono::Duration;
use hotel_booking::db::repository::{
    AvailabilityRepository, FeedbackRepository, InventoryRepository,
};
use hotel_booking::db::{services, LocalRepository};
use hotel_booking::models::{HotelId, HotelSummary, NewHotel};

use support::{date, hotel, reserve, room, user};

// ==================== dislike ====================

#[tokio::test]
async fn test_dislike_builds_on_external_update() {
    let repo = LocalRepository::new();
    let maryland = hotel(&repo, "Maryland").await;

    // Another writer bumps the counter behind our back.
    assert!(repo.set_dislikes(maryland.id, 1));

    services::dislike(&repo, maryland.id).await.unwrap();

    let reloaded = repo.get_hotel(maryland.id).await.unwrap();
    assert_eq!(reloaded.dislikes, 2);
    assert_eq!(reloaded.likes, 0);
}

#[tokio::test]
async fn test_concurrent_dislikes_are_not_lost() {
    const TASKS: i64 = 64;

    let repo = LocalRepository::new();
    let hotel = repo
        .create_hotel(NewHotel {
            title: "Hampton".to_string(),
            likes: 0,
            dislikes: 5,
        })
        .await
        .unwrap();
    let hotel_id = hotel.id;

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.dislike(hotel_id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.get_hotel(hotel_id).await.unwrap().dislikes, 5 + TASKS);
}

#[tokio::test]
async fn test_like_and_dislike_unknown_hotel() {
    let repo = LocalRepository::new();
    let existing = hotel(&repo, "Maryland").await;

    assert!(repo.dislike(HotelId(999)).await.unwrap_err().is_not_found());
    assert!(repo.like(HotelId(999)).await.unwrap_err().is_not_found());

    let unchanged = repo.get_hotel(existing.id).await.unwrap();
    assert_eq!((unchanged.likes, unchanged.dislikes), (0, 0));
}

#[tokio::test]
async fn test_like_increments_only_likes() {
    let repo = LocalRepository::new();
    let h = hotel(&repo, "Maryland").await;

    services::like(&repo, h.id).await.unwrap();
    services::like(&repo, h.id).await.unwrap();

    let reloaded = repo.get_hotel(h.id).await.unwrap();
    assert_eq!((reloaded.likes, reloaded.dislikes), (2, 0));
}

// ==================== get_rooms ====================

#[tokio::test]
async fn test_sold_out_annotation() {
    let repo = LocalRepository::new();
    let today = date(2024, 3, 10);
    let days = Duration::days;

    let h = hotel(&repo, "Maryland").await;
    let spans_move_out = room(&repo, &h, "Room 1").await;
    let inside_window = room(&repo, &h, "Room 2").await;
    let after_window = room(&repo, &h, "Room 3").await;
    let guest = user(&repo, "guest").await;

    reserve(&repo, &spans_move_out, &guest, today - days(1), today + days(1)).await;
    reserve(&repo, &inside_window, &guest, today - days(2), today - days(1)).await;
    reserve(&repo, &after_window, &guest, today + days(1), today + days(2)).await;

    let rooms = repo
        .get_rooms(today - days(10), today - days(1))
        .await
        .unwrap();

    let flags: Vec<_> = rooms.iter().map(|r| (r.room_id, r.sold_out)).collect();
    assert_eq!(
        flags,
        vec![
            (spans_move_out.id, true),
            (inside_window.id, true),
            (after_window.id, false),
        ]
    );
}

#[tokio::test]
async fn test_rooms_are_not_duplicated() {
    let repo = LocalRepository::new();
    let h = hotel(&repo, "Maryland").await;
    let busy = room(&repo, &h, "Busy").await;
    let idle = room(&repo, &h, "Idle").await;
    let a = user(&repo, "a").await;
    let b = user(&repo, "b").await;

    reserve(&repo, &busy, &a, date(2021, 6, 1), date(2021, 6, 5)).await;
    reserve(&repo, &busy, &b, date(2021, 6, 3), date(2021, 6, 8)).await;
    reserve(&repo, &busy, &b, date(2021, 7, 1), date(2021, 7, 2)).await;

    let rooms = repo
        .get_rooms(date(2021, 6, 2), date(2021, 6, 4))
        .await
        .unwrap();

    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].room_id, busy.id);
    assert!(rooms[0].sold_out);
    assert_eq!(rooms[0].title, "Busy");
    assert_eq!(rooms[0].hotel_id, h.id);
    assert_eq!(rooms[1].room_id, idle.id);
    assert!(!rooms[1].sold_out);
}

#[tokio::test]
async fn test_get_rooms_window_boundaries() {
    let repo = LocalRepository::new();
    let h = hotel(&repo, "Maryland").await;
    let ends_on_move_in = room(&repo, &h, "A").await;
    let starts_on_move_out = room(&repo, &h, "B").await;
    let u = user(&repo, "u").await;

    reserve(&repo, &ends_on_move_in, &u, date(2021, 6, 1), date(2021, 6, 10)).await;
    reserve(&repo, &starts_on_move_out, &u, date(2021, 6, 12), date(2021, 6, 14)).await;

    let rooms = repo
        .get_rooms(date(2021, 6, 10), date(2021, 6, 12))
        .await
        .unwrap();

    assert!(!rooms[0].sold_out, "end == move_in is excluded");
    assert!(rooms[1].sold_out, "start == move_out is included");
}

#[tokio::test]
async fn test_get_rooms_on_empty_store() {
    let repo = LocalRepository::new();
    let rooms = repo
        .get_rooms(date(2021, 1, 1), date(2021, 1, 2))
        .await
        .unwrap();
    assert!(rooms.is_empty());
}

// ==================== get_hotels_with_one_free_room ====================

#[tokio::test]
async fn test_hotels_with_one_free_room() {
    let repo = LocalRepository::new();
    let hotel_1 = hotel(&repo, "Hotel 1").await;
    let hotel_2 = hotel(&repo, "Hotel 2").await;
    let _hotel_3 = hotel(&repo, "Hotel 3").await;

    let room_1 = room(&repo, &hotel_1, "Room 1").await;
    let _room_2 = room(&repo, &hotel_1, "Room 2").await;
    let _room_3 = room(&repo, &hotel_2, "Room 3").await;

    let guest = user(&repo, "guest").await;
    reserve(&repo, &room_1, &guest, date(2021, 6, 15), date(2021, 6, 16)).await;
    reserve(&repo, &room_1, &guest, date(2021, 6, 17), date(2021, 6, 18)).await;

    let on_15th = repo
        .get_hotels_with_one_free_room(date(2021, 6, 15))
        .await
        .unwrap();
    assert_eq!(
        on_15th,
        vec![HotelSummary::from(&hotel_1), HotelSummary::from(&hotel_2)]
    );

    let on_16th = repo
        .get_hotels_with_one_free_room(date(2021, 6, 16))
        .await
        .unwrap();
    assert_eq!(on_16th, vec![HotelSummary::from(&hotel_2)]);
}

#[tokio::test]
async fn test_double_booked_room_counts_once() {
    let repo = LocalRepository::new();
    let h = hotel(&repo, "Maryland").await;
    let busy = room(&repo, &h, "Busy").await;
    let _free = room(&repo, &h, "Free").await;
    let a = user(&repo, "a").await;
    let b = user(&repo, "b").await;

    reserve(&repo, &busy, &a, date(2021, 6, 14), date(2021, 6, 16)).await;
    reserve(&repo, &busy, &b, date(2021, 6, 15), date(2021, 6, 17)).await;

    let hotels = repo
        .get_hotels_with_one_free_room(date(2021, 6, 15))
        .await
        .unwrap();
    assert_eq!(hotels, vec![HotelSummary::from(&h)]);
}

#[tokio::test]
async fn test_fully_free_two_room_hotel_is_not_listed() {
    let repo = LocalRepository::new();
    let h = hotel(&repo, "Maryland").await;
    room(&repo, &h, "Room 1").await;
    room(&repo, &h, "Room 2").await;

    let hotels = repo
        .get_hotels_with_one_free_room(date(2021, 6, 15))
        .await
        .unwrap();
    assert!(hotels.is_empty());
}

// ==================== get_users_living_in ====================

#[tokio::test]
async fn test_users_living_in_hotel() {
    let repo = LocalRepository::new();
    let today = date(2024, 3, 10);
    let days = Duration::days;

    let maryland = hotel(&repo, "Maryland").await;
    let hampton = hotel(&repo, "Hampton").await;
    let room_1 = room(&repo, &maryland, "Room 1").await;
    let room_2 = room(&repo, &maryland, "Room 2").await;
    let other = room(&repo, &hampton, "Room 1").await;

    let user_1 = user(&repo, "user_1").await;
    let user_2 = user(&repo, "user_2").await;
    let user_3 = user(&repo, "user_3").await;

    // user_1 lives there now and stayed before; must appear once.
    reserve(&repo, &room_1, &user_1, today - days(2), today + days(3)).await;
    reserve(&repo, &room_2, &user_1, today - days(1), today + days(1)).await;
    reserve(&repo, &room_1, &user_1, today - days(30), today - days(20)).await;
    // user_2 checked out today.
    reserve(&repo, &room_2, &user_2, today - days(4), today).await;
    // user_3 is currently in a different hotel.
    reserve(&repo, &other, &user_3, today - days(1), today + days(1)).await;

    let residents = repo.get_users_living_in("Maryland", today).await.unwrap();
    assert_eq!(residents, vec![user_1.clone()]);

    let nobody = repo.get_users_living_in("Ritz", today).await.unwrap();
    assert!(nobody.is_empty());

    let yesterday = repo
        .get_users_living_in("Maryland", today - days(1))
        .await
        .unwrap();
    assert_eq!(yesterday, vec![user_1, user_2]);
}
