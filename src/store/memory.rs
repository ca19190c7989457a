//! DashMap-backed store used by the test suite and by storeless dev mode.
//!
//! Semantics mirror `PgStore`; in particular `reserve_slot` performs its
//! check-and-decrement while holding the entry's shard write lock, so the
//! decrement is atomic with respect to concurrent reservations.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::{
    Banner, BookedTest, BookingStore, NewBooking, NewTestResult, NewUser, Role, SlotReservation,
    StoreError, Test, TestResult, TestSpec, User,
};

#[derive(Default)]
pub struct MemStore {
    users: DashMap<String, User>,
    tests: DashMap<String, Test>,
    bookings: DashMap<String, BookedTest>,
    results: DashMap<String, TestResult>,
    banners: DashMap<String, Banner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl BookingStore for MemStore {
    async fn upsert_user(&self, user: NewUser) -> Result<User, StoreError> {
        if let Some(mut existing) = self.users.iter_mut().find(|u| u.email == user.email) {
            // Role is only ever changed through promote_user; a submitted
            // name replaces the stored one, an absent name keeps it.
            if user.name.is_some() {
                existing.name = user.name;
            }
            return Ok(existing.value().clone());
        }
        let created = User {
            id: new_id(),
            email: user.email,
            name: user.name,
            role: Role::None,
        };
        self.users.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.iter().find(|u| u.email == email).map(|u| u.value().clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.iter().map(|u| u.value().clone()).collect())
    }

    async fn promote_user(&self, id: &str) -> Result<bool, StoreError> {
        match self.users.get_mut(id) {
            Some(mut user) => {
                user.role = Role::Admin;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_tests(&self) -> Result<Vec<Test>, StoreError> {
        Ok(self.tests.iter().map(|t| t.value().clone()).collect())
    }

    async fn get_test(&self, id: &str) -> Result<Option<Test>, StoreError> {
        Ok(self.tests.get(id).map(|t| t.value().clone()))
    }

    async fn insert_test(&self, spec: TestSpec) -> Result<Test, StoreError> {
        let test = Test {
            id: new_id(),
            title: spec.title,
            price: spec.price,
            slots_count: spec.slots_count,
            image: spec.image,
            date: spec.date,
            short_description: spec.short_description,
        };
        self.tests.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn update_test(&self, id: &str, spec: TestSpec) -> Result<bool, StoreError> {
        match self.tests.get_mut(id) {
            Some(mut test) => {
                test.title = spec.title;
                test.price = spec.price;
                test.slots_count = spec.slots_count;
                test.image = spec.image;
                test.date = spec.date;
                test.short_description = spec.short_description;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_test(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tests.remove(id).is_some())
    }

    async fn reserve_slot(&self, title: &str) -> Result<SlotReservation, StoreError> {
        // iter_mut holds the shard write lock for the entry it yields, so the
        // check and the decrement cannot interleave with another caller.
        for mut test in self.tests.iter_mut() {
            if test.title == title {
                return Ok(if test.slots_count > 0 {
                    test.slots_count -= 1;
                    SlotReservation::Reserved
                } else {
                    SlotReservation::SoldOut
                });
            }
        }
        Ok(SlotReservation::UnknownTest)
    }

    async fn release_slot(&self, title: &str) -> Result<(), StoreError> {
        for mut test in self.tests.iter_mut() {
            if test.title == title {
                test.slots_count += 1;
                break;
            }
        }
        Ok(())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<BookedTest, StoreError> {
        let booked = BookedTest {
            id: new_id(),
            email: booking.email,
            test_name: booking.test_name,
            amount: booking.amount,
            booked_at: Utc::now(),
        };
        self.bookings.insert(booked.id.clone(), booked.clone());
        Ok(booked)
    }

    async fn bookings_for(&self, email: &str) -> Result<Vec<BookedTest>, StoreError> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.email == email)
            .map(|b| b.value().clone())
            .collect())
    }

    async fn list_bookings(&self) -> Result<Vec<BookedTest>, StoreError> {
        Ok(self.bookings.iter().map(|b| b.value().clone()).collect())
    }

    async fn delete_booking(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.bookings.remove(id).is_some())
    }

    async fn insert_result(&self, result: NewTestResult) -> Result<TestResult, StoreError> {
        let created = TestResult {
            id: new_id(),
            email: result.email,
            test_id: result.test_id,
            result: result.result,
        };
        self.results.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn results_for(&self, email: &str) -> Result<Vec<TestResult>, StoreError> {
        Ok(self
            .results
            .iter()
            .filter(|r| r.email == email)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn insert_banner(&self, payload: serde_json::Value) -> Result<Banner, StoreError> {
        let banner = Banner {
            id: new_id(),
            payload,
        };
        self.banners.insert(banner.id.clone(), banner.clone());
        Ok(banner)
    }

    async fn list_banners(&self) -> Result<Vec<Banner>, StoreError> {
        Ok(self.banners.iter().map(|b| b.value().clone()).collect())
    }

    async fn delete_banner(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.banners.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(title: &str, slots: i64) -> TestSpec {
        TestSpec {
            title: title.to_string(),
            price: 50.0,
            slots_count: slots,
            image: None,
            date: None,
            short_description: None,
        }
    }

    #[tokio::test]
    async fn reserve_decrements_until_sold_out() {
        let store = MemStore::new();
        let test = store.insert_test(spec("Blood Panel", 2)).await.unwrap();

        assert_eq!(
            store.reserve_slot("Blood Panel").await.unwrap(),
            SlotReservation::Reserved
        );
        assert_eq!(
            store.reserve_slot("Blood Panel").await.unwrap(),
            SlotReservation::Reserved
        );
        assert_eq!(
            store.reserve_slot("Blood Panel").await.unwrap(),
            SlotReservation::SoldOut
        );

        let current = store.get_test(&test.id).await.unwrap().unwrap();
        assert_eq!(current.slots_count, 0);
    }

    #[tokio::test]
    async fn reserve_unknown_title() {
        let store = MemStore::new();
        assert_eq!(
            store.reserve_slot("No Such Test").await.unwrap(),
            SlotReservation::UnknownTest
        );
    }

    #[tokio::test]
    async fn release_restores_slot() {
        let store = MemStore::new();
        let test = store.insert_test(spec("X-Ray", 1)).await.unwrap();
        store.reserve_slot("X-Ray").await.unwrap();
        store.release_slot("X-Ray").await.unwrap();
        let current = store.get_test(&test.id).await.unwrap().unwrap();
        assert_eq!(current.slots_count, 1);
    }

    #[tokio::test]
    async fn upsert_user_is_idempotent_and_keeps_role() {
        let store = MemStore::new();
        let user = store
            .upsert_user(NewUser {
                email: "a@x.com".into(),
                name: Some("A".into()),
            })
            .await
            .unwrap();
        assert!(store.promote_user(&user.id).await.unwrap());

        let again = store
            .upsert_user(NewUser {
                email: "a@x.com".into(),
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(again.role, Role::Admin);
        // An absent name keeps the stored one.
        assert_eq!(again.name.as_deref(), Some("A"));

        let renamed = store
            .upsert_user(NewUser {
                email: "a@x.com".into(),
                name: Some("B".into()),
            })
            .await
            .unwrap();
        assert_eq!(renamed.name.as_deref(), Some("B"));
        assert_eq!(renamed.role, Role::Admin);
    }

    #[tokio::test]
    async fn duplicate_titles_decrement_one_row() {
        let store = MemStore::new();
        store.insert_test(spec("Blood Panel", 2)).await.unwrap();
        store.insert_test(spec("Blood Panel", 1)).await.unwrap();

        assert_eq!(
            store.reserve_slot("Blood Panel").await.unwrap(),
            SlotReservation::Reserved
        );

        let total: i64 = store
            .list_tests()
            .await
            .unwrap()
            .iter()
            .map(|t| t.slots_count)
            .sum();
        assert_eq!(total, 2);
    }
}
