//! Document store seam.
//!
//! Handlers and the booking orchestrator talk to [`BookingStore`]; the
//! concrete backend is either PostgreSQL ([`postgres::PgStore`]) or the
//! in-memory [`memory::MemStore`] used by tests and storeless dev mode.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed record: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    None,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            _ => Role::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    /// Unique, case-sensitive lookup key.
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Test {
    pub id: String,
    /// Secondary lookup key; bookings reference tests by this title.
    pub title: String,
    pub price: f64,
    pub slots_count: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TestSpec {
    pub title: String,
    pub price: f64,
    pub slots_count: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookedTest {
    pub id: String,
    pub email: String,
    #[serde(rename = "testName")]
    pub test_name: String,
    pub amount: f64,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub email: String,
    pub test_name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestResult {
    pub id: String,
    pub email: String,
    #[serde(rename = "testId")]
    pub test_id: String,
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTestResult {
    pub email: String,
    #[serde(rename = "testId")]
    pub test_id: String,
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    pub id: String,
    /// Free-form banner document supplied by the admin UI.
    pub payload: serde_json::Value,
}

/// Outcome of the conditional slot decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotReservation {
    /// `slots_count` was positive and has been decremented by one.
    Reserved,
    /// The test exists but has no remaining slots.
    SoldOut,
    /// No test carries the given title.
    UnknownTest,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    // Users
    async fn upsert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    /// Sets the role of the user with the given id to admin. Returns false
    /// when no such user exists.
    async fn promote_user(&self, id: &str) -> Result<bool, StoreError>;

    // Test catalog
    async fn list_tests(&self) -> Result<Vec<Test>, StoreError>;
    async fn get_test(&self, id: &str) -> Result<Option<Test>, StoreError>;
    async fn insert_test(&self, spec: TestSpec) -> Result<Test, StoreError>;
    async fn update_test(&self, id: &str, spec: TestSpec) -> Result<bool, StoreError>;
    async fn delete_test(&self, id: &str) -> Result<bool, StoreError>;

    // Inventory ledger
    /// Decrements `slots_count` of the test with the given title iff it is
    /// still positive, as a single atomic update.
    async fn reserve_slot(&self, title: &str) -> Result<SlotReservation, StoreError>;
    /// Compensating increment for a reservation that could not be finalized.
    async fn release_slot(&self, title: &str) -> Result<(), StoreError>;

    // Bookings
    async fn insert_booking(&self, booking: NewBooking) -> Result<BookedTest, StoreError>;
    async fn bookings_for(&self, email: &str) -> Result<Vec<BookedTest>, StoreError>;
    async fn list_bookings(&self) -> Result<Vec<BookedTest>, StoreError>;
    async fn delete_booking(&self, id: &str) -> Result<bool, StoreError>;

    // Test results (append-only)
    async fn insert_result(&self, result: NewTestResult) -> Result<TestResult, StoreError>;
    async fn results_for(&self, email: &str) -> Result<Vec<TestResult>, StoreError>;

    // Banners
    async fn insert_banner(&self, payload: serde_json::Value) -> Result<Banner, StoreError>;
    async fn list_banners(&self) -> Result<Vec<Banner>, StoreError>;
    async fn delete_banner(&self, id: &str) -> Result<bool, StoreError>;
}
