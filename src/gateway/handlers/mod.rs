pub mod banners;
pub mod bookings;
pub mod health;
pub mod payment;
pub mod results;
