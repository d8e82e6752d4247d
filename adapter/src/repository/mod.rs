pub mod auth;
pub mod health;
pub mod memory;
pub mod reservation;
pub mod room;
pub mod user;
