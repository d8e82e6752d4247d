pub mod auth;
pub mod id;
pub mod reservation;
pub mod room;
pub mod user;
