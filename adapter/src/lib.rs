pub mod database;
pub mod notifier;
pub(crate) mod password;
pub mod redis;
pub mod repository;
