pub mod event;

/// Opaque bearer token handed out at login and resolved back to a user id
/// on each authorized request.
pub struct AccessToken(pub String);
