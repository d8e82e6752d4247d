use axum::Router;
use registry::AppRegistry;

use super::auth::build_auth_routers;
use super::health::build_health_check_routers;
use super::reservation::build_reservation_routers;
use super::room::build_room_routers;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_reservation_routers())
        .merge(build_room_routers())
        .merge(build_auth_routers());

    Router::new().nest("/api/v1", router)
}
