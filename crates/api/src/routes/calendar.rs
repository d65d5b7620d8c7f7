use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/calendar/month", get(handlers::calendar::month_view))
        .route("/api/calendar/week", get(handlers::calendar::week_view))
}
