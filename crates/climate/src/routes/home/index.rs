use axum::response::Redirect;

pub const WELCOME: &str = "Welcome to the Hawaii climate API!

Available routes:
  /api/v1.0
  /api/v1.0/precipitation
  /api/v1.0/stations
  /api/v1.0/tobs
  /api/v1.0/<start>          (start as YYYY-MM-DD)
  /api/v1.0/<start>/<end>    (start and end as YYYY-MM-DD)
  /docs
";

pub async fn index_handler() -> &'static str {
    WELCOME
}

/// `/api/v1.0` has no listing of its own.
pub async fn api_root_handler() -> Redirect {
    Redirect::to("/")
}
