//! Error bodies under a production configuration.
//!
//! Kept in its own test binary: the detail mode is fixed once per process.
//!
//! Run with: `cargo test -p vidshelf-api --test production_errors_test`

mod helpers;

use axum::http::StatusCode;
use helpers::{create_test_config, setup_test_app_with};
use serde_json::Value;

#[tokio::test]
async fn test_production_config_hides_error_details() {
    // The configured environment decides, not whatever the process carries.
    std::env::set_var("ENVIRONMENT", "development");

    let mut config = create_test_config();
    config.environment = "production".to_string();
    let app = setup_test_app_with(config);

    let response = app.client().delete("/api/videos/999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Video not found");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}
