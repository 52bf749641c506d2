mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use common::TestApp;

fn acme_payload() -> Value {
    json!({
        "customer": {"name": "Acme"},
        "lineItems": [{"desc": "Widget", "qty": 2, "price": 5.0}],
        "subtotal": 10.0,
        "taxRate": 0.1,
        "taxAmount": 1.0,
        "total": 11.0
    })
}

#[tokio::test]
async fn create_returns_full_entity_with_server_assigned_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(Method::POST, "/purchase-orders", Some(acme_payload()))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(body["id"].as_str().expect("id present")).expect("id is a uuid");
    assert!(body["orderNumber"].as_str().unwrap().starts_with("PO-"));
    assert_eq!(body["status"], "unpaid");
    assert!(body["createdAt"].as_str().is_some());
    assert_eq!(body["dueDate"], Value::Null);
    assert_eq!(body["customer"], json!({"name": "Acme"}));
    assert_eq!(
        body["lineItems"],
        json!([{"desc": "Widget", "qty": 2, "price": 5.0}])
    );
    assert_eq!(body["subtotal"], json!(10.0));
    assert_eq!(body["taxRate"], json!(0.1));
    assert_eq!(body["taxAmount"], json!(1.0));
    assert_eq!(body["total"], json!(11.0));
}

#[tokio::test]
async fn create_rejects_each_missing_required_field_by_name() {
    let app = TestApp::new().await;

    for field in [
        "customer",
        "lineItems",
        "subtotal",
        "taxRate",
        "taxAmount",
        "total",
    ] {
        let mut payload = acme_payload();
        payload.as_object_mut().unwrap().remove(field);

        let (status, body) = app
            .request_json(Method::POST, "/purchase-orders", Some(payload))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
        let message = body["message"].as_str().unwrap();
        assert!(
            message.contains(field),
            "error for missing {field} should name it, got: {message}"
        );
    }
}

#[tokio::test]
async fn create_coerces_numeric_strings() {
    let app = TestApp::new().await;

    let mut payload = acme_payload();
    payload["subtotal"] = json!("10.5");
    payload["total"] = json!("11.55");

    let (status, body) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    // Stored and returned as numbers, not strings
    assert_eq!(body["subtotal"], json!(10.5));
    assert_eq!(body["total"], json!(11.55));
}

#[tokio::test]
async fn create_rejects_uncoercible_numbers() {
    let app = TestApp::new().await;

    let mut payload = acme_payload();
    payload["taxRate"] = json!("not a number");

    let (status, body) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("taxRate"));
}

#[tokio::test]
async fn due_date_formats_land_on_the_same_day() {
    let app = TestApp::new().await;

    let mut with_time = acme_payload();
    with_time["dueDate"] = json!("2025-06-01T00:00:00Z");
    let (status, body_a) = app
        .request_json(Method::POST, "/purchase-orders", Some(with_time))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut plain = acme_payload();
    plain["dueDate"] = json!("2025-06-01");
    let (status, body_b) = app
        .request_json(Method::POST, "/purchase-orders", Some(plain))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let day_a = &body_a["dueDate"].as_str().unwrap()[..10];
    let day_b = &body_b["dueDate"].as_str().unwrap()[..10];
    assert_eq!(day_a, "2025-06-01");
    assert_eq!(day_a, day_b);
}

#[tokio::test]
async fn due_date_in_us_format_is_rejected() {
    let app = TestApp::new().await;

    let mut payload = acme_payload();
    payload["dueDate"] = json!("06/01/2025");

    let (status, body) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("06/01/2025"));
}

#[tokio::test]
async fn duplicate_order_number_conflicts() {
    let app = TestApp::new().await;

    let mut payload = acme_payload();
    payload["orderNumber"] = json!("PO-FIXED-001");

    let (status, _) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("PO-FIXED-001"));
}

#[tokio::test]
async fn list_returns_everything_created() {
    let app = TestApp::new().await;

    for _ in 0..3 {
        let (status, _) = app
            .request_json(Method::POST, "/purchase-orders", Some(acme_payload()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.request_json(Method::GET, "/purchase-orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn get_by_id_round_trips_and_unknown_ids_are_404() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(Method::POST, "/purchase-orders", Some(acme_payload()))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = app
        .request_json(Method::GET, &format!("/purchase-orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = app
        .request_json(
            Method::GET,
            &format!("/purchase-orders/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    // Ids that are not even UUIDs behave like unknown ids
    let (status, _) = app
        .request_json(Method::GET, "/purchase-orders/not-a-uuid", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_update_preserves_untouched_fields() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(Method::POST, "/purchase-orders", Some(acme_payload()))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .request_json(
            Method::PUT,
            &format!("/purchase-orders/{id}"),
            Some(json!({"status": "paid"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "paid");

    // Everything except status is untouched
    for field in [
        "id",
        "orderNumber",
        "customer",
        "lineItems",
        "subtotal",
        "taxRate",
        "taxAmount",
        "total",
        "notes",
        "createdAt",
        "dueDate",
    ] {
        assert_eq!(updated[field], created[field], "field {field} changed");
    }
}

#[tokio::test]
async fn update_with_bad_due_date_rejects_the_whole_request() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(Method::POST, "/purchase-orders", Some(acme_payload()))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = app
        .request_json(
            Method::PUT,
            &format!("/purchase-orders/{id}"),
            Some(json!({"status": "paid", "dueDate": "06/01/2025"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was committed, including the valid status change
    let (_, fetched) = app
        .request_json(Method::GET, &format!("/purchase-orders/{id}"), None)
        .await;
    assert_eq!(fetched["status"], "unpaid");
}

#[tokio::test]
async fn update_can_clear_notes_with_null() {
    let app = TestApp::new().await;

    let mut payload = acme_payload();
    payload["notes"] = json!("rush order");
    let (_, created) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload))
        .await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["notes"], "rush order");

    let (status, updated) = app
        .request_json(
            Method::PUT,
            &format!("/purchase-orders/{id}"),
            Some(json!({"notes": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], Value::Null);
}

#[tokio::test]
async fn update_ignores_explicit_null_due_date() {
    let app = TestApp::new().await;

    let mut payload = acme_payload();
    payload["dueDate"] = json!("2025-06-01");
    let (_, created) = app
        .request_json(Method::POST, "/purchase-orders", Some(payload))
        .await;
    let id = created["id"].as_str().unwrap();
    assert!(created["dueDate"].is_string());

    let (status, updated) = app
        .request_json(
            Method::PUT,
            &format!("/purchase-orders/{id}"),
            Some(json!({"status": "paid", "dueDate": null})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "paid");
    // A null due date is not a clear request; the stored value survives.
    assert_eq!(updated["dueDate"], created["dueDate"]);
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_json(
            Method::PUT,
            &format!("/purchase-orders/{}", Uuid::new_v4()),
            Some(json!({"status": "paid"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(Method::POST, "/purchase-orders", Some(acme_payload()))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(Method::DELETE, &format!("/purchase-orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = app
        .request_json(Method::GET, &format!("/purchase-orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is also a 404
    let (status, _) = app
        .request_json(Method::DELETE, &format!("/purchase-orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_reports_database_status() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}
