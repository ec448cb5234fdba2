//! Integration tests for base event CRUD.
//!
//! Tests:
//! - Create / read / edit / delete round trip through the HTTP API
//! - Validation failures map to 400
//! - The anchor date is immutable through edits, movable only by rescheduling

use salvo::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn create_then_fetch_event() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();

    let created = app
        .create_event(owner, "Weekly inventory", "2024-01-15T09:00:00", "weekly")
        .await;
    assert_eq!(created["anchor_date"], "2024-01-15");
    assert_eq!(created["recurrence"], "weekly");
    assert_eq!(created["owner_id"], owner.to_string());

    let fetched = app
        .get(&event_path(&id_of(&created)))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(fetched, created);
}

#[test_log::test(tokio::test)]
async fn list_filters_by_owner() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(owner, "Mine", "2024-01-15", "daily").await;
    app.create_event(Uuid::new_v4(), "Theirs", "2024-01-15", "daily")
        .await;

    let all = app
        .get(EVENTS_ROUTE_PREFIX)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let mine = app
        .get(&format!("{EVENTS_ROUTE_PREFIX}?owner={owner}"))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["title"], "Mine");

    let status = app
        .get(&format!("{EVENTS_ROUTE_PREFIX}?owner=nobody"))
        .await
        .status;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();

    for (title, anchor, recurrence) in [
        ("", "2024-01-15", "weekly"),
        ("Bad anchor", "15/01/2024", "weekly"),
        ("Bad rule", "2024-01-15", "fortnightly"),
    ] {
        let response = app
            .post(
                EVENTS_ROUTE_PREFIX,
                &json!({
                    "title": title,
                    "anchor_date": anchor,
                    "recurrence": recurrence,
                    "owner_id": owner,
                    "creator_id": owner,
                }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "{title}/{anchor}/{recurrence}: {}",
            response.body
        );
    }

    let response = app
        .post(EVENTS_ROUTE_PREFIX, &json!({ "title": "missing fields" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn edit_cannot_move_the_anchor() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    let created = app
        .create_event(owner, "Deliveries", "2024-01-15", "weekly")
        .await;
    let path = event_path(&id_of(&created));

    let edited = app
        .patch(&path, &json!({ "title": "Deliveries (dock B)", "recurrence": "weekends" }))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(edited["title"], "Deliveries (dock B)");
    assert_eq!(edited["recurrence"], "weekends");
    assert_eq!(edited["anchor_date"], "2024-01-15");

    let status = app
        .patch(&path, &json!({ "anchor_date": "2024-02-01" }))
        .await
        .status;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = app.patch(&path, &json!({})).await.status;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn reschedule_creates_a_replacement() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    let created = app
        .create_event(owner, "Month end", "2024-01-31", "monthly")
        .await;
    let old_id = id_of(&created);

    let moved = app
        .post(
            &format!("{}/reschedule", event_path(&old_id)),
            &json!({ "anchor_date": "2024-01-28" }),
        )
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_ne!(id_of(&moved), old_id);
    assert_eq!(moved["anchor_date"], "2024-01-28");

    let status = app.get(&event_path(&old_id)).await.status;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let dates = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert_eq!(dates, vec!["2024-02-28"]);
}

#[test_log::test(tokio::test)]
async fn delete_removes_the_event() {
    let app = TestApp::on(date(2024, 1, 1));
    let created = app
        .create_event(Uuid::new_v4(), "Temp", "2024-01-15", "once")
        .await;
    let path = event_path(&id_of(&created));

    let response = app.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());

    let status = app.get(&path).await.status;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let status = app.delete(&path).await.status;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn malformed_ids_are_bad_requests() {
    let app = TestApp::on(date(2024, 1, 1));

    let status = app.get(&event_path("not-a-uuid")).await.status;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
