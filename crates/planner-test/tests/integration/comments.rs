//! Integration tests for event comments.
//!
//! Tests:
//! - Free-standing and day-pinned comments
//! - Pinned days that the event does not occur on
//! - Editing and deleting comments

use salvo::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::helpers::*;

fn comments_path(event_id: &str) -> String {
    format!("{}/comments", event_path(event_id))
}

#[test_log::test(tokio::test)]
async fn comments_attach_to_the_event() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    let event = app.create_event(owner, "Standup", "2024-01-15", "weekly").await;
    let event_id = id_of(&event);

    let free = app
        .post(
            &comments_path(&event_id),
            &json!({ "author_id": owner, "text": "bring the slides" }),
        )
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(free["text"], "bring the slides");
    assert!(free["occurrence_date"].is_null());

    let pinned = app
        .post(
            &comments_path(&event_id),
            &json!({
                "author_id": owner,
                "text": "room 4 this week",
                "occurrence_date": "2024-02-12",
            }),
        )
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(pinned["occurrence_date"], "2024-02-12");

    let stored = app
        .get(&event_path(&event_id))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(stored["comments"].as_array().map(Vec::len), Some(2));
}

#[test_log::test(tokio::test)]
async fn pinned_day_must_be_an_occurrence() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    let event = app.create_event(owner, "Standup", "2024-01-15", "weekly").await;
    let path = comments_path(&id_of(&event));

    for day in ["2024-02-13", "2024-01-08"] {
        let response = app
            .post(
                &path,
                &json!({ "author_id": owner, "text": "wrong day", "occurrence_date": day }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "day {day}");
    }

    let status = app
        .post(&path, &json!({ "author_id": owner, "text": "  " }))
        .await
        .status;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn commenting_on_missing_event_is_not_found() {
    let app = TestApp::on(date(2024, 1, 1));

    let status = app
        .post(
            &comments_path(&Uuid::new_v4().to_string()),
            &json!({ "author_id": Uuid::new_v4(), "text": "hello" }),
        )
        .await
        .status;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn edit_then_delete_comment() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    let event = app.create_event(owner, "Payroll", "2024-01-31", "monthly").await;
    let event_id = id_of(&event);

    let comment = app
        .post(
            &comments_path(&event_id),
            &json!({ "author_id": owner, "text": "draft" }),
        )
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let comment_path = format!("{}/{}", comments_path(&event_id), id_of(&comment));

    let edited = app
        .patch(&comment_path, &json!({ "text": "final numbers attached" }))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(edited["text"], "final numbers attached");
    assert!(edited["edited_at"].is_string());

    let response = app
        .delete(&comment_path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());

    let stored = app
        .get(&event_path(&event_id))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(stored["comments"].as_array().map(Vec::len), Some(0));

    let status = app.delete(&comment_path).await.status;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
