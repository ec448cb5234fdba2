//! Integration tests for the month occurrence and agenda views.
//!
//! Tests:
//! - Each recurrence rule projected onto a concrete month
//! - Past one-off events dropping out relative to "today"
//! - Malformed stored events being skipped rather than failing the view
//! - Month query parameter validation

use salvo::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use planner_test::component::planner::Event;

use super::helpers::*;

fn stored_event(owner_id: Uuid, title: &str, anchor_date: &str, recurrence: &str) -> Event {
    serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "title": title,
        "anchor_date": anchor_date,
        "recurrence": recurrence,
        "owner_id": owner_id,
        "creator_id": owner_id,
    }))
    .expect("valid event document")
}

#[test_log::test(tokio::test)]
async fn weekly_event_lands_on_matching_weekday() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(owner, "Standup", "2024-01-15", "weekly").await;

    let response = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.occurrence_dates(),
        vec!["2024-02-05", "2024-02-12", "2024-02-19", "2024-02-26"]
    );

    let body = response.json();
    assert_eq!(body["month"], "2024-02");
    assert_eq!(body["owner_id"], owner.to_string());
    assert_eq!(body["today"], "2024-01-01");
    assert_eq!(body["occurrences"][0]["event"]["title"], "Standup");
}

#[test_log::test(tokio::test)]
async fn monthly_event_skips_short_months() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(owner, "Month end", "2024-01-31", "monthly").await;

    let february = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert!(february.is_empty());

    let march = app
        .get(&occurrences_path(owner, "2024-03"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert_eq!(march, vec!["2024-03-31"]);
}

#[test_log::test(tokio::test)]
async fn nothing_before_the_anchor() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(owner, "Daily", "2024-03-10", "daily").await;

    let before = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert!(before.is_empty());

    let anchor_month = app
        .get(&occurrences_path(owner, "2024-03"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert_eq!(anchor_month.len(), 22);
    assert_eq!(anchor_month.first().map(String::as_str), Some("2024-03-10"));
    assert_eq!(anchor_month.last().map(String::as_str), Some("2024-03-31"));
}

#[test_log::test(tokio::test)]
async fn weekday_and_weekend_rules() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(owner, "Shop open", "2024-02-01", "daily-except-sundays")
        .await;
    let other = Uuid::new_v4();
    app.create_event(other, "Hike", "2024-02-01", "weekends").await;

    let shop = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    // February 2024 has four Sundays: 4, 11, 18, 25.
    assert_eq!(shop.len(), 25);
    assert!(!shop.contains(&"2024-02-04".to_string()));
    assert!(shop.contains(&"2024-02-03".to_string()));

    let hikes = app
        .get(&occurrences_path(other, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert_eq!(
        hikes,
        vec![
            "2024-02-03",
            "2024-02-04",
            "2024-02-10",
            "2024-02-11",
            "2024-02-17",
            "2024-02-18",
            "2024-02-24",
            "2024-02-25",
        ]
    );
}

#[test_log::test(tokio::test)]
async fn past_once_events_are_hidden() {
    let owner = Uuid::new_v4();
    let events = vec![
        stored_event(owner, "Yesterday", "2024-02-14", "once"),
        stored_event(owner, "Today", "2024-02-15", "once"),
        stored_event(owner, "Tomorrow", "2024-02-16", "once"),
    ];
    let app = TestApp::with_events(date(2024, 2, 15), events);

    let dates = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert_eq!(dates, vec!["2024-02-15", "2024-02-16"]);
}

#[test_log::test(tokio::test)]
async fn malformed_stored_events_are_skipped() {
    let owner = Uuid::new_v4();
    let events = vec![
        stored_event(owner, "Broken anchor", "someday", "daily"),
        stored_event(owner, "Unknown rule", "2024-02-01", "fortnightly"),
        stored_event(owner, "Fine", "2024-02-20T18:45:00", "once"),
    ];
    let app = TestApp::with_events(date(2024, 2, 1), events);

    let response = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.occurrence_dates(), vec!["2024-02-20"]);
    assert_eq!(response.json()["occurrences"][0]["event"]["title"], "Fine");
}

#[test_log::test(tokio::test)]
async fn agenda_groups_occurrences_per_day() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(owner, "Review", "2024-01-15", "weekly").await;
    app.create_event(owner, "Audit", "2024-02-12", "once").await;

    let body = app
        .get(&agenda_path(owner, "2024-02-20"))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["month"], "2024-02");
    let days = body["days"].as_array().expect("days array");
    assert_eq!(days.len(), 4);
    assert_eq!(days[1]["date"], "2024-02-12");

    let titles: Vec<&str> = days[1]["events"]
        .as_array()
        .expect("events array")
        .iter()
        .filter_map(|event| event["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Audit", "Review"]);
}

#[test_log::test(tokio::test)]
async fn month_parameter_is_required_and_validated() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();

    let status = app
        .get(&format!("{USERS_ROUTE_PREFIX}/{owner}/occurrences"))
        .await
        .status;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for month in ["2024-13", "February", "2024/02"] {
        let response = app.get(&occurrences_path(owner, month)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "month {month}");
    }

    let status = app
        .get(&format!("{USERS_ROUTE_PREFIX}/not-a-user/agenda?month=2024-02"))
        .await
        .status;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn other_owners_are_not_shown() {
    let app = TestApp::on(date(2024, 1, 1));
    let owner = Uuid::new_v4();
    app.create_event(Uuid::new_v4(), "Not mine", "2024-02-01", "daily")
        .await;

    let dates = app
        .get(&occurrences_path(owner, "2024-02"))
        .await
        .assert_status(StatusCode::OK)
        .occurrence_dates();
    assert!(dates.is_empty());
}
