// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests of login and the proxied read endpoints against a fake
//! upstream.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use otf_tracker::models::{HomeStudio, MemberClassSummary, MemberDetail, PerformanceSummary};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{
    create_test_app, get_with_token, json_body, login_request, valid_token, workout,
    FakeUpstream, EMAIL, PASSWORD,
};

#[tokio::test]
async fn test_login_then_total_classes() {
    let upstream = Arc::new(
        FakeUpstream::new()
            .with_totals(5, 2)
            .with_workouts(vec![
                workout("w1", "2023-01-01T09:00:00"),
                workout("w2", "2023-06-30T18:15:00"),
            ]),
    );
    let (app, _) = create_test_app(upstream.clone());

    let response = app
        .clone()
        .oneshot(login_request("/api/login", EMAIL, PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login = json_body(response).await;
    assert_eq!(login["token_type"], "bearer");
    assert_eq!(login["expires_in"], 86400);
    let token = login["access_token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get_with_token("/api/total-classes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["total_classes"],
        serde_json::json!({ "in_studio": 5, "ot_live": 2, "total": 7 })
    );
    assert!(json["date_range"]["first_class"]
        .as_str()
        .unwrap()
        .starts_with("2023-01-01"));
    assert!(json["date_range"]["last_class"]
        .as_str()
        .unwrap()
        .starts_with("2023-06-30"));
    assert_eq!(json["performance_data"]["retrieved_workouts"], 2);
    assert_eq!(json["status"], "success");

    // Newest first
    let workouts = json["performance_data"]["workouts"].as_array().unwrap();
    assert_eq!(workouts[0]["id"], "w2");
    assert_eq!(workouts[1]["id"], "w1");

    // One session for login, one for the read; both released
    assert_eq!(upstream.sessions_opened(), 2);
    assert!(upstream.all_sessions_closed());
}

#[tokio::test]
async fn test_login_alias_path() {
    let upstream = Arc::new(FakeUpstream::new());
    let (app, state) = create_test_app(upstream.clone());

    let response = app
        .oneshot(login_request("/api/auth/login", EMAIL, PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let credentials = state
        .token_service
        .decode(json["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(credentials.email, EMAIL);
    assert_eq!(credentials.password, PASSWORD);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let upstream = Arc::new(FakeUpstream::new());
    let (app, _) = create_test_app(upstream.clone());

    let response = app
        .oneshot(login_request("/api/login", EMAIL, "wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_upstream_outage_reported_as_invalid_credentials() {
    let upstream = Arc::new(FakeUpstream::new().failing());
    let (app, _) = create_test_app(upstream.clone());

    let response = app
        .oneshot(login_request("/api/login", EMAIL, PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(upstream.sessions_opened(), 1);
    assert!(upstream.all_sessions_closed());
}

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let upstream = Arc::new(FakeUpstream::new());
    let (app, _) = create_test_app(upstream.clone());

    let response = app
        .oneshot(login_request("/api/login", "not-an-email", PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(upstream.sessions_opened(), 0);
}

#[tokio::test]
async fn test_login_malformed_body_uses_error_shape() {
    let upstream = Arc::new(FakeUpstream::new());
    let (app, _) = create_test_app(upstream.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_body");
    assert!(json["detail"].is_string());
    assert_eq!(upstream.sessions_opened(), 0);
}

#[tokio::test]
async fn test_login_missing_field_uses_error_shape() {
    let upstream = Arc::new(FakeUpstream::new());
    let (app, _) = create_test_app(upstream.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email": "user@example.com"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_body");
    assert_eq!(upstream.sessions_opened(), 0);
}

#[tokio::test]
async fn test_total_classes_date_only_history() {
    let upstream = Arc::new(
        FakeUpstream::new()
            .with_totals(5, 2)
            .with_workouts(vec![
                workout("w1", "2023-01-01"),
                workout("w2", "2023-06-30"),
            ]),
    );
    let (app, state) = create_test_app(upstream);
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/total-classes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["total_classes"]["total"], 7);
    assert_eq!(
        json["date_range"],
        serde_json::json!({ "first_class": "2023-01-01", "last_class": "2023-06-30" })
    );
    let workouts = json["performance_data"]["workouts"].as_array().unwrap();
    assert_eq!(workouts[0]["id"], "w2");
}

#[tokio::test]
async fn test_total_classes_partial_failure_returns_nothing() {
    let upstream = Arc::new(
        FakeUpstream::new()
            .with_workouts(vec![workout("w1", "2023-01-01T09:00:00")])
            .failing_totals(),
    );
    let (app, state) = create_test_app(upstream.clone());
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/total-classes", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"], "upstream_error");
    assert!(json.get("performance_data").is_none());

    // The history read completed, yet nothing of it leaks into the response
    assert_eq!(upstream.histories_served(), 1);
    assert_eq!(upstream.sessions_opened(), 1);
    assert!(upstream.all_sessions_closed());
}

#[tokio::test]
async fn test_total_classes_upstream_failure_closes_session() {
    let upstream = Arc::new(FakeUpstream::new().failing());
    let (app, state) = create_test_app(upstream.clone());
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/classes/total", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"], "upstream_error");
    // Upstream details are logged, not returned
    assert!(!json["detail"].as_str().unwrap().contains("503"));

    assert_eq!(upstream.sessions_opened(), 1);
    assert!(upstream.all_sessions_closed());
}

#[tokio::test]
async fn test_total_classes_empty_history() {
    let upstream = Arc::new(FakeUpstream::new().with_totals(0, 0));
    let (app, state) = create_test_app(upstream.clone());
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/total-classes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json["date_range"].is_null());
    assert_eq!(json["performance_data"]["retrieved_workouts"], 0);
    assert_eq!(json["total_classes"]["total"], 0);
    assert!(upstream.all_sessions_closed());
}

#[tokio::test]
async fn test_total_classes_sparse_records_use_placeholders() {
    let upstream = Arc::new(FakeUpstream::new().with_workouts(vec![
        PerformanceSummary {
            id: "bare".to_string(),
            otf_class: None,
            details: None,
        },
        workout("dated", "2024-02-10T07:30:00"),
    ]));
    let (app, state) = create_test_app(upstream);
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/total-classes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let workouts = json["performance_data"]["workouts"].as_array().unwrap();
    assert_eq!(workouts[0]["id"], "dated");
    assert_eq!(workouts[1]["class_name"], "Unknown Class");
    assert_eq!(workouts[1]["coach"], "No Coach");
    assert_eq!(workouts[1]["studio"], "No Studio");
    assert_eq!(workouts[1]["date"], "Unknown Date");
    assert_eq!(workouts[1]["zone_time"]["red"], 0);

    assert_eq!(json["date_range"]["first_class"], "2024-02-10T07:30:00");
    assert_eq!(json["date_range"]["last_class"], "2024-02-10T07:30:00");
}

#[tokio::test]
async fn test_member_detail() {
    let member = MemberDetail {
        first_name: "Alex".to_string(),
        last_name: "Doe".to_string(),
        user_name: "alexd".to_string(),
        email: EMAIL.to_string(),
        max_hr: Some(188),
        member_class_summary: Some(MemberClassSummary {
            total_classes_booked: 10,
            total_classes_attended: 8,
            total_classes_used_hrm: 6,
            total_studios_visited: 3,
            ..Default::default()
        }),
        home_studio: Some(HomeStudio {
            studio_name: "Downtown".to_string(),
            time_zone: Some("America/Los_Angeles".to_string()),
        }),
    };
    let upstream = Arc::new(FakeUpstream::new().with_member(member));
    let (app, state) = create_test_app(upstream.clone());
    let token = valid_token(&state);

    for uri in ["/api/member-detail", "/api/members/detail"] {
        let response = app
            .clone()
            .oneshot(get_with_token(uri, &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let json = json_body(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["first_name"], "Alex");
        assert_eq!(json["data"]["last_name"], "Doe");
        assert_eq!(json["data"]["user_name"], "alexd");
        assert_eq!(json["data"]["email"], EMAIL);
        assert_eq!(json["data"]["workout_stats"]["attendance_rate"], 80.0);
        assert_eq!(json["data"]["workout_stats"]["hrm_usage_rate"], 75.0);
        assert_eq!(json["data"]["studio_info"]["home_studio_name"], "Downtown");
        assert_eq!(json["data"]["studio_info"]["total_studios_visited"], 3);
    }

    assert_eq!(upstream.sessions_opened(), 2);
    assert!(upstream.all_sessions_closed());
}

#[tokio::test]
async fn test_member_detail_minimal_profile() {
    let upstream = Arc::new(FakeUpstream::new().with_member(MemberDetail {
        first_name: "Alex".to_string(),
        email: EMAIL.to_string(),
        ..Default::default()
    }));
    let (app, state) = create_test_app(upstream);
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/member-detail", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let data = json["data"].as_object().unwrap();
    assert!(!data.contains_key("workout_stats"));
    assert!(!data.contains_key("studio_info"));
    assert_eq!(data["user_name"], "");
}

#[tokio::test]
async fn test_member_detail_upstream_failure() {
    let upstream = Arc::new(FakeUpstream::new().failing());
    let (app, state) = create_test_app(upstream.clone());
    let token = valid_token(&state);

    let response = app
        .oneshot(get_with_token("/api/members/detail", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(upstream.all_sessions_closed());
}
