mod common;

use axum::http::StatusCode;
use chrono::{Days, Utc};
use serde_json::json;
use tower::ServiceExt; // for .oneshot()

use common::{body_json, request, TestBackend};
use medrep_backend::model::user::UserRole;
use medrep_backend::repository::user_repo::UserRepository;

fn bonte_payload() -> serde_json::Value {
    json!({
        "report_date": "2024-03-01",
        "region": "Kigali",
        "dentists": 2,
        "general_practitioners": 3,
        "pharmacies": 1,
        "orders_count": 2,
        "orders_value": 5000
    })
}

#[tokio::test]
async fn test_submit_bonte_scenario() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(bonte_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_doctors"], 5);
    assert_eq!(body["data"]["total_visits"], 6);
    assert_eq!(body["data"]["region"], "Kigali");

    // Retrievable via my-reports with the exact same values.
    let resp = backend
        .router
        .clone()
        .oneshot(request("GET", "/api/reports/my-reports", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let reports = body["data"]["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["report_date"], "2024-03-01");
    assert_eq!(reports[0]["dentists"], 2);
    assert_eq!(reports[0]["general_practitioners"], 3);
    assert_eq!(reports[0]["orders_value"], 5000.0);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_duplicate_submission_is_rejected() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    let first = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(bonte_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(bonte_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already"));
}

#[tokio::test]
async fn test_concurrent_duplicate_submissions_only_one_wins() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    let (a, b) = tokio::join!(
        backend.router.clone().oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(bonte_payload()),
        )),
        backend.router.clone().oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(bonte_payload()),
        )),
    );
    let statuses = [a.unwrap().status(), b.unwrap().status()];
    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.contains(&StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_future_date_is_rejected() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    let tomorrow = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap();
    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(json!({ "report_date": tomorrow.to_string(), "region": "Kigali" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_zero_counters_is_valid() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(json!({ "report_date": "2024-03-01", "region": "Kigali" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["total_doctors"], 0);
    assert_eq!(body["data"]["total_visits"], 0);
}

#[tokio::test]
async fn test_region_defaults_to_owner_region() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Eastern"), true)
        .await;
    let token = backend.token_for(&user);

    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&token),
            Some(json!({ "report_date": "2024-03-01" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["region"], "Eastern");
}

#[tokio::test]
async fn test_report_access_rules() {
    let backend = TestBackend::new();
    let owner = backend
        .seed_user("owner", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let other = backend
        .seed_user("other", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let supervisor = backend
        .seed_user("supervisor", UserRole::Supervisor, None, true)
        .await;

    let owner_token = backend.token_for(&owner);
    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/reports/daily",
            Some(&owner_token),
            Some(bonte_payload()),
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let report_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/reports/{}", report_id);

    // Owner reads their own report.
    let resp = backend
        .router
        .clone()
        .oneshot(request("GET", &uri, Some(&owner_token), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // A non-owner, non-privileged caller is forbidden.
    let resp = backend
        .router
        .clone()
        .oneshot(request("GET", &uri, Some(&backend.token_for(&other)), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // A supervisor reads any report.
    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "GET",
            &uri,
            Some(&backend.token_for(&supervisor)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Updates follow the same rule.
    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "PUT",
            &uri,
            Some(&backend.token_for(&other)),
            Some(json!({ "dentists": 9 })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "PUT",
            &uri,
            Some(&owner_token),
            Some(json!({ "dentists": 9 })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    // 9 dentists + 3 GPs; totals are recomputed from the new counters.
    assert_eq!(body["data"]["total_doctors"], 12);
}

#[tokio::test]
async fn test_get_unknown_report_is_404() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/reports/{}", bson::oid::ObjectId::new().to_hex()),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let backend = TestBackend::new();
    let resp = backend
        .router
        .clone()
        .oneshot(request("GET", "/api/reports/my-reports", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_user_token_is_stale() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    // The token itself is still valid, but the live record is inactive.
    backend
        .user_repo
        .set_active(user.id.unwrap(), false)
        .await
        .unwrap();

    let resp = backend
        .router
        .clone()
        .oneshot(request("GET", "/api/reports/my-reports", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_my_reports_pagination_and_order() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    for day in 1..=5 {
        let payload = json!({
            "report_date": format!("2024-03-{:02}", day),
            "region": "Kigali"
        });
        let resp = backend
            .router
            .clone()
            .oneshot(request("POST", "/api/reports/daily", Some(&token), Some(payload)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "GET",
            "/api/reports/my-reports?page=1&limit=2",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let reports = body["data"]["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    // Date-descending.
    assert_eq!(reports[0]["report_date"], "2024-03-05");
    assert_eq!(reports[1]["report_date"], "2024-03-04");
    assert_eq!(body["data"]["pagination"]["total"], 5);
    assert_eq!(body["data"]["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn test_update_to_taken_date_is_rejected() {
    let backend = TestBackend::new();
    let user = backend
        .seed_user("bonte", UserRole::MedRep, Some("Kigali"), true)
        .await;
    let token = backend.token_for(&user);

    for day in ["2024-03-01", "2024-03-02"] {
        backend
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/api/reports/daily",
                Some(&token),
                Some(json!({ "report_date": day, "region": "Kigali" })),
            ))
            .await
            .unwrap();
    }
    let resp = backend
        .router
        .clone()
        .oneshot(request("GET", "/api/reports/my-reports", Some(&token), None))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let id = body["data"]["reports"][0]["id"].as_str().unwrap().to_string();

    // Moving the 03-02 report onto 03-01 collides.
    let resp = backend
        .router
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/reports/{}", id),
            Some(&token),
            Some(json!({ "report_date": "2024-03-01" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
