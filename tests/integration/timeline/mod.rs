//! Timeline CRUD integration tests (require Postgres)

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{create_test_jwt, parse_body, request, TestApp};

mod test_eras {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_create_get_update_delete_era() {
        let app = TestApp::new().await.unwrap();

        let req = request(
            Method::POST,
            "/v1/eras",
            None,
            Some(json!({"name": "Alchemy", "year": -300, "description": "Transmutation"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = parse_body(resp).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["year"], -300);

        let req = request(
            Method::PATCH,
            &format!("/v1/eras/{}", id),
            None,
            Some(json!({"name": "Hellenistic Alchemy", "model_url": "models/alchemy.glb"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = parse_body(resp).await;
        assert_eq!(updated["name"], "Hellenistic Alchemy");
        assert_eq!(updated["year"], -300);
        assert_eq!(updated["model_url"], "models/alchemy.glb");

        let req = request(Method::DELETE, &format!("/v1/eras/{}", id), None, None);
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = request(Method::GET, &format!("/v1/eras/{}", id), None, None);
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_create_era_rejects_empty_name() {
        let app = TestApp::new().await.unwrap();

        let req = request(
            Method::POST,
            "/v1/eras",
            None,
            Some(json!({"name": "", "year": 1800})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_full_detail_includes_events_and_chemists() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Chemical Revolution", 1770).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Antoine Lavoisier", 1743, Some(1794))
            .await
            .unwrap();

        let req = request(
            Method::POST,
            "/v1/events",
            None,
            Some(json!({
                "title": "Traité élémentaire de chimie",
                "year": 1789,
                "category": "publication",
                "era_id": era.id,
                "chemist_id": chemist.id
            })),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = request(
            Method::GET,
            &format!("/v1/eras/{}/full-detail", era.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(body["name"], "Chemical Revolution");
        assert_eq!(body["events"].as_array().unwrap().len(), 1);
        assert_eq!(body["events"][0]["category"], "publication");
        assert_eq!(body["chemists"][0]["name"], "Antoine Lavoisier");

        app.cleanup_era(era.id).await.unwrap();
    }
}

mod test_chemists {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_create_chemist_with_position() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Radioactivity", 1898).await.unwrap();

        let req = request(
            Method::POST,
            "/v1/chemists",
            None,
            Some(json!({
                "era_id": era.id,
                "name": "Marie Curie",
                "birth_year": 1867,
                "death_year": 1934,
                "description": "Discovered polonium and radium",
                "position": {"x": -2.0, "y": 0.0, "z": 0.0},
                "model_path": "models/curie.glb"
            })),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["position"]["x"], -2.0);
        assert_eq!(body["death_year"], 1934);

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_death_before_birth_rejected() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Impossible", 1800).await.unwrap();

        let req = request(
            Method::POST,
            "/v1/chemists",
            None,
            Some(json!({
                "era_id": era.id,
                "name": "Backwards",
                "birth_year": 1900,
                "death_year": 1850
            })),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_unknown_era_is_bad_request() {
        let app = TestApp::new().await.unwrap();

        let req = request(
            Method::POST,
            "/v1/chemists",
            None,
            Some(json!({
                "era_id": Uuid::new_v4(),
                "name": "Orphan",
                "birth_year": 1800
            })),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_list_filters_by_era_and_search() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Filter Era", 1850).await.unwrap();
        let other_era = app.create_era("Other Era", 1950).await.unwrap();
        app.create_chemist(era.id, "Robert Bunsen", 1811, Some(1899))
            .await
            .unwrap();
        app.create_chemist(era.id, "Gustav Kirchhoff", 1824, Some(1887))
            .await
            .unwrap();
        app.create_chemist(other_era.id, "Linus Pauling", 1901, Some(1994))
            .await
            .unwrap();

        let req = request(
            Method::GET,
            &format!("/v1/chemists?era={}", era.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        let body = parse_body(resp).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Robert Bunsen", "Gustav Kirchhoff"]);

        let req = request(
            Method::GET,
            &format!("/v1/chemists?era={}&search=bunsen", era.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        // LIKE metacharacters are matched literally
        for term in ["%25", "_"] {
            let req = request(
                Method::GET,
                &format!("/v1/chemists?era={}&search={}", era.id, term),
                None,
                None,
            );
            let resp = app.test_router().oneshot(req).await.unwrap();
            let body = parse_body(resp).await;
            assert!(body.as_array().unwrap().is_empty());
        }

        app.cleanup_era(era.id).await.unwrap();
        app.cleanup_era(other_era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_deleting_chemist_cascades() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Cascade Era", 1800).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Humphry Davy", 1778, Some(1829))
            .await
            .unwrap();
        app.create_discovery(chemist.id, "Sodium", 1807).await.unwrap();

        let req = request(
            Method::POST,
            &format!("/v1/chemists/{}/messages", chemist.id),
            None,
            Some(json!({"message": "Hello"})),
        );
        app.test_router().oneshot(req).await.unwrap();

        let req = request(
            Method::DELETE,
            &format!("/v1/chemists/{}", chemist.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let events: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM historical_events WHERE chemist_id = $1")
                .bind(chemist.id)
                .fetch_one(&app.pool)
                .await
                .unwrap();
        let turns: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE chemist_id = $1")
                .bind(chemist.id)
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(events, 0);
        assert_eq!(turns, 0);

        app.cleanup_era(era.id).await.unwrap();
    }
}

mod test_events {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_event_without_owner_rejected() {
        let app = TestApp::new().await.unwrap();

        let req = request(
            Method::POST,
            "/v1/events",
            None,
            Some(json!({"title": "Floating", "year": 1800})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_filter_by_category_and_year() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Events Era", 1770).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Joseph Priestley", 1733, Some(1804))
            .await
            .unwrap();
        app.create_discovery(chemist.id, "Dephlogisticated air", 1774)
            .await
            .unwrap();

        let req = request(
            Method::POST,
            "/v1/events",
            None,
            Some(json!({
                "title": "Copley Medal",
                "year": 1772,
                "category": "award",
                "chemist_id": chemist.id
            })),
        );
        app.test_router().oneshot(req).await.unwrap();

        let req = request(
            Method::GET,
            &format!("/v1/events?chemist={}&category=award", chemist.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        let body = parse_body(resp).await;
        let events = body.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["title"], "Copley Medal");

        let req = request(
            Method::GET,
            &format!("/v1/events?chemist={}&year=1774", chemist.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body[0]["title"], "Dephlogisticated air");

        app.cleanup_era(era.id).await.unwrap();
    }
}

mod test_feedback {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_feedback_records_optional_user() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Feedback Era", 1900).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Fritz Haber", 1868, Some(1934))
            .await
            .unwrap();
        let user_id = Uuid::new_v4();
        let jwt = create_test_jwt(user_id, &app.config.jwt_secret).unwrap();

        let req = request(
            Method::POST,
            "/v1/feedback",
            Some(&jwt),
            Some(json!({"chemist_id": chemist.id, "rating": 5, "comment": "Fascinating"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = parse_body(resp).await;
        assert_eq!(body["user_id"], user_id.to_string());

        let req = request(
            Method::POST,
            "/v1/feedback",
            None,
            Some(json!({"chemist_id": chemist.id, "rating": 3})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = parse_body(resp).await;
        assert!(body["user_id"].is_null());
        assert_eq!(body["comment"], "");

        let req = request(
            Method::GET,
            &format!("/v1/feedback?chemist={}", chemist.id),
            None,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_rating_out_of_range_rejected() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Rating Era", 1900).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Svante Arrhenius", 1859, Some(1927))
            .await
            .unwrap();

        let req = request(
            Method::POST,
            "/v1/feedback",
            None,
            Some(json!({"chemist_id": chemist.id, "rating": 6})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        app.cleanup_era(era.id).await.unwrap();
    }
}
