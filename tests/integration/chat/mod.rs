//! Chat endpoint integration tests

use axum::http::{Method, StatusCode};
use chronochem_chat::FALLBACK_REPLY;
use chronochem_llm::{LlmRole, MockLlmService};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{create_test_jwt, parse_body, request, ChatTestApp, TestApp};

fn messages_uri(chemist_id: Uuid) -> String {
    format!("/v1/chemists/{}/messages", chemist_id)
}

mod test_send_message {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_both_turns() {
        let app = ChatTestApp::new(MockLlmService::with_reply("燃燒需要氧氣。"));

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            None,
            Some(json!({"message": "What did you discover?"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["user_message"]["content"], "What did you discover?");
        assert_eq!(body["data"]["assistant_message"]["role"], "assistant");
        assert_eq!(body["data"]["assistant_message"]["content"], "燃燒需要氧氣。");
        assert!(body["data"]["assistant_message"]["timestamp"].is_i64());

        assert_eq!(app.store.turns_for(app.chemist_id).len(), 2);
    }

    #[tokio::test]
    async fn test_lavoisier_first_message_prompt() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            None,
            Some(json!({"message": "What did you discover?"})),
        );
        app.test_router().oneshot(req).await.unwrap();

        let requests = app.llm.recorded_requests();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, LlmRole::System);
        assert!(messages[0].content.contains("1743"));
        assert!(messages[0].content.contains("1827"));
        assert!(messages[0]
            .content
            .contains("- Discovery of Oxygen（1774年）：Identified oxygen's role in combustion"));
        assert_eq!(messages[1].role, LlmRole::User);
        assert_eq!(messages[1].content, "What did you discover?");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_and_not_stored() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            None,
            Some(json!({"message": "   "})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = parse_body(resp).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("content must not be empty"));

        assert!(app.store.turns_for(app.chemist_id).is_empty());
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri(messages_uri(app.chemist_id))
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_completion_failure_still_created_with_fallback() {
        let app = ChatTestApp::new(MockLlmService::failing("upstream 503"));

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            None,
            Some(json!({"message": "Are you there?"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["data"]["assistant_message"]["content"], FALLBACK_REPLY);

        let stored = app.store.turns_for(app.chemist_id);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_unknown_chemist_is_404() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = request(
            Method::POST,
            &messages_uri(Uuid::new_v4()),
            None,
            Some(json!({"message": "Hello"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bearer_token_attributes_turns() {
        let app = ChatTestApp::new(MockLlmService::new());
        let user_id = Uuid::new_v4();
        let jwt = create_test_jwt(user_id, &app.config.jwt_secret).unwrap();

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            Some(&jwt),
            Some(json!({"message": "Hello"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let stored = app.store.turns_for(app.chemist_id);
        assert!(stored.iter().all(|t| t.user_id == Some(user_id)));
    }

    #[tokio::test]
    async fn test_invalid_bearer_token_is_401() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            Some("not-a-jwt"),
            Some(json!({"message": "Hello"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(app.store.turns_for(app.chemist_id).is_empty());
    }
}

mod test_history {
    use super::*;

    #[tokio::test]
    async fn test_list_is_ascending_with_epoch_millis() {
        let app = ChatTestApp::new(MockLlmService::with_reply("ok"));

        for text in ["first", "second"] {
            let req = request(
                Method::POST,
                &messages_uri(app.chemist_id),
                None,
                Some(json!({"message": text})),
            );
            app.test_router().oneshot(req).await.unwrap();
        }

        let req = request(Method::GET, &messages_uri(app.chemist_id), None, None);
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(body["status"], "success");
        let data = body["data"].as_array().unwrap();
        let contents: Vec<&str> = data.iter().map(|m| m["content"].as_str().unwrap()).collect();
        assert_eq!(contents, vec!["first", "ok", "second", "ok"]);

        let timestamps: Vec<i64> = data.iter().map(|m| m["timestamp"].as_i64().unwrap()).collect();
        assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_clear_returns_no_content() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = request(
            Method::POST,
            &messages_uri(app.chemist_id),
            None,
            Some(json!({"message": "Hello"})),
        );
        app.test_router().oneshot(req).await.unwrap();

        let req = request(Method::DELETE, &messages_uri(app.chemist_id), None, None);
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
        assert!(app.store.turns_for(app.chemist_id).is_empty());
    }

    #[tokio::test]
    async fn test_history_of_unknown_chemist_is_404() {
        let app = ChatTestApp::new(MockLlmService::new());

        let req = request(Method::GET, &messages_uri(Uuid::new_v4()), None, None);
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

mod test_chat_with_database {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_persona_loaded_from_store() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Chemical Revolution", 1770).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Antoine Lavoisier", 1743, Some(1827))
            .await
            .unwrap();
        app.create_discovery(chemist.id, "Discovery of Oxygen", 1774)
            .await
            .unwrap();

        let req = request(
            Method::POST,
            &messages_uri(chemist.id),
            None,
            Some(json!({"message": "What did you discover?"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let requests = app.llm.recorded_requests();
        let system = &requests[0].messages[0].content;
        assert!(system.contains("你現在扮演Antoine Lavoisier（1743-1827）"));
        assert!(system.contains("- Discovery of Oxygen（1774年）：Discovery of Oxygen description"));
        assert!(system.contains("Chemical Revolution（1770年）"));

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_history_window_from_database() {
        let app = TestApp::with_llm(MockLlmService::with_reply("ok")).await.unwrap();
        let era = app.create_era("Modern", 1900).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Marie Curie", 1867, Some(1934))
            .await
            .unwrap();

        for i in 0..4 {
            let req = request(
                Method::POST,
                &messages_uri(chemist.id),
                None,
                Some(json!({"message": format!("question {}", i)})),
            );
            let resp = app.test_router().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let requests = app.llm.recorded_requests();
        let last = requests.last().unwrap();
        // system + 5 of the 6 prior turns + new message
        assert_eq!(last.messages.len(), 7);
        assert_eq!(last.messages[1].content, "ok");
        assert_eq!(last.messages[2].content, "question 1");
        assert_eq!(last.messages[6].content, "question 3");

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_clear_is_scoped_to_one_chemist() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Periodic", 1860).await.unwrap();
        let mendeleev = app
            .create_chemist(era.id, "Dmitri Mendeleev", 1834, Some(1907))
            .await
            .unwrap();
        let meyer = app
            .create_chemist(era.id, "Lothar Meyer", 1830, Some(1895))
            .await
            .unwrap();

        for chemist_id in [mendeleev.id, meyer.id] {
            let req = request(
                Method::POST,
                &messages_uri(chemist_id),
                None,
                Some(json!({"message": "Hello"})),
            );
            app.test_router().oneshot(req).await.unwrap();
        }

        let req = request(Method::DELETE, &messages_uri(mendeleev.id), None, None);
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_messages WHERE chemist_id = $1",
        )
        .bind(meyer.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert_eq!(remaining, 2);

        let cleared: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_messages WHERE chemist_id = $1",
        )
        .bind(mendeleev.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert_eq!(cleared, 0);

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_nul_in_reply_still_stores_both_turns() {
        let app = TestApp::with_llm(MockLlmService::with_reply("oxy\0gen"))
            .await
            .unwrap();
        let era = app.create_era("Pneumatic Chemistry", 1770).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Carl Wilhelm Scheele", 1742, Some(1786))
            .await
            .unwrap();

        let req = request(
            Method::POST,
            &messages_uri(chemist.id),
            None,
            Some(json!({"message": "hello"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = parse_body(resp).await;
        assert_eq!(body["data"]["assistant_message"]["content"], "oxygen");

        let stored: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE chemist_id = $1")
                .bind(chemist.id)
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(stored, 2);

        app.cleanup_era(era.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_nul_in_message_rejected_before_storage() {
        let app = TestApp::new().await.unwrap();
        let era = app.create_era("Pneumatic Chemistry", 1770).await.unwrap();
        let chemist = app
            .create_chemist(era.id, "Henry Cavendish", 1731, Some(1810))
            .await
            .unwrap();

        let req = request(
            Method::POST,
            &messages_uri(chemist.id),
            None,
            Some(json!({"message": "hello\u{0}world"})),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let stored: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE chemist_id = $1")
                .bind(chemist.id)
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(stored, 0);
        assert_eq!(app.llm.call_count(), 0);

        app.cleanup_era(era.id).await.unwrap();
    }
}
