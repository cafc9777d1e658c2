//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance reachable through
//! `DATABASE_URL`; each test is skipped when it is unset.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_sign_up_and_sign_in() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let request = SignUpRequest::unique();

    let response = server.post("/auth/signup", &request).await.unwrap();
    let signed_up: SignUpResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(signed_up.email, request.email);
    assert_eq!(signed_up.name, request.name);

    let response = server
        .post("/auth/signin", &SignInRequest::from_sign_up(&request))
        .await
        .unwrap();
    let signed_in: SignInResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(signed_in.user_id, signed_up.user_id);
    assert!(!signed_in.token.is_empty());

    let response = server.get_auth("/auth/session", &signed_in.token).await.unwrap();
    let session: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(session["user"]["email"], request.email.as_str());
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let request = SignUpRequest::unique();

    let response = server.post("/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/auth/signup", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_sign_in_wrong_password_and_unknown_email_look_alike() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();

    let response = server
        .post(
            "/auth/signin",
            &SignInRequest {
                email: user.email.clone(),
                password: "WrongPass123!".to_string(),
            },
        )
        .await
        .unwrap();
    let wrong_password = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post(
            "/auth/signin",
            &SignInRequest {
                email: format!("nobody-{}@example.com", unique_suffix()),
                password: TEST_PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();
    let unknown_email = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_unverified_account_cannot_sign_in_when_required() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start_with(&[("REQUIRE_EMAIL_VERIFICATION", "true")])
        .await
        .unwrap();
    let request = SignUpRequest::unique();
    let response = server.post("/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/auth/signin", &SignInRequest::from_sign_up(&request))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "EMAIL_NOT_VERIFIED");
}

#[tokio::test]
async fn test_sign_out_revokes_every_session_and_is_idempotent() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();
    let second = TestUser::sign_in(&server, &user.email, &user.password)
        .await
        .unwrap();

    let response = server
        .post_auth("/auth/signout", &user.token, &json!({}))
        .await
        .unwrap();
    let revoked: RevokedResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(revoked.success);
    assert_eq!(revoked.revoked_sessions, 2);

    // Both tokens are dead now
    for token in [&user.token, &second] {
        let response = server.get_auth("/auth/session", token).await.unwrap();
        assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    }
}

#[tokio::test]
async fn test_otp_and_reset_endpoints_do_not_reveal_accounts() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let unknown = json!({ "email": format!("ghost-{}@example.com", unique_suffix()) });

    for path in ["/auth/email-otp/send", "/auth/forgot-password"] {
        let response = server.post(path, &unknown).await.unwrap();
        let body: SuccessResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(body.success);
    }

    let response = server
        .post(
            "/auth/reset-password",
            &json!({ "token": format!("{}.bogus", Uuid::new_v4()), "new_password": "NewPass123!" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_TOKEN");
}

// ============================================================================
// Conversation & Message Tests
// ============================================================================

#[tokio::test]
async fn test_conversation_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = TestUser::create(&server).await.unwrap();
    let request = CreateConversationRequest::unique();

    let response = server
        .post_auth("/conversations", &author.token, &request)
        .await
        .unwrap();
    let created: CreateConversationResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();

    let path = format!("/conversations/{}", created.conversation_id);
    let response = server.get(&path).await.unwrap();
    let thread: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread["title"], request.title.as_str());
    assert_eq!(thread["messages"][0]["id"], created.message_id.to_string());
    assert_eq!(thread["author"]["id"], author.id.to_string());

    let response = server
        .patch_auth(&path, &author.token, &json!({ "title": "Renamed" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/conversations").await.unwrap();
    let list: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    let listed = list
        .iter()
        .find(|c| c["id"] == created.conversation_id.to_string())
        .expect("conversation should be listed");
    assert_eq!(listed["title"], "Renamed");
    assert_eq!(listed["message_count"], 1);

    let response = server.delete_auth(&path, &author.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.delete_auth(&path, &author.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_only_author_may_edit_conversation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = TestUser::create(&server).await.unwrap();
    let intruder = TestUser::create(&server).await.unwrap();

    let response = server
        .post_auth("/conversations", &author.token, &CreateConversationRequest::unique())
        .await
        .unwrap();
    let created: CreateConversationResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/conversations/{}", created.conversation_id);

    let response = server
        .patch_auth(&path, &intruder.token, &json!({ "title": "Mine now" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "FORBIDDEN");

    let response = server.delete_auth(&path, &intruder.token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_message_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = TestUser::create(&server).await.unwrap();
    let replier = TestUser::create(&server).await.unwrap();

    let response = server
        .post_auth("/conversations", &author.token, &CreateConversationRequest::unique())
        .await
        .unwrap();
    let created: CreateConversationResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();

    // Both creation routes land in the same thread
    let response = server
        .post_auth(
            "/messages",
            &replier.token,
            &json!({ "conversation_id": created.conversation_id, "content": "First reply" }),
        )
        .await
        .unwrap();
    let first: CreateMessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/conversations/{}/messages", created.conversation_id),
            &replier.token,
            &json!({ "content": "Second reply" }),
        )
        .await
        .unwrap();
    let second: CreateMessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let message_path = format!("/messages/{}", first.message_id);
    let response = server
        .patch_auth(&message_path, &author.token, &json!({ "content": "Not yours" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(&message_path, &replier.token, &json!({ "content": "Edited reply" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(&format!("/messages/{}", second.message_id), &replier.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/conversations/{}", created.conversation_id))
        .await
        .unwrap();
    let thread: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let contents: Vec<&str> = thread["messages"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["content"].as_str())
        .collect();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[1], "Edited reply");
}

#[tokio::test]
async fn test_reply_to_missing_conversation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();

    let response = server
        .post_auth(
            "/messages",
            &user.token,
            &json!({ "conversation_id": Uuid::new_v4(), "content": "Hello?" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_malformed_ids_and_missing_auth() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();

    let response = server.get("/conversations/123").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    let response = server
        .post("/conversations", &CreateConversationRequest::unique())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_profile_patch_semantics() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();

    let response = server
        .patch_auth("/users/profile", &user.token, &json!({ "bio": "Rustacean" }))
        .await
        .unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.bio.as_deref(), Some("Rustacean"));
    assert!(profile.name.is_some(), "absent name must stay untouched");

    let response = server
        .patch_auth("/users/profile", &user.token, &json!({ "name": null }))
        .await
        .unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(profile.name.is_none());
    assert_eq!(profile.bio.as_deref(), Some("Rustacean"));

    let response = server.get_auth("/users/profile", &user.token).await.unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.id, user.id);
    assert_eq!(profile.email, user.email);
}

#[tokio::test]
async fn test_avatar_upload_is_served_back() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();
    let png = b"\x89PNG\r\n\x1a\nnot really an image".to_vec();

    let response = server
        .upload_avatar(&user.token, png.clone(), "image/png")
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let url = body["avatar_url"].as_str().unwrap().to_string();
    assert!(url.starts_with(&format!("{}/avatars/{}-", server.base_url(), user.id)));
    assert!(url.ends_with(".png"));

    let served = server.client.get(&url).send().await.unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().as_ref(), png.as_slice());

    let response = server.get_auth("/users/profile", &user.token).await.unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.avatar.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_avatar_rejects_wrong_type_and_size() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();

    let response = server
        .upload_avatar(&user.token, b"GIF89a".to_vec(), "image/gif")
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "UNSUPPORTED_FORMAT");

    let too_big = vec![0u8; 2 * 1024 * 1024 + 1];
    let response = server
        .upload_avatar(&user.token, too_big, "image/png")
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::PAYLOAD_TOO_LARGE).await.unwrap();
    assert_eq!(code, "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_password_change_keeps_only_current_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();
    let other = TestUser::sign_in(&server, &user.email, &user.password)
        .await
        .unwrap();

    let response = server
        .patch_auth(
            "/users/profile/password",
            &user.token,
            &json!({ "current_password": user.password, "new_password": "NewPass456!" }),
        )
        .await
        .unwrap();
    let changed: RevokedResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(changed.success);
    assert_eq!(changed.revoked_sessions, 1);

    let response = server.get_auth("/auth/session", &user.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let response = server.get_auth("/auth/session", &other).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    TestUser::sign_in(&server, &user.email, "NewPass456!")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_contributions_hide_deleted_conversations() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = TestUser::create(&server).await.unwrap();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = server
            .post_auth("/conversations", &user.token, &CreateConversationRequest::unique())
            .await
            .unwrap();
        let created: CreateConversationResponse =
            assert_json(response, StatusCode::CREATED).await.unwrap();
        ids.push(created.conversation_id);
    }
    let response = server
        .delete_auth(&format!("/conversations/{}", ids[0]), &user.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/users/{}/contributions", user.id))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    let conversations = body["conversations"].as_array().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["id"], ids[1].to_string());
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["conversation_id"], ids[1].to_string());

    let response = server
        .get(&format!("/users/{}/contributions", Uuid::new_v4()))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
