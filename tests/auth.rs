//! Registration and login contract tests.
//!
//! These exercise the public /auth endpoints end to end: validation order,
//! duplicate handling, role resolution with rollback, and the login
//! status-code contract.

use axum::http::StatusCode;
use rusqlite::params;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn register_success_returns_envelope() {
    let t = spawn_app();
    let (status, body) = register(&t.app, base_registration("abc@gmail.com")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "User Registered Successfully");
    // Registration issues no token
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn register_duplicate_email_fails_once_and_forever() {
    let t = spawn_app();
    let (status, _) = register(&t.app, base_registration("exists@gmail.com")).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..2 {
        let (status, body) = register(&t.app, base_registration("exists@gmail.com")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already exists");
    }
}

#[tokio::test]
async fn register_email_uniqueness_is_case_insensitive() {
    let t = spawn_app();
    let (status, _) = register(&t.app, base_registration("case@gmail.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&t.app, base_registration("Case@Gmail.COM")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let t = spawn_app();
    for bad in ["abc@", "invalid-email-format", "@gmail.com"] {
        let mut body = base_registration("x@y.co");
        body["email"] = json!(bad);
        let (status, out) = register(&t.app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "email {:?}", bad);
        assert_eq!(out["message"], "Invalid email format");
    }
}

#[tokio::test]
async fn register_password_length_boundary() {
    let t = spawn_app();

    let mut body = base_registration("short@gmail.com");
    body["password"] = json!("12345");
    let (status, out) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["message"], "Password must be at least 6 characters long");

    let mut body = base_registration("short@gmail.com");
    body["password"] = json!("123456");
    let (status, _) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_phone_number_boundaries() {
    let t = spawn_app();

    // 11 digits
    let mut body = base_registration("phone1@gmail.com");
    body["phoneNumber"] = json!("01234567891");
    let (status, out) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["message"], "Phone number must not exceed 10 digits");

    // non-digit characters
    let mut body = base_registration("phone2@gmail.com");
    body["phoneNumber"] = json!("55InvalidPhone");
    let (status, out) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["message"], "Invalid phone number format");

    // 10 digits is accepted
    let mut body = base_registration("phone3@gmail.com");
    body["phoneNumber"] = json!("0123456789");
    let (status, _) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    // shorter numeric strings are accepted too
    let mut body = base_registration("phone4@gmail.com");
    body["phoneNumber"] = json!("091");
    let (status, _) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_requires_each_mandatory_field() {
    let t = spawn_app();
    for field in ["name", "email", "password", "phoneNumber"] {
        let mut body = base_registration("missing@gmail.com");
        body.as_object_mut().unwrap().remove(field);
        let (status, _) = register(&t.app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {}", field);
    }

    let (status, _) = register(&t.app, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_unknown_role_is_404_with_full_rollback() {
    let t = spawn_app();
    let mut body = base_registration("ghost@gmail.com");
    body["roles"] = json!(["invalid_role"]);

    let (status, out) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(out["message"], "Role 'invalid_role' Not Found");

    // No partial user row is observable...
    let conn = t.state.db.get().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params!["ghost@gmail.com"],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);

    // ...and the credentials cannot log in afterward.
    let (status, out) = login(&t.app, "ghost@gmail.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["message"], "Invalid Email");
}

#[tokio::test]
async fn register_empty_role_list_defaults_to_customer() {
    let t = spawn_app();
    let mut body = base_registration("default@gmail.com");
    body["roles"] = json!([]);

    let (status, _) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, out) = login(&t.app, "default@gmail.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["data"]["roles"], json!(["CUSTOMER"]));
}

#[tokio::test]
async fn register_resolves_role_names_case_insensitively() {
    let t = spawn_app();
    let mut body = base_registration("lower@gmail.com");
    body["roles"] = json!(["customer"]);

    let (status, _) = register(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, out) = login(&t.app, "lower@gmail.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["data"]["roles"], json!(["CUSTOMER"]));
}

#[tokio::test]
async fn login_success_returns_token_and_roles() {
    let t = spawn_app();
    let (status, _) = register(&t.app, base_registration("login@gmail.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(&t.app, "login@gmail.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login Successful");
    assert!(body["data"]["token"].as_str().unwrap().len() > 10);
    assert!(body["data"]["roles"].is_array());
}

#[tokio::test]
async fn login_accepts_any_email_casing() {
    let t = spawn_app();
    let (status, _) = register(&t.app, base_registration("mixed@gmail.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login(&t.app, "Mixed@Gmail.COM", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_wrong_password_is_rejected() {
    let t = spawn_app();
    let (status, _) = register(&t.app, base_registration("wrongpw@gmail.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(&t.app, "wrongpw@gmail.com", "WrongPass123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Password");
}

#[tokio::test]
async fn login_unknown_email_is_rejected() {
    let t = spawn_app();
    let (status, body) = login(&t.app, "nobody@gmail.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Email");
}

#[tokio::test]
async fn login_validates_input_shape() {
    let t = spawn_app();

    let (status, body) = login(&t.app, "invalidemailformat", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");

    let (status, body) = login(&t.app, "valid@example.com", "123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 6 characters long");

    let (status, body) = send_json(&t.app, "POST", "/auth/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .to_lowercase()
            .contains("email")
    );
}

#[tokio::test]
async fn login_inactive_account_is_404() {
    let t = spawn_app();
    let (status, _) = register(&t.app, base_registration("locked@gmail.com")).await;
    assert_eq!(status, StatusCode::OK);

    // Flip the flag directly in storage, as an operator would.
    let conn = t.state.db.get().unwrap();
    conn.execute(
        "UPDATE users SET is_active = 0 WHERE email = ?1",
        params!["locked@gmail.com"],
    )
    .unwrap();
    drop(conn);

    let (status, body) = login(&t.app, "locked@gmail.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .to_lowercase()
            .contains("not active")
    );
}
