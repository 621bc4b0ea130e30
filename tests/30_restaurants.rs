mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};

const OPTIONAL_FIELDS: [&str; 9] = [
    "street",
    "suite",
    "city",
    "state",
    "zip_code",
    "phone_num",
    "website",
    "email",
    "date_established",
];

#[tokio::test]
async fn list_empty_returns_empty_array() -> Result<()> {
    let app = TestApp::new()?;

    let res = app.call(Method::GET, "/restaurants", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "success": true, "restaurants": [] }));
    Ok(())
}

#[tokio::test]
async fn list_returns_rows_ordered_by_id() -> Result<()> {
    let app = TestApp::new()?;
    app.create_restaurant(json!({ "name": "Verve", "creator": "a@b.com" })).await?;
    app.create_restaurant(json!({ "name": "Sightglass", "creator": "c@d.com" })).await?;

    let res = app.call(Method::GET, "/restaurants", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    let restaurants = body["restaurants"].as_array().expect("restaurants array");
    assert_eq!(restaurants.len(), 2);
    assert_eq!(restaurants[0]["id"], 1);
    assert_eq!(restaurants[0]["name"], "Verve");
    assert_eq!(restaurants[1]["id"], 2);
    assert_eq!(restaurants[1]["name"], "Sightglass");
    Ok(())
}

#[tokio::test]
async fn create_with_required_fields_only() -> Result<()> {
    let app = TestApp::new()?;

    let res = app
        .call(
            Method::POST,
            "/restaurants/create",
            Some(json!({ "name": "Ritual", "creator": "a@b.com" })),
        )
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], 1);
    assert!(body["message"].as_str().unwrap_or_default().contains("Ritual"));

    let restaurant = app.call(Method::GET, "/restaurants/1", None).await?.json()["restaurant"].clone();
    assert_eq!(restaurant["name"], "Ritual");
    assert_eq!(restaurant["creator"], "a@b.com");
    for field in OPTIONAL_FIELDS {
        assert_eq!(restaurant[field], Value::Null, "{} should be null", field);
    }
    Ok(())
}

#[tokio::test]
async fn create_with_all_fields_reflects_them() -> Result<()> {
    let app = TestApp::new()?;
    let submitted = json!({
        "name": "Four Barrel",
        "creator": "owner@fourbarrel.com",
        "street": "375 Valencia St",
        "suite": "A",
        "city": "San Francisco",
        "state": "CA",
        "zip_code": "94103",
        "phone_num": "415-555-0100",
        "website": "https://fourbarrel.example",
        "email": "hello@fourbarrel.example",
        "date_established": "2008-05-01",
    });

    let id = app.create_restaurant(submitted.clone()).await?;
    let res = app.call(Method::GET, &format!("/restaurants/{}", id), None).await?;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], true);
    let restaurant = &body["restaurant"];
    assert_eq!(restaurant["id"], id);
    for (field, value) in submitted.as_object().expect("object") {
        assert_eq!(&restaurant[field], value, "field {}", field);
    }
    Ok(())
}

#[tokio::test]
async fn create_truncates_over_long_fields() -> Result<()> {
    let app = TestApp::new()?;
    let long_name = "N".repeat(120);
    let long_city = "ü".repeat(90);

    let res = app
        .call(
            Method::POST,
            "/restaurants/create",
            Some(json!({ "name": long_name, "creator": "a@b.com", "city": long_city })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let message = res.json()["message"].as_str().unwrap_or_default().to_string();
    assert!(message.contains(&"N".repeat(80)));
    assert!(!message.contains(&"N".repeat(81)));

    let restaurant = app.call(Method::GET, "/restaurants/1", None).await?.json()["restaurant"].clone();
    assert_eq!(restaurant["name"], "N".repeat(80));
    assert_eq!(restaurant["city"], "ü".repeat(80));
    Ok(())
}

#[tokio::test]
async fn create_without_name_or_creator_is_400() -> Result<()> {
    let app = TestApp::new()?;
    let bodies = [
        json!({ "creator": "a@b.com" }),
        json!({ "name": "", "creator": "a@b.com" }),
        json!({ "name": "   ", "creator": "a@b.com" }),
        json!({ "name": null, "creator": "a@b.com" }),
        json!({ "name": "Verve" }),
        json!({ "name": "Verve", "creator": "" }),
        json!({}),
    ];

    for body in bodies {
        let res = app.call(Method::POST, "/restaurants/create", Some(body.clone())).await?;
        common::assert_error(&res, StatusCode::BAD_REQUEST);
    }

    let res = app.call(Method::GET, "/restaurants", None).await?;
    assert_eq!(res.json()["restaurants"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_with_malformed_body_is_400() -> Result<()> {
    let app = TestApp::new()?;
    let token = common::token(common::ALL_SCOPES);

    for raw in ["{not json", "[1, 2]", ""] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/restaurants/create")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))?;
        let res = app.send(request).await?;
        common::assert_error(&res, StatusCode::BAD_REQUEST);
    }

    let res = app
        .call(
            Method::POST,
            "/restaurants/create",
            Some(json!({ "name": 42, "creator": "a@b.com" })),
        )
        .await?;
    common::assert_error(&res, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn get_unknown_id_is_404() -> Result<()> {
    let app = TestApp::new()?;

    let res = app.call(Method::GET, "/restaurants/999", None).await?;

    common::assert_error(&res, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn get_non_numeric_id_is_400() -> Result<()> {
    let app = TestApp::new()?;

    let res = app.call(Method::GET, "/restaurants/espresso", None).await?;

    common::assert_error(&res, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_sub_path_is_404() -> Result<()> {
    let app = TestApp::new()?;
    let id = app.create_restaurant(json!({ "name": "Verve", "creator": "a@b.com" })).await?;

    let res = app.call(Method::GET, &format!("/restaurants/{}/menu", id), None).await?;

    common::assert_error(&res, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn disallowed_method_is_405() -> Result<()> {
    let app = TestApp::new()?;
    let id = app.create_restaurant(json!({ "name": "Verve", "creator": "a@b.com" })).await?;

    for (method, path) in [
        (Method::POST, format!("/restaurants/{}", id)),
        (Method::PATCH, format!("/restaurants/{}", id)),
        (Method::DELETE, "/restaurants".to_string()),
        (Method::GET, "/restaurants/create".to_string()),
    ] {
        let res = app.call(method.clone(), &path, None).await?;
        common::assert_error(&res, StatusCode::METHOD_NOT_ALLOWED);
        assert!(res.headers.contains_key(header::ALLOW), "{} {}", method, path);
    }
    Ok(())
}

#[tokio::test]
async fn disallowed_method_without_token_is_405() -> Result<()> {
    let app = TestApp::new()?;

    for (method, path) in [
        (Method::POST, "/restaurants"),
        (Method::PATCH, "/restaurants/1"),
        (Method::GET, "/restaurants/create"),
        (Method::DELETE, "/restaurants/1/reviews"),
    ] {
        let res = app.request(method.clone(), path, None, None).await?;
        let message = common::assert_error(&res, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(message, "Method not allowed", "{} {}", method, path);
        assert!(res.headers.contains_key(header::ALLOW), "{} {}", method, path);
    }

    // Matched method without a token is still rejected
    let res = app.request(Method::GET, "/restaurants", None, None).await?;
    common::assert_error(&res, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn update_applies_only_present_fields() -> Result<()> {
    let app = TestApp::new()?;
    let id = app
        .create_restaurant(json!({ "name": "Verve", "creator": "a@b.com", "city": "Santa Cruz" }))
        .await?;

    let res = app
        .call(
            Method::PUT,
            &format!("/restaurants/{}", id),
            Some(json!({ "website": "https://verve.example", "state": "CA" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["id"], id);

    let restaurant = app
        .call(Method::GET, &format!("/restaurants/{}", id), None)
        .await?
        .json()["restaurant"]
        .clone();
    assert_eq!(restaurant["name"], "Verve");
    assert_eq!(restaurant["creator"], "a@b.com");
    assert_eq!(restaurant["city"], "Santa Cruz");
    assert_eq!(restaurant["website"], "https://verve.example");
    assert_eq!(restaurant["state"], "CA");
    assert_eq!(restaurant["street"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn update_with_blank_name_is_400_and_keeps_state() -> Result<()> {
    let app = TestApp::new()?;
    let id = app.create_restaurant(json!({ "name": "Verve", "creator": "a@b.com" })).await?;
    let path = format!("/restaurants/{}", id);

    let res = app
        .call(Method::PUT, &path, Some(json!({ "name": "", "city": "Oakland" })))
        .await?;
    common::assert_error(&res, StatusCode::BAD_REQUEST);

    let restaurant = app.call(Method::GET, &path, None).await?.json()["restaurant"].clone();
    assert_eq!(restaurant["name"], "Verve");
    assert_eq!(restaurant["city"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn update_unknown_id_is_404() -> Result<()> {
    let app = TestApp::new()?;

    let res = app
        .call(Method::PUT, "/restaurants/7", Some(json!({ "name": "Verve" })))
        .await?;

    common::assert_error(&res, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_404() -> Result<()> {
    let app = TestApp::new()?;
    let id = app.create_restaurant(json!({ "name": "Verve", "creator": "a@b.com" })).await?;
    let path = format!("/restaurants/{}", id);

    let res = app.call(Method::DELETE, &path, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], id);
    assert!(body["message"].as_str().unwrap_or_default().contains("Verve"));

    common::assert_error(&app.call(Method::GET, &path, None).await?, StatusCode::NOT_FOUND);
    common::assert_error(&app.call(Method::DELETE, &path, None).await?, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn end_to_end_lifecycle() -> Result<()> {
    let app = TestApp::new()?;

    let res = app
        .call(
            Method::POST,
            "/restaurants/create",
            Some(json!({ "name": "Restaurant Chinois", "creator": "a@b.com" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["id"], 1);

    let res = app.call(Method::GET, "/restaurants/1", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let before = res.json()["restaurant"].clone();
    assert_eq!(before["name"], "Restaurant Chinois");
    assert_eq!(before["creator"], "a@b.com");
    for field in OPTIONAL_FIELDS {
        assert_eq!(before[field], Value::Null, "{} should be null", field);
    }

    let res = app
        .call(Method::PUT, "/restaurants/1", Some(json!({ "website": "w" })))
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let after = app.call(Method::GET, "/restaurants/1", None).await?.json()["restaurant"].clone();
    assert_eq!(after["website"], "w");
    let mut expected = before.clone();
    expected["website"] = "w".into();
    assert_eq!(after, expected);

    let res = app.call(Method::DELETE, "/restaurants/1", None).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.call(Method::GET, "/restaurants/1", None).await?;
    common::assert_error(&res, StatusCode::NOT_FOUND);
    Ok(())
}
