//! Content CRUD: news, history, guitarists.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::spawn_app;

#[tokio::test]
async fn news_lifecycle() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/news",
            Some(&admin),
            json!({ "title": "Spring concert", "content": "The club plays on Friday." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["newsId"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/news").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["news"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Spring concert");
    assert_eq!(items[0]["author"]["username"], "admin");

    let (status, _) = app
        .put(
            &format!("/api/news/{id}"),
            Some(&admin),
            json!({ "title": "Spring concert moved", "content": "Now on Saturday instead." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/news").await;
    let item = &body["news"].as_array().unwrap()[0];
    assert_eq!(item["title"], "Spring concert moved");
    assert!(item["updatedAt"].is_string());

    let (status, body) = app.delete(&format!("/api/news/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "news and its comments deleted");

    let (_, body) = app.get("/api/news").await;
    assert!(body["news"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn lists_are_newest_first() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    for title in ["first post", "second post", "third post"] {
        let (status, _) = app
            .post(
                "/api/news",
                Some(&admin),
                json!({ "title": title, "content": "enough content here" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        // Distinct creation timestamps
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (_, body) = app.get("/api/news").await;
    let titles: Vec<&str> = body["news"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third post", "second post", "first post"]);
}

#[tokio::test]
async fn update_of_missing_item_is_not_an_upsert() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let ghost = Uuid::new_v4();
    let (status, body) = app
        .put(
            &format!("/api/news/{ghost}"),
            Some(&admin),
            json!({ "title": "never lands", "content": "should not be created" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "news item not found");

    let (status, body) = app
        .put(
            &format!("/api/history/{ghost}"),
            Some(&admin),
            json!({ "title": "never lands", "content": "should not be created" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "history entry not found");

    let (status, body) = app
        .put(
            &format!("/api/guitarists/{ghost}"),
            Some(&admin),
            json!({ "name": "Nobody", "bio": "should not be created" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "guitarist not found");

    let (_, body) = app.get("/api/news").await;
    assert!(body["news"].as_array().unwrap().is_empty());
    let (_, body) = app.get("/api/history").await;
    assert!(body["history"].as_array().unwrap().is_empty());
    let (_, body) = app.get("/api/guitarists").await;
    assert!(body["guitarists"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_missing_item_is_not_found() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let (status, _) = app
        .delete(&format!("/api/news/{}", Uuid::new_v4()), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .delete(&format!("/api/guitarists/{}", Uuid::new_v4()), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn content_validation_is_enforced() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/news",
            Some(&admin),
            json!({ "title": "ok", "content": "long enough content" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "title must be at least 3 characters");

    let (status, body) = app
        .post(
            "/api/news",
            Some(&admin),
            json!({ "title": "valid title", "content": "too short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "content must be at least 10 characters");

    let (status, body) = app
        .post("/api/news", Some(&admin), json!({ "title": "only a title" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "all fields are required");
}

#[tokio::test]
async fn history_lifecycle() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/history",
            Some(&admin),
            json!({ "title": "Founding year", "content": "The club was founded in 1982." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "history entry created");
    let id = body["historyId"].as_str().unwrap().to_string();

    let (_, body) = app.get("/api/history").await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&format!("/api/history/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/history").await;
    assert!(body["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn guitarist_lifecycle() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/guitarists",
            Some(&admin),
            json!({ "name": "Paco", "bio": "Flamenco virtuoso from Algeciras." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "guitarist added");
    let id = body["guitaristId"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(
            &format!("/api/guitarists/{id}"),
            Some(&admin),
            json!({ "name": "Paco de Lucia", "bio": "Flamenco virtuoso from Algeciras." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/guitarists").await;
    let items = body["guitarists"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Paco de Lucia");

    let (status, _) = app
        .delete(&format!("/api/guitarists/{id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_ids_do_not_reach_handlers() {
    let app = spawn_app();
    let admin = app.admin_token().await;

    let (status, _) = app.delete("/api/news/not-a-uuid", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
