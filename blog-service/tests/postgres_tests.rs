//! Document store tests against a real PostgreSQL server.
//!
//! Each test creates its own database from `DATABASE_URL` and returns early
//! when the variable is unset.

mod common;

use blog_service::article::models::Article;
use blog_service::article::models::ArticleId;
use blog_service::article::ports::ArticleRepository;
use blog_service::author::errors::AuthorError;
use blog_service::author::models::Author;
use blog_service::author::models::AuthorChanges;
use blog_service::author::models::AuthorId;
use blog_service::author::models::Username;
use blog_service::author::ports::AuthorRepository;
use blog_service::outbound::repositories::PostgresDocumentStore;
use common::TestApp;
use common::TestDb;
use reqwest::StatusCode;
use serde_json::json;

fn author(username: &str) -> Author {
    Author {
        id: AuthorId::new(),
        first_name: "Nicola".to_string(),
        last_name: "Tesla".to_string(),
        username: Username::new(username.to_string()).unwrap(),
        password_hash: "$argon2id$hash".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_find_author() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());
    let nicola = author("nicola");

    AuthorRepository::create(&store, nicola.clone()).await.unwrap();

    assert_eq!(
        AuthorRepository::find_by_id(&store, &nicola.id).await.unwrap(),
        Some(nicola.clone())
    );
    assert_eq!(store.find_by_username("nicola").await.unwrap(), vec![nicola]);
    assert!(store.find_by_username("thomas").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());

    AuthorRepository::create(&store, author("nicola")).await.unwrap();
    let result = AuthorRepository::create(&store, author("nicola")).await;

    assert!(matches!(
        result,
        Err(AuthorError::UsernameAlreadyExists(username)) if username == "nicola"
    ));
    assert_eq!(AuthorRepository::list_all(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_merges_only_provided_fields() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());
    let nicola = author("nicola");
    AuthorRepository::create(&store, nicola.clone()).await.unwrap();

    let changes = AuthorChanges {
        last_name: Some("Edison".to_string()),
        ..AuthorChanges::default()
    };
    let updated = store.update(&nicola.id, changes).await.unwrap();

    assert_eq!(updated.first_name, "Nicola");
    assert_eq!(updated.last_name, "Edison");
    assert_eq!(updated.username, nicola.username);
    assert_eq!(updated.password_hash, nicola.password_hash);
    assert_eq!(
        AuthorRepository::find_by_id(&store, &nicola.id).await.unwrap(),
        Some(updated)
    );
}

#[tokio::test]
async fn test_update_to_taken_username_is_a_conflict() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());
    let nicola = author("nicola");
    AuthorRepository::create(&store, nicola.clone()).await.unwrap();
    AuthorRepository::create(&store, author("thomas")).await.unwrap();

    let changes = AuthorChanges {
        username: Some(Username::new("thomas".to_string()).unwrap()),
        ..AuthorChanges::default()
    };

    assert!(matches!(
        store.update(&nicola.id, changes).await,
        Err(AuthorError::UsernameAlreadyExists(username)) if username == "thomas"
    ));
}

#[tokio::test]
async fn test_update_and_delete_missing_author() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());
    let missing = AuthorId::new();

    assert!(matches!(
        store.update(&missing, AuthorChanges::default()).await,
        Err(AuthorError::NotFound(_))
    ));
    assert!(matches!(
        store.delete(&missing).await,
        Err(AuthorError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_author() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());
    let nicola = author("nicola");
    AuthorRepository::create(&store, nicola.clone()).await.unwrap();

    store.delete(&nicola.id).await.unwrap();

    assert_eq!(AuthorRepository::find_by_id(&store, &nicola.id).await.unwrap(), None);
    assert!(matches!(
        store.delete(&nicola.id).await,
        Err(AuthorError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_articles_are_separate_from_authors() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let store = PostgresDocumentStore::new(db.pool.clone());
    let nicola = author("nicola");
    AuthorRepository::create(&store, nicola.clone()).await.unwrap();

    let article = Article {
        id: ArticleId::new(),
        author_id: nicola.id,
        title: "Notes".to_string(),
        content: "On alternating current".to_string(),
    };
    ArticleRepository::create(&store, article.clone()).await.unwrap();

    assert_eq!(ArticleRepository::list_all(&store).await.unwrap(), vec![article.clone()]);
    assert_eq!(AuthorRepository::list_all(&store).await.unwrap(), vec![nicola.clone()]);
    assert_eq!(
        ArticleRepository::find_by_id(&store, &article.id).await.unwrap(),
        Some(article.clone())
    );

    // An article id never resolves as an author.
    let article_as_author = AuthorId::from_string(&article.id.to_string()).unwrap();
    assert_eq!(
        AuthorRepository::find_by_id(&store, &article_as_author).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_api_over_postgres() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };

    assert_eq!(app.register("nicola").await.status(), StatusCode::CREATED);
    assert_eq!(app.register("nicola").await.status(), StatusCode::CONFLICT);

    let author = app.create_author("thomas").await;
    let stored = app.raw_document(&author.id).await.expect("Document not stored");
    assert!(stored["password"].as_str().unwrap().starts_with("$argon2id$"));
    assert_eq!(stored["type"], "author");

    let body = app
        .graphql(
            Some(&author.token),
            "mutation($author: AuthorInput!) { updateAuthor(author: $author) { id firstname lastname } }",
            json!({"author": {"id": author.id, "lastname": "Edison"}}),
        )
        .await;
    assert_eq!(body["data"]["updateAuthor"]["firstname"], "Nicola");
    assert_eq!(body["data"]["updateAuthor"]["lastname"], "Edison");

    let deleted = app
        .graphql(
            Some(&author.token),
            "mutation($id: ID!) { deleteAuthor(id: $id) }",
            json!({"id": author.id}),
        )
        .await;
    assert_eq!(deleted["data"]["deleteAuthor"], author.id.as_str());
    assert!(app.raw_document(&author.id).await.is_none());
}
