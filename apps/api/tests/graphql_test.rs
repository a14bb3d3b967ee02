//! Schema-level tests for the catalog GraphQL API
//!
//! Runs documents directly against the schema over an in-memory store,
//! with the request's auth context attached the same way the HTTP handler does.

mod common;

use futures_util::future::join_all;
use rstest::rstest;
use serde_json::json;

use catalog_api::models::NewAuthor;
use catalog_api::repositories::{AuthorStore, UserStore};

use common::*;

const COUNTS: &str = "{ authorCount bookCount }";

async fn catalog_with_books() -> (TestApp, catalog_api::models::User) {
    let app = TestApp::new();
    let (user, _) = app.register("librarian").await;
    seed_books(
        &app,
        &user,
        &[
            ("Clean Code", "Robert Martin", &["refactoring"]),
            ("Agile software development", "Robert Martin", &["agile", "patterns", "design"]),
            ("Refactoring, edition 2", "Martin Fowler", &["refactoring"]),
            ("Crime and punishment", "Fyodor Dostoevsky", &["classic", "crime"]),
            ("The Demon", "Fyodor Dostoevsky", &["classic", "revolution"]),
        ],
    )
    .await;
    (app, user)
}

// ========== Queries ==========

#[tokio::test]
async fn test_counts_on_empty_catalog() {
    let app = TestApp::new();
    let response = app.execute_anonymous(COUNTS, json!({})).await;

    assert_eq!(response["data"]["authorCount"], 0);
    assert_eq!(response["data"]["bookCount"], 0);
}

#[tokio::test]
async fn test_counts_after_seeding() {
    let (app, _) = catalog_with_books().await;
    let response = app.execute_anonymous(COUNTS, json!({})).await;

    assert_eq!(response["data"]["authorCount"], 3);
    assert_eq!(response["data"]["bookCount"], 5);
}

#[rstest]
#[case::no_filter(json!({}), &["Clean Code", "Agile software development", "Refactoring, edition 2", "Crime and punishment", "The Demon"])]
#[case::by_author(json!({ "author": "Robert Martin" }), &["Clean Code", "Agile software development"])]
#[case::by_genre(json!({ "genre": "refactoring" }), &["Clean Code", "Refactoring, edition 2"])]
#[case::both_filters_intersect(json!({ "author": "Fyodor Dostoevsky", "genre": "crime" }), &["Crime and punishment"])]
#[case::unknown_author(json!({ "author": "Nobody" }), &[])]
#[case::genre_not_by_author(json!({ "author": "Martin Fowler", "genre": "classic" }), &[])]
#[tokio::test]
async fn test_all_books_filters(#[case] variables: serde_json::Value, #[case] expected: &[&str]) {
    let (app, _) = catalog_with_books().await;
    let response = app.execute_anonymous(ALL_BOOKS, variables).await;

    assert!(response.get("errors").is_none(), "{}", response);
    assert_eq!(titles(&response), expected);
}

#[tokio::test]
async fn test_all_books_resolves_author() {
    let (app, _) = catalog_with_books().await;
    let response = app
        .execute_anonymous(ALL_BOOKS, json!({ "genre": "revolution" }))
        .await;

    let books = response["data"]["allBooks"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["author"]["name"], "Fyodor Dostoevsky");
    assert_eq!(books[0]["genres"], json!(["classic", "revolution"]));
}

#[tokio::test]
async fn test_all_authors_book_count() {
    let (app, _) = catalog_with_books().await;
    app.store
        .authors
        .insert_if_absent(NewAuthor::named("Joshua Kerievsky"))
        .await
        .unwrap();

    let response = app
        .execute_anonymous("{ allAuthors { name born bookCount } }", json!({}))
        .await;

    let authors = response["data"]["allAuthors"].as_array().unwrap();
    let count_of = |name: &str| {
        authors
            .iter()
            .find(|a| a["name"] == name)
            .map(|a| a["bookCount"].clone())
    };
    assert_eq!(authors.len(), 4);
    assert_eq!(count_of("Robert Martin"), Some(json!(2)));
    assert_eq!(count_of("Martin Fowler"), Some(json!(1)));
    assert_eq!(count_of("Fyodor Dostoevsky"), Some(json!(2)));
    assert_eq!(count_of("Joshua Kerievsky"), Some(json!(0)));
    assert!(authors.iter().all(|a| a["born"].is_null()));
}

// ========== addBook ==========

#[tokio::test]
async fn test_add_book_creates_author_once() {
    let app = TestApp::new();
    let (user, _) = app.register("librarian").await;

    let first = app
        .execute_as(
            &user,
            ADD_BOOK,
            json!({ "title": "NoSQL Distilled", "published": 2012, "author": "Martin Fowler", "genres": ["database", "nosql"] }),
        )
        .await;
    let second = app
        .execute_as(
            &user,
            ADD_BOOK,
            json!({ "title": "Refactoring", "published": 1999, "author": "Martin Fowler" }),
        )
        .await;

    assert_eq!(first["data"]["addBook"]["title"], "NoSQL Distilled");
    assert_eq!(first["data"]["addBook"]["published"], 2012);
    assert_eq!(second["data"]["addBook"]["genres"], json!([]));
    assert_eq!(
        first["data"]["addBook"]["author"]["id"],
        second["data"]["addBook"]["author"]["id"]
    );

    let counts = app.execute_anonymous(COUNTS, json!({})).await;
    assert_eq!(counts["data"]["authorCount"], 1);
    assert_eq!(counts["data"]["bookCount"], 2);
}

#[tokio::test]
async fn test_add_book_requires_authentication() {
    let app = TestApp::new();
    let response = app
        .execute_anonymous(
            ADD_BOOK,
            json!({ "title": "Pimeyden tango", "published": 2010, "author": "Reijo Mäki" }),
        )
        .await;

    assert_eq!(first_error_code(&response), Some("UNAUTHENTICATED"));
    assert!(response["data"]["addBook"].is_null());

    let counts = app.execute_anonymous(COUNTS, json!({})).await;
    assert_eq!(counts["data"]["authorCount"], 0);
    assert_eq!(counts["data"]["bookCount"], 0);
}

#[tokio::test]
async fn test_add_book_duplicate_title() {
    let (app, user) = catalog_with_books().await;
    let response = app
        .execute_as(
            &user,
            ADD_BOOK,
            json!({ "title": "Clean Code", "published": 2020, "author": "Someone Else" }),
        )
        .await;

    assert_eq!(first_error_code(&response), Some("DUPLICATE_TITLE"));
    assert_eq!(
        response["errors"][0]["extensions"]["invalidArgs"]["title"],
        "Clean Code"
    );
    assert_eq!(response["errors"][0]["extensions"]["retryable"], false);

    // Neither the book nor its would-be author was stored
    let counts = app.execute_anonymous(COUNTS, json!({})).await;
    assert_eq!(counts["data"]["authorCount"], 3);
    assert_eq!(counts["data"]["bookCount"], 5);
}

#[tokio::test]
async fn test_add_book_empty_title_is_bad_input() {
    let app = TestApp::new();
    let (user, _) = app.register("librarian").await;
    let response = app
        .execute_as(
            &user,
            ADD_BOOK,
            json!({ "title": "", "published": 2020, "author": "Anyone" }),
        )
        .await;

    assert_eq!(first_error_code(&response), Some("BAD_USER_INPUT"));
    let counts = app.execute_anonymous(COUNTS, json!({})).await;
    assert_eq!(counts["data"]["bookCount"], 0);
    assert_eq!(counts["data"]["authorCount"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_book_shares_one_author() {
    let app = TestApp::new();
    let (user, _) = app.register("librarian").await;

    let tasks = (0..12).map(|i| {
        let app = app.clone();
        let user = user.clone();
        tokio::spawn(async move {
            app.execute_as(
                &user,
                ADD_BOOK,
                json!({ "title": format!("Volume {}", i), "published": 2001, "author": "Tove Jansson" }),
            )
            .await
        })
    });

    for response in join_all(tasks).await {
        let response = response.unwrap();
        assert!(response.get("errors").is_none(), "{}", response);
    }

    let response = app
        .execute_anonymous("{ authorCount allAuthors { name bookCount } }", json!({}))
        .await;
    assert_eq!(response["data"]["authorCount"], 1);
    assert_eq!(response["data"]["allAuthors"][0]["bookCount"], 12);
}

// ========== editAuthor ==========

const EDIT_AUTHOR: &str = r#"
    mutation EditAuthor($name: String!, $born: Int) {
        editAuthor(name: $name, setBornTo: $born) { name born bookCount }
    }
"#;

#[tokio::test]
async fn test_edit_author_sets_born() {
    let (app, user) = catalog_with_books().await;
    let response = app
        .execute_as(&user, EDIT_AUTHOR, json!({ "name": "Robert Martin", "born": 1952 }))
        .await;

    assert_eq!(response["data"]["editAuthor"]["born"], 1952);
    assert_eq!(response["data"]["editAuthor"]["bookCount"], 2);

    let authors = app
        .execute_anonymous("{ allAuthors { name born } }", json!({}))
        .await;
    let martin = authors["data"]["allAuthors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Robert Martin")
        .cloned()
        .unwrap();
    assert_eq!(martin["born"], 1952);
}

#[tokio::test]
async fn test_edit_author_unknown_returns_null() {
    let (app, user) = catalog_with_books().await;
    let response = app
        .execute_as(&user, EDIT_AUTHOR, json!({ "name": "Nobody", "born": 1900 }))
        .await;

    assert!(response.get("errors").is_none(), "{}", response);
    assert!(response["data"]["editAuthor"].is_null());
}

#[tokio::test]
async fn test_edit_author_requires_authentication() {
    let (app, _) = catalog_with_books().await;
    let response = app
        .execute_anonymous(EDIT_AUTHOR, json!({ "name": "Robert Martin", "born": 1952 }))
        .await;

    assert_eq!(first_error_code(&response), Some("UNAUTHENTICATED"));

    let authors = app
        .execute_anonymous("{ allAuthors { born } }", json!({}))
        .await;
    assert!(authors["data"]["allAuthors"]
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["born"].is_null()));
}

// ========== Users ==========

const CREATE_USER: &str = r#"
    mutation CreateUser($username: String!, $genre: String!, $password: String) {
        createUser(username: $username, favoriteGenre: $genre, password: $password) {
            id username favoriteGenre
        }
    }
"#;

const LOGIN: &str = r#"
    mutation Login($username: String!, $password: String!) {
        login(username: $username, password: $password) { value }
    }
"#;

#[tokio::test]
async fn test_create_user_rejects_short_username() {
    let app = TestApp::new();
    let response = app
        .execute_anonymous(CREATE_USER, json!({ "username": "bo", "genre": "crime" }))
        .await;

    assert_eq!(first_error_code(&response), Some("BAD_USER_INPUT"));
    assert_eq!(
        response["errors"][0]["extensions"]["invalidArgs"]["username"],
        "bo"
    );
    assert!(response["data"]["createUser"].is_null());
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_username() {
    let app = TestApp::new();
    let first = app
        .execute_anonymous(
            CREATE_USER,
            json!({ "username": "bob", "genre": "crime", "password": "first-password" }),
        )
        .await;
    assert_eq!(first["data"]["createUser"]["favoriteGenre"], "crime");

    let second = app
        .execute_anonymous(
            CREATE_USER,
            json!({ "username": "bob", "genre": "poetry", "password": "second-password" }),
        )
        .await;
    assert_eq!(first_error_code(&second), Some("BAD_USER_INPUT"));

    // The original account is untouched
    let login = app
        .execute_anonymous(LOGIN, json!({ "username": "bob", "password": "first-password" }))
        .await;
    assert!(login["data"]["login"]["value"].is_string());
}

#[tokio::test]
async fn test_create_user_without_password_uses_initial_password() {
    let app = TestApp::new();
    app.execute_anonymous(CREATE_USER, json!({ "username": "carol", "genre": "design" }))
        .await;

    let initial = app.auth.config().initial_password.clone();
    let login = app
        .execute_anonymous(LOGIN, json!({ "username": "carol", "password": initial }))
        .await;
    assert!(login["data"]["login"]["value"].is_string(), "{}", login);
}

#[tokio::test]
async fn test_login_then_me() {
    let app = TestApp::new();
    app.execute_anonymous(
        CREATE_USER,
        json!({ "username": "dave", "genre": "patterns", "password": "hunter22" }),
    )
    .await;

    let login = app
        .execute_anonymous(LOGIN, json!({ "username": "dave", "password": "hunter22" }))
        .await;
    let token = login["data"]["login"]["value"].as_str().unwrap();

    let identity = app.auth.verify(token).unwrap();
    assert_eq!(identity.username, "dave");

    let user = app
        .store
        .users
        .find_by_id(identity.id)
        .await
        .unwrap()
        .unwrap();
    let me = app
        .execute_as(&user, "{ me { username favoriteGenre } }", json!({}))
        .await;
    assert_eq!(me["data"]["me"]["username"], "dave");
    assert_eq!(me["data"]["me"]["favoriteGenre"], "patterns");
}

#[rstest]
#[case::wrong_password("dave", "wrong")]
#[case::unknown_user("nobody", "hunter22")]
#[tokio::test]
async fn test_login_failures(#[case] username: &str, #[case] password: &str) {
    let app = TestApp::new();
    app.execute_anonymous(
        CREATE_USER,
        json!({ "username": "dave", "genre": "patterns", "password": "hunter22" }),
    )
    .await;

    let response = app
        .execute_anonymous(LOGIN, json!({ "username": username, "password": password }))
        .await;
    assert_eq!(first_error_code(&response), Some("INVALID_CREDENTIALS"));
    assert!(response["data"]["login"].is_null());
}

#[tokio::test]
async fn test_me_is_null_when_anonymous() {
    let app = TestApp::new();
    let response = app.execute_anonymous("{ me { username } }", json!({})).await;

    assert!(response.get("errors").is_none(), "{}", response);
    assert!(response["data"]["me"].is_null());
}
