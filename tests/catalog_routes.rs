use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use marquee::{
    AppState,
    annotation::{AnnotationService, average_sentiment},
    antiforgery::COOKIE_NAME,
    catalog::{Catalog, LinkWriteError},
    db,
    entities::{actor, actor_movie, movie},
    llm::{ChatClient, LlmError},
    models::{ActorFields, MovieFields},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::ServiceExt;

const TOKEN: &str = "test-token";
const BOUNDARY: &str = "marquee-test-boundary";

/// Replies with a fixed completion, or fails when none is configured.
struct CannedClient {
    reply: Option<String>,
    subjects: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatClient for CannedClient {
    async fn complete(
        &self,
        _system: &str,
        user: &str,
        _temperature: f32,
    ) -> Result<String, LlmError> {
        self.subjects.lock().unwrap().push(user.to_string());
        self.reply.clone().ok_or(LlmError::Empty)
    }
}

struct TestApp {
    router: Router,
    catalog: Catalog,
    chat: Arc<CannedClient>,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_reply(None).await
    }

    async fn with_reply(reply: Option<&str>) -> Self {
        Self::build(reply, 1024 * 1024).await
    }

    async fn build(reply: Option<&str>, max_upload_bytes: usize) -> Self {
        let db = db::connect_and_migrate("sqlite::memory:", 1).await.unwrap();
        let catalog = Catalog::new(db);
        let chat =
            Arc::new(CannedClient { reply: reply.map(str::to_string), subjects: Mutex::default() });
        let state = Arc::new(AppState {
            catalog: catalog.clone(),
            annotations: AnnotationService::new(chat.clone()),
        });
        Self { router: marquee::router(state, max_upload_bytes), catalog, chat }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn actor(&self, name: &str) -> actor::Model {
        let fields = ActorFields {
            name: name.to_string(),
            gender: "Female".to_string(),
            age: 40,
            imdb_url: String::new(),
        };
        self.catalog.create_actor(fields, Some(b"old-photo".to_vec())).await.unwrap()
    }

    async fn movie(&self, title: &str) -> movie::Model {
        let fields = MovieFields {
            title: title.to_string(),
            imdb_url: String::new(),
            genre: "Drama".to_string(),
            release_year: 1996,
        };
        self.catalog.create_movie(fields, None).await.unwrap()
    }

    async fn link_count(&self) -> u64 {
        actor_movie::Entity::find().count(self.catalog.db()).await.unwrap()
    }
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, format!("{COOKIE_NAME}={TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_post(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::COOKIE, format!("{COOKIE_NAME}={TOKEN}"))
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn creating_a_link_redirects_and_shows_both_sides() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;
    let movie = app.movie("Fargo").await;

    let response = app
        .send(form_post(
            "/actormovies/create",
            &format!("_csrf={TOKEN}&actor_id={}&movie_id={}", actor.id, movie.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/actormovies");

    let links = app.catalog.links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].actor.id, actor.id);
    assert_eq!(links[0].movie.id, movie.id);

    let page = body_text(app.get(&format!("/actormovies/details/{}", links[0].link.id)).await).await;
    assert!(page.contains("Frances McDormand"));
    assert!(page.contains("Fargo"));

    let actor_page = app.catalog.actor_with_movies(actor.id).await.unwrap().unwrap();
    assert_eq!(actor_page.movies.len(), 1);
}

#[tokio::test]
async fn duplicate_link_is_rejected_without_a_write() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;
    let movie = app.movie("Fargo").await;
    app.catalog.create_link(actor.id, movie.id).await.unwrap();

    let response = app
        .send(form_post(
            "/actormovies/create",
            &format!("_csrf={TOKEN}&actor_id={}&movie_id={}", actor.id, movie.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_text(response).await;
    assert!(page.contains("This relationship already exists."));
    assert!(page.contains("Frances McDormand"));
    assert_eq!(app.link_count().await, 1);
}

#[tokio::test]
async fn store_refuses_duplicate_pairs() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;
    let movie = app.movie("Fargo").await;
    app.catalog.create_link(actor.id, movie.id).await.unwrap();

    let err = app.catalog.create_link(actor.id, movie.id).await.unwrap_err();
    assert!(matches!(err, LinkWriteError::Duplicate));

    let err = app.catalog.create_link(actor.id, movie.id + 100).await.unwrap_err();
    assert!(matches!(err, LinkWriteError::MissingReferent));
}

#[tokio::test]
async fn link_to_missing_referent_is_rejected() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;

    let response = app
        .send(form_post("/actormovies/create", &format!("_csrf={TOKEN}&actor_id={}&movie_id=99", actor.id)))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Please select a movie."));

    let response =
        app.send(form_post("/actormovies/create", &format!("_csrf={TOKEN}&actor_id=0&movie_id=0"))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.link_count().await, 0);
}

#[tokio::test]
async fn editing_a_link_checks_other_rows_only() {
    let app = TestApp::new().await;
    let frances = app.actor("Frances McDormand").await;
    let william = app.actor("William H. Macy").await;
    let fargo = app.movie("Fargo").await;
    let first = app.catalog.create_link(frances.id, fargo.id).await.unwrap();
    let second = app.catalog.create_link(william.id, fargo.id).await.unwrap();

    // Saving a link unchanged is not a duplicate of itself.
    let response = app
        .send(form_post(
            &format!("/actormovies/edit/{}", first.id),
            &format!("_csrf={TOKEN}&id={}&actor_id={}&movie_id={}", first.id, frances.id, fargo.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .send(form_post(
            &format!("/actormovies/edit/{}", second.id),
            &format!("_csrf={TOKEN}&id={}&actor_id={}&movie_id={}", second.id, frances.id, fargo.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("This relationship already exists."));

    let unchanged = app.catalog.find_link(second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.actor_id, william.id);
}

#[tokio::test]
async fn deleting_an_actor_or_movie_removes_its_links() {
    let app = TestApp::new().await;
    let frances = app.actor("Frances McDormand").await;
    let william = app.actor("William H. Macy").await;
    let fargo = app.movie("Fargo").await;
    let boogie = app.movie("Boogie Nights").await;
    app.catalog.create_link(frances.id, fargo.id).await.unwrap();
    app.catalog.create_link(william.id, fargo.id).await.unwrap();
    app.catalog.create_link(william.id, boogie.id).await.unwrap();

    let response =
        app.send(form_post(&format!("/actors/delete/{}", william.id), &format!("_csrf={TOKEN}"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.catalog.find_actor(william.id).await.unwrap().is_none());
    assert_eq!(app.link_count().await, 1);

    let response =
        app.send(form_post(&format!("/movies/delete/{}", fargo.id), &format!("_csrf={TOKEN}"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.link_count().await, 0);

    let boogie_page = app.catalog.movie_with_actors(boogie.id).await.unwrap().unwrap();
    assert!(boogie_page.actors.is_empty());
}

#[tokio::test]
async fn editing_an_actor_keeps_the_photo_unless_replaced() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;
    let uri = format!("/actors/edit/{}", actor.id);
    let id = actor.id.to_string();

    let fields = [
        ("_csrf", TOKEN),
        ("id", id.as_str()),
        ("name", "Frances L. McDormand"),
        ("gender", "Female"),
        ("age", "67"),
        ("imdb_url", "https://www.imdb.com/name/nm0000531/"),
    ];

    let response = app.send(multipart_post(&uri, &fields, Some(("photo", &b""[..])))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = app.catalog.find_actor(actor.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Frances L. McDormand");
    assert_eq!(stored.age, 67);
    assert_eq!(stored.photo.as_deref(), Some(&b"old-photo"[..]));

    let response = app.send(multipart_post(&uri, &fields, Some(("photo", &b"new-photo"[..])))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let photo = app.get(&format!("/actors/photo/{}", actor.id)).await;
    assert_eq!(photo.status(), StatusCode::OK);
    assert_eq!(body_text(photo).await, "new-photo");
}

#[tokio::test]
async fn creating_a_movie_with_a_poster() {
    let app = TestApp::new().await;

    let fields = [
        ("_csrf", TOKEN),
        ("title", "Fargo"),
        ("imdb_url", ""),
        ("genre", "Crime"),
        ("release_year", "1996"),
    ];
    let response = app.send(multipart_post("/movies/create", &fields, Some(("poster", &b"poster"[..])))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies");

    let movies = app.catalog.movies_with_actors().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].movie.genre, "Crime");
    assert_eq!(movies[0].movie.poster.as_deref(), Some(&b"poster"[..]));
}

#[tokio::test]
async fn invalid_actor_form_is_echoed_back() {
    let app = TestApp::new().await;

    let fields = [
        ("_csrf", TOKEN),
        ("name", ""),
        ("gender", "Female"),
        ("age", "forty"),
        ("imdb_url", "not a url"),
    ];
    let response = app.send(multipart_post("/actors/create", &fields, None)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let page = body_text(response).await;
    assert!(page.contains("Name is required."));
    assert!(page.contains("Age must be a whole number."));
    assert!(page.contains("IMDb link must be a valid http(s) URL."));
    assert!(page.contains("forty"));
    assert!(app.catalog.actors_with_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_rows_are_not_found_and_nothing_changes() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;

    for uri in [
        "/actors/details/999",
        "/actors/edit/999",
        "/actors/delete/999",
        "/actors/photo/999",
        "/actors/details/abc",
        "/movies/details/999",
        "/movies/edit/999",
        "/movies/poster/999",
        "/actormovies/details/999",
        "/actormovies/edit/999",
        "/actormovies/delete/999",
        "/no/such/page",
    ] {
        assert_eq!(app.get(uri).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let response = app.send(form_post("/actors/delete/999", &format!("_csrf={TOKEN}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.send(form_post("/actormovies/delete/999", &format!("_csrf={TOKEN}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let fields = [("_csrf", TOKEN), ("id", "999"), ("name", "Nobody"), ("age", "1")];
    let response = app.send(multipart_post("/actors/edit/999", &fields, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(app.catalog.find_actor(actor.id).await.unwrap().is_some());
    assert_eq!(app.catalog.actors_with_movies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn posts_without_a_matching_token_are_refused() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;
    let movie = app.movie("Fargo").await;

    let response = app
        .send(form_post(
            "/actormovies/create",
            &format!("actor_id={}&movie_id={}", actor.id, movie.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(form_post(
            "/actormovies/create",
            &format!("_csrf=other&actor_id={}&movie_id={}", actor.id, movie.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.link_count().await, 0);

    let response = app.send(form_post(&format!("/actors/delete/{}", actor.id), "")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.catalog.find_actor(actor.id).await.unwrap().is_some());
}

#[tokio::test]
async fn form_pages_issue_a_token_cookie() {
    let app = TestApp::new().await;

    let response = app.get("/actors/create").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with(&format!("{COOKIE_NAME}=")));

    let token = cookie.split(';').next().unwrap().trim_start_matches(&format!("{COOKIE_NAME}="));
    assert!(body_text(response).await.contains(token));
}

#[tokio::test]
async fn actor_details_show_generated_tweets() {
    let app = TestApp::with_reply(Some(
        "What a wonderful performance! #love || Terrible casting, awful. || Saw her today",
    ))
    .await;
    let actor = app.actor("Frances McDormand").await;

    let response = app.get(&format!("/actors/details/{}", actor.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("What a wonderful performance! #love"));
    assert!(page.contains("Terrible casting, awful."));
    assert!(page.contains("Saw her today"));
    assert!(!page.contains("No tweets could be generated right now."));

    assert_eq!(app.chat.subjects.lock().unwrap().as_slice(), ["Frances McDormand"]);
}

#[tokio::test]
async fn details_render_without_generated_items_when_generation_fails() {
    let app = TestApp::new().await;
    let actor = app.actor("Frances McDormand").await;
    let movie = app.movie("Fargo").await;

    let page = body_text(app.get(&format!("/actors/details/{}", actor.id)).await).await;
    assert!(page.contains("Frances McDormand"));
    assert!(page.contains("No tweets could be generated right now."));

    let response = app.get(&format!("/movies/details/{}", movie.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No reviews could be generated right now."));
}

#[tokio::test]
async fn store_refuses_moving_a_link_onto_a_taken_pair() {
    let app = TestApp::new().await;
    let frances = app.actor("Frances McDormand").await;
    let william = app.actor("William H. Macy").await;
    let fargo = app.movie("Fargo").await;
    app.catalog.create_link(frances.id, fargo.id).await.unwrap();
    let second = app.catalog.create_link(william.id, fargo.id).await.unwrap();

    let err = app.catalog.update_link(second.id, frances.id, fargo.id).await.unwrap_err();
    assert!(matches!(err, LinkWriteError::Duplicate));

    let unchanged = app.catalog.find_link(second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.actor_id, william.id);
}

#[tokio::test]
async fn editing_a_movie_keeps_the_poster_unless_replaced() {
    let app = TestApp::new().await;
    let fields = MovieFields {
        title: "Fargo".to_string(),
        imdb_url: String::new(),
        genre: "Drama".to_string(),
        release_year: 1996,
    };
    let movie = app.catalog.create_movie(fields, Some(b"orig".to_vec())).await.unwrap();
    let uri = format!("/movies/edit/{}", movie.id);
    let id = movie.id.to_string();

    let fields = [
        ("_csrf", TOKEN),
        ("id", id.as_str()),
        ("title", "Fargo"),
        ("imdb_url", "https://www.imdb.com/title/tt0116282/"),
        ("genre", "Crime"),
        ("release_year", "1996"),
    ];

    let response = app.send(multipart_post(&uri, &fields, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = app.catalog.find_movie(movie.id).await.unwrap().unwrap();
    assert_eq!(stored.genre, "Crime");
    assert_eq!(stored.poster.as_deref(), Some(&b"orig"[..]));

    let response = app.send(multipart_post(&uri, &fields, Some(("poster", &b"fresh"[..])))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let poster = app.get(&format!("/movies/poster/{}", movie.id)).await;
    assert_eq!(poster.status(), StatusCode::OK);
    assert_eq!(body_text(poster).await, "fresh");
}

#[tokio::test]
async fn deleting_a_missing_movie_is_not_found() {
    let app = TestApp::new().await;
    let movie = app.movie("Fargo").await;

    let response = app.send(form_post("/movies/delete/999", &format!("_csrf={TOKEN}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.catalog.find_movie(movie.id).await.unwrap().is_some());
}

#[tokio::test]
async fn detail_page_shows_the_mean_score() {
    let reply = "What a wonderful performance! || Terrible casting, awful. || A stunning triumph";
    let app = TestApp::with_reply(Some(reply)).await;
    let movie = app.movie("Fargo").await;

    let scored = AnnotationService::new(app.chat.clone()).score_segments(reply);
    let mean = average_sentiment(&scored);
    assert!(mean != 0.0);

    let page = body_text(app.get(&format!("/movies/details/{}", movie.id)).await).await;
    assert!(page.contains("A stunning triumph"));
    assert!(page.contains(&format!("{mean:.3}")));
}

#[tokio::test]
async fn oversized_upload_is_refused_as_too_large() {
    let app = TestApp::build(None, 64).await;

    let fields = [("_csrf", TOKEN), ("name", "Frances McDormand"), ("age", "40")];
    let photo = vec![7u8; 4096];
    let response = app.send(multipart_post("/actors/create", &fields, Some(("photo", &photo[..])))).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.catalog.actors_with_movies().await.unwrap().is_empty());
}
