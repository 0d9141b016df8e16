#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use bloglist::{Blog, BlogStore, FjallStore, NewBlog};
use serde_json::Value;
use tower::ServiceExt;

pub fn initial_blogs() -> Vec<NewBlog> {
    vec![
        NewBlog {
            title: "First blog".into(),
            author: "test author 1".into(),
            url: "testurlll".into(),
            likes: 5,
        },
        NewBlog {
            title: "Second blog".into(),
            author: "test author 2".into(),
            url: "url".into(),
            likes: 2,
        },
    ]
}

/// A router over its own throwaway store, seeded with [`initial_blogs`].
///
/// Call [`TestApp::teardown`] at the end of every test to close the store.
pub struct TestApp {
    pub store: Arc<FjallStore>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(FjallStore::temporary().expect("failed to open test store"));
        let router = bloglist::api::router(Arc::clone(&store));

        let app = Self { store, router };
        app.seed().await;
        app
    }

    async fn seed(&self) {
        self.store.delete_all().await.unwrap();
        for blog in initial_blogs() {
            self.store.insert(blog).await.unwrap();
        }
    }

    pub async fn teardown(self) {
        self.store.close().await.expect("failed to close test store");
    }

    pub async fn blogs_in_db(&self) -> Vec<Blog> {
        self.store.find_all().await.unwrap()
    }

    pub async fn blog_titled(&self, title: &str) -> Blog {
        self.blogs_in_db()
            .await
            .into_iter()
            .find(|blog| blog.title == title)
            .unwrap_or_else(|| panic!("no blog titled {title:?}"))
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}
