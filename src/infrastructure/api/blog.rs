use std::{path::Path, time::Duration};

use reqwest::{multipart, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use super::{ensure_success, read_json, ApiError, HttpApi, Result};
use crate::domain::{
    post::{FeedFilter, NewPost, Post, PostId},
    session::{AccessToken, Credentials, Registration},
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client of the blog REST API: posts, authentication and image uploads
#[derive(Debug, Clone)]
pub struct BlogClient {
    api: HttpApi,
}

impl BlogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api: HttpApi::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// `GET /blogs?limit&offset[&visibility][&tags]`
    pub async fn list_posts(
        &self,
        offset: usize,
        limit: usize,
        filter: &FeedFilter,
    ) -> Result<Vec<Post>> {
        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        query.extend(filter.query_pairs());
        log::debug!("Listing posts: {query:?}");

        let response = self
            .api
            .http
            .get(self.api.url("blogs")?)
            .query(&query)
            .send()
            .await?;
        read_json(response).await
    }

    /// `GET /blogs/{id}`; a 404 reads "Blog not found"
    pub async fn get_post(&self, id: PostId) -> Result<Post> {
        let response = self
            .api
            .http
            .get(self.api.url(&format!("blogs/{id}"))?)
            .send()
            .await?;
        match read_json(response).await {
            Err(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Err(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                detail: "Blog not found".into(),
            }),
            other => other,
        }
    }

    pub async fn create_post(&self, post: &NewPost, token: &AccessToken) -> Result<Post> {
        let response = self
            .api
            .http
            .post(self.api.url("blogs")?)
            .bearer_auth(token.expose())
            .json(post)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete_post(&self, id: PostId, token: &AccessToken) -> Result<()> {
        let response = self
            .api
            .http
            .delete(self.api.url(&format!("blogs/{id}"))?)
            .bearer_auth(token.expose())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AccessToken> {
        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });
        let response = self
            .api
            .http
            .post(self.api.url("auth/login")?)
            .json(&body)
            .send()
            .await?;
        // Bad credentials are a plain error here, not a prompt to log in
        let token: TokenResponse = read_json(response).await.map_err(|e| match e {
            ApiError::Unauthorized { status, detail } => ApiError::Status { status, detail },
            e => e,
        })?;
        token
            .access_token
            .map(AccessToken::new)
            .ok_or_else(|| ApiError::Decode("missing access_token".into()))
    }

    /// `POST /users`; the server may log the new user in right away
    pub async fn signup(&self, registration: &Registration) -> Result<Option<AccessToken>> {
        let body = json!({
            "username": registration.credentials.username,
            "email": registration.email,
            "password": registration.credentials.password.expose_secret(),
        });
        let response = self
            .api
            .http
            .post(self.api.url("users")?)
            .json(&body)
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        // Any success body without a token still means the account exists
        let token = serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|response| response.access_token);
        Ok(token.map(AccessToken::new))
    }

    /// Upload an image as multipart field `file`, returning its URL
    pub async fn upload_image(&self, path: &Path, token: &AccessToken) -> Result<String> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".into());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .api
            .http
            .post(self.api.url("upload/image")?)
            .bearer_auth(token.expose())
            .multipart(form)
            .send()
            .await?;
        let upload: UploadResponse = read_json(response).await?;
        Ok(upload.url)
    }
}

fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, body_string_contains, header, header_regex, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::domain::post::Visibility;

    async fn client(server: &MockServer) -> BlogClient {
        BlogClient::new(&server.uri(), Duration::from_secs(5)).expect("valid mock server url")
    }

    fn post_json(id: i64) -> serde_json::Value {
        json!({"id": id, "title": format!("post {id}"), "content": "", "visibility": "public"})
    }

    #[tokio::test]
    async fn test_list_posts_sends_paging_and_filter() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs"))
            .and(query_param("limit", "3"))
            .and(query_param("offset", "6"))
            .and(query_param("visibility", "public"))
            .and(query_param("tags", "rust,tui"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(7)])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = FeedFilter {
            visibility: Some(Visibility::Public),
            tags: vec!["rust".into(), "tui".into()],
        };
        let posts = client(&server).await.list_posts(6, 3, &filter).await?;

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, PostId(7));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_posts_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
            .mount(&server)
            .await;

        let result = client(&server)
            .await
            .list_posts(0, 10, &FeedFilter::default())
            .await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let error = client(&server)
            .await
            .get_post(PostId(404))
            .await
            .expect_err("404 is an error");
        assert_eq!(error.to_string(), "Blog not found");
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_create_post_sends_bearer_and_body() -> Result<()> {
        let server = MockServer::start().await;
        let new_post = NewPost {
            title: "A walk in the park".into(),
            content: "words".into(),
            visibility: Visibility::Draft,
            tags: vec!["nature".into()],
            main_image_url: None,
            sub_images: vec![],
        };
        Mock::given(method("POST"))
            .and(path("/blogs"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_json(json!({
                "title": "A walk in the park",
                "content": "words",
                "visibility": "draft",
                "tags": ["nature"],
                "main_image_url": null,
                "sub_images": [],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(post_json(12)))
            .expect(1)
            .mount(&server)
            .await;

        let post = client(&server)
            .await
            .create_post(&new_post, &AccessToken::new("secret-token"))
            .await?;
        assert_eq!(post.id, PostId(12));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_post_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/blogs/3"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"detail": "Not your blog"})),
            )
            .mount(&server)
            .await;

        let error = client(&server)
            .await
            .delete_post(PostId(3), &AccessToken::new("t"))
            .await
            .expect_err("403 is an error");
        assert!(matches!(error, ApiError::Unauthorized { .. }));
        assert_eq!(error.to_string(), "Not your blog: please log in");
    }

    #[tokio::test]
    async fn test_delete_post_no_content() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/blogs/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .await
            .delete_post(PostId(3), &AccessToken::new("t"))
            .await
    }

    #[tokio::test]
    async fn test_login() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "jwt", "token_type": "bearer"})),
            )
            .mount(&server)
            .await;

        let token = client(&server)
            .await
            .login(&Credentials::new("alice", "pw"))
            .await?;
        assert_eq!(token.expose(), "jwt");
        Ok(())
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"detail": "Incorrect username or password"})),
            )
            .mount(&server)
            .await;

        let error = client(&server)
            .await
            .login(&Credentials::new("alice", "nope"))
            .await
            .expect_err("401 is an error");
        assert_eq!(error.to_string(), "Incorrect username or password");
    }

    #[tokio::test]
    async fn test_signup_without_token() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(
                json!({"username": "bob", "email": "bob@example.com", "password": "pw"}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "username": "bob"})))
            .mount(&server)
            .await;

        let registration = Registration {
            credentials: Credentials::new("bob", "pw"),
            email: "bob@example.com".into(),
        };
        let token = client(&server).await.signup(&registration).await?;
        assert_eq!(token, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_image() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/image"))
            .and(header("authorization", "Bearer t"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("filename=\"cat.png\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"url": "/static/cat.png"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let file_path = dir.path().join("cat.png");
        let mut file = std::fs::File::create(&file_path).expect("create image");
        file.write_all(b"\x89PNG fake").expect("write image");

        let url = client(&server)
            .await
            .upload_image(&file_path, &AccessToken::new("t"))
            .await?;
        assert_eq!(url, "/static/cat.png");
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let result = BlogClient::new("http://127.0.0.1:9", Duration::from_secs(1))
            .expect("valid url")
            .upload_image(Path::new("/definitely/not/here.png"), &AccessToken::new("t"))
            .await;
        assert!(matches!(result, Err(ApiError::File { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop a listener to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .map(|addr| addr.port())
            .expect("free port");
        let result = BlogClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
            .expect("valid url")
            .list_posts(0, 10, &FeedFilter::default())
            .await;

        let error = result.expect_err("nothing listens there");
        assert!(matches!(error, ApiError::Transport(_)));
        assert!(error.to_string().starts_with("Network Error"));
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(Path::new("a.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a")), "application/octet-stream");
    }
}
