use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use inkfeed::{
    core::msg::{FeedMsg, Msg, SessionMsg, SystemMsg},
    domain::{post::PostId, session::AccessToken},
    infrastructure::config::Config,
    integration::{headless, runtime::Runtime},
    model::pagination,
};

fn page(ids: &[i64]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| json!({"id": id, "title": format!("post {id}"), "visibility": "public"}))
            .collect(),
    )
}

fn runtime(blog: &MockServer, data_dir: &TempDir, page_size: usize) -> Runtime {
    let mut config = Config::default();
    config.config._data_dir = data_dir.path().to_path_buf();
    config.api.blog_url = blog.uri();
    config.api.timeout_secs = 5;
    config.feed.page_size = page_size;
    Runtime::from_config(&config).expect("runtime from config")
}

async fn mount_page(server: &MockServer, offset: usize, ids: &[i64]) {
    Mock::given(method("GET"))
        .and(path("/blogs"))
        .and(query_param("offset", offset.to_string()))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(ids)))
        .expect(1)
        .mount(server)
        .await;
}

fn ids(runtime: &Runtime) -> Vec<PostId> {
    runtime.state().feed.items().iter().map(|post| post.id).collect()
}

#[tokio::test]
async fn test_list_stops_at_end_of_feed_without_duplicates() {
    let blog = MockServer::start().await;
    mount_page(&blog, 0, &[1, 2, 3]).await;
    mount_page(&blog, 3, &[3, 4]).await;
    mount_page(&blog, 6, &[]).await;
    let data_dir = TempDir::new().expect("tempdir");
    let mut runtime = runtime(&blog, &data_dir, 3);

    let posts = headless::list(&mut runtime, 10, None)
        .await
        .expect("list succeeds");

    let listed: Vec<PostId> = posts.iter().map(|post| post.id).collect();
    assert_eq!(listed, [1, 2, 3, 4].map(PostId));
    assert!(!runtime.state().feed.has_more());
    assert_eq!(runtime.state().feed.offset(), 6);
}

#[tokio::test]
async fn test_tall_terminal_keeps_loading_until_the_end() {
    let blog = MockServer::start().await;
    mount_page(&blog, 0, &[1, 2, 3]).await;
    mount_page(&blog, 3, &[3, 4]).await;
    mount_page(&blog, 6, &[]).await;
    let data_dir = TempDir::new().expect("tempdir");
    let mut runtime = runtime(&blog, &data_dir, 3);

    // 10 rows of posts, so the last post stays visible after every page
    runtime.send_msg(Msg::System(SystemMsg::Resized {
        width: 80,
        height: 42,
    }));
    runtime.send_msg(Msg::System(SystemMsg::FeedMounted));
    runtime
        .run_until(|state| !state.feed.has_more())
        .await
        .expect("feed reaches its end");
    runtime.run_to_idle().await.expect("idle");

    assert_eq!(ids(&runtime), [1, 2, 3, 4].map(PostId));
    assert!(!runtime.state().feed.is_loading());
}

#[tokio::test]
async fn test_short_terminal_waits_for_scrolling() {
    let blog = MockServer::start().await;
    mount_page(&blog, 0, &[1, 2, 3]).await;
    Mock::given(method("GET"))
        .and(path("/blogs"))
        .and(query_param("offset", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[4, 5, 6])))
        .mount(&blog)
        .await;
    let data_dir = TempDir::new().expect("tempdir");
    let mut runtime = runtime(&blog, &data_dir, 3);

    // Room for a single post
    runtime.send_msg(Msg::System(SystemMsg::Resized {
        width: 80,
        height: 6,
    }));
    runtime.send_msg(Msg::System(SystemMsg::FeedMounted));
    runtime
        .run_until(|state| state.feed.len() == 3)
        .await
        .expect("first page");
    runtime.run_to_idle().await.expect("idle");
    assert_eq!(runtime.state().feed.len(), 3);

    for _ in 0..3 {
        runtime.send_msg(Msg::Feed(FeedMsg::NextSelected));
    }
    runtime
        .run_until(|state| state.feed.len() == 6)
        .await
        .expect("second page after scrolling to the last post");
    assert_eq!(ids(&runtime), (1..=6).map(PostId).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_page_of_previous_filter_is_discarded() {
    let blog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs"))
        .and(query_param("visibility", "public"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[1, 2, 3]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&blog)
        .await;
    Mock::given(method("GET"))
        .and(path("/blogs"))
        .and(query_param("visibility", "private"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[7])))
        .mount(&blog)
        .await;
    let data_dir = TempDir::new().expect("tempdir");
    let mut runtime = runtime(&blog, &data_dir, 3);
    runtime.send_msg(Msg::Session(SessionMsg::Restored {
        token: AccessToken::new("jwt"),
        username: Some("alice".into()),
    }));

    runtime.send_msg(Msg::System(SystemMsg::FeedMounted));
    runtime.run_update_cycle().expect("first fetch started");
    assert!(runtime.state().feed.is_loading());

    runtime.send_msg(Msg::Feed(FeedMsg::VisibilityFilterCycled));
    runtime.run_to_idle().await.expect("both responses applied");

    assert_eq!(ids(&runtime), vec![PostId(7)]);
    assert_eq!(runtime.state().feed.filter().to_string(), "private");
}

#[tokio::test]
async fn test_failed_page_is_retried_by_hand() {
    let blog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&blog)
        .await;
    mount_page(&blog, 0, &[1]).await;
    let data_dir = TempDir::new().expect("tempdir");
    let mut runtime = runtime(&blog, &data_dir, 3);

    let error = headless::list(&mut runtime, 1, None)
        .await
        .expect_err("first attempt fails");
    assert_eq!(error.to_string(), "Internal Server Error");
    assert!(runtime.state().feed.is_empty());

    runtime.send_msg(Msg::Feed(FeedMsg::Pagination(
        pagination::Message::NextPageRequested,
    )));
    runtime
        .run_until(|state| !state.feed.is_loading())
        .await
        .expect("retry answered");
    assert_eq!(ids(&runtime), vec![PostId(1)]);
    assert_eq!(runtime.state().feed.error(), None);
}
