use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pageflip::core::history::{History, MemoryHistory};
use pageflip::core::navigator::{ActivationTarget, Navigator};
use pageflip::core::surface::{ContainerRole, MemorySurface, SurfaceEvent, SurfaceOp};
use pageflip::core::transition::{TransitionEngine, TransitionOutcome, TransitionTiming};
use pageflip::fetch::{FetchError, FetchLocation, FetchMode, HttpPageSource, PageSource, Resolver};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

const INDEX: &str = r#"<!doctype html><html><head><title>Home</title></head>
<body><h1>Home</h1><a href="/about">About</a></body></html>"#;
const ABOUT: &str = "<html><body><h1>About</h1></body></html>";

struct Harness {
    navigator: Arc<Navigator>,
    surface: Arc<MemorySurface>,
    history: Arc<MemoryHistory>,
}

fn harness(source: Arc<dyn PageSource>, start: &str, resolver: Resolver, duration: &str) -> Harness {
    let surface = Arc::new(MemorySurface::with_body("<p>server rendered</p>"));
    let history = Arc::new(MemoryHistory::new(start));
    let engine = TransitionEngine::new(surface.clone(), source, history.clone())
        .with_resolver(resolver)
        .with_timing(TransitionTiming::from_token(duration));
    Harness {
        navigator: Arc::new(Navigator::new(engine)),
        surface,
        history,
    }
}

async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn position(events: &[SurfaceEvent], op: &SurfaceOp) -> usize {
    events
        .iter()
        .position(|e| &e.op == op)
        .unwrap_or_else(|| panic!("no {op:?} in {events:?}"))
}

/// Serves fixed markup without a network; used where tokio time is paused.
struct MapSource(HashMap<&'static str, &'static str>);

#[async_trait]
impl PageSource for MapSource {
    async fn fetch(&self, location: &FetchLocation) -> Result<String, FetchError> {
        self.0
            .get(location.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| FetchError::Status {
                status: 404,
                location: location.to_string(),
            })
    }
}

fn map_source() -> Arc<MapSource> {
    Arc::new(MapSource(HashMap::from([
        ("/index.html", INDEX),
        ("/about.html", ABOUT),
    ])))
}

// ============================================================================
// HTTP Tests
// ============================================================================

#[tokio::test]
async fn test_initial_load_over_http() {
    let server = MockServer::start().await;
    mount_page(&server, "/index.html", INDEX).await;

    let source = Arc::new(HttpPageSource::new(&server.uri()).unwrap());
    let h = harness(source, "/", Resolver::new(FetchMode::Production), "0.5s");

    let outcome = h.navigator.init().await;
    assert!(outcome.is_completed());

    let active = h.surface.container(ContainerRole::Active).unwrap();
    assert!(active.markup.contains("<h1>Home</h1>"));
    assert!(!active.markup.contains("<title>"));
    assert!(!active.has_class("page-enter"));
    assert!(h.surface.container(ContainerRole::Incoming).is_none());

    let state = h.navigator.state();
    assert_eq!(state.current.path.as_deref(), Some("/index"));
    assert!(!state.is_transitioning);
}

#[tokio::test]
async fn test_link_navigation_over_http() {
    let server = MockServer::start().await;
    mount_page(&server, "/index.html", INDEX).await;
    mount_page(&server, "/about.html", ABOUT).await;

    let source = Arc::new(HttpPageSource::new(&server.uri()).unwrap());
    let h = harness(source, "/", Resolver::new(FetchMode::Production), "0.05s");
    h.navigator.init().await;

    let outcome = h
        .navigator
        .handle_activation(&ActivationTarget::link("/about"))
        .await;
    assert!(matches!(outcome, Some(TransitionOutcome::Completed)));

    assert_eq!(h.history.entries(), vec!["/", "/about"]);
    let state = h.navigator.state();
    assert_eq!(state.previous.path.as_deref(), Some("/index"));
    assert_eq!(state.current.path.as_deref(), Some("/about"));
    assert_eq!(state.current.page.as_deref(), Some("about"));

    let containers = h.surface.containers();
    assert_eq!(containers.len(), 1);
    assert!(containers[0].markup.contains("<h1>About</h1>"));

    // The old page stays up for the whole fade: 50ms * 1.2
    let events = h.surface.events();
    let marked = position(
        &events,
        &SurfaceOp::Mark(ContainerRole::Active, "page-exit".to_string()),
    );
    let removed = position(&events[marked..], &SurfaceOp::Remove(ContainerRole::Active)) + marked;
    assert!(events[removed].at - events[marked].at >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_development_mode_fetches_from_source_prefix() {
    let server = MockServer::start().await;
    mount_page(&server, "/src/html/about.html", ABOUT).await;

    let source = Arc::new(HttpPageSource::new(&server.uri()).unwrap());
    let h = harness(source, "/about", Resolver::new(FetchMode::Development), "0s");

    assert!(h.navigator.init().await.is_completed());
    assert!(
        h.surface
            .active_markup()
            .unwrap()
            .contains("<h1>About</h1>")
    );
}

#[tokio::test]
async fn test_missing_page_redirects_home() {
    let server = MockServer::start().await;
    mount_page(&server, "/index.html", INDEX).await;
    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = Arc::new(HttpPageSource::new(&server.uri()).unwrap());
    let h = harness(source, "/", Resolver::new(FetchMode::Production), "0s");
    h.navigator.init().await;

    let outcome = h.navigator.navigate("/missing").await;
    assert!(matches!(
        outcome,
        TransitionOutcome::Recovered(FetchError::Status { status: 404, .. })
    ));
    assert_eq!(h.history.take_redirect().as_deref(), Some("/"));
    assert_eq!(h.history.current_path(), "/");
    assert!(!h.navigator.state().is_transitioning);

    // Recovered: the next navigation is accepted
    assert!(h.navigator.navigate("/").await.is_completed());
}

#[tokio::test]
async fn test_unreachable_server_redirects_home() {
    // Nothing listens on port 9 (discard) in test environments
    let source = Arc::new(HttpPageSource::new("http://127.0.0.1:9").unwrap());
    let h = harness(source, "/about", Resolver::new(FetchMode::Production), "0s");

    let outcome = h.navigator.init().await;
    assert!(matches!(
        outcome,
        TransitionOutcome::Recovered(FetchError::Network(_))
    ));
    assert_eq!(h.history.take_redirect().as_deref(), Some("/"));
    assert!(!h.navigator.state().is_transitioning);
}

// ============================================================================
// Timing Tests (paused clock)
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_exit_waits_duration_plus_overshoot() {
    let h = harness(map_source(), "/", Resolver::default(), "0.5s");
    h.navigator.init().await;

    let start = tokio::time::Instant::now();
    assert!(h.navigator.navigate("/about").await.is_completed());
    assert_eq!(start.elapsed(), Duration::from_millis(600));

    let events = h.surface.events();
    let marked = position(
        &events,
        &SurfaceOp::Mark(ContainerRole::Active, "page-exit".to_string()),
    );
    let removed = position(&events[marked..], &SurfaceOp::Remove(ContainerRole::Active)) + marked;
    assert_eq!(
        events[removed].at - events[marked].at,
        Duration::from_millis(600)
    );
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_does_not_wait() {
    let h = harness(map_source(), "/", Resolver::default(), "2s");

    let start = tokio::time::Instant::now();
    assert!(h.navigator.init().await.is_completed());
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(
        !h.surface
            .events()
            .iter()
            .any(|e| matches!(e.op, SurfaceOp::Mark(_, _)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_navigations_only_first_runs() {
    let h = harness(map_source(), "/", Resolver::default(), "0.5s");
    h.navigator.init().await;

    let (first, second) = tokio::join!(
        h.navigator.navigate("/about"),
        h.navigator.navigate("/index")
    );

    assert!(first.is_completed());
    assert!(second.is_rejected());
    assert_eq!(h.history.entries(), vec!["/", "/about"]);
    assert_eq!(
        h.navigator.state().current.path.as_deref(),
        Some("/about")
    );
}

#[tokio::test(start_paused = true)]
async fn test_back_then_forward() {
    let h = harness(map_source(), "/", Resolver::default(), "0.5s");
    h.navigator.init().await;
    h.navigator.navigate("/about").await;

    assert_eq!(h.history.back().as_deref(), Some("/"));
    assert!(h.navigator.handle_pop().await.is_completed());
    assert_eq!(h.navigator.state().current.path.as_deref(), Some("/index"));
    assert!(h.surface.active_markup().unwrap().contains("Home"));

    assert_eq!(h.history.forward().as_deref(), Some("/about"));
    assert!(h.navigator.handle_pop().await.is_completed());
    assert_eq!(h.navigator.state().current.path.as_deref(), Some("/about"));

    // Pops never add entries
    assert_eq!(h.history.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_second_navigation_rejected_while_first_fades() {
    let h = harness(map_source(), "/", Resolver::default(), "0.5s");
    h.navigator.init().await;

    let navigator = h.navigator.clone();
    let mut first = tokio_test::task::spawn(async move { navigator.navigate("/about").await });
    tokio_test::assert_pending!(first.poll());
    assert!(h.navigator.state().is_transitioning);

    assert!(h.navigator.navigate("/index").await.is_rejected());
    assert_eq!(h.history.entries(), vec!["/", "/about"]);

    tokio::time::advance(Duration::from_millis(600)).await;
    let outcome = tokio_test::assert_ready!(first.poll());
    assert!(outcome.is_completed());
    assert!(!h.navigator.state().is_transitioning);
}
