//! Integration tests for the diagram client and workbench against a mock
//! diagram service.

use serde_json::json;
use sketch_client::{
    ClientConfig, DiagramClient, DiagramError, GenerateRequest, RetryConfig, TikzRequest,
    Workbench,
};
use sketch_core::{Point, SketchSession, Tool};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DiagramClient {
    let config = ClientConfig::with_base_url(server.uri()).with_retry(RetryConfig::new(3, 1, 5, 2.0));
    DiagramClient::new(&config).expect("client")
}

fn sketched_session() -> SketchSession {
    let mut session = SketchSession::default();
    session.set_tool(Tool::Line);
    session.begin_gesture(Point::new(0.0, 0.0));
    session.end_gesture(Point::new(100.0, 0.0));
    session
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data, "error": null }))
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn styles_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diagram/styles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "styles": {
                "nature": { "name": "Nature", "description": "Suitable for Nature publications" },
                "ieee": { "name": "IEEE", "description": "Suitable for IEEE publications" }
            },
            "diagram_types": { "flowchart": "Flowchart / Process diagram" }
        })))
        .mount(&server)
        .await;

    let catalog = client(&server).styles().await.expect("styles");
    assert_eq!(catalog.styles.len(), 2);
    assert_eq!(catalog.styles["nature"].name, "Nature");
    assert_eq!(catalog.diagram_types["flowchart"], "Flowchart / Process diagram");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn generate_posts_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/diagram/generate"))
        .and(body_json(json!({
            "description": "a pipeline",
            "style": "science",
            "diagram_type": "timeline"
        })))
        .respond_with(ok(json!({
            "svg": "<svg/>",
            "style": "science",
            "style_name": "Science",
            "diagram_type": "timeline"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest {
        description: "a pipeline".into(),
        style: "science".into(),
        diagram_type: "timeline".into(),
        context: None,
    };
    let generated = client(&server).generate(&request).await.expect("generate");
    assert_eq!(generated.style_name, "Science");
    assert_eq!(generated.svg, "<svg/>");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn service_unavailable_means_not_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/diagram/svg-to-tikz"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "detail": "AI service not configured" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .svg_to_tikz(&TikzRequest {
            svg: "<svg/>".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DiagramError::NotConfigured));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diagram/styles"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).styles().await.unwrap_err();
    assert!(matches!(err, DiagramError::Status(500)));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn envelope_failure_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/diagram/iterate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": null,
            "error": "model refused"
        })))
        .mount(&server)
        .await;

    let mut bench = Workbench::new(client(&server));
    // Seed a current diagram through generate first.
    Mock::given(method("POST"))
        .and(path("/api/diagram/generate"))
        .respond_with(ok(json!({
            "svg": "<svg id=\"v1\"/>",
            "style": "nature",
            "style_name": "Nature",
            "diagram_type": "flowchart"
        })))
        .mount(&server)
        .await;
    bench.generate("a loop", None).await.expect("generate");

    let err = bench.iterate("make it blue").await.unwrap_err();
    assert!(matches!(err, DiagramError::Remote(ref m) if m == "model refused"));
    // A failed call leaves the current diagram and history untouched.
    assert_eq!(bench.current_svg(), Some("<svg id=\"v1\"/>"));
    assert_eq!(bench.history().len(), 1);
}

#[tokio::test]
async fn transport_failures_surface_after_retries() {
    // Port 9 (discard) is closed on test machines; connections are refused.
    let config = ClientConfig::with_base_url("http://127.0.0.1:9").with_retry(RetryConfig::new(2, 1, 1, 1.0));
    let client = DiagramClient::new(&config).expect("client");
    let err = client.styles().await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn workbench_full_flow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/diagram/refine"))
        .and(body_partial_json(json!({
            "description": "two boxes",
            "style": "ieee",
            "context": "optical computing"
        })))
        .respond_with(ok(json!({
            "refined_svg": "<svg id=\"refined\"/>",
            "style": "ieee",
            "style_name": "IEEE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/diagram/iterate"))
        .and(body_json(json!({
            "current_svg": "<svg id=\"refined\"/>",
            "feedback": "add labels",
            "style": "ieee"
        })))
        .respond_with(ok(json!({
            "svg": "<svg id=\"iterated\"/>",
            "style": "ieee",
            "feedback_addressed": "add labels"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/diagram/svg-to-tikz"))
        .and(body_json(json!({ "svg": "<svg id=\"iterated\"/>" })))
        .respond_with(ok(json!({ "tikz": "\\begin{tikzpicture}\\end{tikzpicture}" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = sketched_session();
    let mut bench = Workbench::new(client(&server));
    bench.set_style("ieee");
    bench.set_context(Some("optical computing".into()));

    let refined = bench.refine(&mut session, "  two boxes ").await.expect("refine");
    assert_eq!(refined.style_name, "IEEE");
    assert_eq!(bench.current_svg(), Some("<svg id=\"refined\"/>"));

    bench.iterate("add labels").await.expect("iterate");
    assert_eq!(bench.current_svg(), Some("<svg id=\"iterated\"/>"));

    let tikz = bench.export_tikz(Some("   ")).await.expect("tikz");
    assert!(tikz.starts_with("\\begin{tikzpicture}"));
    assert_eq!(bench.current_tikz(), Some(tikz.as_str()));
    assert_eq!(
        bench.history(),
        &[
            "User: two boxes\nAI: Refined diagram in IEEE style".to_string(),
            "User: add labels\nAI: Updated diagram".to_string(),
        ]
    );

    bench.clear(&mut session).expect("clear");
    assert!(session.is_empty());
    assert!(bench.current_svg().is_none());
    assert!(bench.history().is_empty());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn refine_sends_only_recent_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/diagram/generate"))
        .respond_with(ok(json!({
            "svg": "<svg/>",
            "style": "nature",
            "style_name": "Nature",
            "diagram_type": "flowchart"
        })))
        .mount(&server)
        .await;

    let expected: Vec<String> = (2..6)
        .map(|i| format!("User: step {i}\nAI: Generated flowchart diagram"))
        .collect();
    Mock::given(method("POST"))
        .and(path("/api/diagram/refine"))
        .and(body_partial_json(json!({ "previous_iterations": expected })))
        .respond_with(ok(json!({
            "refined_svg": "<svg/>",
            "style": "nature",
            "style_name": "Nature"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut bench = Workbench::new(client(&server));
    for i in 0..6 {
        bench.generate(&format!("step {i}"), None).await.expect("generate");
    }
    let mut session = sketched_session();
    bench.refine(&mut session, "tidy up").await.expect("refine");
    assert_eq!(bench.history().len(), 7);
}
