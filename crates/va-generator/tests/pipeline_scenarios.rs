//! End-to-end pipeline scenarios.
//!
//! HTTP scenarios run against a local mockito server; ordering and
//! fail-fast properties use the scripted backend from `va-sim`.

use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use va_core::preview::{SCRIPT_TAG, STYLESHEET_LINK};
use va_core::{compose_document, ApiKey, ArtifactKind, GenerationError};
use va_generator::{GeneratorConfig, Pipeline};
use va_sim::{
    get_or_generate_seed, DeterministicRng, FaultConfig, FaultInjector, Outcome, ScriptedBackend,
};

const RECIPE_APP: &str = "a recipe sharing app with search and favorites";

const SPECIFICATION: &str = "1. Core features\n\
    - Full-text recipe search\n\
    - Favorites saved per device\n\
    2. Layout: search header, card grid\n\
    3. Colors: tomato red on white";

/// Regex fragments unique to each stage's prompt.
fn stage_marker(stage: ArtifactKind) -> &'static str {
    match stage {
        ArtifactKind::Specification => "Analyze this app idea",
        ArtifactKind::Markup => "Write semantic, modern HTML",
        ArtifactKind::Styling => "Write complete, modern CSS",
        ArtifactKind::Behavior => "Write functional JavaScript",
    }
}

fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "model": "llama-3.3-70b",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

async fn mock_stage(
    server: &mut ServerGuard,
    stage: ArtifactKind,
    status: usize,
    body: String,
) -> mockito::Mock {
    server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer csk-e2e")
        .match_body(Matcher::Regex(stage_marker(stage).to_string()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_reply(server: &mut ServerGuard, stage: ArtifactKind, content: &str) -> mockito::Mock {
    mock_stage(server, stage, 200, completion(content)).await
}

fn http_pipeline(server: &ServerGuard) -> Pipeline {
    Pipeline::from_config(GeneratorConfig {
        base_url: server.url(),
        ..GeneratorConfig::default()
    })
}

fn key() -> ApiKey {
    ApiKey::new("csk-e2e").unwrap()
}

#[tokio::test]
async fn test_recipe_app_over_http() {
    let mut server = Server::new_async().await;
    let markup = format!(
        "```html\n<html><head>{}</head><body><main id=\"recipes\"></main>{}</body></html>\n```",
        STYLESHEET_LINK, SCRIPT_TAG
    );
    let styling = "```css\nmain{display:grid}\n```";
    let behavior = "```js\nconsole.log('ok');\n```";
    let mocks = vec![
        mock_reply(&mut server, ArtifactKind::Specification, SPECIFICATION).await,
        mock_reply(&mut server, ArtifactKind::Markup, &markup).await,
        mock_reply(&mut server, ArtifactKind::Styling, styling).await,
        mock_reply(&mut server, ArtifactKind::Behavior, behavior).await,
    ];

    let bundle = http_pipeline(&server).run(RECIPE_APP, &key()).await.unwrap();

    // The bundle keeps the external references; only the preview inlines them.
    assert!(bundle.markup().contains(STYLESHEET_LINK));
    assert!(bundle.markup().contains(SCRIPT_TAG));
    assert_eq!(bundle.styling(), "main{display:grid}");
    assert_eq!(bundle.behavior(), "console.log('ok');");

    let document = compose_document(&bundle);
    assert!(!document.contains("style.css"));
    assert!(!document.contains("script.js"));
    assert!(document.contains("<style>main{display:grid}</style>"));

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_styling_500_stops_before_behavior() {
    let mut server = Server::new_async().await;
    let spec = mock_reply(&mut server, ArtifactKind::Specification, SPECIFICATION).await;
    let markup = mock_reply(&mut server, ArtifactKind::Markup, "<main></main>").await;
    let failure = "{\"error\":\"internal\"}".to_string();
    let styling = mock_stage(&mut server, ArtifactKind::Styling, 500, failure).await;
    let behavior = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex(stage_marker(ArtifactKind::Behavior).to_string()))
        .expect(0)
        .create_async()
        .await;

    let err = http_pipeline(&server).run(RECIPE_APP, &key()).await.unwrap_err();

    assert_eq!(err.stage(), Some(ArtifactKind::Styling));
    assert!(err.to_string().contains("styling"));
    assert!(err.to_string().contains("500"));

    spec.assert_async().await;
    markup.assert_async().await;
    styling.assert_async().await;
    behavior.assert_async().await;
}

#[tokio::test]
async fn test_missing_content_path_is_malformed() {
    let mut server = Server::new_async().await;
    mock_stage(
        &mut server,
        ArtifactKind::Specification,
        200,
        json!({"choices": [{"index": 0, "finish_reason": "length"}]}).to_string(),
    )
    .await;

    let err = http_pipeline(&server).run(RECIPE_APP, &key()).await.unwrap_err();
    match err {
        GenerationError::MalformedResponse { stage, detail } => {
            assert_eq!(stage, ArtifactKind::Specification);
            assert!(detail.contains("message"));
        }
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_malformed() {
    let mut server = Server::new_async().await;
    mock_stage(
        &mut server,
        ArtifactKind::Specification,
        200,
        "<html>gateway login</html>".to_string(),
    )
    .await;

    let err = http_pipeline(&server).run(RECIPE_APP, &key()).await.unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.stage(), Some(ArtifactKind::Specification));
}

#[tokio::test]
async fn test_artifact_requests_embed_description_and_specification() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with(ArtifactKind::Specification, Outcome::Reply(format!("\n{}\n", SPECIFICATION))),
    );
    Pipeline::new(backend.clone(), GeneratorConfig::default())
        .run(RECIPE_APP, &key())
        .await
        .unwrap();

    let calls = backend.calls();
    assert_eq!(calls[0].stage, ArtifactKind::Specification);
    assert!(calls[0].request.prompt_text().contains(RECIPE_APP));

    for call in &calls[1..] {
        let prompt = call.request.prompt_text();
        assert!(prompt.contains(RECIPE_APP), "{} lacks description", call.stage);
        assert!(prompt.contains(SPECIFICATION), "{} lacks specification", call.stage);
    }
}

#[tokio::test]
async fn test_specification_failure_issues_no_artifact_requests() {
    let backend =
        Arc::new(ScriptedBackend::new().with(ArtifactKind::Specification, Outcome::NetworkDown));
    let err = Pipeline::new(backend.clone(), GeneratorConfig::default())
        .run(RECIPE_APP, &key())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(ArtifactKind::Specification));
    assert_eq!(backend.stages_called(), vec![ArtifactKind::Specification]);
}

#[tokio::test]
async fn test_behavior_failure_discards_finished_artifacts() {
    let backend =
        Arc::new(ScriptedBackend::new().with(ArtifactKind::Behavior, Outcome::Status(503)));
    let result = Pipeline::new(backend.clone(), GeneratorConfig::default())
        .run(RECIPE_APP, &key())
        .await;

    assert!(result.is_err());
    assert_eq!(backend.calls().len(), 4);
}

/// Seeded fault runs: every run either yields a full bundle or stops at the
/// first failing stage without issuing later requests.
#[tokio::test]
async fn test_seeded_fault_runs_are_all_or_nothing() {
    let mut rng = DeterministicRng::new(get_or_generate_seed());
    let descriptions = [RECIPE_APP, "a pomodoro timer", "a flashcard quiz", "a budget planner"];

    for round in 0..40 {
        let config = FaultConfig {
            latency_ms_max: 0,
            ..FaultConfig::aggressive()
        };
        let backend = Arc::new(
            ScriptedBackend::new().with_faults(FaultInjector::new(rng.fork(), config)),
        );
        let description = descriptions[round % descriptions.len()];
        let result = Pipeline::new(backend.clone(), GeneratorConfig::default())
            .run(description, &key())
            .await;

        let called = backend.stages_called();
        match result {
            Ok(bundle) => {
                assert_eq!(called.len(), 4, "seed {}: success must call every stage", rng.seed());
                for (kind, text) in bundle.iter() {
                    assert!(!text.is_empty(), "seed {}: empty {}", rng.seed(), kind);
                }
            }
            Err(err) => {
                let failed = err.stage().expect("a stage failure");
                assert_eq!(called.last(), Some(&failed), "seed {}", rng.seed());
                assert_eq!(called.iter().filter(|&&s| s == failed).count(), 1);
            }
        }
    }
}
