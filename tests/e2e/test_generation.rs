use crate::e2e::helpers;

use genstudio_backend::domain::generation::Vendor;
use helpers::mock_vendor::{chat_answer, MockResponse};
use helpers::{TestContext, SUNO_KEY};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

fn suno_queued(task_id: &str) -> MockResponse {
    MockResponse::ok(json!({ "id": task_id, "status": "queued" }))
}

fn processing() -> MockResponse {
    MockResponse::ok(json!({ "status": "processing" }))
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_and_save_suno_track(ctx: &TestContext) {
    ctx.vendors.on_submit("suno", suno_queued("t1"));
    ctx.vendors.on_status(
        "t1",
        vec![
            processing(),
            MockResponse::ok(json!({
                "status": "completed",
                "audio_url": "https://x/a.mp3",
                "title": "Night Drive"
            })),
        ],
    );

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "suno", "prompt": "lofi beat" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["taskId"], "t1");
    assert_eq!(body["vendor"], "suno");
    assert_eq!(body["status"], "complete");
    assert_eq!(body["audioUrl"], "https://x/a.mp3");
    assert_eq!(body["title"], "Night Drive");

    assert_eq!(ctx.vendors.status_calls("t1"), 2);

    let submissions = ctx.vendors.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].body["prompt"], "lofi beat");
    assert_eq!(
        submissions[0].authorization.as_deref(),
        Some(format!("Bearer {}", SUNO_KEY).as_str())
    );

    let tracks = ctx.tracks.all();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].vendor, Vendor::Suno);
    assert_eq!(tracks[0].task_id, "t1");
    assert_eq!(tracks[0].prompt, "lofi beat");
    assert_eq!(tracks[0].title, "Night Drive");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_time_out_after_attempt_ceiling(ctx: &TestContext) {
    ctx.vendors.on_submit("suno", suno_queued("slow"));
    ctx.vendors.on_status("slow", vec![processing()]);

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "suno", "prompt": "ambient drone" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::GATEWAY_TIMEOUT)
        .assert_error_code("poll_timeout");
    assert_eq!(ctx.vendors.status_calls("slow"), 60);
    assert!(ctx.tracks.all().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_vendor_rejection_without_polling(ctx: &TestContext) {
    ctx.vendors.on_submit(
        "suno",
        MockResponse::status(401, json!({ "message": "Invalid API key" })),
    );

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "suno", "prompt": "lofi beat" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_code("vendor_rejected")
        .assert_error_message("Invalid API key");
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["details"]["vendorStatus"], 401);
    assert_eq!(ctx.vendors.total_status_calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_unconfigured_vendor(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "mureka", "prompt": "synthwave" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_code("service_not_configured")
        .assert_error_message("MUREKA_ACCOUNT");
    assert!(ctx.vendors.submissions().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_immediate_kie_result(ctx: &TestContext) {
    ctx.vendors.on_submit(
        "kie",
        MockResponse::ok(json!({
            "audioUrl": "https://k/direct.mp3",
            "title": "Direct Hit",
            "duration": "0:30",
            "bpm": 120
        })),
    );

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "kie", "prompt": "house groove" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "complete");
    assert_eq!(body["audioUrl"], "https://k/direct.mp3");
    assert_eq!(body["durationSeconds"], 30.0);
    assert_eq!(body["metadata"]["bpm"], 120);
    assert!(body["taskId"].as_str().unwrap().starts_with("kie-"));

    assert_eq!(ctx.vendors.total_status_calls(), 0);
    assert_eq!(ctx.tracks.all().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_task_handle_when_not_waiting(ctx: &TestContext) {
    ctx.vendors.on_submit("suno", suno_queued("t/2"));
    ctx.vendors.on_status(
        "t/2",
        vec![
            processing(),
            MockResponse::ok(json!({ "status": "complete", "audio_url": "https://x/b.mp3" })),
        ],
    );

    let response = ctx
        .client
        .post(
            "/api/generations",
            &json!({ "vendor": "suno", "prompt": "lofi beat", "wait": false }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::ACCEPTED);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["taskId"], "t/2");
    assert_eq!(body["status"], "queued");
    assert_eq!(body["statusUrl"], "/api/generations/suno/t%2F2");
    assert_eq!(ctx.vendors.total_status_calls(), 0);

    let status_url = body["statusUrl"].as_str().unwrap().to_string();

    let first = ctx.client.get(&status_url).await.unwrap();
    first.assert_status(StatusCode::OK);
    assert_eq!(first.body.as_ref().unwrap()["status"], "in_progress");
    assert!(ctx.tracks.all().is_empty());

    let second = ctx.client.get(&status_url).await.unwrap();
    second.assert_status(StatusCode::OK);
    assert_eq!(second.body.as_ref().unwrap()["status"], "complete");
    assert_eq!(second.body.as_ref().unwrap()["audioUrl"], "https://x/b.mp3");

    let tracks = ctx.tracks.all();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].task_id, "t/2");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stop_polling_when_vendor_rejects_status(ctx: &TestContext) {
    // No status script: the mock answers 404
    ctx.vendors
        .on_submit("kie", MockResponse::ok(json!({ "code": 200, "data": { "taskId": "k404" } })));

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "kie", "prompt": "jazz trio" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_code("vendor_rejected");
    assert_eq!(response.body.as_ref().unwrap()["details"]["vendorStatus"], 404);
    assert_eq!(ctx.vendors.status_calls("k404"), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ride_out_transient_misses(ctx: &TestContext) {
    ctx.vendors.on_submit(
        "musicgen",
        MockResponse::ok(json!({ "task_id": "m1", "status": "queued" })),
    );
    ctx.vendors.on_status(
        "m1",
        vec![
            MockResponse::Text(500, "Internal Server Error".to_string()),
            MockResponse::Text(200, "<html>warming up</html>".to_string()),
            processing(),
            MockResponse::ok(json!({
                "task_id": "m1",
                "status": "completed",
                "audio_url": "/audio/m1.wav"
            })),
        ],
    );

    let response = ctx
        .client
        .post(
            "/api/generations",
            &json!({ "vendor": "musicgen", "prompt": "piano etude", "duration": 90 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body["audioUrl"],
        format!("{}/audio/m1.wav", ctx.vendors.url("musicgen"))
    );
    assert_eq!(ctx.vendors.status_calls("m1"), 4);

    let submissions = ctx.vendors.submissions();
    assert_eq!(submissions[0].body["duration"], 30);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_vendor_failure_to_generation_failed(ctx: &TestContext) {
    ctx.vendors.on_submit("suno", suno_queued("bad"));
    ctx.vendors.on_status(
        "bad",
        vec![MockResponse::ok(json!({ "status": "failed", "error": "content policy" }))],
    );

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "suno", "prompt": "lofi beat" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_code("generation_failed")
        .assert_error_message("content policy");
    assert!(ctx.tracks.all().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_failed_result_from_status_endpoint(ctx: &TestContext) {
    ctx.vendors.on_status(
        "gone",
        vec![MockResponse::ok(json!({ "status": "error", "error_message": "render crashed" }))],
    );

    let response = ctx.client.get("/api/generations/suno/gone").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "render crashed");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_complete_payload_without_asset(ctx: &TestContext) {
    ctx.vendors.on_submit("suno", suno_queued("empty"));
    ctx.vendors.on_status(
        "empty",
        vec![MockResponse::ok(json!({ "status": "complete", "title": "Ghost" }))],
    );

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "suno", "prompt": "lofi beat" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_code("malformed_vendor_payload");
    assert!(ctx.tracks.all().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_generation_requests(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "spotify", "prompt": "lofi beat" }))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("bad_request")
        .assert_error_message("spotify");

    let response = ctx
        .client
        .post("/api/generations", &json!({ "vendor": "suno", "prompt": "   " }))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("bad_request");

    assert!(ctx.vendors.submissions().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_vendor_status(ctx: &TestContext) {
    let response = ctx.client.get("/api/generations/spotify/t1").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_code("not_found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_status_unavailable_on_vendor_outage(ctx: &TestContext) {
    ctx.vendors.on_status(
        "t9",
        vec![MockResponse::status(503, json!({ "message": "maintenance" }))],
    );

    let response = ctx.client.get("/api/generations/kie/t9").await.unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_code("status_unavailable");
    assert_eq!(ctx.vendors.status_calls("t9"), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_enhance_prompt_before_submitting(ctx: &TestContext) {
    ctx.vendors.on_chat(chat_answer(
        r#"Here you go:
{"musicDescription": "Dusty vinyl crackle over mellow Rhodes chords",
 "structure": ["intro", "loop", "outro"],
 "tempo": 82,
 "key": "F major",
 "instrumentation": ["rhodes", "brushed drums"],
 "mixingNotes": "keep the low end warm"}"#,
    ));
    ctx.vendors.on_submit("suno", suno_queued("t3"));
    ctx.vendors.on_status(
        "t3",
        vec![MockResponse::ok(json!({ "status": "complete", "audio_url": "https://x/c.mp3" }))],
    );

    let response = ctx
        .client
        .post(
            "/api/generations",
            &json!({
                "vendor": "suno",
                "prompt": "lofi beat",
                "style": "lofi",
                "mood": "calm",
                "enhancePrompt": true
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.vendors.chat_calls(), 1);

    let submitted = ctx.vendors.submissions()[0].body["prompt"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(submitted.starts_with("lofi beat"));
    assert!(submitted.contains("Dusty vinyl crackle over mellow Rhodes chords"));
    assert!(submitted.contains("Instruments: rhodes, brushed drums"));

    let tracks = ctx.tracks.all();
    assert_eq!(tracks[0].prompt, "lofi beat");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_submit_original_prompt_when_enhancement_fails(ctx: &TestContext) {
    ctx.vendors.on_chat(MockResponse::status(
        401,
        json!({
            "error": {
                "message": "bad key",
                "type": "invalid_request_error",
                "param": null,
                "code": null
            }
        }),
    ));
    ctx.vendors.on_submit("suno", suno_queued("t4"));
    ctx.vendors.on_status(
        "t4",
        vec![MockResponse::ok(json!({ "status": "complete", "audio_url": "https://x/d.mp3" }))],
    );

    let response = ctx
        .client
        .post(
            "/api/generations",
            &json!({ "vendor": "suno", "prompt": "lofi beat", "enhancePrompt": true }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.vendors.submissions()[0].body["prompt"], "lofi beat");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_run_independent_generations_concurrently(ctx: &TestContext) {
    ctx.vendors.on_submit("suno", suno_queued("s-par"));
    ctx.vendors.on_status(
        "s-par",
        vec![
            processing(),
            processing(),
            MockResponse::ok(json!({ "status": "complete", "audio_url": "https://x/s.mp3" })),
        ],
    );
    ctx.vendors
        .on_submit("kie", MockResponse::ok(json!({ "data": { "taskId": "k-par" } })));
    ctx.vendors.on_status(
        "k-par",
        vec![
            processing(),
            MockResponse::ok(json!({ "status": "SUCCESS", "audioUrl": "https://k/k.mp3" })),
        ],
    );

    let mut futures = Vec::new();
    for vendor in ["suno", "kie"] {
        let client = ctx.client.clone();
        futures.push(async move {
            client
                .post("/api/generations", &json!({ "vendor": vendor, "prompt": "parallel" }))
                .await
        });
    }

    let results = futures::future::join_all(futures).await;

    for result in results {
        let response = result.unwrap();
        response.assert_status(StatusCode::OK);
        assert_eq!(response.body.as_ref().unwrap()["status"], "complete");
    }
    assert_eq!(ctx.vendors.status_calls("s-par"), 3);
    assert_eq!(ctx.vendors.status_calls("k-par"), 2);
    assert_eq!(ctx.tracks.all().len(), 2);
}
