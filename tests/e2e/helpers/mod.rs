use axum::Router;
use genstudio_backend::controllers::{
    creative::CreativeController, generation::GenerationController, tracks::TrackController,
    vocals::VocalsController,
};
use genstudio_backend::domain::creative::{CreativeGenerator, CreativeService};
use genstudio_backend::domain::generation::{GenerationRepository, GenerationService};
use genstudio_backend::domain::track::TrackRepository;
use genstudio_backend::domain::vocals::{VocalService, VocalSynthesizer};
use genstudio_backend::infrastructure::config::{
    KieConfig, MurekaConfig, MusicGenConfig, SunoConfig,
};
use genstudio_backend::infrastructure::http::build_router;
use genstudio_backend::infrastructure::repositories::{
    build_http_client, KieRepository, MurekaRepository, MusicGenRepository, OpenAiVocalRepository,
    RealGenerator, SimulatedGenerator, SunoRepository,
};
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;
pub mod memory_track_repo;

use api_client::TestClient;
use memory_track_repo::MemoryTrackRepository;
use mock_vendor::MockVendors;

/// Poll fast; the attempt ceilings stay the production ones
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(5);

pub const SUNO_KEY: &str = "test-suno-key";
pub const KIE_KEY: &str = "test-kie-key";
pub const RAPIDAPI_KEY: &str = "test-rapidapi-key";

pub struct TestContext {
    pub client: TestClient,
    pub vendors: MockVendors,
    pub tracks: Arc<MemoryTrackRepository>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let vendors = MockVendors::start().await;
            let tracks = Arc::new(MemoryTrackRepository::new());

            let app = create_app(&vendors, tracks.clone()).expect("Failed to create app");

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            Self {
                client: TestClient::new(&base_url),
                vendors,
                tracks,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

/// Same wiring as `main`, with every vendor pointed at the mock server.
/// Mureka has a key but no account, so it reports "not configured".
fn create_app(vendors: &MockVendors, tracks: Arc<MemoryTrackRepository>) -> anyhow::Result<Router> {
    let http_client = build_http_client(Duration::from_secs(5))?;
    let track_repo: Arc<dyn TrackRepository> = tracks;

    let vendor_repos: Vec<Arc<dyn GenerationRepository>> = vec![
        Arc::new(SunoRepository::new(
            http_client.clone(),
            SunoConfig {
                api_key: Some(SUNO_KEY.to_string()),
                base_url: vendors.url("suno"),
            },
        )),
        Arc::new(KieRepository::new(
            http_client.clone(),
            KieConfig {
                api_key: Some(KIE_KEY.to_string()),
                base_url: vendors.url("kie"),
                model: "V3_5".to_string(),
            },
        )),
        Arc::new(MusicGenRepository::new(
            http_client.clone(),
            MusicGenConfig {
                base_url: vendors.url("musicgen"),
            },
        )),
        Arc::new(MurekaRepository::new(
            http_client,
            MurekaConfig {
                rapidapi_key: Some(RAPIDAPI_KEY.to_string()),
                account: None,
                base_url: vendors.url("mureka"),
            },
        )),
    ];

    let generator: Arc<dyn CreativeGenerator> = Arc::new(RealGenerator::groq_at(
        &vendors.url("openai"),
        "test-groq-key",
        "test-model".to_string(),
    ));
    let creative_service = Arc::new(CreativeService::new(
        generator,
        Arc::new(SimulatedGenerator::new()),
    ));

    let synthesizer: Arc<dyn VocalSynthesizer> = Arc::new(OpenAiVocalRepository::with_api_base(
        &vendors.url("openai"),
        "test-openai-key",
        "tts-1".to_string(),
    ));
    let vocal_service = Arc::new(VocalService::new(Some(synthesizer)));

    let generation_service = Arc::new(GenerationService::new(
        vendor_repos,
        track_repo.clone(),
        creative_service.clone(),
        TEST_POLL_INTERVAL,
        None,
    ));

    Ok(build_router(
        track_repo.clone(),
        Arc::new(GenerationController::new(generation_service)),
        Arc::new(TrackController::new(track_repo)),
        Arc::new(CreativeController::new(creative_service)),
        Arc::new(VocalsController::new(vocal_service)),
        true,
    ))
}
