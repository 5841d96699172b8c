use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use genstudio_backend::controllers::{
    creative::CreativeController, generation::GenerationController, tracks::TrackController,
    vocals::VocalsController,
};
use genstudio_backend::domain::creative::{CreativeGenerator, CreativeService};
use genstudio_backend::domain::generation::{GenerationRepository, GenerationService};
use genstudio_backend::domain::track::TrackRepository;
use genstudio_backend::domain::vocals::{VocalService, VocalSynthesizer};
use genstudio_backend::infrastructure::config::{Config, LogFormat};
use genstudio_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use genstudio_backend::infrastructure::http::{build_router, start_http_server};
use genstudio_backend::infrastructure::repositories::{
    build_http_client, KieRepository, MurekaRepository, MusicGenRepository, OpenAiVocalRepository,
    PgTrackRepository, RealGenerator, SimulatedGenerator, SunoRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting GenStudio Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    tracing::info!(
        suno = config.suno.api_key.is_some(),
        kie = config.kie.api_key.is_some(),
        musicgen_backend = %config.musicgen.base_url,
        mureka = config.mureka.rapidapi_key.is_some() && config.mureka.account.is_some(),
        openai = config.openai_api_key.is_some(),
        groq = config.groq_api_key.is_some(),
        "Vendor credentials check"
    );

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool and http client)
    tracing::info!("Instantiating repositories...");
    let http_client = build_http_client(config.vendor_timeout())?;
    let track_repo: Arc<dyn TrackRepository> = Arc::new(PgTrackRepository::new(pool.clone()));
    let vendor_repos: Vec<Arc<dyn GenerationRepository>> = vec![
        Arc::new(SunoRepository::new(http_client.clone(), config.suno.clone())),
        Arc::new(KieRepository::new(http_client.clone(), config.kie.clone())),
        Arc::new(MusicGenRepository::new(http_client.clone(), config.musicgen.clone())),
        Arc::new(MurekaRepository::new(http_client, config.mureka.clone())),
    ];

    // 2. Pick the text generator
    let simulated: Arc<dyn CreativeGenerator> = Arc::new(SimulatedGenerator::new());
    let generator: Arc<dyn CreativeGenerator> = if let Some(key) = &config.openai_api_key {
        Arc::new(RealGenerator::openai(key, config.openai_model.clone()))
    } else if let Some(key) = &config.groq_api_key {
        Arc::new(RealGenerator::groq(key, config.groq_model.clone()))
    } else {
        tracing::warn!("No OPENAI_API_KEY or GROQ_API_KEY set, text generation is simulated");
        simulated.clone()
    };
    tracing::info!(provider = %generator.provider(), "Text generator selected");

    let synthesizer: Option<Arc<dyn VocalSynthesizer>> = match &config.openai_api_key {
        Some(key) => Some(Arc::new(OpenAiVocalRepository::new(
            key,
            config.openai_tts_model.clone(),
        ))),
        None => {
            tracing::warn!("No OPENAI_API_KEY set, vocals run in demo mode");
            None
        }
    };

    // 3. Instantiate services (inject repositories and clients)
    tracing::info!("Instantiating services...");
    let creative_service = Arc::new(CreativeService::new(generator, simulated));
    let vocal_service = Arc::new(VocalService::new(synthesizer));
    let generation_service = Arc::new(GenerationService::new(
        vendor_repos,
        track_repo.clone(),
        creative_service.clone(),
        config.poll_interval(),
        config.poll_max_attempts,
    ));

    // 4. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let generation_controller = Arc::new(GenerationController::new(generation_service));
    let track_controller = Arc::new(TrackController::new(track_repo.clone()));
    let creative_controller = Arc::new(CreativeController::new(creative_service));
    let vocals_controller = Arc::new(VocalsController::new(vocal_service));

    // Start HTTP server with all routes
    let app = build_router(
        track_repo,
        generation_controller,
        track_controller,
        creative_controller,
        vocals_controller,
        config.is_development(),
    );
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "genstudio_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "genstudio_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
