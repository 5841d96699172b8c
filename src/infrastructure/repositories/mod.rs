pub mod kie_repository;
pub mod mureka_repository;
pub mod musicgen_repository;
pub mod openai_vocal_repository;
pub mod real_generator;
pub mod simulated_generator;
pub mod suno_repository;
pub mod track_repository;
pub mod vendor_http;

pub use kie_repository::KieRepository;
pub use mureka_repository::MurekaRepository;
pub use musicgen_repository::MusicGenRepository;
pub use openai_vocal_repository::OpenAiVocalRepository;
pub use real_generator::RealGenerator;
pub use simulated_generator::SimulatedGenerator;
pub use suno_repository::SunoRepository;
pub use track_repository::PgTrackRepository;
pub use vendor_http::{build_http_client, VendorHttpClient};
