use crate::domain::creative::{
    CreativeError, CreativeGenerator, CreativeProvider, LyricsRequest, MusicBrief, MusicDescription,
    VideoConceptRequest,
};
use async_trait::async_trait;

const SCENE_TIMES: [(&str, &str); 4] = [
    ("0:00", "0:30"),
    ("0:30", "1:00"),
    ("1:00", "1:30"),
    ("1:30", "2:00"),
];

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Template output used when no text vendor is configured, and as the
/// fallback for video concepts
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGenerator;

impl SimulatedGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CreativeGenerator for SimulatedGenerator {
    fn provider(&self) -> CreativeProvider {
        CreativeProvider::Simulated
    }

    async fn lyrics(&self, request: &LyricsRequest) -> Result<String, CreativeError> {
        let idea = request.prompt.trim();
        let mood = or_default(&request.mood, "hopeful");

        Ok(format!(
            "[Verse 1]\n\
             I keep on thinking about {idea}\n\
             Every street light hums a {mood} tune\n\n\
             [Chorus]\n\
             Oh, {idea}, stay with me tonight\n\
             Hold on to the feeling, hold on to the light\n\n\
             [Verse 2]\n\
             Pages turning, seasons change\n\
             Still the echo sounds the same\n\n\
             [Chorus]\n\
             Oh, {idea}, stay with me tonight\n\
             Hold on to the feeling, hold on to the light\n\n\
             [Bridge]\n\
             When the world goes quiet, I can hear it too\n\n\
             [Chorus]\n\
             Oh, {idea}, stay with me tonight"
        ))
    }

    async fn video_concept(&self, request: &VideoConceptRequest) -> Result<String, CreativeError> {
        let theme = request.prompt.trim();
        let style = or_default(&request.style, "cinematic");
        let budget = or_default(&request.budget, "medium");

        let scene_descriptions = [
            format!("Opening shot introducing {theme} with a dramatic entrance"),
            "The performer on stage with dynamic lighting effects".to_string(),
            "Close-ups with emotional expressions matching the music".to_string(),
            "Finale pose with spectacular visual effects".to_string(),
        ];

        let scenes = SCENE_TIMES
            .iter()
            .zip(scene_descriptions.iter())
            .enumerate()
            .map(|(i, ((start, end), description))| {
                format!("Scene {} ({}-{}): {}", i + 1, start, end, description)
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "Concept: A {style} music video about {theme}.\n\n\
             {scenes}\n\n\
             Visual style: {style} with dynamic elements responding to the rhythm \
             and energy of the track.\n\
             Budget: {budget}"
        ))
    }

    async fn music_description(
        &self,
        brief: &MusicBrief,
    ) -> Result<MusicDescription, CreativeError> {
        let genre = or_default(&brief.genre, "Pop");
        let mood = or_default(&brief.mood, "Happy");
        let style = or_default(&brief.style, "Vocal");

        Ok(MusicDescription {
            music_description: format!("A {} song with a {} mood in {} style.", genre, mood, style),
            structure: ["intro", "verse", "chorus", "verse", "chorus", "bridge", "chorus", "outro"]
                .into_iter()
                .map(String::from)
                .collect(),
            tempo: Some(120),
            key: Some("C major".to_string()),
            instrumentation: ["piano", "guitar", "drums", "bass", "synth"]
                .into_iter()
                .map(String::from)
                .collect(),
            mixing_notes: None,
        })
    }
}
