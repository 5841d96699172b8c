use super::{LyricsRequest, MusicBrief, MusicDescription, VideoConceptRequest};
use regex::Regex;
use std::sync::LazyLock;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json pattern"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"));

fn optional_line(label: &str, value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => format!("{}: {}\n", label, v),
        _ => String::new(),
    }
}

pub fn lyrics_prompt(request: &LyricsRequest) -> String {
    format!(
        "Write original song lyrics.\n\
         Theme/Idea: {}\n\
         {}{}{}\n\
         Use the structure [Verse 1], [Chorus], [Verse 2], [Chorus], [Bridge], [Chorus]. \
         Keep the lines singable and emotionally consistent.",
        request.prompt.trim(),
        optional_line("Genre", &request.genre),
        optional_line("Mood", &request.mood),
        optional_line("Theme", &request.theme),
    )
}

pub fn video_concept_prompt(request: &VideoConceptRequest) -> String {
    format!(
        "Create a music video concept and storyboard.\n\
         Song/Theme: {}\n\
         {}{}{}\n\
         Cover: overall narrative, scene-by-scene breakdown with timestamps, visual aesthetics, \
         camera work, lighting and colour palette, props and locations, performance elements, \
         post-production effects.",
        request.prompt.trim(),
        optional_line("Visual Style", &request.style),
        optional_line("Duration", &request.duration),
        optional_line("Budget Level", &request.budget),
    )
}

pub fn music_description_prompt(brief: &MusicBrief) -> String {
    let lyrics = match brief.lyrics.as_deref().map(str::trim) {
        Some(l) if !l.is_empty() => format!("The lyrics are: {}", l),
        _ => "This should be an instrumental piece.".to_string(),
    };
    let duration = brief
        .duration_seconds
        .map(|d| format!("Target length: {}:{:02}.\n", d / 60, d % 60))
        .unwrap_or_default();

    format!(
        "Describe how to produce a {} song with a {} mood in {} style.\n\
         {}\n\
         {}Title: {}\n\
         Answer with a single JSON object with the keys \"musicDescription\" (string), \
         \"structure\" (array of section names), \"tempo\" (BPM number), \"key\" (string), \
         \"instrumentation\" (array of strings) and \"mixingNotes\" (string).",
        brief.genre.as_deref().unwrap_or("pop"),
        brief.mood.as_deref().unwrap_or("happy"),
        brief.style.as_deref().unwrap_or("modern"),
        lyrics,
        duration,
        brief.title.as_deref().unwrap_or("Untitled Track"),
    )
}

/// Pull the JSON object out of a chat answer (models like to add code fences)
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Fold a music description into a vendor prompt
pub fn enhanced_prompt(
    prompt: &str,
    lyrics: Option<&str>,
    description: &MusicDescription,
) -> String {
    let mut sections = vec![
        prompt.trim().to_string(),
        description.music_description.trim().to_string(),
    ];

    if let Some(lyrics) = lyrics.map(str::trim).filter(|l| !l.is_empty()) {
        sections.push(format!("Lyrics: {}", lyrics));
    }
    if !description.instrumentation.is_empty() {
        sections.push(format!("Instruments: {}", description.instrumentation.join(", ")));
    }
    let notes = description.mixing_notes.as_deref().map(str::trim);
    if let Some(notes) = notes.filter(|n| !n.is_empty()) {
        sections.push(format!("Mixing notes: {}", notes));
    }

    let joined = sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    BLANK_LINES.replace_all(&joined, "\n\n").trim().to_string()
}
