use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the chat backend (serves /get_conversations, /chat, ...)
    #[arg(long, env = "CHAT_BACKEND_URL", default_value = "http://127.0.0.1:5000")]
    pub backend_url: String,

    // --- Speech Args ---
    /// Locale used for both speech synthesis and recognition
    #[arg(long, env = "CHAT_SPEECH_LANG", default_value = "en-US")]
    pub speech_lang: String,

    /// Speaking rate passed to the text-to-speech command (0.1 to 10)
    #[arg(long, env = "CHAT_SPEECH_RATE", default_value = "1.0", value_parser = parse_rate)]
    pub speech_rate: f32,

    /// Speaking pitch passed to the text-to-speech command (0 to 2)
    #[arg(long, env = "CHAT_SPEECH_PITCH", default_value = "1.0", value_parser = parse_pitch)]
    pub speech_pitch: f32,

    /// Command that speaks text read from stdin (e.g. "espeak-ng --stdin"). Unset disables text-to-speech.
    #[arg(long, env = "CHAT_TTS_COMMAND")]
    pub tts_command: Option<String>,

    /// Command that listens once and prints the transcript on stdout. Unset disables voice input.
    #[arg(long, env = "CHAT_STT_COMMAND")]
    pub stt_command: Option<String>,

    // --- General App Args ---
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

fn parse_in_range(value: &str, min: f32, max: f32) -> Result<f32, String> {
    let parsed: f32 = value.parse().map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    if !(min..=max).contains(&parsed) {
        return Err(format!("{} is outside {}..={}", parsed, min, max));
    }
    Ok(parsed)
}

fn parse_rate(value: &str) -> Result<f32, String> {
    parse_in_range(value, 0.1, 10.0)
}

fn parse_pitch(value: &str) -> Result<f32, String> {
    parse_in_range(value, 0.0, 2.0)
}
