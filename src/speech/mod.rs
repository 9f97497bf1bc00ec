pub mod command;

use async_trait::async_trait;
use thiserror::Error;

pub use self::command::{ CommandRecognizer, CommandSynthesizer, SpeechSettings };

pub const VOICE_UNSUPPORTED_TOOLTIP: &str = "Voice input is not supported in this environment.";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to start speech command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("speech command exited with {0}")]
    Failed(String),
    #[error("no speech was recognized")]
    EmptyTranscript,
}

/// Speaks text without waiting for playback to finish.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, text: &str);
}

/// Single-shot recognition: one utterance in, one transcript out.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self) -> Result<String, SpeechError>;
}
