use async_trait::async_trait;
use log::{ debug, error };
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use super::{ SpeechError, SpeechRecognizer, SpeechSynthesizer };

pub const LANG_ENV: &str = "CHAT_SPEECH_LANG";
pub const RATE_ENV: &str = "CHAT_SPEECH_RATE";
pub const PITCH_ENV: &str = "CHAT_SPEECH_PITCH";

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Splits a configured command line into program and arguments.
fn split_command(command_line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command_line.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn build_command(program: &str, args: &[String], settings: &SpeechSettings) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .env(LANG_ENV, &settings.lang)
        .env(RATE_ENV, settings.rate.to_string())
        .env(PITCH_ENV, settings.pitch.to_string())
        .kill_on_drop(false);
    cmd
}

/// Text-to-speech through an external program that reads the text on stdin.
///
/// Utterances are queued and spoken one after another by a single worker
/// task, started on the first `speak`.
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    settings: SpeechSettings,
    queue: OnceLock<mpsc::UnboundedSender<String>>,
}

impl CommandSynthesizer {
    pub fn new(command_line: &str, settings: SpeechSettings) -> Option<Self> {
        let (program, args) = split_command(command_line)?;
        Some(Self { program, args, settings, queue: OnceLock::new() })
    }

    fn queue(&self) -> &mpsc::UnboundedSender<String> {
        self.queue.get_or_init(|| {
            let (tx, mut rx) = mpsc::unbounded_channel::<String>();
            let program = self.program.clone();
            let args = self.args.clone();
            let settings = self.settings.clone();
            tokio::spawn(async move {
                while let Some(text) = rx.recv().await {
                    if let Err(e) = Self::run(&program, &args, &settings, &text).await {
                        error!("Text-to-speech failed: {}", e);
                    }
                }
                debug!("Text-to-speech queue closed");
            });
            tx
        })
    }

    async fn run(program: &str, args: &[String], settings: &SpeechSettings, text: &str) -> Result<(), SpeechError> {
        let mut cmd = build_command(program, args, settings);
        cmd.stdin(Stdio::piped()).stdout(Stdio::null()).stderr(Stdio::null());
        let mut child = cmd
            .spawn()
            .map_err(|source| SpeechError::Spawn { command: program.to_string(), source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes()).await
                .map_err(|source| SpeechError::Spawn { command: program.to_string(), source })?;
        }

        let status = child
            .wait().await
            .map_err(|source| SpeechError::Spawn { command: program.to_string(), source })?;
        if !status.success() {
            return Err(SpeechError::Failed(status.to_string()));
        }
        Ok(())
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, text: &str) {
        if self.queue().send(text.to_string()).is_err() {
            error!("Text-to-speech worker is gone, dropping utterance");
        }
    }
}

/// Speech-to-text through an external program that prints one transcript.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    settings: SpeechSettings,
}

impl CommandRecognizer {
    pub fn new(command_line: &str, settings: SpeechSettings) -> Option<Self> {
        let (program, args) = split_command(command_line)?;
        Some(Self { program, args, settings })
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self) -> Result<String, SpeechError> {
        debug!("Starting speech recognition with '{}' ({})", self.program, self.settings.lang);
        let mut cmd = build_command(&self.program, &self.args, &self.settings);
        cmd.stdin(Stdio::null()).stderr(Stdio::inherit());
        let output = cmd
            .output().await
            .map_err(|source| SpeechError::Spawn { command: self.program.clone(), source })?;

        if !output.status.success() {
            return Err(SpeechError::Failed(output.status.to_string()));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(SpeechError::EmptyTranscript);
        }
        debug!("Speech recognition ended");
        Ok(transcript)
    }
}
