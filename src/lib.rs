pub mod app;
pub mod backend;
pub mod cli;
pub mod models;
pub mod session;
pub mod speech;
pub mod store;
pub mod view;
#[cfg(test)]
mod testing;

use app::App;
use backend::HttpBackend;
use cli::Args;
use log::info;
use session::ChatSession;
use speech::{ CommandRecognizer, CommandSynthesizer, SpeechRecognizer, SpeechSettings, SpeechSynthesizer };
use std::error::Error;
use std::sync::Arc;
use view::TerminalView;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Client Configuration ---");
    info!("Backend URL: {}", args.backend_url);
    info!("Speech Language: {}", args.speech_lang);
    info!("Text-to-Speech Command: {}", args.tts_command.as_deref().unwrap_or("disabled"));
    info!("Speech Recognition Command: {}", args.stt_command.as_deref().unwrap_or("disabled"));
    info!("-------------------------");

    let backend = Arc::new(HttpBackend::new(&args.backend_url)?);
    let settings = SpeechSettings {
        lang: args.speech_lang.clone(),
        rate: args.speech_rate,
        pitch: args.speech_pitch,
    };
    let synthesizer = args.tts_command
        .as_deref()
        .and_then(|cmd| CommandSynthesizer::new(cmd, settings.clone()))
        .map(|s| Arc::new(s) as Arc<dyn SpeechSynthesizer>);
    let recognizer = args.stt_command
        .as_deref()
        .and_then(|cmd| CommandRecognizer::new(cmd, settings.clone()))
        .map(|r| Arc::new(r) as Arc<dyn SpeechRecognizer>);

    let view = Arc::new(TerminalView::stdin());
    let session = ChatSession::new(backend, view.clone())
        .with_synthesizer(synthesizer)
        .with_recognizer(recognizer);

    app::print_help();
    App::new(session, view).run().await
}
