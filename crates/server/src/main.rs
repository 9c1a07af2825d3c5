//! Front desk agent server binary
//!
//! Startup phase: load settings, load every model and asset (failures abort
//! here, never mid-session), then serve the event surface.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use frontdesk_config::load_settings;
use frontdesk_core::FrameSource;
use frontdesk_llm::{LlmConfig, OpenAiBackend};
use frontdesk_server::{create_router, AppState, FrameSourceFactory};
use frontdesk_speech::{SttConfig, WhisperTranscriber};
use frontdesk_vision::{
    AnnotatorConfig, ClassifierConfig, DetectorConfig, EmotionSensor, FrameAnnotator,
    ImageDirSource, YoloFaceDetector,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1);
    let settings = match load_settings(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => fatal("settings", &e.to_string()),
    };

    // Model loading is the explicit startup phase: any failure is fatal.
    let detector = match YoloFaceDetector::new(DetectorConfig::from(&settings.vision)) {
        Ok(detector) => Arc::new(detector),
        Err(e) => fatal("face_detector", &e.to_string()),
    };

    let classifier = match frontdesk_vision::OnnxEmotionClassifier::new(ClassifierConfig::from(
        &settings.vision,
    )) {
        Ok(classifier) => Arc::new(classifier),
        Err(e) => fatal("emotion_classifier", &e.to_string()),
    };

    let annotator = match FrameAnnotator::new(
        &settings.vision.caption_font,
        AnnotatorConfig::default(),
    ) {
        Ok(annotator) => Arc::new(annotator),
        Err(e) => fatal("caption_font", &e.to_string()),
    };

    let stt = match WhisperTranscriber::new(SttConfig::from(&settings.stt)) {
        Ok(stt) => Arc::new(stt),
        Err(e) => fatal("whisper", &e.to_string()),
    };

    let backend = match OpenAiBackend::new(LlmConfig::from(&settings.llm)) {
        Ok(backend) => Arc::new(backend),
        Err(e) => fatal("chat_backend", &e.to_string()),
    };

    let sensor = Arc::new(EmotionSensor::new(detector, classifier));

    let capture_dir = settings.vision.capture_dir.clone();
    let loop_capture = settings.vision.loop_capture;
    let frame_sources: FrameSourceFactory = Arc::new(move || {
        let source = ImageDirSource::open(&capture_dir, loop_capture)?;
        Ok(Box::new(source) as Box<dyn FrameSource>)
    });

    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(settings, backend, stt, sensor, annotator, frame_sources);
    let router = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => fatal("bind", &e.to_string()),
    };

    tracing::info!(addr = %bind_addr, "front desk agent listening");

    if let Err(e) = axum::serve(listener, router).await {
        fatal("serve", &e.to_string());
    }
}

fn fatal(operation: &str, error: &str) -> ! {
    tracing::error!(operation, error, "startup failed");
    std::process::exit(1);
}
