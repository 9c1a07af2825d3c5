//! Runtime settings
//!
//! Layered loading: `config/default.toml` (optional), then an explicit file,
//! then `FRONTDESK_*` environment overrides (`__` as section separator, e.g.
//! `FRONTDESK_SERVER__PORT=8080`).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub vision: VisionSettings,
    #[serde(default)]
    pub stt: SttSettings,
    #[serde(default)]
    pub llm: LlmSettings,
}

/// HTTP/WebSocket server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// When false, CORS is fully permissive (development only).
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum concurrent connections before new sessions are refused.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_true() -> bool {
    true
}
fn default_max_sessions() -> usize {
    64
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Vision pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionSettings {
    /// Path to the face-detection ONNX model.
    #[serde(default = "default_detector_model")]
    pub detector_model: String,
    /// Path to the emotion-classification ONNX model.
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,
    /// Path to the TTF font used for overlay captions.
    #[serde(default = "default_caption_font")]
    pub caption_font: String,
    /// Square input size of the face detector.
    #[serde(default = "default_detector_input")]
    pub detector_input: u32,
    /// Square input size of the emotion classifier.
    #[serde(default = "default_classifier_input")]
    pub classifier_input: u32,
    /// Minimum face-detection score.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
    /// IoU threshold for non-maximum suppression.
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
    /// Capacity of the per-connection emotion window.
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
    /// Directory of frames served by the development capture source.
    #[serde(default = "default_capture_dir")]
    pub capture_dir: String,
    /// Replay the capture directory indefinitely instead of exhausting it.
    #[serde(default)]
    pub loop_capture: bool,
}

fn default_detector_model() -> String {
    "models/face-detector.onnx".to_string()
}
fn default_classifier_model() -> String {
    "models/emotion-recognition.onnx".to_string()
}
fn default_caption_font() -> String {
    "assets/caption.ttf".to_string()
}
fn default_detector_input() -> u32 {
    640
}
fn default_classifier_input() -> u32 {
    224
}
fn default_score_threshold() -> f32 {
    0.5
}
fn default_iou_threshold() -> f32 {
    0.45
}
fn default_window_capacity() -> usize {
    20
}
fn default_capture_dir() -> String {
    "capture".to_string()
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            detector_model: default_detector_model(),
            classifier_model: default_classifier_model(),
            caption_font: default_caption_font(),
            detector_input: default_detector_input(),
            classifier_input: default_classifier_input(),
            score_threshold: default_score_threshold(),
            iou_threshold: default_iou_threshold(),
            window_capacity: default_window_capacity(),
            capture_dir: default_capture_dir(),
            loop_capture: false,
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttSettings {
    /// Path to the whisper GGML model.
    #[serde(default = "default_stt_model")]
    pub model_path: String,
    /// Beam width for decoding.
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    /// Hint language passed to the decoder ("auto" to detect).
    #[serde(default = "default_stt_language")]
    pub language: String,
}

fn default_stt_model() -> String {
    "models/ggml-base.bin".to_string()
}
fn default_beam_width() -> usize {
    5
}
fn default_stt_language() -> String {
    "en".to_string()
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            model_path: default_stt_model(),
            beam_width: default_beam_width(),
            language: default_stt_language(),
        }
    }
}

/// Chat-completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API endpoint (OpenAI-compatible).
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// Model name.
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API key; falls back to `OPENAI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial backoff in milliseconds (doubles each retry).
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o".to_string()
}
fn default_max_tokens() -> usize {
    512
}
fn default_temperature() -> f32 {
    0.7
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff_ms() -> u64 {
    100
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl LlmSettings {
    /// Resolve the API key from settings or the conventional env var.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

/// Load settings from the default file, an optional explicit file, and
/// environment overrides.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false));

    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix("FRONTDESK").separator("__"))
        .build()?
        .try_deserialize::<Settings>()?;

    tracing::debug!(
        host = %settings.server.host,
        port = settings.server.port,
        "settings loaded"
    );

    Ok(settings)
}
