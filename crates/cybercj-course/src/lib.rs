//! Browser-independent core of the CyberCJ course pages
//!
//! The chat widget, quiz engine and lesson navigator live here as plain Rust.
//! Each talks to the page only through a small port trait (`ChatView`,
//! `QuizView`, `ContentFrame`, `PreviewPanel`), so the same logic runs under
//! wasm in the browser and natively in tests.

pub mod chat;
pub mod config;
pub mod error;
pub mod markdown;
pub mod navigator;
pub mod popup;
pub mod quiz;

pub use chat::{ChatApi, ChatApiError, ChatSession, ChatView, HttpChatApi, SendOutcome, Timer};
pub use config::{ChatConfig, CourseConfig, Endpoints, PopupConfig, QuizConfig};
pub use error::{ConfigError, ConfigResult};
pub use navigator::{ContentFrame, LessonNavigator};
pub use quiz::{QuizEngine, QuizScore, QuizView};
