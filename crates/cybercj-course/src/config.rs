//! Course wiring loaded from TOML
//!
//! The shipped course is embedded at compile time; every field falls back to
//! the shipped value, so a partial document is enough to override one knob.

use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use cybercj_types::{LessonMap, QuizBank};

use crate::error::{ConfigError, ConfigResult};

/// Course wiring shipped with the site
pub const BUNDLED_COURSE: &str = include_str!("../assets/course.toml");

/// Answer keys shipped with the site
pub const BUNDLED_QUIZ_BANK: &str = include_str!("../assets/quiz_bank.toml");

/// Default chat endpoint, relative to the page origin
pub const CHAT_ENDPOINT: &str = "/chat_multi_agent";

/// Default feedback endpoint, relative to the page origin
pub const FEEDBACK_ENDPOINT: &str = "/feedback";

/// Default number of questions drawn per quiz
pub const QUESTION_LIMIT: usize = 15;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub popup: PopupConfig,
    /// Lesson map per course site (`cybercj`, `challenges`)
    #[serde(default)]
    pub lessons: BTreeMap<String, LessonMap>,
    #[serde(default)]
    pub quizzes: QuizBank,
}

impl CourseConfig {
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// The embedded course plus the embedded quiz bank
    pub fn bundled() -> ConfigResult<Self> {
        let mut config = Self::from_toml_str(BUNDLED_COURSE)?;
        config.quizzes = load_quiz_bank(BUNDLED_QUIZ_BANK)?;
        log::debug!(
            "Loaded bundled course: {} lesson maps, {} quizzes",
            config.lessons.len(),
            config.quizzes.len()
        );
        Ok(config)
    }

    pub fn lesson_map(&self, course: &str) -> ConfigResult<&LessonMap> {
        self.lessons
            .get(course)
            .ok_or_else(|| ConfigError::UnknownCourse(course.to_string()))
    }
}

/// Parse a quiz bank document (`[quizN]` tables of `qN = answer`)
pub fn load_quiz_bank(raw: &str) -> ConfigResult<QuizBank> {
    Ok(toml::from_str(raw)?)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub chat_endpoint: String,
    pub feedback_endpoint: String,
    pub assistant_name: String,
    pub typing_label: String,
    pub welcome_message: String,
    pub new_topic_message: String,
    pub connection_error_message: String,
    pub welcome_delay_ms: u64,
    pub new_topic_delay_ms: u64,
    /// Preset prompts offered by the module selector
    pub module_prompts: BTreeMap<String, String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: CHAT_ENDPOINT.to_string(),
            feedback_endpoint: FEEDBACK_ENDPOINT.to_string(),
            assistant_name: "CJ-Mentor".to_string(),
            typing_label: "CJ-Mentor is thinking...".to_string(),
            welcome_message: "Hello! I'm **CJ-Mentor**, your cybersecurity learning companion. \
                I can help you understand cybersecurity concepts and create personalized learning plans. \
                What would you like to learn about today?"
                .to_string(),
            new_topic_message: "Great! Let's start a **new topic**. \
                What cybersecurity concept would you like to explore today?"
                .to_string(),
            connection_error_message:
                "Sorry, I encountered an error trying to connect. Please try again later."
                    .to_string(),
            welcome_delay_ms: 500,
            new_topic_delay_ms: 100,
            module_prompts: BTreeMap::new(),
        }
    }
}

impl ChatConfig {
    pub fn welcome_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_delay_ms)
    }

    pub fn new_topic_delay(&self) -> Duration {
        Duration::from_millis(self.new_topic_delay_ms)
    }

    /// Resolve both endpoints against the page origin
    pub fn endpoints(&self, base_url: &str) -> ConfigResult<Endpoints> {
        let base = Url::parse(base_url).map_err(|e| ConfigError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let join = |path: &str| {
            base.join(path)
                .map(String::from)
                .map_err(|e| ConfigError::BaseUrl {
                    url: format!("{}{}", base_url, path),
                    reason: e.to_string(),
                })
        };
        Ok(Endpoints {
            chat: join(&self.chat_endpoint)?,
            feedback: join(&self.feedback_endpoint)?,
        })
    }
}

/// Absolute URLs the chat client posts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub chat: String,
    pub feedback: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub question_limit: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_limit: QUESTION_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Opened in a new tab when the live preview is clicked
    pub live_preview_url: String,
    /// `window.open` features for `.popupLink` anchors
    pub window_features: String,
    pub image_width_px: u32,
    pub image_offset_top: f64,
    pub image_offset_left: f64,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            live_preview_url: "https://livethreatmap.radware.com/".to_string(),
            window_features: "width=600,height=600,scrollbars=yes,resizable=yes".to_string(),
            image_width_px: 200,
            image_offset_top: -100.0,
            image_offset_left: 600.0,
        }
    }
}
