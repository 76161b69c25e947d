//! Conversation flow: turns incoming chat messages into SlidesGPT jobs and replies.

use crate::command::{Command, parse_command};
use crate::courier::{Courier, TextFormat};
use crate::messages;
use deckbot_core::AppConfig;
use deckbot_slides::{PollPolicy, SlidesClient, SlidesError};
use std::collections::HashSet;
use std::path::PathBuf;
use teloxide::types::Message;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// An incoming chat message, stripped down to what the flow needs.
/// Stickers, photos and other non-text messages carry an empty `text`.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub chat_id: i64,
    pub user_id: Option<u64>,
    pub username: Option<String>,
    pub text: String,
}

impl Incoming {
    pub fn from_message(msg: &Message) -> Self {
        let user = msg.from.as_ref();
        Self {
            chat_id: msg.chat.id.0,
            user_id: user.map(|u| u.id.0),
            username: user.and_then(|u| u.username.clone()),
            text: msg.text().unwrap_or_default().to_string(),
        }
    }

    fn greeting_key(&self) -> GreetingKey {
        match self.user_id {
            Some(id) => GreetingKey::User(id),
            None => GreetingKey::Chat(self.chat_id),
        }
    }
}

/// Who has already seen the greeting: the sender, or the chat when there is no sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GreetingKey {
    User(u64),
    Chat(i64),
}

#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub storage_dir: PathBuf,
    pub format: String,
    pub poll: PollPolicy,
    pub admin_chat: Option<i64>,
}

impl FlowSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            storage_dir: config.storage_dir(),
            format: config.format.clone(),
            poll: PollPolicy::from_config(config),
            admin_chat: config.admin_chat_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Greeted,
    NotUnderstood,
    UsageShown,
    Delivered(PathBuf),
    SubmitFailed,
    NotCreated,
    DownloadFailed,
}

pub struct DeckFlow<C> {
    courier: C,
    slides: SlidesClient,
    settings: FlowSettings,
    greeted: Mutex<HashSet<GreetingKey>>,
}

impl<C: Courier> DeckFlow<C> {
    pub fn new(courier: C, slides: SlidesClient, settings: FlowSettings) -> Self {
        Self {
            courier,
            slides,
            settings,
            greeted: Mutex::new(HashSet::new()),
        }
    }

    pub async fn handle(&self, msg: Incoming) -> Outcome {
        match parse_command(&msg.text) {
            Command::Start | Command::Help => {
                self.greeted.lock().await.insert(msg.greeting_key());
                self.say(msg.chat_id, messages::GREETING, TextFormat::MarkdownV2).await;
                Outcome::Greeted
            }
            Command::Generate(prompt) if prompt.is_empty() => {
                self.say(msg.chat_id, messages::USAGE, TextFormat::MarkdownV2).await;
                Outcome::UsageShown
            }
            Command::Generate(prompt) => self.generate(&msg, &prompt).await,
            Command::Unknown => {
                let first_contact = self.greeted.lock().await.insert(msg.greeting_key());
                if first_contact {
                    self.say(msg.chat_id, messages::GREETING, TextFormat::MarkdownV2).await;
                    Outcome::Greeted
                } else {
                    self.say(msg.chat_id, messages::NOT_UNDERSTOOD, TextFormat::MarkdownV2).await;
                    Outcome::NotUnderstood
                }
            }
        }
    }

    async fn generate(&self, msg: &Incoming, prompt: &str) -> Outcome {
        info!("📩 [Telegram] /generate from {:?}: {}", msg.username, prompt);
        self.say(msg.chat_id, &messages::generating(prompt), TextFormat::MarkdownV2).await;

        let format = &self.settings.format;
        let job = match self.slides.generate(prompt, format).await {
            Ok(job) => job,
            Err(SlidesError::MissingId { status }) => {
                warn!("SlidesGPT returned no id (HTTP {})", status);
                self.say(msg.chat_id, messages::NOT_CREATED, TextFormat::Plain).await;
                return Outcome::NotCreated;
            }
            Err(e) => {
                error!("❌ Generation request failed: {}", e);
                self.say(msg.chat_id, messages::COULD_NOT_CREATE, TextFormat::Plain).await;
                return Outcome::SubmitFailed;
            }
        };

        if let Some(admin) = self.settings.admin_chat {
            let notice = messages::admin_notice(msg.username.as_deref(), msg.user_id);
            self.say(admin, &notice, TextFormat::Plain).await;
        }

        let fetched = self
            .slides
            .fetch_artifact(&job, format, &self.settings.storage_dir, &self.settings.poll)
            .await;

        match fetched {
            Ok(path) => {
                if let Err(e) = self
                    .courier
                    .send_document(msg.chat_id, &path, &messages::caption(prompt))
                    .await
                {
                    warn!("⚠️ Telegram: failed to deliver {}: {}", path.display(), e);
                }
                Outcome::Delivered(path)
            }
            Err(e) => {
                error!("❌ Download of {} failed: {}", job, e);
                self.say(msg.chat_id, messages::DOWNLOAD_FAILED, TextFormat::Plain).await;
                Outcome::DownloadFailed
            }
        }
    }

    /// Sends a text and logs delivery failures; the transport is not retried.
    async fn say(&self, chat: i64, text: &str, format: TextFormat) {
        if let Err(e) = self.courier.send_text(chat, text, format).await {
            warn!("⚠️ Telegram: failed to send message to {}: {}", chat, e);
        }
    }
}
