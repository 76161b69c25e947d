use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    MarkdownV2,
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait Courier: Send + Sync {
    async fn send_text(&self, chat: i64, text: &str, format: TextFormat) -> anyhow::Result<()>;

    async fn send_document(&self, chat: i64, path: &Path, caption: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: Courier + ?Sized> Courier for Arc<T> {
    async fn send_text(&self, chat: i64, text: &str, format: TextFormat) -> anyhow::Result<()> {
        (**self).send_text(chat, text, format).await
    }

    async fn send_document(&self, chat: i64, path: &Path, caption: &str) -> anyhow::Result<()> {
        (**self).send_document(chat, path, caption).await
    }
}

#[derive(Clone)]
pub struct TeloxideCourier {
    bot: Bot,
}

impl TeloxideCourier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Courier for TeloxideCourier {
    async fn send_text(&self, chat: i64, text: &str, format: TextFormat) -> anyhow::Result<()> {
        if format == TextFormat::MarkdownV2 {
            // Fall back to plain text if Telegram rejects the markup
            match self
                .bot
                .send_message(ChatId(chat), text)
                .parse_mode(ParseMode::MarkdownV2)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => warn!("⚠️ Telegram: MarkdownV2 failed, retrying with plain text. Error: {}", e),
            }
        }

        self.bot.send_message(ChatId(chat), text).await?;
        Ok(())
    }

    async fn send_document(&self, chat: i64, path: &Path, caption: &str) -> anyhow::Result<()> {
        info!("📤 Telegram: sending {} to chat {}", path.display(), chat);
        self.bot
            .send_document(ChatId(chat), InputFile::file(path.to_path_buf()))
            .caption(caption)
            .await?;
        Ok(())
    }
}
