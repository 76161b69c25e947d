//! Telegram Channel for DeckBot

pub mod command;
pub mod courier;
pub mod flow;
pub mod messages;

pub use courier::{Courier, TeloxideCourier, TextFormat};
pub use flow::{DeckFlow, FlowSettings, Incoming, Outcome};

use deckbot_core::AppConfig;
use deckbot_slides::SlidesClient;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};

#[derive(Clone)]
pub struct TelegramChannel {
    token: String,
    config: AppConfig,
}

impl TelegramChannel {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let token = config
            .telegram_bot_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("TELEGRAM_BOT_TOKEN not set"))?;

        Ok(Self {
            token,
            config: config.clone(),
        })
    }

    /// Start the Telegram bot listener (Long Polling). Runs until the process stops.
    pub async fn start(&self) -> anyhow::Result<()> {
        info!("📡 Telegram Gateway Starting...");

        let bot = Bot::new(&self.token);
        let commands = vec![
            BotCommand::new("start", "Say hello and show an example"),
            BotCommand::new("generate", "Generate a presentation: /generate <topic>"),
        ];
        if let Err(e) = bot.set_my_commands(commands).await {
            warn!("⚠️ Telegram: could not register the command menu: {}", e);
        }

        let flow = Arc::new(DeckFlow::new(
            TeloxideCourier::new(bot.clone()),
            SlidesClient::from_config(&self.config),
            FlowSettings::from_config(&self.config),
        ));

        info!("✅ Telegram Gateway Active. Decks go to {}", self.config.storage_dir().display());

        teloxide::repl(bot, move |msg: Message| {
            let flow = flow.clone();
            async move {
                let incoming = Incoming::from_message(&msg);
                // Generation takes minutes; don't hold up the next update
                tokio::spawn(async move {
                    flow.handle(incoming).await;
                });
                respond(())
            }
        })
        .await;

        Ok(())
    }
}
