use anyhow::{Context, Result};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use umiclean::admin::AdminGate;
use umiclean::bot::{schema, BotState, Command};
use umiclean::catalog::default_services;
use umiclean::config::BotConfig;
use umiclean::db::{self as price_db, PgPriceTable};
use umiclean::localization::init_localization_with_default;
use umiclean::price_table::{InMemoryPriceTable, PriceTable};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,umiclean=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Umiclean Telegram Bot");

    let config = BotConfig::from_env()?;
    info!(admin_user_id = config.admin_user_id, "Configuration loaded");

    init_localization_with_default(&config.default_language)?;

    let prices: Arc<dyn PriceTable> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPool::connect(database_url)
                .await
                .context("Failed to connect to database")?;
            price_db::init_database_schema(&pool).await?;
            price_db::seed_prices(&pool, &default_services()).await?;
            Arc::new(PgPriceTable::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory prices; admin edits will not survive a restart");
            Arc::new(InMemoryPriceTable::new(default_services()))
        }
    };

    let state = BotState::new(prices, AdminGate::new(config.admin_user_id));

    let bot = Bot::new(config.bot_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
