//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: Slash commands understood by the bot
//! - `message_handler`: Handles commands and free-text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats messages
//! - `dialogue_manager`: Runs wizard events and renders the resulting transition

pub mod callback_handler;
pub mod commands;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::admin::AdminGate;
use crate::price_table::PriceTable;
use crate::session::InMemorySessionStore;
use crate::wizard::Wizard;

pub use callback_handler::callback_handler;
pub use commands::Command;
pub use message_handler::{command_handler, text_handler};

/// Wizard as wired into the running bot
pub type BotWizard = Wizard<InMemorySessionStore>;

/// Shared dependencies injected into every handler
#[derive(Clone)]
pub struct BotState {
    pub wizard: Arc<BotWizard>,
    pub prices: Arc<dyn PriceTable>,
    pub admin: AdminGate,
}

impl BotState {
    pub fn new(prices: Arc<dyn PriceTable>, admin: AdminGate) -> Self {
        Self {
            wizard: Arc::new(Wizard::new(InMemorySessionStore::new())),
            prices,
            admin,
        }
    }
}

/// Dispatcher tree: commands first, then free text, then button presses
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let message_handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(text_handler));

    dptree::entry()
        .branch(message_handler)
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
