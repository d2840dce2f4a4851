//! # Umiclean Telegram Bot
//!
//! A Telegram bot that walks a customer through choosing a cleaning type,
//! optional add-on services and the room area, then quotes the price from an
//! editable price table.

pub mod admin;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod localization;
pub mod price_table;
pub mod pricing;
pub mod session;
pub mod wizard;
