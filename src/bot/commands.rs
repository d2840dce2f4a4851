//! Bot command definitions

use teloxide::utils::command::BotCommands;

/// All bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "Cleaning cost calculator commands:"
)]
pub enum Command {
    #[command(description = "Calculate the cost of a cleaning")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Abandon the current calculation")]
    Cancel,

    #[command(description = "Admin: list all prices")]
    Prices,

    #[command(description = "Admin: change a price, e.g. /setprice fridge_price 1600")]
    SetPrice(String),
}

/// Split `/setprice` arguments into key and value
pub fn parse_setprice_args(args: &str) -> Option<(&str, &str)> {
    let mut parts = args.split_whitespace();
    let key = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((key, value))
}
