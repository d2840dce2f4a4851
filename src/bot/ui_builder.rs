//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::catalog::{PricingMode, Service};
use crate::errors::{InputError, PricingError};
use crate::localization::{t_args_lang, t_lang};
use crate::pricing::Quote;
use crate::wizard::WizardEvent;

const BASE_TYPE_PREFIX: &str = "type:";
const EXTRA_PREFIX: &str = "extra:";
const EXTRAS_DONE: &str = "extras:done";

/// Round to one decimal place for display
pub fn format_money(value: f64) -> String {
    format!("{:.1}", value)
}

/// Callback payload for picking a base cleaning type
pub fn base_type_callback(key: &str) -> String {
    format!("{BASE_TYPE_PREFIX}{key}")
}

/// Callback payload for toggling an add-on
pub fn extra_callback(key: &str) -> String {
    format!("{EXTRA_PREFIX}{key}")
}

/// Map a callback payload back to a wizard event. Unknown payloads yield `None`.
pub fn parse_callback_data(data: &str) -> Option<WizardEvent> {
    if data == EXTRAS_DONE {
        return Some(WizardEvent::ExtrasDone);
    }
    if let Some(key) = data.strip_prefix(BASE_TYPE_PREFIX) {
        return (!key.is_empty()).then(|| WizardEvent::SelectBaseType(key.to_string()));
    }
    if let Some(key) = data.strip_prefix(EXTRA_PREFIX) {
        return (!key.is_empty()).then(|| WizardEvent::ToggleExtra(key.to_string()));
    }
    None
}

/// One button per base cleaning type
pub fn create_base_type_keyboard(services: &[Service]) -> InlineKeyboardMarkup {
    let buttons = services
        .iter()
        .map(|service| {
            vec![InlineKeyboardButton::callback(
                service.description.clone(),
                base_type_callback(&service.key),
            )]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}

/// Add-on toggles with their selection state, followed by the continue button
pub fn create_extras_keyboard(
    services: &[Service],
    selected: &[String],
    language_code: Option<&str>,
) -> InlineKeyboardMarkup {
    let mut buttons = Vec::new();

    for service in services {
        let marker = if selected.iter().any(|k| *k == service.key) {
            "✅"
        } else {
            "⬜"
        };
        buttons.push(vec![InlineKeyboardButton::callback(
            format!(
                "{} {} — {}",
                marker,
                service.description,
                format_money(service.unit_price)
            ),
            extra_callback(&service.key),
        )]);
    }

    buttons.push(vec![InlineKeyboardButton::callback(
        t_lang("extras-done-button", language_code),
        EXTRAS_DONE.to_string(),
    )]);

    InlineKeyboardMarkup::new(buttons)
}

/// Corrective message for a rejected area
pub fn area_error_message(error: &InputError, language_code: Option<&str>) -> String {
    match error {
        InputError::Empty => t_lang("invalid-area-empty", language_code),
        InputError::NotANumber(input) => {
            t_args_lang("invalid-area-number", &[("input", input.as_str())], language_code)
        }
        InputError::NotPositive(_) | InputError::Negative(_) => {
            t_lang("invalid-area-positive", language_code)
        }
        InputError::TooLarge { max, .. } => t_args_lang(
            "invalid-area-too-large",
            &[("max", format_money(*max).as_str())],
            language_code,
        ),
    }
}

/// Localized explanation of a failed quote
pub fn pricing_error_message(error: &PricingError, language_code: Option<&str>) -> String {
    match error {
        PricingError::ServiceNotFound(key) => {
            t_args_lang("quote-failed-unavailable", &[("key", key.as_str())], language_code)
        }
        PricingError::NotABaseService(_)
        | PricingError::NotAnAddon(_)
        | PricingError::MissingBaseType => t_lang("quote-failed", language_code),
    }
}

fn quote_line(description: &str, cost: f64, language_code: Option<&str>) -> String {
    t_args_lang(
        "quote-line",
        &[("service", description), ("cost", format_money(cost).as_str())],
        language_code,
    )
}

/// Itemized quote: base service, add-ons in selection order, totals
pub fn format_quote(quote: &Quote, language_code: Option<&str>) -> String {
    let mut lines = vec![
        t_lang("quote-title", language_code),
        String::new(),
        t_args_lang(
            "quote-area",
            &[("area", format_money(quote.area).as_str())],
            language_code,
        ),
    ];

    if let Some(base) = quote.base_item() {
        lines.push(quote_line(&base.description, base.cost, language_code));
    }

    lines.push(String::new());
    lines.push(t_lang("quote-extras-title", language_code));
    let extras = quote.extra_items();
    if extras.is_empty() {
        lines.push(t_lang("quote-no-extras", language_code));
    } else {
        for item in extras {
            lines.push(quote_line(&item.description, item.cost, language_code));
        }
        lines.push(t_args_lang(
            "quote-extras-total",
            &[("cost", format_money(quote.extras_cost).as_str())],
            language_code,
        ));
    }

    lines.push(String::new());
    lines.push(t_args_lang(
        "quote-total",
        &[("total", format_money(quote.total).as_str())],
        language_code,
    ));
    lines.push(t_lang("quote-restart", language_code));

    lines.join("\n")
}

/// Admin view of the full price table
pub fn format_price_list(services: &[Service], language_code: Option<&str>) -> String {
    let mut result = t_lang("admin-prices-title", language_code);
    result.push('\n');

    for service in services {
        let mode = match service.pricing_mode {
            PricingMode::PerArea => "per m²",
            PricingMode::Flat => "flat",
        };
        result.push('\n');
        result.push_str(&t_args_lang(
            "admin-price-line",
            &[
                ("key", service.key.as_str()),
                ("description", service.description.as_str()),
                ("price", format_money(service.unit_price).as_str()),
                ("category", service.category.as_str()),
                ("mode", mode),
            ],
            language_code,
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_data_round_trip() {
        assert_eq!(
            parse_callback_data(&base_type_callback("general_cleaning")),
            Some(WizardEvent::SelectBaseType("general_cleaning".to_string()))
        );
        assert_eq!(
            parse_callback_data(&extra_callback("oven_price")),
            Some(WizardEvent::ToggleExtra("oven_price".to_string()))
        );
        assert_eq!(parse_callback_data("extras:done"), Some(WizardEvent::ExtrasDone));
    }

    #[test]
    fn test_unknown_callback_data_is_ignored() {
        assert_eq!(parse_callback_data(""), None);
        assert_eq!(parse_callback_data("type:"), None);
        assert_eq!(parse_callback_data("delete_3"), None);
    }

    #[test]
    fn test_format_money_rounds_to_one_decimal() {
        assert_eq!(format_money(8250.0), "8250.0");
        assert_eq!(format_money(12.345), "12.3");
        assert_eq!(format_money(0.04), "0.0");
    }
}
