//! # Quote Wizard
//!
//! State machine that walks a user from picking a cleaning type, through
//! optional add-ons, to entering the area and receiving a quote.
//!
//! Transitions are decided by [`apply_event`] from the pair
//! `(current step, incoming event)`. Any pair without a rule is a no-op,
//! which also absorbs stale or retransmitted button presses.

use tracing::debug;

use crate::catalog::{Catalog, Category, Service};
use crate::errors::{InputError, PricingError};
use crate::pricing::{compute_quote, Quote};
use crate::session::{Session, SessionStore, UserKey, WizardStep};

/// Input coming from the messaging layer for one user
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// Start (or restart) the wizard
    Start,
    /// Abandon the current session
    Cancel,
    SelectBaseType(String),
    ToggleExtra(String),
    /// Finished picking add-ons
    ExtrasDone,
    /// Free text, only meaningful while the area is awaited
    Text(String),
}

impl WizardEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            WizardEvent::Start => "start",
            WizardEvent::Cancel => "cancel",
            WizardEvent::SelectBaseType(_) => "select_base_type",
            WizardEvent::ToggleExtra(_) => "toggle_extra",
            WizardEvent::ExtrasDone => "extras_done",
            WizardEvent::Text(_) => "text",
        }
    }
}

/// What the messaging layer has to show after an event
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Event did not fit the current step, nothing changed
    Ignored,
    /// Single-choice prompt over the base services
    ChooseBaseType { services: Vec<Service> },
    /// Multi-select prompt over the add-ons with the current selection
    ChooseExtras {
        services: Vec<Service>,
        selected: Vec<String>,
    },
    /// Ask for the area in m²
    AskArea,
    /// Area was rejected, still waiting for it
    InvalidArea(InputError),
    /// Quote computed, session has been reset
    Quoted(Quote),
    /// Quote could not be computed, session has been reset
    QuoteFailed(PricingError),
    /// Session was reset on request
    Cancelled,
}

/// Largest area in m² accepted from a user
pub const MAX_AREA: f64 = 1_000_000.0;

/// Parse a decimal number typed by a user.
///
/// Surrounding whitespace is ignored and a decimal comma is accepted.
pub fn parse_decimal(input: &str) -> Result<f64, InputError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(InputError::Empty);
    }

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::NotANumber(input.trim().to_string())),
    }
}

/// Parse a room area, which must be strictly positive and at most `MAX_AREA`
pub fn parse_area(input: &str) -> Result<f64, InputError> {
    let area = parse_decimal(input)?;
    if area <= 0.0 {
        return Err(InputError::NotPositive(area));
    }
    if area > MAX_AREA {
        return Err(InputError::TooLarge {
            value: area,
            max: MAX_AREA,
        });
    }
    Ok(area)
}

fn extras_prompt(session: &Session, catalog: &Catalog) -> Transition {
    Transition::ChooseExtras {
        services: catalog.by_category(Category::Addon),
        selected: session.selected_extra_keys.clone(),
    }
}

/// Apply one event to a session and report what to render.
pub fn apply_event(session: &mut Session, event: WizardEvent, catalog: &Catalog) -> Transition {
    match (session.step, event) {
        (_, WizardEvent::Start) => {
            session.clear();
            session.step = WizardStep::ChoosingType;
            Transition::ChooseBaseType {
                services: catalog.by_category(Category::Base),
            }
        }
        (_, WizardEvent::Cancel) => {
            session.clear();
            Transition::Cancelled
        }
        (WizardStep::ChoosingType, WizardEvent::SelectBaseType(key)) => {
            if catalog.find(&key, Category::Base).is_none() {
                return Transition::Ignored;
            }
            session.base_type_key = Some(key);
            session.selected_extra_keys.clear();
            session.step = WizardStep::ChoosingExtras;
            extras_prompt(session, catalog)
        }
        (WizardStep::ChoosingExtras, WizardEvent::ToggleExtra(key)) => {
            if catalog.find(&key, Category::Addon).is_none() {
                return Transition::Ignored;
            }
            session.toggle_extra(&key);
            extras_prompt(session, catalog)
        }
        (WizardStep::ChoosingExtras, WizardEvent::ExtrasDone) => {
            session.step = WizardStep::AwaitingArea;
            Transition::AskArea
        }
        (WizardStep::AwaitingArea, WizardEvent::Text(input)) => {
            let area = match parse_area(&input) {
                Ok(area) => area,
                Err(e) => return Transition::InvalidArea(e),
            };
            session.area = Some(area);

            let result = match session.base_type_key.as_deref() {
                Some(base) => compute_quote(catalog, base, area, &session.selected_extra_keys),
                None => Err(PricingError::MissingBaseType),
            };
            session.clear();

            match result {
                Ok(quote) => Transition::Quoted(quote),
                Err(e) => Transition::QuoteFailed(e),
            }
        }
        (
            WizardStep::Idle
            | WizardStep::ChoosingType
            | WizardStep::ChoosingExtras
            | WizardStep::AwaitingArea,
            WizardEvent::SelectBaseType(_)
            | WizardEvent::ToggleExtra(_)
            | WizardEvent::ExtrasDone
            | WizardEvent::Text(_),
        ) => Transition::Ignored,
    }
}

/// Dispatch layer owning the session store
#[derive(Debug, Default)]
pub struct Wizard<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> Wizard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self, user_id: UserKey) -> Session {
        self.store.get(user_id)
    }

    /// Run one event through the state machine for `user_id`
    pub fn handle(&self, user_id: UserKey, event: WizardEvent, catalog: &Catalog) -> Transition {
        let kind = event.kind();
        let mut transition = Transition::Ignored;

        let session = self.store.update(user_id, |session| {
            transition = apply_event(session, event, catalog);
        });

        if transition == Transition::Ignored {
            debug!(user_id, event = kind, step = ?session.step, "Ignored event for current step");
        } else {
            debug!(user_id, event = kind, step = ?session.step, "Wizard transition applied");
        }

        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_area_accepts_comma_and_whitespace() {
        assert_eq!(parse_area("45"), Ok(45.0));
        assert_eq!(parse_area("45,5"), Ok(45.5));
        assert_eq!(parse_area("  45.5  "), Ok(45.5));
    }

    #[test]
    fn test_parse_area_rejects_bad_values() {
        assert_eq!(parse_area("-5"), Err(InputError::NotPositive(-5.0)));
        assert_eq!(parse_area("0"), Err(InputError::NotPositive(0.0)));
        assert_eq!(parse_area("abc"), Err(InputError::NotANumber("abc".to_string())));
        assert_eq!(parse_area("   "), Err(InputError::Empty));
        assert!(parse_area("inf").is_err());
        assert!(parse_area("NaN").is_err());
        assert_eq!(
            parse_area("1e308"),
            Err(InputError::TooLarge { value: 1e308, max: MAX_AREA })
        );
        assert_eq!(parse_area("1000000"), Ok(MAX_AREA));
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(WizardEvent::Start.kind(), "start");
        assert_eq!(WizardEvent::Text("1".to_string()).kind(), "text");
    }
}
