use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::sync::OnceLock;
use tracing::warn;
use unic_langid::LanguageIdentifier;

use crate::config::DEFAULT_LANGUAGE;

/// Locales shipped under `./locales/<lang>/main.ftl`
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ru"];

/// Localization manager for the bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl LocalizationManager {
    /// Create a new localization manager with the built-in default language
    pub fn new() -> Result<Self> {
        Self::with_default_language(DEFAULT_LANGUAGE)
    }

    pub fn with_default_language(default_language: &str) -> Result<Self> {
        let mut bundles = HashMap::new();

        for lang in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = lang.parse()?;
            let bundle = Self::create_bundle(&locale)?;
            bundles.insert(lang.to_string(), bundle);
        }

        let default_language = if bundles.contains_key(default_language) {
            default_language.to_string()
        } else {
            warn!(language = %default_language, "Unsupported default language, using en");
            "en".to_string()
        };

        Ok(Self {
            bundles,
            default_language,
        })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Unicode isolation marks would end up inside Telegram messages
        bundle.set_use_isolating(false);

        let resource_path = format!("./locales/{}/main.ftl", locale);
        match fs::read_to_string(&resource_path) {
            Ok(content) => match FluentResource::try_new(content) {
                Ok(resource) => {
                    let _ = bundle.add_resource(resource);
                }
                Err((_, errors)) => {
                    warn!(path = %resource_path, errors = errors.len(), "Failed to parse locale file");
                }
            },
            Err(e) => warn!(path = %resource_path, error = %e, "Failed to read locale file"),
        }

        Ok(bundle)
    }

    /// Pick the bundle language for a Telegram language code such as `en-US`
    pub fn resolve_language(&self, language_code: Option<&str>) -> &str {
        let supported: Option<&str> = language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(|code| code.to_lowercase())
            .and_then(|code| {
                SUPPORTED_LANGUAGES
                    .iter()
                    .find(|lang| **lang == code)
                    .copied()
            });

        supported.unwrap_or(&self.default_language)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = self.resolve_language(Some(language));
        let Some(bundle) = self.bundles.get(language) else {
            return format!("Missing translation: {}", key);
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        match args {
            Some(args) => {
                let fluent_args = FluentArgs::from_iter(
                    args.iter().map(|(k, v)| (*k, FluentValue::from(*v))),
                );
                bundle
                    .format_pattern(pattern, Some(&fluent_args), &mut errors)
                    .into_owned()
            }
            None => bundle.format_pattern(pattern, None, &mut errors).into_owned(),
        }
    }
}

static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager
pub fn init_localization() -> Result<()> {
    init_localization_with_default(DEFAULT_LANGUAGE)
}

pub fn init_localization_with_default(default_language: &str) -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_none() {
        let manager = LocalizationManager::with_default_language(default_language)?;
        let _ = LOCALIZATION_MANAGER.set(manager);
    }
    Ok(())
}

/// Get the global localization manager, initializing it on first use
pub fn get_localization_manager() -> Option<&'static LocalizationManager> {
    if LOCALIZATION_MANAGER.get().is_none() {
        if let Err(e) = init_localization() {
            warn!(error = %e, "Failed to initialize localization");
        }
    }
    LOCALIZATION_MANAGER.get()
}

/// Localized message for the user's language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    t_args_lang(key, &[], language_code)
}

/// Localized message with arguments for the user's language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let Some(manager) = get_localization_manager() else {
        return format!("Missing translation: {}", key);
    };

    let language = manager.resolve_language(language_code);
    if args.is_empty() {
        manager.get_message_in_language(key, language, None)
    } else {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        manager.get_message_in_language(key, language, Some(&args_map))
    }
}
