//! Light/dark theme preference.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::KeyValueStore;

/// Preference key for the selected theme.
pub const THEME_KEY: &str = "app_theme";

/// A concrete color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// The user's theme choice. `System` follows the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    /// Stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::System => "System",
        }
    }

    pub fn resolve(&self, os_scheme: ColorScheme) -> ColorScheme {
        match self {
            ThemeMode::Light => ColorScheme::Light,
            ThemeMode::Dark => ColorScheme::Dark,
            ThemeMode::System => os_scheme,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemeMode {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

/// The theme preference, cached in memory and persisted to a store.
///
/// Storage failures never reach the caller: a failed read keeps `System`
/// and a failed write keeps the new mode for the current run only.
pub struct ThemePreference {
    store: Arc<dyn KeyValueStore>,
    mode: Mutex<ThemeMode>,
}

impl ThemePreference {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            mode: Mutex::new(ThemeMode::default()),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the saved mode. Missing or unrecognized values leave `System`.
    pub async fn load(&self) -> ThemeMode {
        let saved = match self.store.get(THEME_KEY).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!("Error loading theme: {}", e);
                None
            }
        };
        let mode = match saved.as_deref().map(str::parse::<ThemeMode>) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                tracing::warn!("{}", e);
                ThemeMode::System
            }
            None => ThemeMode::System,
        };
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
        mode
    }

    pub async fn set(&self, mode: ThemeMode) {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
        if let Err(e) = self.store.set(THEME_KEY, mode.as_str()).await {
            tracing::error!("Error saving theme: {}", e);
        }
    }

    pub fn resolve(&self, os_scheme: ColorScheme) -> ColorScheme {
        self.mode().resolve(os_scheme)
    }
}
