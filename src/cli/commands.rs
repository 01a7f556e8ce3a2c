//! Handlers for the CLI commands.

use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use std::sync::Arc;

use crate::adapters::{
    AppwriteBackend, FilePreferenceStore, LocalNotificationScheduler, ReqwestHttpClient,
};
use crate::api::{CatApi, TreeApi};
use crate::config::AppConfig;
use crate::error::{AuthAction, AuthFailure, GifTreeError};
use crate::fetch::FetchController;
use crate::notifications::{DailyReminder, REMINDER_TRIGGER};
use crate::session::{IncrementOutcome, SessionProvider};
use crate::theme::{ThemeMode, ThemePreference};
use crate::traits::{HttpClient, KeyValueStore};
use crate::validation::LoginForm;
use crate::view_state::{format_thousands, TreesView, EMPTY_TEXT};

/// Report a domain failure in its user-facing wording.
fn user_error(err: impl Into<GifTreeError>) -> Report {
    let err = err.into();
    tracing::debug!(
        code = err.error_code(),
        category = %err.category(),
        retryable = err.is_retryable(),
        "{}",
        err
    );
    eyre!(err.user_message())
}

fn http() -> Arc<dyn HttpClient> {
    Arc::new(ReqwestHttpClient::new())
}

fn preferences() -> Result<Arc<dyn KeyValueStore>> {
    let store = FilePreferenceStore::new().map_err(user_error)?;
    Ok(Arc::new(store))
}

fn session(config: &AppConfig) -> Result<SessionProvider> {
    let backend = Arc::new(AppwriteBackend::new(
        http(),
        config.require_backend().map_err(user_error)?.clone(),
        preferences()?,
    ));
    Ok(SessionProvider::new(backend.clone(), backend))
}

pub async fn cat(config: &AppConfig) -> Result<()> {
    let api = Arc::new(CatApi::new(http(), config.cataas_url.clone()));
    let cats = FetchController::new(
        move || {
            let api = Arc::clone(&api);
            async move { api.fetch_cat_gif().await }
        },
        false,
    );
    cats.refetch().await?;

    let state = cats.state();
    match (state.data, state.error) {
        (Some(cat), _) => {
            println!("{}", cat.url);
            Ok(())
        }
        (None, Some(err)) => Err(eyre!("Error: {}", err)),
        (None, None) => Err(eyre!("No cat this time")),
    }
}

pub async fn trees(config: &AppConfig, count: u32) -> Result<()> {
    if count == 0 {
        println!("{}", EMPTY_TEXT);
        return Ok(());
    }
    let api = TreeApi::new(
        http(),
        config.trefle_url.clone(),
        config.require_trefle_token().map_err(user_error)?.to_string(),
    );
    let view = TreesView::new(Arc::new(api), count);
    if let Some(handle) = view.mount() {
        handle.await?;
    }

    if let Some(error) = view.error_text() {
        return Err(eyre!(error));
    }
    let state = view.state();
    match (view.summary(), state.data) {
        (Some(summary), Some(response)) => {
            println!("{}", summary);
            for tree in &response.data {
                println!("  {} ({})", tree.display_name(), tree.status);
            }
        }
        _ => println!("{}", EMPTY_TEXT),
    }
    Ok(())
}

pub async fn theme(mode: Option<ThemeMode>) -> Result<()> {
    let preference = ThemePreference::new(preferences()?);
    match mode {
        Some(mode) => {
            preference.set(mode).await;
            println!("Theme set to {}", mode.label());
        }
        None => {
            let current = preference.load().await;
            let options: Vec<&str> = ThemeMode::ALL.iter().map(ThemeMode::label).collect();
            println!("Theme: {} (options: {})", current.label(), options.join(", "));
        }
    }
    Ok(())
}

fn reminder() -> Result<DailyReminder> {
    Ok(DailyReminder::new(
        preferences()?,
        Arc::new(LocalNotificationScheduler::new()),
    ))
}

pub async fn reminders(enabled: Option<bool>) -> Result<()> {
    let reminder = reminder()?;
    match enabled {
        Some(true) => {
            if reminder.set_enabled(true).await.map_err(user_error)? {
                println!(
                    "Daily reminder on ({:02}:{:02}). Run `giftree reminders run` to deliver it.",
                    REMINDER_TRIGGER.hour, REMINDER_TRIGGER.minute
                );
            } else {
                println!("Daily reminder saved, but notifications are not permitted");
            }
        }
        Some(false) => {
            reminder.set_enabled(false).await.map_err(user_error)?;
            println!("Daily reminder off");
        }
        None => {
            let state = if reminder.is_enabled().await { "on" } else { "off" };
            println!("Daily reminder: {}", state);
        }
    }
    Ok(())
}

/// Keep the reminder schedule alive until Ctrl-C.
pub async fn run_reminders() -> Result<()> {
    let reminder = reminder()?;
    if !reminder.initialize().await.map_err(user_error)? {
        println!("Daily reminder is off. Enable it with `giftree reminders on`.");
        return Ok(());
    }
    println!("Waiting for the daily reminder. Press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await?;
    Ok(())
}

pub async fn login(config: &AppConfig, email: String) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let form = LoginForm {
        email: email.clone(),
        password: password.clone(),
    };
    form.validate().map_err(user_error)?;

    let session = session(config)?;
    match session.sign_in(&email, &password).await {
        Ok(user) => {
            println!("Signed in as {}", user.nickname);
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Sign in failed: {}", e);
            let failure = AuthFailure::classify(AuthAction::SignIn, &e);
            Err(eyre!(failure.user_message()))
        }
    }
}

pub async fn logout(config: &AppConfig) -> Result<()> {
    let session = session(config)?;
    session.sign_out().await.map_err(user_error)?;
    println!("Signed out");
    Ok(())
}

pub async fn status(config: &AppConfig) -> Result<()> {
    let session = session(config)?;
    let Some(user) = session.initialize().await else {
        println!("Not signed in. Use `giftree login <email>`.");
        return Ok(());
    };
    let threshold = session.threshold();
    println!("{} <{}>", user.nickname, user.email);
    println!(
        "Clicks: {} / {} ({:.0}%)",
        format_thousands(user.click_count),
        format_thousands(threshold.get()),
        user.progress().percent(threshold)
    );
    println!("Trees planted: {}", user.completed_goals);
    Ok(())
}

pub async fn click(config: &AppConfig) -> Result<()> {
    let session = session(config)?;
    session.initialize().await;
    match session.increment_click_count().await {
        IncrementOutcome::NoUser => Err(eyre!("Not signed in")),
        IncrementOutcome::Persisted(progress) => {
            println!("{}", progress);
            Ok(())
        }
        IncrementOutcome::Reverted(_) | IncrementOutcome::Diverged => {
            Err(eyre!("Could not save your click. Please try again."))
        }
    }
}
