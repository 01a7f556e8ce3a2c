//! Home screen: one cat gif at a time, each one counting as a click.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::CatApi;
use crate::fetch::{FetchController, FetchState};
use crate::models::CatGifResponse;
use crate::session::{IncrementOutcome, SessionProvider};

pub const PROGRESS_TITLE: &str = "Progress (keep 50 clicks per day 🌲)";

/// `1500` -> `"1,500"`
pub fn format_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub struct HomeView {
    session: SessionProvider,
    cats: FetchController<CatGifResponse>,
    incremented_on_mount: AtomicBool,
    image_loaded: AtomicBool,
}

impl HomeView {
    pub fn new(session: SessionProvider, api: Arc<CatApi>) -> Self {
        let cats = FetchController::new(
            move || {
                let api = Arc::clone(&api);
                async move { api.fetch_cat_gif().await }
            },
            true,
        );
        Self {
            session,
            cats,
            incremented_on_mount: AtomicBool::new(false),
            image_loaded: AtomicBool::new(false),
        }
    }

    pub fn cats(&self) -> &FetchController<CatGifResponse> {
        &self.cats
    }

    pub fn state(&self) -> FetchState<CatGifResponse> {
        self.cats.state()
    }

    /// Start the first fetch and count the first gif, once.
    pub async fn mount(&self) -> Option<JoinHandle<()>> {
        let handle = self.cats.mount();
        if !self.incremented_on_mount.swap(true, Ordering::SeqCst) {
            self.session.increment_click_count().await;
        }
        handle
    }

    /// "Another one!": count a click, then load the next gif.
    pub async fn handle_click(&self) -> (IncrementOutcome, JoinHandle<()>) {
        self.image_loaded.store(false, Ordering::SeqCst);
        let outcome = self.session.increment_click_count().await;
        (outcome, self.cats.refetch())
    }

    /// The renderer finished drawing the current gif.
    pub fn mark_image_loaded(&self) {
        self.image_loaded.store(true, Ordering::SeqCst);
    }

    /// True while a gif is being fetched or drawn. The button is disabled
    /// meanwhile.
    ///
    /// A failed fetch keeps the previous gif, which is never redrawn, so an
    /// error always frees the button for a retry.
    pub fn is_busy(&self) -> bool {
        let state = self.cats.state();
        if state.loading {
            return true;
        }
        state.error.is_none()
            && state.data.is_some()
            && !self.image_loaded.load(Ordering::SeqCst)
    }

    pub fn error_text(&self) -> Option<String> {
        self.cats
            .state()
            .error_message()
            .map(|message| format!("Error: {}", message))
    }

    pub async fn progress_label(&self) -> String {
        let clicks = self
            .session
            .user()
            .await
            .map(|user| user.click_count)
            .unwrap_or(0);
        format!(
            "{} / {}",
            format_thousands(clicks),
            format_thousands(self.session.threshold().get())
        )
    }

    pub async fn progress_percent(&self) -> f64 {
        let threshold = self.session.threshold();
        self.session
            .user()
            .await
            .map(|user| user.progress().percent(threshold))
            .unwrap_or(0.0)
    }
}
