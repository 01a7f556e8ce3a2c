//! Trees screen: one plant per completed goal.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

use crate::api::{TreeApi, DEFAULT_TREE_QUERY};
use crate::fetch::{FetchController, FetchState};
use crate::models::{Tree, TreesApiResponse};

pub const EMPTY_TEXT: &str = "No trees planted yet, keep clicking!";

/// "You planted 1 tree. Hooray!" / "You planted 3 trees. Hooray!"
pub fn planted_summary(count: usize) -> String {
    let noun = if count == 1 { "tree" } else { "trees" };
    format!("You planted {} {}. Hooray!", count, noun)
}

pub struct TreesView {
    goals: Arc<AtomicU32>,
    trees: FetchController<TreesApiResponse>,
    selected: Mutex<Option<Tree>>,
}

impl TreesView {
    /// Nothing is fetched while `completed_goals` is zero.
    pub fn new(api: Arc<TreeApi>, completed_goals: u32) -> Self {
        let goals = Arc::new(AtomicU32::new(completed_goals));
        let limit = Arc::clone(&goals);
        let trees = FetchController::new(
            move || {
                let api = Arc::clone(&api);
                let limit = limit.load(Ordering::SeqCst);
                async move { api.fetch_tree_data(DEFAULT_TREE_QUERY, limit).await }
            },
            completed_goals > 0,
        );
        Self {
            goals,
            trees,
            selected: Mutex::new(None),
        }
    }

    pub fn trees(&self) -> &FetchController<TreesApiResponse> {
        &self.trees
    }

    pub fn state(&self) -> FetchState<TreesApiResponse> {
        self.trees.state()
    }

    pub fn mount(&self) -> Option<JoinHandle<()>> {
        self.trees.mount()
    }

    pub fn completed_goals(&self) -> u32 {
        self.goals.load(Ordering::SeqCst)
    }

    /// Follow a change of the user's goal count.
    ///
    /// The first goal switches auto-fetch on. A later change refetches so
    /// the list length matches the new count.
    pub fn set_completed_goals(&self, goals: u32) -> Option<JoinHandle<()>> {
        let previous = self.goals.swap(goals, Ordering::SeqCst);
        let was_enabled = self.trees.auto_fetch();
        let started = self.trees.set_auto_fetch(goals > 0);
        if started.is_some() {
            return started;
        }
        (was_enabled && goals > 0 && goals != previous && self.trees.is_mounted())
            .then(|| self.trees.refetch())
    }

    /// Summary line, or `None` before any trees were loaded.
    pub fn summary(&self) -> Option<String> {
        self.trees
            .state()
            .data
            .map(|response| planted_summary(response.data.len()))
    }

    pub fn error_text(&self) -> Option<String> {
        self.trees
            .state()
            .error_message()
            .map(|message| format!("Error: {}", message))
    }

    /// Open the details modal for `tree`.
    pub fn select(&self, tree: Tree) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(tree);
    }

    pub fn close_details(&self) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn selected(&self) -> Option<Tree> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
