//! Data models shared by the providers, the backend and the view models.

use serde::{Deserialize, Serialize};

use crate::progress::Progress;

/// A plant record from the plant-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: u64,
    /// Missing in some provider records.
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub genus: Option<String>,
}

impl Tree {
    /// Name for list rows and the details modal.
    pub fn display_name(&self) -> &str {
        match self.common_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown tree",
        }
    }
}

/// Response of `GET /plants/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreesApiResponse {
    pub data: Vec<Tree>,
}

/// Response of the cat-image endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatGifResponse {
    pub url: String,
}

/// A backend account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// A user-profile row. Counters are absent on rows created before the first
/// click and read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "nickName")]
    pub nickname: String,
    pub email: String,
    #[serde(rename = "clickCount", default, skip_serializing_if = "Option::is_none")]
    pub click_count: Option<u32>,
    #[serde(
        rename = "completedGoals",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_goals: Option<u32>,
}

impl UserProfile {
    pub fn progress(&self) -> Progress {
        Progress {
            click_count: self.click_count.unwrap_or(0),
            completed_goals: self.completed_goals.unwrap_or(0),
        }
    }
}

/// The authenticated user as seen by the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub click_count: u32,
    pub completed_goals: u32,
}

impl User {
    /// Combine an account with its profile row. Without a row the nickname
    /// falls back to the account name and progress starts at zero.
    pub fn from_parts(account: &AccountInfo, profile: Option<&UserProfile>) -> Self {
        let progress = profile.map(UserProfile::progress).unwrap_or_default();
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            nickname: profile
                .map(|p| p.nickname.clone())
                .unwrap_or_else(|| account.name.clone()),
            click_count: progress.click_count,
            completed_goals: progress.completed_goals,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            click_count: self.click_count,
            completed_goals: self.completed_goals,
        }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.click_count = progress.click_count;
        self.completed_goals = progress.completed_goals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_deserializes_with_missing_optionals() {
        let tree: Tree = serde_json::from_str(
            r#"{"id":1,"common_name":"Oak","status":"accepted","family":"Fagaceae","genus":"Quercus"}"#,
        )
        .unwrap();
        assert_eq!(tree.display_name(), "Oak");
        assert_eq!(tree.image_url, None);
        assert_eq!(tree.genus.as_deref(), Some("Quercus"));
    }

    #[test]
    fn test_tree_without_common_name() {
        let tree: Tree =
            serde_json::from_str(r#"{"id":7,"common_name":null,"status":"accepted"}"#).unwrap();
        assert_eq!(tree.display_name(), "Unknown tree");
    }

    #[test]
    fn test_profile_uses_backend_column_names() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "$id": "user-123",
            "$createdAt": "",
            "nickName": "TestNick",
            "email": "test@example.com",
            "clickCount": 100,
            "completedGoals": 2
        }))
        .unwrap();
        assert_eq!(profile.nickname, "TestNick");
        assert_eq!(
            profile.progress(),
            Progress {
                click_count: 100,
                completed_goals: 2
            }
        );
    }

    #[test]
    fn test_user_from_account_and_profile() {
        let account = AccountInfo {
            id: "user-123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
        };
        let profile = UserProfile {
            id: "user-123".to_string(),
            nickname: "TestNick".to_string(),
            email: "test@example.com".to_string(),
            click_count: None,
            completed_goals: None,
        };

        let user = User::from_parts(&account, Some(&profile));
        assert_eq!(user.nickname, "TestNick");
        assert_eq!(user.click_count, 0);

        let user = User::from_parts(&account, None);
        assert_eq!(user.nickname, "Test User");
        assert_eq!(user.completed_goals, 0);
    }
}
