use serde::{Deserialize, Serialize};

pub mod stats {
    use super::*;

    /// Real counters as reported by the community backend.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct SiteCounters {
        #[serde(default)]
        pub online_real: i64,
        #[serde(default)]
        pub total_real: i64,
        #[serde(default)]
        pub registered_today: i64,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ContentStats {
        #[serde(default)]
        pub posts: i64,
        #[serde(default)]
        pub comments: i64,
        #[serde(default)]
        pub praises: i64,
        #[serde(default)]
        pub shares: i64,
        #[serde(default)]
        pub top_posts: Vec<TopPost>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TopPost {
        pub id: i64,
        pub title: String,
        pub author: String,
        pub views: i64,
        pub praises: i64,
    }

    /// Display-ready payload for the public stats widgets (praise buttons,
    /// share counters, profile popovers).
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct StatsSummary {
        pub online: i64,
        pub online_str: String,
        pub total: i64,
        pub total_str: String,
    }
}

pub mod notifications {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NotificationItem {
        pub id: i64,
        pub kind: NotificationKind,
        pub message: String,
        pub read: bool,
        pub created_at: String,
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum NotificationKind {
        Praise,
        Comment,
        Share,
        Follow,
        System,
    }
}
