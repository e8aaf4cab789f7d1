//! Published-item feed
//!
//! Project apps and videos come from an external store. Only published
//! items are shown, newest first; when nothing survives the filter the
//! landing page falls back to the built-in project list.

use serde::{Deserialize, Serialize};

use crate::consts::FEATURED_COUNT;

/// Image used for a project that has none
pub const PLACEHOLDER_IMAGE: &str = "/images/project-placeholder.jpg";
/// Length of a generated short description, in chars
const SHORT_DESCRIPTION_CHARS: usize = 80;

/// Anything that can appear in a published feed
pub trait Publishable {
    fn is_published(&self) -> bool;
    /// Creation time, Unix ms
    fn created_at(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unix timestamp (ms)
    pub created_at: f64,
    #[serde(default)]
    pub published: bool,
}

impl Publishable for ProjectRecord {
    fn is_published(&self) -> bool {
        self.published
    }

    fn created_at(&self) -> f64 {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Unix timestamp (ms)
    pub created_at: f64,
    #[serde(default)]
    pub published: bool,
}

impl Publishable for VideoRecord {
    fn is_published(&self) -> bool {
        self.published
    }

    fn created_at(&self) -> f64 {
        self.created_at
    }
}

impl VideoRecord {
    /// Player URL: YouTube and Vimeo links become embed URLs, anything
    /// else is played directly
    pub fn embed_url(&self) -> String {
        let url = self.video_url.as_str();
        if let Some(id) = query_param(url, "v").filter(|_| url.contains("youtube.com")) {
            return format!("https://www.youtube.com/embed/{}", id);
        }
        if let Some(rest) = url.split("youtu.be/").nth(1) {
            let id = rest.split(['?', '&', '/']).next().unwrap_or_default();
            return format!("https://www.youtube.com/embed/{}", id);
        }
        if let Some(rest) = url.split("vimeo.com/").nth(1) {
            let id = rest.split(['?', '/']).next().unwrap_or_default();
            if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
                return format!("https://player.vimeo.com/video/{}", id);
            }
        }
        self.video_url.clone()
    }

    pub fn is_embedded(&self) -> bool {
        self.video_url.contains("youtube") || self.video_url.contains("youtu.be") || self.video_url.contains("vimeo")
    }
}

fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let query = url.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Published items, newest first, at most `count`. Equal timestamps keep
/// their input order.
pub fn published_newest_first<T: Publishable + Clone>(items: &[T], count: usize) -> Vec<T> {
    let mut published: Vec<T> = items.iter().filter(|i| i.is_published()).cloned().collect();
    published.sort_by(|a, b| b.created_at().total_cmp(&a.created_at()));
    published.truncate(count);
    published
}

/// Project card as rendered on the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDisplay {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub url: String,
    pub description: String,
    pub short_description: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
}

impl From<&ProjectRecord> for ProjectDisplay {
    fn from(record: &ProjectRecord) -> Self {
        let short: String = record.description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            subtitle: record.tags.first().cloned().unwrap_or_default(),
            url: record.url.clone(),
            description: record.description.clone(),
            short_description: format!("{}...", short),
            images: vec![
                record
                    .image_url
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            ],
            tags: record.tags.clone(),
        }
    }
}

fn builtin(
    id: &str,
    title: &str,
    subtitle: &str,
    url: &str,
    short_description: &str,
    tags: &[&str],
) -> ProjectDisplay {
    ProjectDisplay {
        id: id.into(),
        title: title.into(),
        subtitle: subtitle.into(),
        url: url.into(),
        description: short_description.into(),
        short_description: short_description.into(),
        images: vec![format!("/projects/{}/01.jpg", id)],
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Built-in project list shown when the feed has nothing published
pub fn default_projects() -> Vec<ProjectDisplay> {
    vec![
        builtin(
            "rag-chat",
            "AIナレッジチャット",
            "RAG Search System",
            "https://rag-search-c85d8.web.app",
            "ファイルをアップロードするだけでAIが内容を理解し、質問に回答するRAGシステム。",
            &["RAG", "AI検索", "Firebase", "ナレッジ管理"],
        ),
        builtin(
            "sharebudget",
            "PairFinance",
            "Smart Household Budget App",
            "https://sharebudget-d2faf.web.app",
            "レシート撮影でAI自動入力、共同生活の精算を効率化するスマート家計簿。",
            &["家計簿", "AI自動入力", "PWA", "共同精算"],
        ),
        builtin(
            "management-dashboard",
            "経営コックピット",
            "Business Intelligence Dashboard",
            "https://company-board-2760c.web.app",
            "経営データを一元管理・可視化するBIダッシュボード。",
            &["BI", "ダッシュボード", "KPI管理", "データ分析"],
        ),
        builtin(
            "paper-search",
            "Scholar AI",
            "Research Support System",
            "https://dissertation-research-9946c.web.app",
            "AIで研究トレンド調査・論文分析・アイデア創出を支援。",
            &["論文検索", "AI分析", "研究支援", "アカデミック"],
        ),
    ]
}

/// Top `count` published projects, or the first `count` built-ins
pub fn featured_projects(records: &[ProjectRecord], count: usize) -> Vec<ProjectDisplay> {
    let published = published_newest_first(records, count);
    if published.is_empty() {
        let mut defaults = default_projects();
        defaults.truncate(count);
        return defaults;
    }
    published.iter().map(ProjectDisplay::from).collect()
}

/// Landing-page selection
pub fn landing_projects(records: &[ProjectRecord]) -> Vec<ProjectDisplay> {
    featured_projects(records, FEATURED_COUNT)
}

/// Public video gallery, newest first
pub fn video_gallery(records: &[VideoRecord]) -> Vec<VideoRecord> {
    published_newest_first(records, records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn project(id: &str, created_at: f64, published: bool) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            title: format!("Project {}", id),
            description: "d".repeat(120),
            url: format!("https://example.com/{}", id),
            image_url: None,
            tags: vec!["Tool".into(), "AI".into()],
            created_at,
            published,
        }
    }

    fn video(id: &str, url: &str) -> VideoRecord {
        VideoRecord {
            id: id.into(),
            title: id.into(),
            prompt: String::new(),
            video_url: url.into(),
            thumbnail_url: None,
            created_at: 0.0,
            published: true,
        }
    }

    #[test]
    fn test_filter_sort_truncate() {
        let items = vec![
            project("a", 1.0, true),
            project("b", 5.0, false),
            project("c", 3.0, true),
            project("d", 4.0, true),
            project("e", 2.0, true),
        ];
        let ids: Vec<_> = published_newest_first(&items, 3)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["d", "c", "e"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![project("x", 1.0, true), project("y", 1.0, true)];
        let ids: Vec<_> = published_newest_first(&items, 5)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn test_falls_back_to_defaults() {
        let unpublished = vec![project("a", 1.0, false)];
        let shown = landing_projects(&unpublished);
        assert_eq!(shown.len(), FEATURED_COUNT);
        assert_eq!(shown[0].id, "rag-chat");
        assert_eq!(landing_projects(&[]).len(), FEATURED_COUNT);
    }

    #[test]
    fn test_display_conversion() {
        let display = ProjectDisplay::from(&project("a", 1.0, true));
        assert_eq!(display.subtitle, "Tool");
        assert_eq!(display.short_description.chars().count(), 83);
        assert!(display.short_description.ends_with("..."));
        assert_eq!(display.images, vec![PLACEHOLDER_IMAGE.to_string()]);

        let mut bare = project("b", 1.0, true);
        bare.tags.clear();
        bare.image_url = Some("/b.png".into());
        let display = ProjectDisplay::from(&bare);
        assert_eq!(display.subtitle, "");
        assert_eq!(display.images, vec!["/b.png".to_string()]);
    }

    #[test]
    fn test_short_description_counts_chars_not_bytes() {
        let mut record = project("j", 1.0, true);
        record.description = "あ".repeat(100);
        let display = ProjectDisplay::from(&record);
        assert_eq!(display.short_description.chars().count(), 83);
    }

    #[test]
    fn test_video_embed_urls() {
        assert_eq!(
            video("a", "https://www.youtube.com/watch?v=abc123&t=4").embed_url(),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            video("b", "https://youtu.be/xyz?si=1").embed_url(),
            "https://www.youtube.com/embed/xyz"
        );
        assert_eq!(
            video("c", "https://vimeo.com/123456").embed_url(),
            "https://player.vimeo.com/video/123456"
        );
        let direct = video("d", "https://cdn.example.com/clip.mp4");
        assert_eq!(direct.embed_url(), "https://cdn.example.com/clip.mp4");
        assert!(!direct.is_embedded());
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"{"id":"v","title":"t","prompt":"p","videoUrl":"u","createdAt":5}"#;
        let v: VideoRecord = serde_json::from_str(json).expect("valid record");
        assert!(!v.published);
        assert_eq!(v.created_at, 5.0);
    }

    proptest! {
        #[test]
        fn prop_feed_is_published_sorted_and_bounded(
            raw in proptest::collection::vec((0.0f64..1e12, any::<bool>()), 0..40),
            count in 0usize..10,
        ) {
            let items: Vec<_> = raw
                .iter()
                .enumerate()
                .map(|(i, (t, p))| project(&i.to_string(), *t, *p))
                .collect();
            let out = published_newest_first(&items, count);
            prop_assert!(out.len() <= count);
            prop_assert!(out.iter().all(|p| p.published));
            prop_assert!(out.windows(2).all(|w| w[0].created_at >= w[1].created_at));
            let available = items.iter().filter(|p| p.published).count();
            prop_assert_eq!(out.len(), available.min(count));
        }
    }
}
