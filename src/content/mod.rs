//! Site content read model
//!
//! Everything the owner can edit without redeploying. Snapshots are
//! stored as camelCase JSON; missing sections or fields fall back to the
//! built-in defaults so a partial snapshot still renders a full page.

pub mod admin;
pub mod feed;
pub mod snapshot;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use admin::AdminGate;
pub use feed::{ProjectDisplay, ProjectRecord, Publishable, VideoRecord, featured_projects};
pub use snapshot::{FeedOutcome, FeedSource, ItemSource, MemoryCache, SnapshotCache};
pub use upload::{PayloadStatus, check_upload, classify_payload};

/// Hero slideshow images used when the snapshot has none
pub const DEFAULT_HERO_IMAGES: [&str; 4] = [
    "https://picsum.photos/id/1/1920/1080",
    "https://picsum.photos/id/26/1920/1080",
    "https://picsum.photos/id/48/1920/1080",
    "https://picsum.photos/id/58/1920/1080",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub name_ja: String,
    pub name_en: String,
    pub title: String,
    pub subtitle: String,
    pub images: Vec<String>,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            name_ja: "鈴木 智久".into(),
            name_en: "Suzuki Tomohisa".into(),
            title: "選択肢を整理し、後悔しにくい決断をつくる".into(),
            subtitle: "データサイエンス × 意思決定デザイン".into(),
            images: strings(&DEFAULT_HERO_IMAGES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Intro {
    pub title: String,
    pub body: String,
    pub highlight: String,
}

impl Default for Intro {
    fn default() -> Self {
        Self {
            title: "はじめまして".into(),
            body: "こんにちは、鈴木智久です。\nデータサイエンティストとして、AI・データ分析・生成AIを活用した\n意思決定支援や業務設計に携わっています。".into(),
            highlight: "「人が迷う場面で、どうすれば判断しやすくなるか」".into(),
        }
    }
}

/// A titled list with an optional closing line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemList {
    pub title: String,
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

impl ItemList {
    fn new(title: &str, items: &[&str]) -> Self {
        Self {
            title: title.into(),
            items: strings(items),
            note: None,
            conclusion: None,
        }
    }
}

/// Closing statement card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tagline {
    pub main: String,
    pub sub: Vec<String>,
}

impl Default for Tagline {
    fn default() -> Self {
        Self {
            main: "正解を押しつけるより、\n後悔しにくい選択肢を整える。".into(),
            sub: strings(&[
                "比較できれば、決断は少し楽になる",
                "結論は条件つき。その方が、現実に強い",
                "迷いは才能不足ではなく、設計の問題かもしれません",
            ]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Footer {
    pub message: String,
}

/// The whole editable page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteContent {
    pub hero: Hero,
    pub intro: Intro,
    pub what_i_do: ItemList,
    pub stance: ItemList,
    pub skills: ItemList,
    pub values: ItemList,
    pub personality: ItemList,
    pub copy: Tagline,
    pub footer: Footer,
}

impl Default for SiteContent {
    fn default() -> Self {
        let mut what_i_do = ItemList::new(
            "何をしている人？",
            &[
                "データやAIを使った意思決定・業務改善の設計",
                "生成AI（LLM）を活用した実務向けアプリケーションや仕組みづくり",
                "人や組織の「感覚・経験・暗黙知」を構造・指標・言葉に翻訳すること",
            ],
        );
        what_i_do.note = Some("「AIを入れること」よりも、“何を決めたいのかを整理すること”を大切にしています。".into());

        let mut stance = ItemList::new(
            "考え方のスタンス",
            &[
                "正解は一つとは限らない",
                "だからこそ、条件を明確にする",
                "いきなり大きく決めず、小さく試す",
            ],
        );
        stance.conclusion = Some("結論は、だいたい条件つき。\n意思決定は、比較できる形にすると楽になると考えています。".into());

        Self {
            hero: Hero::default(),
            intro: Intro::default(),
            what_i_do,
            stance,
            skills: ItemList::new(
                "得意なこと",
                &[
                    "複雑な話を、整理して見える化する",
                    "感情的・抽象的な議論を、構造で翻訳する",
                    "技術とビジネス、思考と実装の橋渡し",
                    "「何をやらないか」を含めて設計すること",
                ],
            ),
            values: ItemList::new(
                "仕事で大切にしていること",
                &[
                    "断言しすぎない",
                    "でも、曖昧なまま放置しない",
                    "失敗したときの“やめどき”を先に決める",
                ],
            ),
            personality: ItemList::new(
                "少しだけ人となり",
                &[
                    "ロジックは好きですが、冷たい判断は好みません",
                    "便利さの裏にある「失われた前提」を考えがちです",
                    "難しい話を、できるだけわかりやすく伝えたいタイプです",
                ],
            ),
            copy: Tagline::default(),
            footer: Footer::default(),
        }
    }
}

impl SiteContent {
    /// Headline rotation: both names, then the two role lines
    pub fn name_variations(&self) -> Vec<String> {
        vec![
            self.hero.name_ja.clone(),
            self.hero.name_en.clone(),
            "Data Scientist".into(),
            "Decision Design".into(),
        ]
    }

    /// Hero slideshow images, falling back to the defaults when empty
    pub fn hero_images(&self) -> Vec<String> {
        if self.hero.images.is_empty() {
            strings(&DEFAULT_HERO_IMAGES)
        } else {
            self.hero.images.clone()
        }
    }

    /// Parse a snapshot, merging it over the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_snapshot_merges_over_defaults() {
        let content =
            SiteContent::from_json(r#"{"hero":{"nameEn":"Someone Else"},"footer":{"message":"bye"}}"#)
                .expect("valid snapshot");
        assert_eq!(content.hero.name_en, "Someone Else");
        // Fields missing inside a present section keep their defaults
        assert_eq!(content.hero.name_ja, Hero::default().name_ja);
        assert_eq!(content.footer.message, "bye");
        assert_eq!(content.skills, SiteContent::default().skills);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = SiteContent::default().to_json().expect("serializes");
        assert!(json.contains("\"whatIDo\""));
        assert!(json.contains("\"nameJa\""));
        assert!(!json.contains("\"conclusion\":null"));
    }

    #[test]
    fn test_name_variations_and_images() {
        let mut content = SiteContent::default();
        let names = content.name_variations();
        assert_eq!(names.len(), 4);
        assert_eq!(names[1], "Suzuki Tomohisa");
        content.hero.images.clear();
        assert_eq!(content.hero_images().len(), DEFAULT_HERO_IMAGES.len());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        assert!(SiteContent::from_json("{\"hero\": 5}").is_err());
    }
}
