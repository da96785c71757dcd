use std::collections::BTreeMap;

use memechat_schema::{EmotionCatalog, EmotionEntry, ToneSymbol};
use serde::Serialize;
use thiserror::Error;

use crate::random::RandomSource;
use crate::tone::Emotion;

/// Key of the fallback list in media tables.
pub const DEFAULT_MEDIA_KEY: &str = "default";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("media catalog has no 'default' list")]
    MissingDefault,
    #[error("media list for '{0}' is empty")]
    EmptyList(String),
}

/// What the server sends to the client: one pick plus the full fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSelection {
    pub chosen: String,
    pub candidates: Vec<String>,
}

/// Symbol → ordered candidate URLs. The default list always exists and no
/// list is empty; both are checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCatalog {
    tables: BTreeMap<ToneSymbol, Vec<String>>,
    default: Vec<String>,
}

impl MediaCatalog {
    pub fn new(
        tables: BTreeMap<ToneSymbol, Vec<String>>,
        default: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self { tables, default };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The default list exists and no list is empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.default.is_empty() {
            return Err(CatalogError::MissingDefault);
        }
        if let Some((symbol, _)) = self.tables.iter().find(|(_, urls)| urls.is_empty()) {
            return Err(CatalogError::EmptyList(symbol.to_string()));
        }
        Ok(())
    }

    /// Build from a flat `key -> list` map where `default` is one of the keys.
    pub fn from_map(mut raw: BTreeMap<String, Vec<String>>) -> Result<Self, CatalogError> {
        let default = raw
            .remove(DEFAULT_MEDIA_KEY)
            .ok_or(CatalogError::MissingDefault)?;
        let tables = raw
            .into_iter()
            .map(|(key, urls)| (ToneSymbol::new(key), urls))
            .collect();
        Self::new(tables, default)
    }

    pub fn builtin() -> Self {
        let tables = BUILTIN_MEDIA
            .iter()
            .map(|(symbol, urls)| {
                (
                    ToneSymbol::new(*symbol),
                    urls.iter().map(|u| u.to_string()).collect(),
                )
            })
            .collect();
        let default = BUILTIN_DEFAULT_MEDIA.iter().map(|u| u.to_string()).collect();
        Self { tables, default }
    }

    pub fn has_symbol(&self, symbol: &ToneSymbol) -> bool {
        self.tables.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &ToneSymbol> {
        self.tables.keys()
    }

    /// Candidate list for `symbol`, or the default list when it has none.
    pub fn candidates(&self, symbol: &ToneSymbol) -> &[String] {
        self.tables
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&self.default)
    }

    pub fn default_candidates(&self) -> &[String] {
        &self.default
    }

    /// Locally hosted asset (first entry) used when every candidate failed.
    pub fn local_asset(&self, symbol: &ToneSymbol) -> &str {
        self.candidates(symbol)
            .first()
            .or_else(|| self.default.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn select(&self, symbol: &ToneSymbol, rng: &dyn RandomSource) -> MediaSelection {
        let candidates = self.candidates(symbol);
        let index = rng.pick(candidates.len());
        MediaSelection {
            chosen: candidates[index.min(candidates.len() - 1)].clone(),
            candidates: candidates.to_vec(),
        }
    }

    /// Full tone → symbol → media listing for inspection.
    pub fn emotion_catalog(&self) -> EmotionCatalog {
        let emotions = Emotion::CATALOG
            .iter()
            .map(|emotion| {
                let emoji = emotion.tone_symbol();
                let memes = self.candidates(&emoji).to_vec();
                EmotionEntry {
                    tone: emotion.as_str().to_string(),
                    emoji,
                    memes,
                }
            })
            .collect();
        EmotionCatalog { emotions }
    }
}

impl Default for MediaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_MEDIA: &[(&str, &[&str])] = &[
    (
        "😂",
        &[
            "/laugh.jpeg",
            "https://i.imgflip.com/30b1gx.jpg",
            "https://i.pinimg.com/originals/df/11/22/df1122bc16c03e254dfc7960307f46e6.jpg",
            "https://i.imgflip.com/4ptpox.jpg",
            "https://pbs.twimg.com/media/E8K_H0LVkAUPehP.jpg",
        ],
    ),
    (
        "😭",
        &[
            "sad.jpeg",
            "https://i.imgflip.com/1bgxj.jpg",
            "https://i.pinimg.com/originals/6e/7a/b5/6e7ab5b8c0f4dc25d0b44c8dad21a0dc.jpg",
            "https://i.pinimg.com/564x/5a/01/d0/5a01d0079bf61a537fee58089bfc2c89.jpg",
            "https://img.mensxp.com/media/content/2022/Sep/vicky-kaushal-bollywood-actor-crying-memes9_6312fa7c2e131.jpeg",
        ],
    ),
    (
        "😡",
        &[
            "angry.jpeg",
            "https://i.imgflip.com/1bh0.jpg",
            "https://i.pinimg.com/736x/22/26/b7/2226b7ea7d0fa66750894715d97a7393.jpg",
            "https://i.pinimg.com/originals/7e/a5/28/7ea5286de1ec51dd48e0874c79130c1f.jpg",
        ],
    ),
    (
        "🤔",
        &[
            "thinking.jpeg",
            "https://i.imgflip.com/1bgw.jpg",
            "https://i.imgflip.com/1bhf.jpg",
            "https://i.pinimg.com/736x/e4/a9/a8/e4a9a8f9d52fe48b90a983c90e21eb41.jpg",
            "https://i.pinimg.com/originals/c0/d5/71/c0d571ecda9e360e99115d33c31fa429.jpg",
        ],
    ),
    (
        "😱",
        &[
            "scared.jpeg",
            "https://i.imgflip.com/1bgxj.jpg",
            "https://letsplaymes.com/wp-content/uploads/2021/05/Shocked-Brahmanandam-meme-template-768x768.jpg",
            "https://i.pinimg.com/564x/eb/30/07/eb300707f05c9deee97e18e37c916aaa.jpg",
        ],
    ),
    (
        "😲",
        &[
            "surprised.jpeg",
            "https://i.imgflip.com/1bgw.jpg",
            "https://starsunfolded.com/wp-content/uploads/2021/09/Brahmanandams-surprised-expression.jpg",
            "https://i.pinimg.com/originals/4a/f4/9b/4af49b9f815b10c7ec4d42a52c5a17d4.jpg",
        ],
    ),
    (
        "😎",
        &[
            "cool.jpeg",
            "https://i.imgflip.com/26am.jpg",
            "https://i.pinimg.com/736x/4a/7d/12/4a7d1253ace002c5e6236275e2451e4c.jpg",
            "https://pbs.twimg.com/media/EU0FgJyUMAAdlDZ.jpg",
        ],
    ),
    (
        "😅",
        &[
            "awkward.jpeg",
            "https://i.imgflip.com/1h7in3.jpg",
            "https://i.pinimg.com/originals/eb/c9/52/ebc952ce141f31a46cb5b3a0c7675fdb.jpg",
            "https://i.pinimg.com/originals/91/2b/12/912b1273099e98f9582544a6e9c669ee.jpg",
        ],
    ),
    (
        "🤬",
        &[
            "furious.jpeg",
            "https://i.imgflip.com/1bh0.jpg",
            "https://i.pinimg.com/736x/92/b2/73/92b273777b87fd93c59bff2bd3f5fb69.jpg",
            "https://im.indiatimes.in/content/2023/Jul/amrish-puri_64a6a9d5bac3d.jpg",
        ],
    ),
    (
        "😊",
        &[
            "happy.jpeg",
            "https://i.imgflip.com/1bgw.jpg",
            "https://i.pinimg.com/originals/39/7c/e4/397ce47995a17cd83f739f811e4f36b3.jpg",
            "https://www.pinkvilla.com/images/2023-07/1689233117_5f85f85bb6e8d68bafa8e5c1ebe16209b744f05ad8f4e.jpg",
        ],
    ),
];

const BUILTIN_DEFAULT_MEDIA: &[&str] = &[
    "default.jpeg",
    "https://i.imgflip.com/1bgw.jpg",
    "https://i.pinimg.com/736x/77/be/88/77be88ab12c7cdcabd3ac7b6c1385093.jpg",
    "https://i.pinimg.com/736x/df/11/22/df1122bc16c03e254dfc7960307f46e6.jpg",
];
