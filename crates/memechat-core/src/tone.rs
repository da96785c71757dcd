//! Keyword tone classifier.
//!
//! Two passes decide the symbol attached to a reply:
//!
//! 1. **Literal symbol**: when the reply itself ends its emoji run with a
//!    symbol from the catalog, that symbol is used as-is.
//! 2. **Keyword score**: otherwise each scored emotion counts how many of its
//!    keywords occur (substring match on the lower-cased text). The strictly
//!    highest count wins, earlier emotions win ties, and no hits at all yields
//!    [`ToneSymbol::DEFAULT`].

use std::sync::LazyLock;

use memechat_schema::ToneSymbol;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joy,
    Excitement,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Trust,
    Disgust,
    Anticipation,
    Serenity,
    Love,
    Anxiety,
    Embarrassment,
    Confusion,
    Relief,
    Guilt,
    Pride,
    Admiration,
    Boredom,
    Nostalgia,
    Determination,
    Curiosity,
    Happiness,
    Sarcasm,
    Confidence,
    Tiredness,
    Awkwardness,
    Shock,
    Frustration,
    Inspiration,
    Gratefulness,
    Loneliness,
    Flirtiness,
    Hesitation,
    Euphoria,
    Panic,
    Celebration,
    Selflove,
    Amusement,
    Cold,
    Wonder,
    /// Scored label without a tone-map entry of its own.
    Gratitude,
}

impl Emotion {
    /// Tone map in display order. `Gratitude` is scored but not listed.
    pub const CATALOG: [Emotion; 41] = [
        Emotion::Joy,
        Emotion::Excitement,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Trust,
        Emotion::Disgust,
        Emotion::Anticipation,
        Emotion::Serenity,
        Emotion::Love,
        Emotion::Anxiety,
        Emotion::Embarrassment,
        Emotion::Confusion,
        Emotion::Relief,
        Emotion::Guilt,
        Emotion::Pride,
        Emotion::Admiration,
        Emotion::Boredom,
        Emotion::Nostalgia,
        Emotion::Determination,
        Emotion::Curiosity,
        Emotion::Happiness,
        Emotion::Sarcasm,
        Emotion::Confidence,
        Emotion::Tiredness,
        Emotion::Awkwardness,
        Emotion::Shock,
        Emotion::Frustration,
        Emotion::Inspiration,
        Emotion::Gratefulness,
        Emotion::Loneliness,
        Emotion::Flirtiness,
        Emotion::Hesitation,
        Emotion::Euphoria,
        Emotion::Panic,
        Emotion::Celebration,
        Emotion::Selflove,
        Emotion::Amusement,
        Emotion::Cold,
        Emotion::Wonder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Excitement => "excitement",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Trust => "trust",
            Emotion::Disgust => "disgust",
            Emotion::Anticipation => "anticipation",
            Emotion::Serenity => "serenity",
            Emotion::Love => "love",
            Emotion::Anxiety => "anxiety",
            Emotion::Embarrassment => "embarrassment",
            Emotion::Confusion => "confusion",
            Emotion::Relief => "relief",
            Emotion::Guilt => "guilt",
            Emotion::Pride => "pride",
            Emotion::Admiration => "admiration",
            Emotion::Boredom => "boredom",
            Emotion::Nostalgia => "nostalgia",
            Emotion::Determination => "determination",
            Emotion::Curiosity => "curiosity",
            Emotion::Happiness => "happiness",
            Emotion::Sarcasm => "sarcasm",
            Emotion::Confidence => "confidence",
            Emotion::Tiredness => "tiredness",
            Emotion::Awkwardness => "awkwardness",
            Emotion::Shock => "shock",
            Emotion::Frustration => "frustration",
            Emotion::Inspiration => "inspiration",
            Emotion::Gratefulness => "gratefulness",
            Emotion::Loneliness => "loneliness",
            Emotion::Flirtiness => "flirtiness",
            Emotion::Hesitation => "hesitation",
            Emotion::Euphoria => "euphoria",
            Emotion::Panic => "panic",
            Emotion::Celebration => "celebration",
            Emotion::Selflove => "selflove",
            Emotion::Amusement => "amusement",
            Emotion::Cold => "cold",
            Emotion::Wonder => "wonder",
            Emotion::Gratitude => "gratitude",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Emotion::Joy => "😂",
            Emotion::Excitement => "🤩",
            Emotion::Sadness => "😭",
            Emotion::Anger => "😡",
            Emotion::Fear => "😱",
            Emotion::Surprise => "😲",
            Emotion::Trust => "🤝",
            Emotion::Disgust => "🤢",
            Emotion::Anticipation => "⏳",
            Emotion::Serenity => "😌",
            Emotion::Love => "😍",
            Emotion::Anxiety => "😰",
            Emotion::Embarrassment => "😳",
            Emotion::Confusion => "🤔",
            Emotion::Relief => "😅",
            Emotion::Guilt => "😔",
            Emotion::Pride => "😎",
            Emotion::Admiration => "👏",
            Emotion::Boredom => "🥱",
            Emotion::Nostalgia => "🥹",
            Emotion::Determination => "💪",
            Emotion::Curiosity => "🧐",
            Emotion::Happiness | Emotion::Gratitude => "😊",
            Emotion::Sarcasm => "🙃",
            Emotion::Confidence => "😤",
            Emotion::Tiredness => "😴",
            Emotion::Awkwardness => "😬",
            Emotion::Shock => "😧",
            Emotion::Frustration => "🤬",
            Emotion::Inspiration => "🌟",
            Emotion::Gratefulness => "🙏",
            Emotion::Loneliness => "😢",
            Emotion::Flirtiness => "😉",
            Emotion::Hesitation => "😕",
            Emotion::Euphoria => "🫠",
            Emotion::Panic => "😵",
            Emotion::Celebration => "🎉",
            Emotion::Selflove => "💖",
            Emotion::Amusement => "🤣",
            Emotion::Cold => "🥶",
            Emotion::Wonder => "🤯",
        }
    }

    pub fn tone_symbol(self) -> ToneSymbol {
        ToneSymbol::new(self.symbol())
    }
}

// ── Keyword tables ──────────────────────────────────────────────────────

/// Scored emotions in tie-break order.
const KEYWORD_TABLE: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &["happy", "joy", "laugh", "funny", "delighted", "amused", "pleased"],
    ),
    (
        Emotion::Sadness,
        &["sad", "unhappy", "crying", "depressed", "sorry", "disappointed"],
    ),
    (
        Emotion::Anger,
        &["angry", "upset", "mad", "furious", "annoyed", "irritated"],
    ),
    (
        Emotion::Fear,
        &["afraid", "scared", "terrified", "worried", "anxious", "nervous"],
    ),
    (
        Emotion::Surprise,
        &["surprised", "shocked", "amazed", "astonished", "unexpected"],
    ),
    (
        Emotion::Confusion,
        &["confused", "puzzled", "unsure", "uncertain", "don't understand"],
    ),
    (
        Emotion::Excitement,
        &["excited", "thrilled", "enthusiastic", "eager", "looking forward"],
    ),
    (
        Emotion::Determination,
        &["determined", "resolute", "committed", "focused", "persistent"],
    ),
    (
        Emotion::Relief,
        &["relief", "phew", "relaxed", "calm", "better now"],
    ),
    (
        Emotion::Gratitude,
        &["thankful", "grateful", "appreciate", "thanks", "thank you"],
    ),
    (
        Emotion::Curiosity,
        &["curious", "interested", "wonder", "intriguing", "fascinating"],
    ),
    (
        Emotion::Confidence,
        &["confident", "sure", "certain", "positive", "without doubt"],
    ),
];

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Emoji_Presentation}\p{Extended_Pictographic}]")
        .expect("emoji pattern is a valid regex")
});

/// Per-emotion keyword hit counts, in tie-break order.
pub fn score(text: &str) -> Vec<(Emotion, usize)> {
    let lower = text.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .map(|&(emotion, keywords)| {
            let hits = keywords.iter().filter(|kw| lower.contains(*kw)).count();
            (emotion, hits)
        })
        .collect()
}

/// Emotion with the strictly highest score, if any keyword matched.
pub fn dominant_emotion(text: &str) -> Option<Emotion> {
    let mut best: Option<Emotion> = None;
    let mut best_score = 0;

    for (emotion, hits) in score(text) {
        if hits > best_score {
            best_score = hits;
            best = Some(emotion);
        }
    }

    best
}

/// Keyword-only classification.
pub fn classify(text: &str) -> ToneSymbol {
    dominant_emotion(text)
        .map(Emotion::tone_symbol)
        .unwrap_or_default()
}

pub fn is_known_symbol(symbol: &str) -> bool {
    symbol == ToneSymbol::DEFAULT || Emotion::CATALOG.iter().any(|e| e.symbol() == symbol)
}

/// Last emoji in the text, when it is one the catalog knows.
pub fn extract_symbol(text: &str) -> Option<ToneSymbol> {
    let last = EMOJI.find_iter(text).last()?;
    let symbol = last.as_str();
    is_known_symbol(symbol).then(|| ToneSymbol::new(symbol))
}

/// Classify a generated reply: a literal catalog symbol wins over keywords.
pub fn classify_reply(text: &str) -> ToneSymbol {
    match extract_symbol(text) {
        Some(symbol) => {
            tracing::debug!(%symbol, "using literal symbol from reply");
            symbol
        }
        None => classify(text),
    }
}
