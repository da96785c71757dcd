//! Image-load fallback chain as a finite-state machine.
//!
//! A client starts with the URL the server chose and the full candidate list.
//! Each load failure is fed to [`FallbackResolver::on_error`], which either
//! points the image at the next candidate, at the symbol's local asset, at
//! the placeholder, or does nothing once the placeholder has been shown.

use memechat_schema::ToneSymbol;

use crate::media::MediaCatalog;

/// Always-available asset shown once everything else failed.
pub const PLACEHOLDER_ASSET: &str = "placeholder-meme.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    /// Showing `candidates[i]`.
    Candidate(usize),
    /// Showing a URL that is not in the candidate list.
    Unlisted,
    /// Showing the symbol's local asset.
    LocalFallback,
    /// Showing the placeholder. Terminal.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackAction {
    Retarget(String),
    UseFallback(String),
    UsePlaceholder(String),
    /// Terminal state reached; nothing left to try.
    Ignore,
}

impl FallbackAction {
    /// New image source, if the action changes it.
    pub fn url(&self) -> Option<&str> {
        match self {
            FallbackAction::Retarget(url)
            | FallbackAction::UseFallback(url)
            | FallbackAction::UsePlaceholder(url) => Some(url),
            FallbackAction::Ignore => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FallbackResolver {
    candidates: Vec<String>,
    local_fallback: String,
    placeholder: String,
    current: String,
    state: FallbackState,
}

impl FallbackResolver {
    pub fn new(
        current: impl Into<String>,
        candidates: Vec<String>,
        local_fallback: impl Into<String>,
    ) -> Self {
        let current = current.into();
        let state = match position_by_segment(&candidates, &current) {
            Some(index) => FallbackState::Candidate(index),
            None => FallbackState::Unlisted,
        };
        Self {
            candidates,
            local_fallback: local_fallback.into(),
            placeholder: PLACEHOLDER_ASSET.to_string(),
            current,
            state,
        }
    }

    /// Resolver for a meme delivered with `symbol`, using the catalog's
    /// local asset for that symbol as the last real image.
    pub fn for_symbol(
        catalog: &MediaCatalog,
        symbol: &ToneSymbol,
        current: impl Into<String>,
        candidates: Vec<String>,
    ) -> Self {
        Self::new(current, candidates, catalog.local_asset(symbol))
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn state(&self) -> FallbackState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == FallbackState::Placeholder
    }

    /// Advance after the current image failed to load.
    pub fn on_error(&mut self) -> FallbackAction {
        let action = match self.state {
            FallbackState::Candidate(index) if index + 1 < self.candidates.len() => {
                self.state = FallbackState::Candidate(index + 1);
                FallbackAction::Retarget(self.candidates[index + 1].clone())
            }
            FallbackState::Candidate(_) | FallbackState::Unlisted => {
                self.state = FallbackState::LocalFallback;
                FallbackAction::UseFallback(self.local_fallback.clone())
            }
            FallbackState::LocalFallback => {
                self.state = FallbackState::Placeholder;
                FallbackAction::UsePlaceholder(self.placeholder.clone())
            }
            FallbackState::Placeholder => FallbackAction::Ignore,
        };

        if let Some(url) = action.url() {
            tracing::debug!(failed = %self.current, next = %url, "image load failed");
            self.current = url.to_string();
        }
        action
    }
}

/// Last path segment with query and fragment removed.
fn trailing_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Index of the candidate whose trailing segment matches `url`'s, so that
/// `http://host/sad.jpeg` finds `sad.jpeg`.
fn position_by_segment(candidates: &[String], url: &str) -> Option<usize> {
    let segment = trailing_segment(url);
    if segment.is_empty() {
        return None;
    }
    candidates
        .iter()
        .position(|candidate| trailing_segment(candidate) == segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<String> {
        vec![
            "sad.jpeg".to_string(),
            "https://i.imgflip.com/1bgxj.jpg".to_string(),
            "https://example.com/memes/crying.jpg?size=large".to_string(),
        ]
    }

    #[test]
    fn advances_one_candidate_per_failure() {
        let mut resolver =
            FallbackResolver::new("https://i.imgflip.com/1bgxj.jpg", chain(), "sad.jpeg");
        assert_eq!(resolver.state(), FallbackState::Candidate(1));

        assert_eq!(
            resolver.on_error(),
            FallbackAction::Retarget("https://example.com/memes/crying.jpg?size=large".into())
        );
        assert_eq!(resolver.state(), FallbackState::Candidate(2));
    }

    #[test]
    fn full_chain_ends_in_idempotent_placeholder() {
        let candidates = chain();
        let n = candidates.len();
        let mut resolver = FallbackResolver::new("sad.jpeg", candidates, "sad.jpeg");

        for expected in 1..n {
            let action = resolver.on_error();
            assert!(matches!(action, FallbackAction::Retarget(_)));
            assert_eq!(resolver.state(), FallbackState::Candidate(expected));
        }

        assert_eq!(resolver.on_error(), FallbackAction::UseFallback("sad.jpeg".into()));
        assert_eq!(
            resolver.on_error(),
            FallbackAction::UsePlaceholder(PLACEHOLDER_ASSET.into())
        );
        assert!(resolver.is_terminal());

        for _ in 0..3 {
            assert_eq!(resolver.on_error(), FallbackAction::Ignore);
        }
        assert_eq!(resolver.current(), PLACEHOLDER_ASSET);
    }

    #[test]
    fn absolute_url_matches_relative_candidate() {
        let resolver = FallbackResolver::new("http://localhost:3001/sad.jpeg", chain(), "sad.jpeg");
        assert_eq!(resolver.state(), FallbackState::Candidate(0));
    }

    #[test]
    fn query_string_is_ignored_when_matching() {
        let resolver = FallbackResolver::new(
            "https://cdn.example.com/crying.jpg?size=small",
            chain(),
            "sad.jpeg",
        );
        assert_eq!(resolver.state(), FallbackState::Candidate(2));
    }

    #[test]
    fn unlisted_url_goes_straight_to_local_fallback() {
        let mut resolver = FallbackResolver::new("https://elsewhere.com/x.gif", chain(), "sad.jpeg");
        assert_eq!(resolver.state(), FallbackState::Unlisted);
        assert_eq!(resolver.on_error(), FallbackAction::UseFallback("sad.jpeg".into()));
    }

    #[test]
    fn empty_list_goes_straight_to_local_fallback() {
        let mut resolver = FallbackResolver::new("sad.jpeg", Vec::new(), "default.jpeg")
            .with_placeholder("missing.png");
        assert_eq!(resolver.on_error(), FallbackAction::UseFallback("default.jpeg".into()));
        assert_eq!(resolver.on_error(), FallbackAction::UsePlaceholder("missing.png".into()));
        assert_eq!(resolver.on_error(), FallbackAction::Ignore);
    }

    #[test]
    fn repeated_segments_still_advance() {
        let candidates = vec![
            "https://a.example.com/meme.jpg".to_string(),
            "https://b.example.com/meme.jpg".to_string(),
        ];
        let mut resolver =
            FallbackResolver::new("https://a.example.com/meme.jpg", candidates, "default.jpeg");
        assert_eq!(
            resolver.on_error(),
            FallbackAction::Retarget("https://b.example.com/meme.jpg".into())
        );
        assert_eq!(resolver.on_error(), FallbackAction::UseFallback("default.jpeg".into()));
    }

    #[test]
    fn for_symbol_uses_catalog_local_asset() {
        let catalog = MediaCatalog::builtin();
        let symbol = ToneSymbol::new("🥶");
        let candidates = catalog.candidates(&symbol).to_vec();
        let last = candidates.last().cloned().unwrap();

        let mut resolver = FallbackResolver::for_symbol(&catalog, &symbol, last, candidates);
        assert_eq!(resolver.on_error(), FallbackAction::UseFallback("default.jpeg".into()));
    }
}
