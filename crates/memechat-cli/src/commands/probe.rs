//! Walks a symbol's media chain the way the browser does, using HTTP probes
//! in place of image loads.

use std::time::Duration;

use memechat_core::{FallbackAction, FallbackResolver, MediaCatalog, RandomSource};
use memechat_schema::ToneSymbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStep {
    pub url: String,
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub steps: Vec<ProbeStep>,
    /// What the client would end up displaying.
    pub shown: String,
}

/// Relative candidates are hosted by the server itself.
pub fn absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

async fn loads(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(err) => {
            tracing::debug!(%url, "probe failed: {err}");
            false
        }
    }
}

pub async fn probe_media(
    catalog: &MediaCatalog,
    symbol: &ToneSymbol,
    base_url: &str,
    rng: &dyn RandomSource,
) -> ProbeReport {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default();

    let selection = catalog.select(symbol, rng);
    let mut resolver =
        FallbackResolver::for_symbol(catalog, symbol, selection.chosen, selection.candidates);
    let mut steps = Vec::new();

    loop {
        let url = resolver.current().to_string();
        let ok = loads(&client, &absolute_url(base_url, &url)).await;
        steps.push(ProbeStep { url, ok });
        if ok {
            break;
        }
        if let FallbackAction::Ignore = resolver.on_error() {
            break;
        }
    }

    ProbeReport {
        steps,
        shown: resolver.current().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use memechat_core::{FixedRandom, PLACEHOLDER_ASSET};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn catalog(server: &MockServer) -> MediaCatalog {
        let mut raw = BTreeMap::new();
        raw.insert("default".to_string(), vec!["default.jpeg".to_string()]);
        raw.insert(
            "😂".to_string(),
            vec![
                "laugh.jpeg".to_string(),
                format!("{}/remote/one.jpg", server.uri()),
                format!("{}/remote/two.jpg", server.uri()),
            ],
        );
        MediaCatalog::from_map(raw).unwrap()
    }

    #[test]
    fn relative_urls_are_joined_to_base() {
        assert_eq!(
            absolute_url("http://localhost:3001/", "/sad.jpeg"),
            "http://localhost:3001/sad.jpeg"
        );
        assert_eq!(
            absolute_url("http://localhost:3001", "https://i.imgflip.com/x.jpg"),
            "https://i.imgflip.com/x.jpg"
        );
    }

    #[tokio::test]
    async fn stops_at_first_candidate_that_loads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/remote/one.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/remote/two.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let catalog = catalog(&server);
        let report = probe_media(&catalog, &"😂".into(), &server.uri(), &FixedRandom(1)).await;

        assert_eq!(report.steps.len(), 2);
        assert!(!report.steps[0].ok);
        assert!(report.shown.ends_with("/remote/two.jpg"));
    }

    #[tokio::test]
    async fn ends_on_placeholder_when_nothing_loads() {
        let server = MockServer::start().await;
        let catalog = catalog(&server);

        let report = probe_media(&catalog, &"😂".into(), &server.uri(), &FixedRandom(0)).await;

        // three candidates, local fallback, placeholder
        assert_eq!(report.steps.len(), 5);
        assert!(report.steps.iter().all(|step| !step.ok));
        assert_eq!(report.steps[3].url, "laugh.jpeg");
        assert_eq!(report.shown, PLACEHOLDER_ASSET);
    }
}
