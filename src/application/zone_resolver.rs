//! Sales zone lookup on recall detail pages

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{PageFetcher, RecallError, RecallResult};
use crate::infrastructure::parsing::{DetailParseContext, RecallDetailParser};

pub struct ZoneResolver {
    fetcher: Arc<dyn PageFetcher>,
    parser: RecallDetailParser,
}

impl ZoneResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> RecallResult<Self> {
        Ok(Self::with_parser(fetcher, RecallDetailParser::new()?))
    }

    pub fn with_parser(fetcher: Arc<dyn PageFetcher>, parser: RecallDetailParser) -> Self {
        Self { fetcher, parser }
    }

    /// Sales zone of the recall at `link`, empty when it cannot be determined.
    /// An empty link is answered without a request.
    pub async fn resolve(&self, link: &str) -> String {
        if link.trim().is_empty() {
            debug!("No detail link, skipping zone lookup");
            return String::new();
        }
        zone_or_default(link, self.lookup(link).await)
    }

    async fn lookup(&self, link: &str) -> RecallResult<String> {
        let body = self.fetcher.fetch(link).await?;
        self.parser
            .parse_page(&body, &DetailParseContext::new(link))
            .map_err(RecallError::from)
    }
}

/// Every lookup failure degrades to an empty zone
pub fn zone_or_default(link: &str, outcome: RecallResult<String>) -> String {
    match outcome {
        Ok(zone) => zone,
        Err(e) => {
            warn!("⚠️  Sales zone unavailable for {}: {}", link, e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const LINK: &str = "https://rappel.conso.gouv.fr/fiche-rappel/17342/Interne";

    struct StaticFetcher {
        response: RecallResult<String>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn new(response: RecallResult<String>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> RecallResult<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn resolves_zone_from_detail_page() {
        let fetcher = StaticFetcher::new(Ok(r#"<ul><li class="product-desc-item"><span class="carac">Zone géographique de vente</span><span class="val">France entière</span></li></ul>"#.to_string()));
        let resolver = ZoneResolver::new(fetcher.clone()).unwrap();

        assert_eq!(resolver.resolve(LINK).await, "France entière");
        assert_eq!(*fetcher.requests.lock().unwrap(), vec![LINK.to_string()]);
    }

    #[tokio::test]
    async fn missing_label_gives_empty_zone() {
        let fetcher = StaticFetcher::new(Ok("<html><body><p>Fiche</p></body></html>".to_string()));
        let resolver = ZoneResolver::new(fetcher).unwrap();
        assert_eq!(resolver.resolve(LINK).await, "");
    }

    #[tokio::test]
    async fn non_success_status_gives_empty_zone() {
        let fetcher = StaticFetcher::new(Err(RecallError::HttpStatus {
            status: 404,
            url: LINK.to_string(),
        }));
        let resolver = ZoneResolver::new(fetcher.clone()).unwrap();

        assert_eq!(resolver.resolve(LINK).await, "");
        assert_eq!(fetcher.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_link_makes_no_request() {
        let fetcher = StaticFetcher::new(Ok(String::new()));
        let resolver = ZoneResolver::new(fetcher.clone()).unwrap();

        assert_eq!(resolver.resolve("").await, "");
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn policy_keeps_successful_zone() {
        assert_eq!(zone_or_default(LINK, Ok("Bretagne".into())), "Bretagne");
        assert_eq!(zone_or_default(LINK, Err(RecallError::transport(LINK, "reset"))), "");
    }
}
