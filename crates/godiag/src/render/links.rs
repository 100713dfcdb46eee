//! Ready-made [`LinkResolver`]s for hosts without their own page resolution.

use godiag_render::{LinkResolver, ResolvedLink};
use url::Url;

/// Uses every target verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl LinkResolver for PassthroughResolver {
    fn resolve(&self, target: &str) -> ResolvedLink {
        ResolvedLink {
            url: target.to_string(),
            title: target.to_string(),
        }
    }
}

/// Resolves relative targets against a base URL, e.g. a wiki's page prefix.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: Url,
}

impl BaseUrlResolver {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        // Without a trailing slash `join` would replace the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl LinkResolver for BaseUrlResolver {
    fn resolve(&self, target: &str) -> ResolvedLink {
        let url = match self.base.join(target) {
            Ok(url) => url.to_string(),
            Err(err) => {
                tracing::warn!(%target, %err, "cannot resolve link target against base URL");
                target.to_string()
            }
        };
        ResolvedLink {
            url,
            title: target.to_string(),
        }
    }
}
