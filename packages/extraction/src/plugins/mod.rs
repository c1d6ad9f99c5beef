//! Bundled extractor plugins and the default registries.
//!
//! Each plugin is independent leaf logic over a [`ParsedDocument`]. The
//! registries below are the single place that decides dispatch order.
//!
//! [`ParsedDocument`]: crate::dom::ParsedDocument

mod bot_challenge;
mod citation_meta;
mod dspace;
mod eprints;
mod json_ld;
mod mdpi;
mod springer;

pub use bot_challenge::BotChallenge;
pub use citation_meta::CitationMeta;
pub use dspace::DSpace;
pub use eprints::EPrints;
pub use json_ld::JsonLd;
pub use mdpi::Mdpi;
pub use springer::Springer;

use crate::registry::ExtractorRegistry;
use crate::types::document::DocumentClass;

/// Publisher landing-page plugins, in dispatch order.
pub fn publisher_registry() -> ExtractorRegistry {
    ExtractorRegistry::builder(DocumentClass::Publisher)
        .register(BotChallenge)
        .register(Springer)
        .register(Mdpi)
        .register(JsonLd)
        .with_fallback(CitationMeta::publisher())
        .build()
}

/// Repository-page plugins, in dispatch order.
pub fn repository_registry() -> ExtractorRegistry {
    ExtractorRegistry::builder(DocumentClass::Repository)
        .register(BotChallenge)
        .register(DSpace)
        .register(EPrints)
        .register(CitationMeta::repository())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dispatch_order() {
        let publisher = publisher_registry();
        assert_eq!(publisher.names(), vec!["bot_challenge", "springer", "mdpi", "json_ld"]);
        assert_eq!(publisher.fallback().map(|p| p.name()), Some("citation_meta"));

        let repository = repository_registry();
        assert_eq!(
            repository.names(),
            vec!["bot_challenge", "dspace", "eprints", "citation_repository"]
        );
        assert!(repository.fallback().is_none());
    }
}
