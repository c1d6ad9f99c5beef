//! Bot-challenge guard.
//!
//! Never extracts. Its only job is to recognize anti-scraping walls during
//! detection and stop dispatch for the snapshot.

use crate::dom::ParsedDocument;
use crate::error::{PluginError, PluginResult};
use crate::traits::extractor::Extractor;
use crate::types::payload::ExtractionPayload;

/// Lowercased page titles served by challenge pages.
const CHALLENGE_TITLES: &[&str] = &[
    "just a moment...",
    "attention required! | cloudflare",
    "please wait while we verify",
    "are you a robot?",
    "access denied",
    "radware bot manager captcha",
    "validate user",
];

/// Elements only challenge pages carry.
const CHALLENGE_SELECTORS: &[&str] = &[
    "#challenge-form",
    "#cf-challenge-running",
    "#challenge-running",
    "#px-captcha",
    "form#captcha-form",
    "div.g-recaptcha",
];

pub struct BotChallenge;

impl BotChallenge {
    /// Why the page looks like a challenge, if it does.
    pub fn challenge_reason(doc: &ParsedDocument) -> Option<String> {
        if let Some(title) = doc.title() {
            let lower = title.to_lowercase();
            if CHALLENGE_TITLES.iter().any(|t| lower.starts_with(t)) {
                return Some(format!("challenge page title {:?}", title));
            }
        }

        CHALLENGE_SELECTORS
            .iter()
            .find(|css| doc.exists(css))
            .map(|css| format!("challenge element {}", css))
    }
}

impl Extractor for BotChallenge {
    fn name(&self) -> &str {
        "bot_challenge"
    }

    fn is_publisher_specific(&self) -> bool {
        false
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        match Self::challenge_reason(doc) {
            Some(reason) => Err(PluginError::blocked(reason)),
            None => Ok(false),
        }
    }

    fn has_extractable_content(&self, _doc: &ParsedDocument) -> bool {
        false
    }

    fn extract(&self, _doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        Err(PluginError::failed("bot_challenge never extracts"))
    }
}
