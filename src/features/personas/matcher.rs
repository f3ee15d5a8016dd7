//! # Feature: Trigger Matching
//!
//! Decides whether an inbound message addresses one of its sender's personas.
//! Only the sender's own persona set is consulted, read fresh from the store on
//! every message, and the first persona in registration order whose trigger
//! prefixes the text wins.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use anyhow::Result;
use std::sync::Arc;

use super::record::PersonaRecord;
use super::store::PersonaStore;

/// A persona selected for a message, with the text left after its trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub persona: PersonaRecord,
    pub residual: String,
}

/// Strip `trigger` from the front of `text`, comparing lower-cased forms.
///
/// Returns the remainder of the original text (original casing preserved), or
/// `None` when the text does not start with the trigger. Empty triggers never match.
pub fn strip_trigger<'a>(text: &'a str, trigger: &str) -> Option<&'a str> {
    let wanted = trigger.to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let mut folded = String::with_capacity(wanted.len());
    for (idx, ch) in text.char_indices() {
        folded.extend(ch.to_lowercase());
        if !wanted.starts_with(folded.as_str()) {
            return None;
        }
        if folded.len() == wanted.len() {
            return Some(&text[idx + ch.len_utf8()..]);
        }
    }
    None
}

/// First-match scan over one owner's personas, in the order given.
pub fn match_trigger(personas: &[PersonaRecord], text: &str) -> Option<TriggerMatch> {
    personas.iter().find_map(|persona| {
        strip_trigger(text, &persona.trigger).map(|rest| TriggerMatch {
            persona: persona.clone(),
            residual: rest.trim().to_string(),
        })
    })
}

#[derive(Clone)]
pub struct TriggerMatcher {
    store: Arc<dyn PersonaStore>,
}

impl TriggerMatcher {
    pub fn new(store: Arc<dyn PersonaStore>) -> Self {
        TriggerMatcher { store }
    }

    /// Find the persona `sender` is speaking as in `text`, if any
    pub async fn find(&self, sender: u64, text: &str) -> Result<Option<TriggerMatch>> {
        let personas = self.store.get_personas(sender).await?;
        Ok(match_trigger(&personas, text))
    }
}
