//! Creation-intent detection
//!
//! A request carries creation intent only when an action verb and an object
//! noun co-occur in it. Verb alone ("create what?") or noun alone ("my
//! segment is slow") is not intent.

use crate::vocabulary::Vocabulary;

/// A detected creation intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentMatch {
    /// Object identifier, e.g. "segment"
    pub object: String,
    /// The keyword that matched in the text
    pub keyword: String,
}

/// Detect creation intent in request text. Objects are checked in the
/// vocabulary's declaration order; the first object with a matching keyword
/// wins, so "segment" beats "report" in "create a segment report".
pub fn detect_intent(vocabulary: &Vocabulary, text: &str) -> Option<IntentMatch> {
    let lowered = text.to_lowercase();

    let has_verb = vocabulary
        .intent
        .action_verbs
        .iter()
        .any(|verb| lowered.contains(verb.as_str()));
    if !has_verb {
        return None;
    }

    for object in &vocabulary.intent.objects {
        if let Some(keyword) = object
            .keywords
            .iter()
            .find(|keyword| lowered.contains(keyword.as_str()))
        {
            return Some(IntentMatch {
                object: object.object.clone(),
                keyword: keyword.clone(),
            });
        }
    }
    None
}
