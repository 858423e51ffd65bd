//! Canonical vocabulary tables
//!
//! One versioned table shared by the intent classifier, the extractor and the
//! mapper, so the terms the extractor recognizes and the attributes the mapper
//! can resolve never drift apart. The vocabulary is an injectable value;
//! [`Vocabulary::builtin`] provides the default tables.

mod category;

pub use category::*;

use crate::error::{Result, SegmentError};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique id per constructed vocabulary, so caches can tell instances apart
/// even when their declared `version` fields collide. Clones share the id:
/// their content is identical.
fn next_instance_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// One object-noun entry for the intent classifier. Declaration order is the
/// tie-break: the first object whose keyword matches wins.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentObject {
    pub object: String,
    pub keywords: Vec<String>,
}

/// Intent classifier keyword sets
#[derive(Debug, Clone, Deserialize)]
pub struct IntentVocabulary {
    pub action_verbs: Vec<String>,
    pub objects: Vec<IntentObject>,
}

/// A group of term variants that all normalize to one key,
/// e.g. `mobile` <- ["mobile", "phone", "smartphone", ...]
#[derive(Debug, Clone, Deserialize)]
pub struct TermGroup {
    pub key: String,
    pub variants: Vec<String>,
}

/// The consolidated vocabulary shared by all pipeline stages
#[derive(Debug, Clone, Deserialize)]
pub struct Vocabulary {
    /// Cache identity, never serialized; every parse or `Default` gets a
    /// fresh one
    #[serde(skip, default = "next_instance_id")]
    instance_id: u64,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_intent")]
    pub intent: IntentVocabulary,
    /// Per-category term dictionaries, scanned in [`Category::SCAN_ORDER`]
    #[serde(default = "default_terms")]
    pub terms: HashMap<Category, Vec<TermGroup>>,
    /// Dimension attribute paths (`variables/...`), keyed by category name or
    /// term-group key
    #[serde(default = "default_dimensions")]
    pub dimensions: HashMap<String, String>,
    /// Metric attribute paths (`metrics/...`) for behavioral counts. Kept in a
    /// separate namespace from dimensions: mixing the two produces
    /// schema-valid but semantically wrong segments.
    #[serde(default = "default_metrics")]
    pub metrics: HashMap<String, String>,
    /// Event attribute paths (`events/...`)
    #[serde(default = "default_events")]
    pub events: HashMap<String, String>,
    /// Per-category value normalization, e.g. device: phone -> "Mobile Phone"
    #[serde(default = "default_values")]
    pub values: HashMap<String, HashMap<String, String>>,
    /// Ordered value sets for list predicates (time-of-week, hour bands)
    #[serde(default = "default_list_values")]
    pub list_values: HashMap<String, Vec<String>>,
    /// Default numeric thresholds for behavioral signals with no explicit
    /// number in the request
    #[serde(default = "default_thresholds")]
    pub default_thresholds: HashMap<String, i64>,
    /// Family label for custom-attribute keys ("eVar", "Prop"), used in
    /// missing-mapping entries
    #[serde(default = "default_families")]
    pub families: HashMap<String, String>,
    /// Category -> evaluation tier membership (exactly one tier per category)
    #[serde(default = "default_contexts")]
    pub contexts: HashMap<Category, SegmentContext>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            instance_id: next_instance_id(),
            version: default_version(),
            intent: default_intent(),
            terms: default_terms(),
            dimensions: default_dimensions(),
            metrics: default_metrics(),
            events: default_events(),
            values: default_values(),
            list_values: default_list_values(),
            default_thresholds: default_thresholds(),
            families: default_families(),
            contexts: default_contexts(),
        }
    }
}

static BUILTIN: Lazy<Vocabulary> = Lazy::new(Vocabulary::default);

impl Vocabulary {
    /// Built-in vocabulary, initialized once
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    /// Identity for cache keying, distinct for every constructed instance
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Parse a vocabulary (or partial override) from JSON
    pub fn from_json(json: &str) -> Result<Vocabulary> {
        let vocab: Vocabulary = serde_json::from_str(json)
            .map_err(|e| SegmentError::DeserializationError(e.to_string()))?;
        vocab.validate()?;
        Ok(vocab)
    }

    /// Check namespace discipline: dimensions, metrics and events must live
    /// under their own path prefixes.
    pub fn validate(&self) -> Result<()> {
        for (key, path) in &self.dimensions {
            if !path.starts_with("variables/") {
                return Err(SegmentError::InvalidVocabulary(format!(
                    "dimension '{}' resolves outside variables/: {}",
                    key, path
                )));
            }
        }
        for (key, path) in &self.metrics {
            if !path.starts_with("metrics/") {
                return Err(SegmentError::InvalidVocabulary(format!(
                    "metric '{}' resolves outside metrics/: {}",
                    key, path
                )));
            }
        }
        for (key, path) in &self.events {
            if !path.starts_with("events/") {
                return Err(SegmentError::InvalidVocabulary(format!(
                    "event '{}' resolves outside events/: {}",
                    key, path
                )));
            }
        }
        for (category, groups) in &self.terms {
            if groups.iter().any(|g| g.variants.is_empty()) {
                return Err(SegmentError::InvalidVocabulary(format!(
                    "empty term group in category '{}'",
                    category
                )));
            }
        }
        Ok(())
    }

    /// Term groups for one category, empty slice when none are declared
    pub fn groups(&self, category: Category) -> &[TermGroup] {
        self.terms.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Normalize a free-text value through the per-category value dictionary.
    /// Values without an entry pass through unchanged.
    pub fn normalize_value<'a>(&'a self, category: &str, value: &'a str) -> &'a str {
        self.values
            .get(category)
            .and_then(|m| m.get(value))
            .map(String::as_str)
            .unwrap_or(value)
    }

    /// Evaluation tier a category votes for
    pub fn context_of(&self, category: Category) -> SegmentContext {
        self.contexts
            .get(&category)
            .copied()
            .unwrap_or(SegmentContext::Entity)
    }
}

fn default_version() -> u32 {
    1
}

fn groups(pairs: &[(&str, &[&str])]) -> Vec<TermGroup> {
    pairs
        .iter()
        .map(|(key, variants)| TermGroup {
            key: (*key).to_string(),
            variants: variants.iter().map(|v| (*v).to_string()).collect(),
        })
        .collect()
}

fn string_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn default_intent() -> IntentVocabulary {
    IntentVocabulary {
        action_verbs: ["create", "build", "make", "set up", "generate", "establish"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        objects: [
            ("segment", vec!["segment", "audience", "cohort", "user group", "visitor group"]),
            ("dashboard", vec!["dashboard", "workspace"]),
            ("calculated_metric", vec!["calculated metric", "metric"]),
            ("report", vec!["report"]),
            ("alert", vec!["alert"]),
        ]
        .into_iter()
        .map(|(object, keywords)| IntentObject {
            object: object.to_string(),
            keywords: keywords.into_iter().map(String::from).collect(),
        })
        .collect(),
    }
}

fn default_terms() -> HashMap<Category, Vec<TermGroup>> {
    let mut terms = HashMap::new();
    terms.insert(
        Category::Device,
        groups(&[
            ("mobile", &["mobile", "phone", "smartphone", "ios", "android", "cell phone"]),
            ("desktop", &["desktop", "computer", "pc", "mac", "laptop", "workstation"]),
            ("tablet", &["tablet", "ipad", "surface"]),
        ]),
    );
    terms.insert(
        Category::Page,
        groups(&[
            ("homepage", &["homepage", "home page", "main page", "landing page"]),
            ("product", &["product page", "product pages", "product detail"]),
            ("checkout", &["checkout", "check out", "shopping cart page"]),
            ("login", &["login page", "sign in page"]),
            ("registration", &["registration page", "signup page", "sign up page"]),
        ]),
    );
    terms.insert(
        Category::Event,
        groups(&[
            ("purchase", &["purchased", "bought", "made a purchase", "completed a sale"]),
            ("newsletter", &["newsletter", "email signup", "email subscription"]),
            ("download", &["downloaded", "download", "file download"]),
            ("video", &["watched video", "video play", "video view"]),
        ]),
    );
    terms.insert(
        Category::Campaign,
        groups(&[
            ("email", &["email campaign", "email marketing", "email blast"]),
            ("social", &["social media", "facebook", "twitter", "instagram", "linkedin"]),
            ("search", &["organic search", "paid search", "google", "seo"]),
            ("display", &["display ad", "banner", "display campaign", "retargeting"]),
        ]),
    );
    terms.insert(
        Category::Custom,
        groups(&[
            ("user_type", &["premium users", "free users", "subscribers", "members"]),
            ("customer_tier", &["gold", "silver", "bronze", "platinum", "vip"]),
            ("subscription", &["subscribed", "subscription", "premium member"]),
        ]),
    );
    terms.insert(
        Category::Geography,
        groups(&[
            ("country", &["usa", "united states", "canada", "uk", "germany", "france", "india", "country"]),
            ("state", &["california", "texas", "new york", "florida", "illinois", "state"]),
            ("city", &["los angeles", "chicago", "houston", "phoenix", "london", "city"]),
        ]),
    );
    terms.insert(
        Category::Time,
        groups(&[
            ("weekend", &["weekend", "weekends"]),
            ("weekday", &["weekday", "weekdays"]),
            ("business_hours", &["business hours", "work hours", "working hours"]),
        ]),
    );
    terms.insert(
        Category::Behavior,
        groups(&[
            ("page_views", &["page views", "pages", "pageviews"]),
            ("time_on_site", &["time on site", "minutes on site", "session duration", "visit length"]),
            ("conversion", &["conversion", "converted", "goal"]),
            ("cart_add", &["added to cart", "cart add", "added items to cart", "shopping cart"]),
        ]),
    );
    terms
}

fn default_dimensions() -> HashMap<String, String> {
    string_map(&[
        ("device", "variables/mobiledevicetype"),
        ("page", "variables/page"),
        ("campaign", "variables/trackingcode"),
        ("browser", "variables/browser"),
        ("operating_system", "variables/operatingsystem"),
        ("referrer", "variables/referrer"),
        ("country", "variables/geocountry"),
        ("state", "variables/geostate"),
        ("city", "variables/geocity"),
        ("weekend", "variables/dayofweek"),
        ("weekday", "variables/dayofweek"),
        ("business_hours", "variables/hour"),
    ])
}

fn default_metrics() -> HashMap<String, String> {
    string_map(&[
        ("page_views", "metrics/pageviews"),
        ("time_on_site", "metrics/timespent"),
        ("visits", "metrics/visits"),
        ("revenue", "metrics/revenue"),
        ("orders", "metrics/orders"),
        ("bounce_rate", "metrics/bouncerate"),
    ])
}

fn default_events() -> HashMap<String, String> {
    string_map(&[
        ("purchase", "events/purchase"),
        ("conversion", "events/purchase"),
        ("cart_add", "events/scAdd"),
        ("cart_remove", "events/scRemove"),
        ("checkout", "events/scCheckout"),
        ("newsletter", "events/newsletter_signup"),
        ("download", "events/download"),
        ("video", "events/video_play"),
        ("login", "events/login"),
        ("registration", "events/registration"),
    ])
}

fn default_values() -> HashMap<String, HashMap<String, String>> {
    let mut values = HashMap::new();
    values.insert(
        "device".to_string(),
        string_map(&[
            ("mobile", "Mobile Phone"),
            ("phone", "Mobile Phone"),
            ("desktop", "Desktop"),
            ("tablet", "Tablet"),
        ]),
    );
    values.insert(
        "geography".to_string(),
        string_map(&[
            ("usa", "United States"),
            ("united states", "United States"),
            ("canada", "Canada"),
            ("uk", "United Kingdom"),
            ("germany", "Germany"),
            ("france", "France"),
            ("india", "India"),
            ("california", "California"),
            ("texas", "Texas"),
            ("new york", "New York"),
            ("florida", "Florida"),
            ("illinois", "Illinois"),
            ("los angeles", "Los Angeles"),
            ("chicago", "Chicago"),
            ("houston", "Houston"),
            ("phoenix", "Phoenix"),
            ("london", "London"),
        ]),
    );
    values
}

fn default_list_values() -> HashMap<String, Vec<String>> {
    let mut lists = HashMap::new();
    lists.insert(
        "weekend".to_string(),
        vec!["Saturday".to_string(), "Sunday".to_string()],
    );
    lists.insert(
        "weekday".to_string(),
        ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    lists.insert(
        "business_hours".to_string(),
        (9..=17).map(|h| h.to_string()).collect(),
    );
    lists
}

fn default_thresholds() -> HashMap<String, i64> {
    let mut thresholds = HashMap::new();
    thresholds.insert("page_views".to_string(), 5);
    thresholds.insert("time_on_site".to_string(), 300);
    thresholds
}

fn default_families() -> HashMap<String, String> {
    string_map(&[
        ("user_type", "eVar"),
        ("customer_tier", "eVar"),
        ("subscription", "eVar"),
    ])
}

fn default_contexts() -> HashMap<Category, SegmentContext> {
    let mut contexts = HashMap::new();
    contexts.insert(Category::Page, SegmentContext::Event);
    contexts.insert(Category::Event, SegmentContext::Event);
    contexts.insert(Category::Campaign, SegmentContext::Event);
    contexts.insert(Category::Device, SegmentContext::Session);
    contexts.insert(Category::Geography, SegmentContext::Session);
    contexts.insert(Category::Time, SegmentContext::Session);
    contexts.insert(Category::Custom, SegmentContext::Entity);
    contexts.insert(Category::Behavior, SegmentContext::Entity);
    contexts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_validates() {
        Vocabulary::builtin().validate().unwrap();
    }

    #[test]
    fn test_every_category_has_a_context() {
        let vocab = Vocabulary::builtin();
        for category in Category::SCAN_ORDER {
            assert!(vocab.contexts.contains_key(&category), "{}", category);
        }
    }

    #[test]
    fn test_value_normalization_passthrough() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.normalize_value("device", "phone"), "Mobile Phone");
        assert_eq!(vocab.normalize_value("device", "kiosk"), "kiosk");
        assert_eq!(vocab.normalize_value("geography", "usa"), "United States");
    }

    #[test]
    fn test_from_json_partial_override() {
        let vocab = Vocabulary::from_json(r#"{"version": 7}"#).unwrap();
        assert_eq!(vocab.version, 7);
        // Untouched sections fall back to the builtin tables
        assert!(vocab.dimensions.contains_key("device"));
    }

    #[test]
    fn test_instances_get_distinct_ids() {
        let a = Vocabulary::default();
        let b = Vocabulary::from_json("{}").unwrap();
        assert_ne!(a.instance_id(), b.instance_id());
        // Clones are content-identical and keep the id
        assert_eq!(a.clone().instance_id(), a.instance_id());
    }

    #[test]
    fn test_validate_rejects_namespace_mixing() {
        let mut vocab = Vocabulary::default();
        vocab
            .metrics
            .insert("page_views".to_string(), "variables/pageviews".to_string());
        assert!(matches!(
            vocab.validate(),
            Err(crate::error::SegmentError::InvalidVocabulary(_))
        ));
    }
}
