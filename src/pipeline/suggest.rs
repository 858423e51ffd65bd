//! Name and description suggestions for compiled segments

use crate::extract::RawCondition;

/// Suggest a segment name from the matched term keys, e.g.
/// "Mobile + Page Views Segment". The caller's explicit name always wins.
pub fn suggest_name(conditions: &[RawCondition]) -> String {
    if conditions.is_empty() {
        return "New Segment".to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    for condition in conditions {
        let title = title_case(&condition.term);
        if !parts.contains(&title) {
            parts.push(title);
        }
    }
    format!("{} Segment", parts.join(" + "))
}

/// Suggest a one-line description listing the matched terms
pub fn suggest_description(conditions: &[RawCondition]) -> String {
    if conditions.is_empty() {
        return "Auto-generated segment".to_string();
    }
    let terms: Vec<String> = conditions
        .iter()
        .map(|c| c.term.replace('_', " "))
        .collect();
    format!("Auto-generated segment matching: {}", terms.join(", "))
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_conditions;
    use crate::vocabulary::Vocabulary;

    #[test]
    fn test_name_from_terms() {
        let raw = extract_conditions(
            Vocabulary::builtin(),
            "mobile users with more than 5 page views",
        );
        assert_eq!(suggest_name(&raw), "Mobile + Page Views Segment");
    }

    #[test]
    fn test_description_lists_terms() {
        let raw = extract_conditions(Vocabulary::builtin(), "mobile users who purchased");
        assert_eq!(
            suggest_description(&raw),
            "Auto-generated segment matching: mobile, purchase"
        );
    }

    #[test]
    fn test_defaults_without_conditions() {
        assert_eq!(suggest_name(&[]), "New Segment");
        assert_eq!(suggest_description(&[]), "Auto-generated segment");
    }
}
