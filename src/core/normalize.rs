use std::collections::{BTreeSet, HashMap};

/// Normalize a single skill token
///
/// Lower-cases, trims and collapses internal whitespace runs to a single
/// space. Returns `None` for tokens that are blank after trimming.
#[inline]
pub fn normalize_skill(raw: &str) -> Option<String> {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Normalize a sequence of skill tokens into a deduplicated set
///
/// Unknown tokens pass through unchanged apart from the normalization
/// itself; blank tokens are dropped so the set never holds `""`.
pub fn normalize_skills<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|token| normalize_skill(token.as_ref()))
        .collect()
}

/// Skill normalizer with an optional alias table
///
/// Aliases map a normalized token onto a canonical one (`"js"` to
/// `"javascript"`). With an empty table it behaves exactly like
/// [`normalize_skills`].
#[derive(Debug, Clone, Default)]
pub struct SkillNormalizer {
    aliases: HashMap<String, String>,
}

impl SkillNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(alias, canonical)` pairs; both sides are normalized and
    /// blank entries are skipped.
    pub fn with_aliases<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let aliases = pairs
            .into_iter()
            .filter_map(|(alias, canonical)| {
                let alias = normalize_skill(alias.as_ref())?;
                let canonical = normalize_skill(canonical.as_ref())?;
                Some((alias, canonical))
            })
            .collect();

        Self { aliases }
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let token = normalize_skill(raw)?;
        Some(self.aliases.get(&token).cloned().unwrap_or(token))
    }

    pub fn normalize<I, S>(&self, raw: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|token| self.canonicalize(token.as_ref()))
            .collect()
    }

    /// Re-canonicalize an already normalized set through the alias table
    pub fn apply(&self, skills: &BTreeSet<String>) -> BTreeSet<String> {
        if self.aliases.is_empty() {
            return skills.clone();
        }
        self.normalize(skills.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_skill() {
        assert_eq!(normalize_skill("  React  "), Some("react".to_string()));
        assert_eq!(normalize_skill("Spring \t  Boot"), Some("spring boot".to_string()));
        assert_eq!(normalize_skill("Node.js"), Some("node.js".to_string()));
        assert_eq!(normalize_skill("   "), None);
        assert_eq!(normalize_skill(""), None);
    }

    #[test]
    fn test_normalize_skills_dedupes() {
        let skills = normalize_skills(["React", "react ", "REACT", "TypeScript", ""]);
        assert_eq!(skills.len(), 2);
        assert!(skills.contains("react"));
        assert!(skills.contains("typescript"));
        assert!(!skills.contains(""));
    }

    #[test]
    fn test_empty_input() {
        let skills = normalize_skills(Vec::<String>::new());
        assert!(skills.is_empty());
    }

    #[test]
    fn test_aliases() {
        let normalizer = SkillNormalizer::with_aliases([("JS", "JavaScript"), ("k8s", "Kubernetes")]);
        assert_eq!(normalizer.alias_count(), 2);

        let skills = normalizer.normalize(["js", "JavaScript", "K8S", "Go"]);
        let expected: BTreeSet<String> = ["javascript", "kubernetes", "go"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(skills, expected);
    }

    #[test]
    fn test_default_normalizer_matches_free_function() {
        let raw = ["  Docker", "AWS", "aws", "Kubernetes  "];
        assert_eq!(SkillNormalizer::new().normalize(raw), normalize_skills(raw));
    }
}
