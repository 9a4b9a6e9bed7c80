//! Target keyword coverage in page metadata and across the site.

use crate::checks::metadata::{extract, MetadataDecl};
use crate::models::{Category, Issue, Severity, ROOT_FILE};

fn lowered(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Page whose static title and description mention none of the keywords.
pub fn check_page(file: &str, text: &str, keywords: &[String]) -> Vec<Issue> {
    let keys = lowered(keywords);
    if keys.is_empty() {
        return Vec::new();
    }
    let MetadataDecl::Static(meta) = extract(text) else {
        return Vec::new();
    };
    let haystack = format!(
        "{} {}",
        meta.title.unwrap_or_default(),
        meta.description.unwrap_or_default()
    )
    .to_lowercase();
    if keys.iter().any(|k| haystack.contains(k.as_str())) {
        return Vec::new();
    }
    vec![Issue::new(
        Category::Keywords,
        Severity::Low,
        file,
        "Title and description contain none of the target keywords",
    )]
}

/// Keywords that appear in no page source at all.
pub fn check_site(pages: &[(String, String)], keywords: &[String]) -> Vec<Issue> {
    let texts: Vec<String> = pages.iter().map(|(_, t)| t.to_lowercase()).collect();
    keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .filter(|k| {
            let k = k.trim().to_lowercase();
            !texts.iter().any(|t| t.contains(k.as_str()))
        })
        .map(|k| {
            Issue::new(
                Category::Keywords,
                Severity::Low,
                ROOT_FILE,
                format!("Target keyword '{}' does not appear on any page", k.trim()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws() -> Vec<String> {
        vec!["Physiotherapy".to_string(), "back pain".to_string()]
    }

    #[test]
    fn test_page_keyword_match_is_case_insensitive() {
        let hit = "export const metadata = { title: 'Back Pain Treatment', description: 'x' }";
        assert!(check_page("app/page.tsx", hit, &kws()).is_empty());
        let miss = "export const metadata = { title: 'About us', description: 'Our team' }";
        assert_eq!(check_page("app/page.tsx", miss, &kws()).len(), 1);
        assert!(check_page("app/page.tsx", miss, &[]).is_empty());
    }

    #[test]
    fn test_site_wide_keyword_usage() {
        let pages = vec![("app/page.tsx".to_string(), "<p>Physiotherapy in town</p>".to_string())];
        let issues = check_site(&pages, &kws());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, ROOT_FILE);
        assert!(issues[0].message.contains("'back pain'"));
    }
}
