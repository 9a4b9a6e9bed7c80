//! Heading structure: exactly one H1 per page.
//!
//! A Hero-named component counts as an implicit H1 provider since the
//! heading is usually rendered inside it rather than in the page file.

use crate::error::Result;
use crate::models::{Category, Issue, Severity};
use crate::text::count_h1;
use regex::Regex;

/// Build the matcher for Hero-style component usages, e.g. `<Hero`,
/// `<ServiceHero`, `<HeroBanner`.
pub fn hero_matcher(hero: &str) -> Result<Regex> {
    let pat = format!(
        r"<[A-Za-z0-9]*{}[A-Za-z0-9]*[\s/>]",
        regex::escape(hero)
    );
    Ok(Regex::new(&pat)?)
}

/// Issues for a page given its literal H1 and Hero usage counts.
pub fn h1_issues(file: &str, h1: usize, heroes: usize) -> Vec<Issue> {
    let mut issues = Vec::new();
    if h1 == 0 && heroes == 0 {
        issues.push(Issue::new(
            Category::Structure,
            Severity::High,
            file,
            "Missing H1 heading",
        ));
    } else if h1 > 1 {
        issues.push(
            Issue::new(
                Category::Structure,
                Severity::Medium,
                file,
                format!("Multiple H1 headings ({})", h1),
            )
            .with_details(serde_json::json!({ "h1_count": h1 })),
        );
    }
    issues
}

pub fn check(file: &str, text: &str, hero: &Regex) -> Vec<Issue> {
    h1_issues(file, count_h1(text), hero.find_iter(text).count())
}
