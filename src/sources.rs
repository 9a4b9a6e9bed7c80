//! Directory walking and source-file enumeration.

use crate::config::Effective;
use crate::error::Result;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// Compile file-name glob patterns from config.
pub fn compile_patterns(list: &[String]) -> Result<Vec<Pattern>> {
    let mut out = Vec::with_capacity(list.len());
    for p in list {
        out.push(Pattern::new(p)?);
    }
    Ok(out)
}

/// Whether a directory name matches an exclude pattern. Patterns match the
/// whole name, so `out` prunes `out/` but not `about/`; `*cache*` matches
/// any name containing `cache`.
pub fn is_excluded(name: &str, exclude: &[Pattern]) -> bool {
    exclude.iter().any(|p| p.matches(name))
}

/// Recursively collect files under `dir` whose file name matches one of
/// `patterns`. Excluded and unreadable directories contribute nothing.
/// Results are sorted.
pub fn walk_files(dir: &Path, exclude: &[Pattern], patterns: &[Pattern]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk_into(dir, exclude, patterns, &mut out);
    out.sort();
    out
}

fn walk_into(dir: &Path, exclude: &[Pattern], patterns: &[Pattern], out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let Ok(ft) = entry.file_type() else { continue };
        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();
        if ft.is_dir() {
            if !is_excluded(&name, exclude) {
                walk_into(&path, exclude, patterns, out);
            }
        } else if ft.is_file() && patterns.iter().any(|p| p.matches(&name)) {
            out.push(path);
        }
    }
}

/// All page and reusable-fragment source files scanned for links.
pub fn collect_sources(eff: &Effective) -> Result<Vec<PathBuf>> {
    let patterns = compile_patterns(&eff.source_patterns)?;
    let exclude = compile_patterns(&eff.exclude_dirs)?;
    let mut files = walk_files(&eff.app_dir, &exclude, &patterns);
    if eff.components_dir.is_dir() && !eff.components_dir.starts_with(&eff.app_dir) {
        files.extend(walk_files(&eff.components_dir, &exclude, &patterns));
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_walk_skips_excluded_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/node_modules/x")).unwrap();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/node_modules/x/page.tsx"), "").unwrap();
        fs::write(root.join("a/b/page.tsx"), "").unwrap();
        fs::write(root.join("a/b/layout.tsx"), "").unwrap();
        let pats = compile_patterns(&["page.tsx".to_string()]).unwrap();
        let exclude = compile_patterns(&["node_modules".to_string()]).unwrap();
        let found = walk_files(root, &exclude, &pats);
        assert_eq!(found, vec![root.join("a/b/page.tsx")]);
    }

    #[test]
    fn test_missing_dir_yields_nothing() {
        let dir = tempdir().unwrap();
        let pats = compile_patterns(&["*".to_string()]).unwrap();
        assert!(walk_files(&dir.path().join("missing"), &[], &pats).is_empty());
    }

    #[test]
    fn test_collect_sources_includes_components() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("app")).unwrap();
        fs::create_dir_all(root.join("components")).unwrap();
        fs::write(root.join("app/page.tsx"), "").unwrap();
        fs::write(root.join("components/Nav.tsx"), "").unwrap();
        fs::write(root.join("components/readme.txt"), "").unwrap();
        let eff = Effective::for_root(root);
        let files = collect_sources(&eff).unwrap();
        assert_eq!(
            files,
            vec![root.join("app/page.tsx"), root.join("components/Nav.tsx")]
        );
    }

    #[test]
    fn test_excludes_match_whole_directory_names() {
        let ex = compile_patterns(&[
            "out".to_string(),
            "build".to_string(),
            "dist".to_string(),
            "*cache*".to_string(),
        ])
        .unwrap();
        for kept in ["about", "checkout", "layout", "district", "team-building", "outline"] {
            assert!(!is_excluded(kept, &ex), "{} should be kept", kept);
        }
        for dropped in ["out", "build", "dist", ".cache", "swc-cache-dir"] {
            assert!(is_excluded(dropped, &ex), "{} should be excluded", dropped);
        }
    }

    #[test]
    fn test_default_excludes_keep_lookalike_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for rel in [
            "app/page.tsx",
            "app/checkout/page.tsx",
            "app/out/page.tsx",
            "components/layout/Footer.tsx",
            "components/build/Stamp.tsx",
        ] {
            let p = root.join(rel);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, "").unwrap();
        }
        let eff = Effective::for_root(root);
        let files = collect_sources(&eff).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("app/checkout/page.tsx"),
                root.join("app/page.tsx"),
                root.join("components/layout/Footer.tsx"),
            ]
        );
    }

    #[test]
    fn test_bad_pattern_is_error() {
        assert!(compile_patterns(&["[".to_string()]).is_err());
    }
}
