//! Static path→section categorization rules.
//!
//! `categorize(path)` maps a changed file onto the document sections it can
//! affect. The rules are an ordered table of (matcher, section-set) pairs
//! evaluated to a union — data, not branching code — so each rule is
//! testable in isolation. Checks are ordered by specificity: artifact
//! exclusion first, manifests before generic trees.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use automem_core::types::SectionName;

// ---------------------------------------------------------------------------
// Section names
// ---------------------------------------------------------------------------

pub const ARCHITECTURE: &str = "architecture";
pub const BUILD_COMMANDS: &str = "build-commands";
pub const DEPENDENCIES: &str = "dependencies";
pub const TESTING: &str = "testing";

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

enum Matcher {
    /// Exact file name.
    FileName(&'static [&'static str]),
    /// Any path component.
    PathComponent(&'static [&'static str]),
    /// File name prefix.
    NamePrefix(&'static [&'static str]),
    /// File name suffix.
    NameSuffix(&'static [&'static str]),
    /// A YAML file under `.github/workflows/`.
    CiWorkflow,
}

struct Rule {
    matcher: Matcher,
    sections: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        matcher: Matcher::FileName(&[
            "Cargo.toml",
            "package.json",
            "pyproject.toml",
            "go.mod",
            "Gemfile",
            "composer.json",
            "build.gradle",
            "build.gradle.kts",
            "pom.xml",
            "Makefile",
            "justfile",
            "CMakeLists.txt",
        ]),
        sections: &[BUILD_COMMANDS, DEPENDENCIES],
    },
    Rule {
        matcher: Matcher::FileName(&[
            "Cargo.lock",
            "package-lock.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "poetry.lock",
            "uv.lock",
            "go.sum",
            "Gemfile.lock",
            "composer.lock",
        ]),
        sections: &[DEPENDENCIES],
    },
    Rule {
        matcher: Matcher::CiWorkflow,
        sections: &[BUILD_COMMANDS],
    },
    Rule {
        matcher: Matcher::PathComponent(&["tests", "test", "__tests__", "spec"]),
        sections: &[TESTING],
    },
    Rule {
        matcher: Matcher::NamePrefix(&["test_"]),
        sections: &[TESTING],
    },
    Rule {
        matcher: Matcher::NameSuffix(&[
            "_test.rs",
            "_test.go",
            "_test.py",
            ".test.ts",
            ".test.tsx",
            ".test.js",
            ".spec.ts",
            ".spec.js",
        ]),
        sections: &[TESTING],
    },
    Rule {
        matcher: Matcher::PathComponent(&["src", "lib", "app", "pkg", "internal", "crates"]),
        sections: &[ARCHITECTURE],
    },
];

/// Build-output, vendored, and VCS directories whose contents never matter
/// for documentation.
pub const ARTIFACT_COMPONENTS: &[&str] = &[
    ".git",
    "target",
    "node_modules",
    "dist",
    "build",
    "vendor",
    "__pycache__",
    ".venv",
];

const ARTIFACT_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "pdf", "zip", "tar", "gz", "woff", "woff2", "so",
    "dylib", "dll", "exe", "o", "a", "class", "pyc", "wasm",
];

// ---------------------------------------------------------------------------
// Categorization
// ---------------------------------------------------------------------------

/// Whether a path is a binary or generated artifact — a documentation no-op.
pub fn is_generated_artifact(path: &Path) -> bool {
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    {
        return true;
    }
    components(path).any(|c| ARTIFACT_COMPONENTS.contains(&c))
}

/// Map a changed path onto the document sections it can affect.
///
/// Union over all matching rules; a path may target several sections.
/// Artifacts and unmatched paths yield the empty set.
pub fn categorize(path: &Path) -> BTreeSet<SectionName> {
    let mut sections = BTreeSet::new();
    if is_generated_artifact(path) {
        return sections;
    }
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    for rule in RULES {
        let matched = match &rule.matcher {
            Matcher::FileName(names) => names.contains(&file_name),
            Matcher::PathComponent(parts) => components(path).any(|c| parts.contains(&c)),
            Matcher::NamePrefix(prefixes) => prefixes.iter().any(|p| file_name.starts_with(p)),
            Matcher::NameSuffix(suffixes) => suffixes.iter().any(|s| file_name.ends_with(s)),
            Matcher::CiWorkflow => is_ci_workflow(path),
        };
        if matched {
            for section in rule.sections {
                sections.insert(SectionName::from(*section));
            }
        }
    }
    sections
}

/// [`categorize`], plus the new-top-level-directory rule: a file that
/// matches no rule but lives inside a top-level directory under `root`
/// signals that the architecture overview needs re-evaluation.
pub fn categorize_with_root(root: &Path, path: &Path) -> BTreeSet<SectionName> {
    let mut sections = categorize(path);
    if !sections.is_empty() || is_generated_artifact(path) {
        return sections;
    }
    if let Ok(relative) = path.strip_prefix(root) {
        if relative.components().count() >= 2 {
            sections.insert(SectionName::from(ARCHITECTURE));
        }
    }
    sections
}

fn components(path: &Path) -> impl Iterator<Item = &str> {
    path.components().filter_map(|c| match c {
        Component::Normal(part) => part.to_str(),
        _ => None,
    })
}

fn is_ci_workflow(path: &Path) -> bool {
    let yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == "yml" || ext == "yaml");
    if !yaml {
        return false;
    }
    let mut parts = components(path).collect::<Vec<_>>();
    parts.pop(); // file name
    parts
        .windows(2)
        .any(|w| w == [".github", "workflows"])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn names(set: &BTreeSet<SectionName>) -> Vec<String> {
        set.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case("/repo/Cargo.toml", &[BUILD_COMMANDS, DEPENDENCIES])]
    #[case("/repo/package.json", &[BUILD_COMMANDS, DEPENDENCIES])]
    #[case("/repo/Cargo.lock", &[DEPENDENCIES])]
    #[case("/repo/uv.lock", &[DEPENDENCIES])]
    #[case("/repo/src/main.rs", &[ARCHITECTURE])]
    #[case("/repo/crates/engine/src/lib.rs", &[ARCHITECTURE])]
    #[case("/repo/tests/integration.rs", &[TESTING])]
    #[case("/repo/app/__tests__/login.test.ts", &[ARCHITECTURE, TESTING])]
    #[case("/repo/src/auth_test.go", &[ARCHITECTURE, TESTING])]
    #[case("/repo/scripts/test_deploy.py", &[TESTING])]
    #[case("/repo/.github/workflows/ci.yml", &[BUILD_COMMANDS])]
    fn rule_table_cases(#[case] path: &str, #[case] expected: &[&str]) {
        let sections = categorize(Path::new(path));
        assert_eq!(names(&sections), expected, "path: {path}");
    }

    #[rstest]
    #[case("/repo/assets/logo.png")]
    #[case("/repo/target/debug/app")]
    #[case("/repo/node_modules/left-pad/index.js")]
    #[case("/repo/pkg/module.wasm")]
    fn artifacts_categorize_to_empty_set(#[case] path: &str) {
        assert!(categorize(Path::new(path)).is_empty(), "path: {path}");
        assert!(is_generated_artifact(Path::new(path)), "path: {path}");
    }

    #[test]
    fn unmatched_root_file_is_empty() {
        assert!(categorize(Path::new("/repo/README.txt")).is_empty());
    }

    #[test]
    fn new_top_level_directory_signals_architecture() {
        let root = Path::new("/repo");
        let sections = categorize_with_root(root, Path::new("/repo/services/worker.py"));
        assert_eq!(names(&sections), vec![ARCHITECTURE]);
    }

    #[test]
    fn top_level_rule_skips_root_files_and_artifacts() {
        let root = Path::new("/repo");
        assert!(categorize_with_root(root, Path::new("/repo/README.txt")).is_empty());
        assert!(categorize_with_root(root, Path::new("/repo/docs/diagram.png")).is_empty());
    }

    #[test]
    fn union_is_deterministic_and_deduplicated() {
        // tests/ component and test_ prefix both map to testing.
        let sections = categorize(Path::new("/repo/tests/test_auth.py"));
        assert_eq!(names(&sections), vec![TESTING]);
    }
}
