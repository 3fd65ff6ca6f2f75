use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
    workspace_root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, `"dev"` or `"build"` otherwise
    kind: Option<String>,
}

/// Normal dependencies each layer may use. Crates not listed are unrestricted.
const ALLOWED_DEPENDENCIES: &[(&str, &[&str])] = &[
    (
        "stampalooza-domain",
        &["chrono", "serde", "thiserror", "uuid"],
    ),
    (
        "stampalooza-shared",
        &["serde", "serde_json", "stampalooza-domain"],
    ),
];

/// Calls that would make the domain nondeterministic
const DOMAIN_FORBIDDEN_CALLS: &[&str] = &["Utc::now(", "SystemTime::now(", "rand::", "thread_rng("];

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = dependency_violations(&metadata.packages);
    let domain_src = metadata.workspace_root.join("crates/domain/src");
    violations.extend(source_violations(&domain_src)?);

    if violations.is_empty() {
        println!("arch-check: OK");
        return Ok(());
    }
    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("arch-check found {} violation(s)", violations.len())
}

fn dependency_violations(packages: &[Package]) -> Vec<String> {
    let mut violations = Vec::new();
    for package in packages {
        let Some((_, allowed)) = ALLOWED_DEPENDENCIES
            .iter()
            .find(|(name, _)| *name == package.name)
        else {
            continue;
        };
        for dependency in package.dependencies.iter().filter(|d| d.kind.is_none()) {
            if !allowed.contains(&dependency.name.as_str()) {
                violations.push(format!(
                    "{} must not depend on {}",
                    package.name, dependency.name
                ));
            }
        }
    }
    violations
}

/// Scan non-test code under `dir` for forbidden calls
fn source_violations(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut violations = Vec::new();
    for path in rust_files(dir)? {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let production = source.split("#[cfg(test)]").next().unwrap_or_default();
        for (index, line) in production.lines().enumerate() {
            let code = line.split("//").next().unwrap_or_default();
            if let Some(call) = DOMAIN_FORBIDDEN_CALLS.iter().find(|c| code.contains(*c)) {
                violations.push(format!(
                    "{}:{} uses {} in the domain",
                    path.display(),
                    index + 1,
                    call
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, deps: &[(&str, Option<&str>)]) -> Package {
        Package {
            name: name.to_string(),
            dependencies: deps
                .iter()
                .map(|(name, kind)| Dependency {
                    name: name.to_string(),
                    kind: kind.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn domain_may_not_pull_in_runtime_crates() {
        let packages = vec![package(
            "stampalooza-domain",
            &[("serde", None), ("tokio", None), ("serde_json", Some("dev"))],
        )];
        assert_eq!(
            dependency_violations(&packages),
            vec!["stampalooza-domain must not depend on tokio".to_string()]
        );
    }

    #[test]
    fn player_is_unrestricted() {
        let packages = vec![package("stampalooza-player", &[("reqwest", None)])];
        assert!(dependency_violations(&packages).is_empty());
    }

    #[test]
    fn forbidden_calls_outside_tests_are_reported() {
        let dir = std::env::temp_dir().join(format!("xtask-arch-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        fs::write(
            dir.join("clocky.rs"),
            "fn now() { let _ = Utc::now(); }\n// Utc::now() in a comment\n#[cfg(test)]\nmod tests { fn t() { Utc::now(); } }\n",
        )
        .expect("write");

        let violations = source_violations(&dir).expect("scan");
        fs::remove_dir_all(&dir).expect("cleanup");

        assert_eq!(violations.len(), 1);
        assert!(violations[0].ends_with(":1 uses Utc::now( in the domain"));
    }
}
