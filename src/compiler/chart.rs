//! Chart detail resolution: application name plus repository to a fully
//! qualified chart reference.

use crate::config::Settings;
use crate::core::HelmplanError;
use crate::versionstream::RepositoryPrefixes;

/// Where a release's chart comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartDetails {
    /// Fully qualified chart (`prefix/local`) or a filesystem path
    pub name: String,
    pub prefix: String,
    /// Chart name without prefix, also the release name
    pub local_name: String,
    /// Repository URL, empty for filesystem charts
    pub repository: String,
}

impl ChartDetails {
    /// True when the chart is fetched from a repository URL.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        is_absolute_url(&self.repository)
    }
}

/// Absolute URIs are repositories; anything else is a path or alias.
#[must_use]
pub fn is_absolute_url(value: &str) -> bool {
    !value.is_empty() && url::Url::parse(value).is_ok()
}

fn is_local_path(value: &str) -> bool {
    value.starts_with('.') || value.starts_with('/')
}

/// Join a local chart directory and chart name, cleaning `.`, `..` and
/// empty segments the way a cleaned filesystem path would.
fn join_local(dir: &str, name: &str) -> String {
    let absolute = dir.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in dir.split('/').chain(std::iter::once(name)) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` at the root stays at the root
                _ if absolute => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn parent_dir(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((dir, _)) => dir.to_string(),
        None => ".".to_string(),
    }
}

/// Resolve an application's chart.
///
/// Rules in order:
/// 1. `prefix/local` names take the repository registered for `prefix`
/// 2. a repository that is itself a registered prefix becomes that prefix's URL
/// 3. no repository falls back to the team repository, then the default one
/// 4. no prefix takes the prefix registered for the repository URL
/// 5. an unprefixed name gains the prefix
///
/// A repository starting with `.` or `/` makes this a filesystem chart and
/// skips all of the above.
pub fn resolve_chart(
    name: &str,
    repository: &str,
    prefixes: &RepositoryPrefixes,
    settings: &Settings,
) -> Result<ChartDetails, HelmplanError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HelmplanError::InvalidApplication {
            name: String::new(),
            reason: "chart name is empty".to_string(),
        });
    }

    let mut repo = repository.trim().to_string();
    let (mut prefix, local_name) = match name.split_once('/') {
        Some((p, l)) if !p.is_empty() && !l.is_empty() => (p.to_string(), l.to_string()),
        _ => (String::new(), name.to_string()),
    };

    if is_local_path(&repo) {
        let full_name = join_local(&repo, &local_name);
        tracing::debug!("Resolved chart for {}: local chart {}", name, full_name);
        return Ok(ChartDetails {
            prefix: parent_dir(&full_name),
            name: full_name,
            local_name,
            repository: String::new(),
        });
    }

    if !prefix.is_empty()
        && let Some(url) = prefixes.urls_for_prefix(&prefix).first()
    {
        repo.clone_from(url);
    }

    if !repo.is_empty()
        && !is_absolute_url(&repo)
        && !is_local_path(&repo)
        && let Some(url) = prefixes.urls_for_prefix(&repo).first()
    {
        if prefix.is_empty() {
            prefix.clone_from(&repo);
        }
        repo.clone_from(url);
    }

    if repo.is_empty() {
        repo = settings
            .team_apps_repository
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| settings.default_chart_repository.clone());
    }

    if prefix.is_empty()
        && let Some(p) = prefixes.prefix_for_url(&repo)
    {
        prefix = p.to_string();
    }

    let mut full_name = name.to_string();
    if !prefix.is_empty() && full_name == local_name {
        full_name = format!("{prefix}/{local_name}");
    }

    tracing::debug!("Resolved chart for {}: chart={} repository={}", name, full_name, repo);

    Ok(ChartDetails {
        name: full_name,
        prefix,
        local_name,
        repository: repo,
    })
}
