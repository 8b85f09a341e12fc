//! Template fetching from the remote repository or a local checkout
//!
//! Remote templates live as subdirectories of a GitHub repository and are
//! retrieved through the repository zipball endpoint - a shallow,
//! history-less download. Local fetching copies a template folder from a
//! checkout on disk, which keeps development against unpublished templates
//! identical to the production path.

use super::registry::TemplateDescriptor;
use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Parsed `owner/repo/path` template locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocator {
    pub owner: String,
    pub repo: String,
    pub subdir: String,
}

impl RemoteLocator {
    pub fn parse(source: &str) -> Result<Self> {
        let mut parts = source.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), Some(subdir))
                if !owner.is_empty() && !repo.is_empty() && !subdir.trim_matches('/').is_empty() =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    subdir: subdir.trim_matches('/').to_string(),
                })
            }
            _ => anyhow::bail!("invalid template locator `{source}`, expected owner/repo/path"),
        }
    }

    /// Zipball endpoint of the locator's repository (default branch)
    pub fn zipball_url(&self) -> Result<Url> {
        let raw = format!(
            "https://api.github.com/repos/{}/{}/zipball",
            self.owner, self.repo
        );
        Url::parse(&raw).with_context(|| format!("invalid zipball URL: {raw}"))
    }
}

/// Template source - remote repository zipballs or a local checkout
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Download zipballs from each locator's repository. `override_url`
    /// replaces the endpoint wholesale (mirrors, tests).
    Remote { override_url: Option<Url> },
    /// Copy template folders from a local checkout (development)
    Local(PathBuf),
}

impl TemplateSource {
    /// Remote source, honoring the product's URL override variable
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, ScaffoldError> {
        let override_url = match std::env::var(config.template_url_env()) {
            Ok(raw) => Some(Url::parse(&raw).map_err(|err| ScaffoldError::FetchFailed {
                reason: format!("invalid {}: {err}", config.template_url_env()),
            })?),
            Err(_) => None,
        };
        Ok(Self::Remote { override_url })
    }

    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Materialization seam for template files.
///
/// The workflow is generic over this so tests count fetches without
/// touching the network.
#[allow(async_fn_in_trait)]
pub trait TemplateFetch {
    /// Fetch the descriptor's files into `target_dir`, returning how many
    /// files were written
    async fn fetch_into(
        &mut self,
        descriptor: &TemplateDescriptor,
        target_dir: &Path,
    ) -> Result<usize, ScaffoldError>;
}

/// Fetches template files from a [`TemplateSource`]
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    /// Downloaded archives keyed by URL, reused across templates in one run
    archive_cache: HashMap<String, Vec<u8>>,
}

impl TemplateFetcher {
    /// Create a fetcher with a custom user agent.
    ///
    /// GitHub rejects requests without a user agent.
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            archive_cache: HashMap::new(),
        }
    }

    /// Create a remote fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, ScaffoldError> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Create a fetcher over a local template checkout
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), user_agent)
    }

    async fn download(&mut self, url: Url) -> Result<Vec<u8>> {
        if let Some(bytes) = self.archive_cache.get(url.as_str()) {
            return Ok(bytes.clone());
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to download template archive from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP {} from {}", response.status(), url);
        }

        let bytes = response.bytes().await?.to_vec();
        self.archive_cache.insert(url.to_string(), bytes.clone());
        Ok(bytes)
    }

    async fn fetch_remote(
        &mut self,
        descriptor: &TemplateDescriptor,
        override_url: Option<Url>,
        target_dir: &Path,
    ) -> Result<usize> {
        let locator = RemoteLocator::parse(descriptor.remote_source)?;
        let url = match override_url {
            Some(url) => url,
            None => locator.zipball_url()?,
        };

        let bytes = self.download(url).await?;
        let entries = extract_subdir(&bytes, &locator.subdir)?;
        if entries.is_empty() {
            anyhow::bail!(
                "template path `{}` not found in {}/{}",
                locator.subdir,
                locator.owner,
                locator.repo
            );
        }
        write_entries(entries, target_dir).await
    }

    async fn fetch_local(
        &self,
        descriptor: &TemplateDescriptor,
        root: &Path,
        target_dir: &Path,
    ) -> Result<usize> {
        let template_dir = root.join(descriptor.key);
        if !template_dir.is_dir() {
            anyhow::bail!(
                "template directory not found: {}",
                template_dir.display()
            );
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&template_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&template_dir)?.to_path_buf();
            let contents = std::fs::read(entry.path())
                .with_context(|| format!("failed to read {}", entry.path().display()))?;
            entries.push((relative, contents));
        }
        write_entries(entries, target_dir).await
    }
}

impl TemplateFetch for TemplateFetcher {
    async fn fetch_into(
        &mut self,
        descriptor: &TemplateDescriptor,
        target_dir: &Path,
    ) -> Result<usize, ScaffoldError> {
        let result = match self.source.clone() {
            TemplateSource::Remote { override_url } => {
                self.fetch_remote(descriptor, override_url, target_dir).await
            }
            TemplateSource::Local(root) => {
                self.fetch_local(descriptor, &root, target_dir).await
            }
        };
        result.map_err(|err| ScaffoldError::FetchFailed {
            reason: format!("{err:#}"),
        })
    }
}

/// Pull the entries under `subdir` out of a repository zipball.
///
/// Zipball entries are prefixed with a `{owner}-{repo}-{sha}/` folder that
/// varies per commit, so the first path component is stripped before the
/// subdirectory match. Returned paths are relative to the template root.
fn extract_subdir(zip_bytes: &[u8], subdir: &str) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    let cursor = Cursor::new(zip_bytes);
    let mut archive =
        ZipArchive::new(cursor).context("template archive is not a valid zip file")?;

    let prefix = format!("{}/", subdir.trim_matches('/'));
    let mut entries = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let full_path = entry.name().to_string();
        let Some((_, repo_relative)) = full_path.split_once('/') else {
            continue;
        };
        let Some(template_relative) = repo_relative.strip_prefix(&prefix) else {
            continue;
        };
        if template_relative.is_empty()
            || template_relative
                .split('/')
                .any(|component| component.is_empty() || component == "..")
        {
            continue;
        }

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        entries.push((PathBuf::from(template_relative), contents));
    }

    Ok(entries)
}

async fn write_entries(entries: Vec<(PathBuf, Vec<u8>)>, target_dir: &Path) -> Result<usize> {
    let mut written = 0;
    for (relative, contents) in entries {
        let out_path = target_dir.join(&relative);
        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        tokio::fs::write(&out_path, &contents)
            .await
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::registry::descriptor_for;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zipball(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            for (path, contents) in entries {
                writer.start_file(*path, options).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn locator_parses_owner_repo_and_nested_path() {
        let locator = RemoteLocator::parse("ianhco/cerces/templates/cf-workers").unwrap();
        assert_eq!(locator.owner, "ianhco");
        assert_eq!(locator.repo, "cerces");
        assert_eq!(locator.subdir, "templates/cf-workers");
        assert!(locator
            .zipball_url()
            .unwrap()
            .as_str()
            .ends_with("/repos/ianhco/cerces/zipball"));
    }

    #[test]
    fn locator_rejects_short_forms() {
        assert!(RemoteLocator::parse("ianhco/cerces").is_err());
        assert!(RemoteLocator::parse("ianhco//templates/x").is_err());
        assert!(RemoteLocator::parse("").is_err());
    }

    #[test]
    fn extract_strips_the_zipball_prefix_and_selects_the_subdir() {
        let bytes = zipball(&[
            ("ianhco-cerces-0a1b2c/README.md", "root readme"),
            ("ianhco-cerces-0a1b2c/templates/bun/index.ts", "app"),
            ("ianhco-cerces-0a1b2c/templates/bun/src/main.ts", "main"),
            ("ianhco-cerces-0a1b2c/templates/docker/Dockerfile", "FROM"),
        ]);

        let entries = extract_subdir(&bytes, "templates/bun").unwrap();
        let mut paths: Vec<String> = entries
            .iter()
            .map(|(path, _)| path.to_string_lossy().into_owned())
            .collect();
        paths.sort();
        assert_eq!(paths, vec!["index.ts", "src/main.ts"]);
    }

    #[test]
    fn extract_finds_nothing_for_a_missing_subdir() {
        let bytes = zipball(&[("ianhco-cerces-0a1b2c/templates/bun/index.ts", "app")]);
        assert!(extract_subdir(&bytes, "templates/cf-workers")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn extract_skips_traversal_entries() {
        let bytes = zipball(&[(
            "ianhco-cerces-0a1b2c/templates/bun/../../../etc/passwd",
            "nope",
        )]);
        assert!(extract_subdir(&bytes, "templates/bun").unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_fetch_copies_the_template_tree() {
        let checkout = tempfile::tempdir().unwrap();
        let template_dir = checkout.path().join("cf-workers");
        std::fs::create_dir_all(template_dir.join("src")).unwrap();
        std::fs::write(template_dir.join("wrangler.jsonc"), "{}").unwrap();
        std::fs::write(template_dir.join("src/index.ts"), "export {}").unwrap();

        let target = tempfile::tempdir().unwrap();
        let mut fetcher =
            TemplateFetcher::from_local(checkout.path().to_path_buf(), "create-cerces");
        let descriptor = descriptor_for("cf-workers").unwrap();
        let written = fetcher.fetch_into(descriptor, target.path()).await.unwrap();

        assert_eq!(written, 2);
        assert!(target.path().join("wrangler.jsonc").is_file());
        assert!(target.path().join("src/index.ts").is_file());
    }

    #[tokio::test]
    async fn local_fetch_fails_for_a_missing_template() {
        let checkout = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let mut fetcher =
            TemplateFetcher::from_local(checkout.path().to_path_buf(), "create-cerces");
        let descriptor = descriptor_for("bun").unwrap();
        let err = fetcher
            .fetch_into(descriptor, target.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::FetchFailed { .. }));
    }
}
