use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Relational metadata store (structured filtering and audit).
    pub meta_db: DbConfig,
    /// Vector index (full text + embeddings), kept in its own database file.
    pub vector_db: DbConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    /// Base URL for the Ollama provider.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            model: None,
            dims: None,
            url: None,
            max_retries: 5,
            timeout_secs: 30,
        }
    }
}

fn default_provider() -> String {
    "hash".to_string()
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.meta_db.path == config.vector_db.path {
        anyhow::bail!("meta_db.path and vector_db.path must be distinct database files");
    }

    if config.embedding.dims == Some(0) {
        anyhow::bail!("embedding.dims must be > 0 when set");
    }

    match config.embedding.provider.as_str() {
        "openai" | "ollama" => {
            // Remote providers need an explicit model and dimensionality.
            if config.embedding.model.is_none() {
                anyhow::bail!(
                    "embedding.model must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
            if config.embedding.dims.is_none() {
                anyhow::bail!(
                    "embedding.dims must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
        }
        "hash" | "local" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be hash, openai, ollama, local, or disabled.",
            other
        ),
    }

    if config.server.bind.is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdock.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn minimal_config_defaults() {
        let (_dir, path) = write_config(
            r#"
[meta_db]
path = "data/resumes.sqlite"

[vector_db]
path = "data/vectors.sqlite"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.embedding.provider, "hash");
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
        assert!(cfg.embedding.is_enabled());
    }

    #[test]
    fn shared_db_path_rejected() {
        let (_dir, path) = write_config(
            r#"
[meta_db]
path = "data/one.sqlite"

[vector_db]
path = "data/one.sqlite"
"#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn openai_requires_model_and_dims() {
        let (_dir, path) = write_config(
            r#"
[meta_db]
path = "data/resumes.sqlite"

[vector_db]
path = "data/vectors.sqlite"

[embedding]
provider = "openai"
"#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn unknown_provider_rejected() {
        let (_dir, path) = write_config(
            r#"
[meta_db]
path = "data/resumes.sqlite"

[vector_db]
path = "data/vectors.sqlite"

[embedding]
provider = "chroma"
"#,
        );
        assert!(load_config(&path).is_err());
    }
}
