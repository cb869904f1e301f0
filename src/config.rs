use std::path::PathBuf;

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;
use tracing::info;

use crate::parser::dictionary::Vocabulary;
use crate::parser::Pipeline;
use crate::theme::kb::KnowledgeBase;

pub const DEFAULT_DB_PATH: &str = "data/detailpic.sqlite";

/// Defaults, then `detailpic.toml` if present, then `DETAILPIC_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub vocabulary: Option<PathBuf>,
    pub knowledge_base: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .add_source(config::File::with_name("detailpic").required(false))
            .add_source(config::Environment::with_prefix("DETAILPIC"))
            .build()
            .context("loading settings")?;
        Ok(settings.try_deserialize()?)
    }

    pub fn load_vocabulary(&self) -> Result<Vocabulary> {
        match &self.vocabulary {
            Some(path) => {
                info!(path = %path.display(), "loading vocabulary override");
                Vocabulary::from_file(path)
                    .with_context(|| format!("vocabulary {}", path.display()))
            }
            None => Ok(Vocabulary::default()),
        }
    }

    pub fn load_knowledge_base(&self) -> Result<KnowledgeBase> {
        match &self.knowledge_base {
            Some(path) => {
                info!(path = %path.display(), "loading knowledge base override");
                KnowledgeBase::from_file(path)
                    .with_context(|| format!("knowledge base {}", path.display()))
            }
            None => Ok(KnowledgeBase::default()),
        }
    }

    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(Pipeline::new(self.load_vocabulary()?, self.load_knowledge_base()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let s = Settings::load().unwrap();
        assert_eq!(s.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert!(s.vocabulary.is_none());
        assert!(s.pipeline().is_ok());
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let s = Settings {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            vocabulary: Some(PathBuf::from("tests/fixtures/no_such_vocabulary.json")),
            knowledge_base: None,
        };
        assert!(s.load_vocabulary().is_err());
        assert!(s.load_knowledge_base().is_ok());
    }
}
