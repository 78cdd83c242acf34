//! INI file configuration adapter.
//!
//! Only `#` starts a comment: `;` is the address part delimiter and must
//! survive in values.

use crate::domain::error::ArchivistError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::fs;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArchivistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(content, &path.display().to_string())
    }

    pub fn from_string(content: &str) -> Result<Self, ArchivistError> {
        Self::parse(content.to_string(), "<string>")
    }

    fn parse(content: String, origin: &str) -> Result<Self, ArchivistError> {
        let mut defaults = Ini::new().defaults();
        defaults.comment_symbols = vec!['#'];
        let mut config = Ini::new_from_defaults(defaults);
        config
            .read(content)
            .map_err(|reason| ArchivistError::ConfigParse {
                file: origin.to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn sections(&self) -> Vec<String> {
        let mut sections = self.config.sections();
        sections.sort();
        sections
    }
}
