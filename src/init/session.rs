use std::path::Path;

use super::json;
use crate::{Error, GameSession};

impl GameSession {
    pub fn try_from_files<P: AsRef<Path>>(settings_file_path: P) -> Result<Self, Error> {
        Self::try_new(json::parse_settings(settings_file_path)?)
    }
}
