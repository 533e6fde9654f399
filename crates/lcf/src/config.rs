//! Reads the handful of `RPG_RT.ini` keys that affect how a project's files should be
//! loaded: which codepage its text is in, and which engine variant wrote it.
//!
//! Everything below the codec proper is core territory and uses [`LcfError`]; this module
//! sits above it, doing file I/O and INI parsing, so it follows the same `anyhow` + context
//! style the rest of the workspace's ambient glue uses.

use std::fs;
use std::path::Path;

use lcf_utils::AnyhowResultExt;

use crate::encoding;
use crate::ini::IniDocument;
use crate::records::database::EngineFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub codepage: u32,
    pub engine: EngineFlags,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { codepage: encoding::CP_WINDOWS_1252, engine: EngineFlags::default() }
    }
}

impl GameConfig {
    pub fn encoding(&self) -> lcf_utils::AnyResult<&'static encoding_rs::Encoding> {
        encoding::by_codepage(self.codepage).otherwise("resolving configured codepage")
    }
}

/// Loads `RPG_RT.ini` (or an equivalent config file) from `path`. Missing or unrecognized
/// keys fall back to [`GameConfig::default`] rather than failing the whole load — a project
/// with no ini file at all is a normal, supported case.
const INI_SECTION: &str = "rpg_rt";

pub fn load_game_config(path: &Path) -> lcf_utils::AnyResult<GameConfig> {
    let text = fs::read_to_string(path).otherwise(format!("reading {}", path.display()))?;
    let doc = IniDocument::parse(&text).otherwise(format!("parsing {}", path.display()))?;

    let codepage = doc
        .get(INI_SECTION, "codepage")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(encoding::CP_WINDOWS_1252);

    let engine = EngineFlags {
        is_rpg2k3: doc.get(INI_SECTION, "fullpackageflag").map(|v| v == "1").unwrap_or(false),
        default_term_language_is_english: doc
            .get(INI_SECTION, "language")
            .map(|v| v.eq_ignore_ascii_case("english"))
            .unwrap_or(true),
    };

    log::debug!("loaded game config from {}: codepage={codepage}", path.display());
    Ok(GameConfig { codepage, engine })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_used_when_keys_are_absent() {
        let doc = IniDocument::parse("[RPG_RT]\r\n").unwrap();
        assert_eq!(doc.get("RPG_RT", "codepage"), None);
    }

    #[test]
    fn game_config_default_resolves_an_encoding() {
        let config = GameConfig::default();
        assert!(config.encoding().is_ok());
    }
}
