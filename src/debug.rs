//! Last-transcription dump for debugging recognition problems.

use crate::stt::Transcription;
use crate::Result;
use std::path::{Path, PathBuf};

pub const LAST_TRANSCRIPTION_FILE: &str = "voxcode-last-transcription.json";

/// Write `transcription` as pretty JSON into `dir`, replacing the previous dump.
pub fn write_last_transcription(transcription: &Transcription, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LAST_TRANSCRIPTION_FILE);
    let json = serde_json::to_string_pretty(transcription)?;
    std::fs::write(&path, json)?;
    tracing::debug!(path = %path.display(), "wrote last transcription");
    Ok(path)
}

/// Default dump directory: the system temp dir.
pub fn default_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_previous_dump() {
        let dir = std::env::temp_dir().join(format!("voxcode-debug-{}", uuid::Uuid::new_v4()));
        write_last_transcription(&Transcription::from_text("first"), &dir).unwrap();
        let path = write_last_transcription(
            &Transcription::from_text("open the config file").with_language("english"),
            &dir,
        )
        .unwrap();
        let back: Transcription =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.text, "open the config file");
        assert_eq!(back.language, "english");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
