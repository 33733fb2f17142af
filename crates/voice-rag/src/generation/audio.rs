//! Audio staging and encoding

use base64::Engine;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::Result;

/// MIME type of synthesized replies
pub const REPLY_AUDIO_MIME: &str = "audio/mpeg";

/// Extension used when an upload carries no usable file name
const DEFAULT_AUDIO_EXTENSION: &str = "webm";

/// Encode audio bytes as a `data:audio/mpeg;base64,...` URI
pub fn audio_data_uri(audio: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        REPLY_AUDIO_MIME,
        base64::engine::general_purpose::STANDARD.encode(audio)
    )
}

/// Uploaded audio written to a temporary file for transcription
///
/// The file is removed when the value is dropped, on success and error
/// paths alike.
pub struct StagedAudio {
    file: NamedTempFile,
}

impl StagedAudio {
    /// Write `data` to a fresh temporary file named after the upload's extension
    pub fn stage(data: &[u8], file_name: Option<&str>) -> Result<Self> {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or(DEFAULT_AUDIO_EXTENSION)
            .to_ascii_lowercase();

        let mut file = tempfile::Builder::new()
            .prefix("voice-rag-")
            .suffix(&format!(".{}", extension))
            .tempfile()?;
        file.write_all(data)?;
        file.flush()?;

        tracing::debug!("Staged {} bytes of audio at {}", data.len(), file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
