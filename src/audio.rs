//! Audio file helpers: duration probing and speech-file housekeeping

use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::EngineError;

/// Return the audio duration of a file in seconds.
///
/// Works with the formats the probe registry knows (mp3, wav, ...). Fails
/// with an `Audio` error when the file is missing or its duration cannot be
/// determined.
pub fn duration_seconds(path: &Path) -> Result<f64, EngineError> {
    if !path.exists() {
        return Err(EngineError::Audio {
            message: format!("audio file not found: {}", path.display()),
        });
    }

    let file = File::open(path).map_err(|e| EngineError::Audio {
        message: format!("failed to open {}: {e}", path.display()),
    })?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| EngineError::Audio {
            message: format!("could not read audio metadata for {}: {e}", path.display()),
        })?;

    let mut format = probed.format;
    let track = format.default_track().ok_or_else(|| EngineError::Audio {
        message: format!("no default track in {}", path.display()),
    })?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let frames = match params.n_frames {
        Some(frames) => frames,
        // Headerless streams (common for mp3) declare no frame count; walk
        // the packets and sum their durations instead
        None => {
            let mut total: u64 = 0;
            while let Ok(packet) = format.next_packet() {
                if packet.track_id() == track_id {
                    total += packet.dur();
                }
            }
            total
        }
    };

    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(frames);
        return Ok(time.seconds as f64 + time.frac);
    }
    if let Some(sample_rate) = params.sample_rate {
        return Ok(frames as f64 / sample_rate as f64);
    }

    Err(EngineError::Audio {
        message: format!("could not determine duration for {}", path.display()),
    })
}

/// Path for a generated speech file under the speech directory.
pub fn speech_file_path(dir: &Path, prefix: &str, id: i64) -> PathBuf {
    dir.join(format!("{prefix}_{id}.mp3"))
}

/// Create the speech directory if it does not exist yet.
pub fn ensure_speech_dir(dir: &Path) -> Result<(), EngineError> {
    std::fs::create_dir_all(dir).map_err(|e| EngineError::Internal {
        message: format!("failed to create speech dir {}: {e}", dir.display()),
    })
}

/// Delete all generated `.mp3` files from the speech directory and return
/// how many were removed. A missing directory counts as zero.
pub fn purge_speech_files(dir: &Path) -> Result<usize, EngineError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(EngineError::Internal {
                message: format!("failed to read speech dir {}: {e}", dir.display()),
            });
        }
    };

    let mut deleted = 0;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("mp3") {
            std::fs::remove_file(&path)?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_audio_error() {
        let err = duration_seconds(Path::new("/nonexistent/clip.mp3")).unwrap_err();
        assert!(matches!(err, EngineError::Audio { .. }));
    }

    #[test]
    fn speech_paths_follow_the_prefix_id_convention() {
        let path = speech_file_path(Path::new("speechfiles"), "speech", 42);
        assert_eq!(path, PathBuf::from("speechfiles/speech_42.mp3"));
    }

    #[test]
    fn purging_a_missing_directory_deletes_nothing() {
        assert_eq!(
            purge_speech_files(Path::new("/nonexistent/speechfiles")).unwrap(),
            0
        );
    }
}
