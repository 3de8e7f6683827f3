//! Audio output used for step narration.
//!
//! The story controller only needs "point at this resource" and "start
//! playing"; both may fail and the caller treats failures as non-fatal.

use anyhow::{Context, Result, anyhow};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub trait AudioOutput {
    fn set_source(&mut self, resource: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
}

impl<A: AudioOutput + ?Sized> AudioOutput for Box<A> {
    fn set_source(&mut self, resource: &str) -> Result<()> {
        (**self).set_source(resource)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }
}

/// Plays files from disk through the default output device.
///
/// The output stream is opened once and reused; each `play` decodes the
/// current source into a fresh sink, which drops (and silences) the previous
/// one.
pub struct RodioAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    base_dir: PathBuf,
    source: Option<PathBuf>,
    volume: f32,
}

impl RodioAudio {
    pub fn open(base_dir: impl Into<PathBuf>, volume: f32) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let base_dir = base_dir.into();
        info!(base = %base_dir.display(), volume, "Audio output ready");
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            base_dir,
            source: None,
            volume: volume.max(0.0),
        })
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl AudioOutput for RodioAudio {
    fn set_source(&mut self, resource: &str) -> Result<()> {
        let path = resolve_resource(&self.base_dir, resource);
        debug!(path = %path.display(), "Audio source set");
        self.source = Some(path);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let path = self
            .source
            .as_ref()
            .ok_or_else(|| anyhow!("no audio source selected"))?;
        let file =
            File::open(path).with_context(|| format!("Opening audio file {}", path.display()))?;
        let decoder = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Decoding audio file {}", path.display()))?;
        let sink = Sink::try_new(&self.handle).context("Creating sink")?;
        sink.set_volume(self.volume);
        sink.append(decoder);
        sink.play();
        debug!(path = %path.display(), "Started narration playback");
        self.sink = Some(sink);
        Ok(())
    }
}

/// Output that accepts every request without producing sound.
#[derive(Debug, Default)]
pub struct NullAudio {
    source: Option<String>,
}

impl NullAudio {
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl AudioOutput for NullAudio {
    fn set_source(&mut self, resource: &str) -> Result<()> {
        self.source = Some(resource.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        debug!(source = ?self.source, "Audio disabled; skipping playback");
        Ok(())
    }
}

/// Resolve a story-relative resource against the story's directory.
pub fn resolve_resource(base_dir: &Path, resource: &str) -> PathBuf {
    let path = Path::new(resource);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_resources_resolve_against_base() {
        let base = Path::new("/stories/andromeda");
        assert_eq!(
            resolve_resource(base, "audio/intro.ogg"),
            PathBuf::from("/stories/andromeda/audio/intro.ogg")
        );
        assert_eq!(
            resolve_resource(base, "/srv/audio/intro.ogg"),
            PathBuf::from("/srv/audio/intro.ogg")
        );
    }

    #[test]
    fn null_audio_remembers_source() {
        let mut audio = NullAudio::default();
        audio.set_source("pulsar.flac").unwrap();
        audio.play().unwrap();
        assert_eq!(audio.source(), Some("pulsar.flac"));
    }
}
