//! Voice message playback control.
//!
//! A single [`PlaybackController`] is owned by the UI layer and decides what
//! the audio backend does when a voice bubble is tapped. At most one clip is
//! loaded at a time; any backend failure releases it and returns to idle.

use thiserror::Error;
use tracing::{debug, warn};

/// Boxed error reported by a [`PlaybackBackend`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for playback operations.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Failed to start {source_id}: {source}")]
    Start {
        source_id: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to resume {source_id}: {source}")]
    Resume {
        source_id: String,
        #[source]
        source: BackendError,
    },
}

/// Audio output used by the controller.
pub trait PlaybackBackend {
    /// Failure raised when loading or resuming a clip.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load `source` and begin playing it.
    fn start(&mut self, source: &str) -> Result<(), Self::Error>;
    /// Pause the loaded clip.
    fn pause(&mut self);
    /// Continue the paused clip.
    fn resume(&mut self) -> Result<(), Self::Error>;
    /// Stop and release the loaded clip.
    fn stop(&mut self);
}

/// What the controller currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing loaded.
    #[default]
    Idle,
    /// Clip is playing.
    Playing(String),
    /// Clip is loaded but paused.
    Paused(String),
}

/// Owns the backend and the "currently playing" state.
#[derive(Debug)]
pub struct PlaybackController<B: PlaybackBackend> {
    backend: B,
    state: PlaybackState,
}

impl<B: PlaybackBackend> PlaybackController<B> {
    /// Create an idle controller.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: PlaybackState::Idle,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Get the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Id of the loaded clip, playing or paused.
    pub fn currently_playing(&self) -> Option<&str> {
        match &self.state {
            PlaybackState::Playing(id) | PlaybackState::Paused(id) => Some(id),
            PlaybackState::Idle => None,
        }
    }

    /// Check if `id` is loaded and actively playing.
    pub fn is_playing(&self, id: &str) -> bool {
        matches!(&self.state, PlaybackState::Playing(current) if current == id)
    }

    /// Play `id`.
    ///
    /// Resumes if `id` is paused, does nothing if it is already playing,
    /// otherwise replaces whatever is loaded.
    pub fn play(&mut self, id: &str) -> Result<(), PlaybackError> {
        if self.is_playing(id) {
            return Ok(());
        }
        if matches!(&self.state, PlaybackState::Paused(current) if current == id) {
            return self.resume();
        }
        self.start(id)
    }

    /// Pause the active clip. No-op unless something is playing.
    pub fn pause(&mut self) {
        if let PlaybackState::Playing(id) = &self.state {
            let id = id.clone();
            self.backend.pause();
            debug!(id = %id, "Playback paused");
            self.state = PlaybackState::Paused(id);
        }
    }

    /// Tap behavior of a voice bubble: pause if `id` is playing, otherwise play it.
    pub fn toggle(&mut self, id: &str) -> Result<(), PlaybackError> {
        if self.is_playing(id) {
            self.pause();
            Ok(())
        } else {
            self.play(id)
        }
    }

    /// Completion callback from the backend.
    pub fn finished(&mut self) {
        if let Some(id) = self.currently_playing() {
            debug!(id = %id, "Playback finished");
        }
        self.release();
    }

    /// Stop playback and release the backend.
    pub fn stop(&mut self) {
        self.release();
    }

    fn start(&mut self, id: &str) -> Result<(), PlaybackError> {
        self.release();

        if let Err(e) = self.backend.start(id) {
            warn!(id = %id, error = %e, "Failed to start playback");
            self.release_after_error();
            return Err(PlaybackError::Start {
                source_id: id.to_string(),
                source: Box::new(e),
            });
        }

        debug!(id = %id, "Playback started");
        self.state = PlaybackState::Playing(id.to_string());
        Ok(())
    }

    fn resume(&mut self) -> Result<(), PlaybackError> {
        let Some(id) = self.currently_playing().map(str::to_string) else {
            return Ok(());
        };

        if let Err(e) = self.backend.resume() {
            warn!(id = %id, error = %e, "Failed to resume playback");
            self.release_after_error();
            return Err(PlaybackError::Resume {
                source_id: id,
                source: Box::new(e),
            });
        }

        self.state = PlaybackState::Playing(id);
        Ok(())
    }

    fn release(&mut self) {
        if self.state != PlaybackState::Idle {
            self.backend.stop();
            self.state = PlaybackState::Idle;
        }
    }

    fn release_after_error(&mut self) {
        self.backend.stop();
        self.state = PlaybackState::Idle;
    }
}
