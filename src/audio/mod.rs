pub mod beep;

use beep::BeepTone;

use log::warn;
use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

/// Audible-feedback boundary. Fire-and-forget; the core never consults a
/// result, so implementations swallow and log their own failures.
pub trait CueSink: Send + Sync {
    fn play(&self, volume: f32);
}

/// Plays no sound. Useful at the boundary when audio hardware is absent.
pub struct SilentCue;

impl CueSink for SilentCue {
    fn play(&self, _volume: f32) {}
}

enum CueCommand {
    Play(f32),
}

/// Default `CueSink` backed by rodio.
///
/// The output stream and sink are not `Send`, so a dedicated audio thread
/// owns them and commands arrive over a channel. The thread is spawned lazily
/// on the first cue and lives until the handle is dropped.
pub struct CuePlayer {
    tx: Arc<Mutex<Option<Sender<CueCommand>>>>,
}

impl CuePlayer {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<CueCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<CueCommand>();

        thread::Builder::new()
            .name("cue-player".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        CueCommand::Play(volume) => {
                            if let Err(e) = ensure_sink(&mut _stream, &mut sink) {
                                warn!("cue playback unavailable: {e}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.set_volume(volume.clamp(0.0, 1.0));
                                s.append(BeepTone::new());
                            }
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }
}

impl Default for CuePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl CueSink for CuePlayer {
    fn play(&self, volume: f32) {
        match self.ensure_thread() {
            Ok(tx) => {
                let _ = tx.send(CueCommand::Play(volume));
            }
            Err(e) => warn!("cue thread unavailable: {e}"),
        }
    }
}
