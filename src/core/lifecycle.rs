use std::sync::Arc;
use parking_lot::{const_mutex, Mutex};
use tracing::{error, info};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::memory::TranslationMemory;

/// Process-wide instance state: Uninitialized -> Active -> ShutDown
enum GlobalState {
    Uninitialized(Option<Config>),
    Active(Arc<TranslationMemory>),
    Failed(Error),
    ShutDown,
}

static GLOBAL: Mutex<GlobalState> = const_mutex(GlobalState::Uninitialized(None));

impl TranslationMemory {
    /// Set the configuration the process-wide instance is built with.
    /// Only valid before the first `get()`.
    pub fn configure(config: Config) -> Result<()> {
        let mut state = GLOBAL.lock();
        match &*state {
            GlobalState::Uninitialized(_) => {
                config.validate()?;
                *state = GlobalState::Uninitialized(Some(config));
                Ok(())
            }
            GlobalState::ShutDown => Err(after_shutdown()),
            GlobalState::Active(_) | GlobalState::Failed(_) => Err(Error::new(
                ErrorKind::InvalidState,
                "Translation memory is already initialized".to_string(),
            )),
        }
    }

    /// The process-wide instance, opened on first call. A failed open is
    /// remembered and returned again; it is never retried.
    pub fn get() -> Result<Arc<TranslationMemory>> {
        let mut state = GLOBAL.lock();
        match &mut *state {
            GlobalState::Active(tm) => Ok(tm.clone()),
            GlobalState::Failed(e) => Err(e.clone()),
            GlobalState::ShutDown => Err(after_shutdown()),
            GlobalState::Uninitialized(config) => {
                let config = config.take().unwrap_or_default();
                let path = config.storage_path.clone();
                match TranslationMemory::open(config) {
                    Ok(tm) => {
                        info!(path = %path.display(), "translation memory initialized");
                        let tm = Arc::new(tm);
                        *state = GlobalState::Active(tm.clone());
                        Ok(tm)
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "failed to open translation memory");
                        *state = GlobalState::Failed(e.clone());
                        Err(e)
                    }
                }
            }
        }
    }

    /// Shut the process-wide instance down. Pending writes are committed
    /// first. Legal exactly once.
    pub fn clean_up() -> Result<()> {
        let mut state = GLOBAL.lock();
        match std::mem::replace(&mut *state, GlobalState::ShutDown) {
            GlobalState::Active(tm) => {
                let result = tm.close();
                info!("translation memory shut down");
                result
            }
            GlobalState::Uninitialized(_) | GlobalState::Failed(_) => {
                info!("translation memory shut down before use");
                Ok(())
            }
            GlobalState::ShutDown => {
                error!("translation memory cleaned up twice");
                Err(after_shutdown())
            }
        }
    }
}

fn after_shutdown() -> Error {
    Error::lifecycle("Translation memory was already shut down")
}
