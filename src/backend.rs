//! Backend selection.
//!
//! The portable implementation runs everywhere. On `x86_64` hosts with SSE4.1, an accelerated
//! implementation producing the exact same digests is available. The backend is chosen once per
//! process, by probing the host and consulting the `Settings`, and never changes afterwards.

use std::sync::OnceLock;

use slog::{Discard, Logger};

use error::Error;
use key::Key;
use portable;
use settings::{Preference, Settings};
#[cfg(all(feature = "sse41", target_arch = "x86_64"))]
use sse41;

/// The backend selected for this process.
///
/// A `OnceLock` rather than a lazy static, since `init` fills it from caller-supplied settings.
static SELECTED: OnceLock<Backend> = OnceLock::new();

/// An implementation of the hash function.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Backend {
    /// The lane-at-a-time implementation.
    Portable,
    /// The SSE4.1 implementation.
    Sse41,
}

impl Backend {
    /// Probe the host for the fastest supported backend.
    pub fn probe() -> Backend {
        if Backend::Sse41.is_supported() {
            Backend::Sse41
        } else {
            Backend::Portable
        }
    }

    /// Choose a backend from some settings.
    ///
    /// This never fails: if the settings force a backend that the host cannot run, the probed
    /// backend is used instead and a warning is logged.
    pub fn detect(settings: &Settings, log: &Logger) -> Backend {
        let probed = Backend::probe();

        match settings.backend {
            Preference::Auto => {
                info!(log, "selected backend"; "backend" => probed.name(), "forced" => false);
                probed
            },
            Preference::Force(backend) => match backend.require() {
                Ok(backend) => {
                    info!(log, "selected backend"; "backend" => backend.name(), "forced" => true);
                    backend
                },
                Err(err) => {
                    warn!(log, "falling back to probed backend"; "error" => %err,
                          "backend" => probed.name());
                    probed
                },
            },
        }
    }

    /// Get the backend of this process.
    ///
    /// On the first call, this selects the backend with the settings from the environment (see
    /// `Settings::from_env`).
    pub fn current() -> Backend {
        *SELECTED.get_or_init(|| {
            Backend::select(Settings::from_env(), &Logger::root(Discard, o!()))
        })
    }

    /// Choose a backend from settings which may have failed to load.
    ///
    /// Invalid settings are logged and replaced by the defaults.
    fn select(settings: Result<Settings, Error>, log: &Logger) -> Backend {
        let settings = settings.unwrap_or_else(|err| {
            warn!(log, "ignoring invalid settings"; "error" => %err);
            Settings::default()
        });

        Backend::detect(&settings, log)
    }

    /// Is this backend supported on this host?
    pub fn is_supported(self) -> bool {
        match self {
            Backend::Portable => true,
            Backend::Sse41 => sse41_supported(),
        }
    }

    /// Return this backend if it is supported on this host.
    pub fn require(self) -> Result<Backend, Error> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(Error::UnsupportedBackend {
                backend: self,
            })
        }
    }

    /// The name of this backend, as accepted by the settings.
    pub fn name(self) -> &'static str {
        match self {
            Backend::Portable => "portable",
            Backend::Sse41 => "sse41",
        }
    }

    /// Hash a buffer with this backend.
    ///
    /// If this backend is not supported on this host, the portable implementation is used, which
    /// gives the same result.
    pub fn hash(self, key: &Key, buf: &[u8]) -> u64 {
        match self {
            #[cfg(all(feature = "sse41", target_arch = "x86_64"))]
            Backend::Sse41 if sse41_supported() => unsafe { sse41::hash(key.lanes(), buf) },
            _ => portable::hash(key, buf),
        }
    }
}

/// Select the backend of this process from explicit settings.
///
/// This only has an effect if no backend has been selected yet; either way, the backend of this
/// process is returned.
pub fn init(settings: &Settings, log: &Logger) -> Backend {
    let backend = *SELECTED.get_or_init(|| Backend::detect(settings, log));
    debug!(log, "backend initialized"; "backend" => backend.name());

    backend
}

#[cfg(all(feature = "sse41", target_arch = "x86_64"))]
fn sse41_supported() -> bool {
    is_x86_feature_detected!("sse4.1")
}

#[cfg(not(all(feature = "sse41", target_arch = "x86_64")))]
fn sse41_supported() -> bool {
    false
}
