//! Settings for backend selection.

use std::env;
use std::str::FromStr;

use backend::Backend;
use error::Error;

/// The environment variable read by `Settings::from_env`.
pub const BACKEND_VAR: &'static str = "HIGHWAY_BACKEND";

/// Which backend to use.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Preference {
    /// Use the fastest backend the host supports.
    Auto,
    /// Use this backend, if the host supports it.
    Force(Backend),
}

impl Default for Preference {
    fn default() -> Preference {
        Preference::Auto
    }
}

impl FromStr for Preference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Preference, Error> {
        match &*s.trim().to_ascii_lowercase() {
            "" | "auto" => Ok(Preference::Auto),
            "portable" => Ok(Preference::Force(Backend::Portable)),
            "sse41" | "sse4.1" => Ok(Preference::Force(Backend::Sse41)),
            _ => Err(Error::UnknownBackend {
                name: s.to_owned(),
            }),
        }
    }
}

/// Settings for the system.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Settings {
    /// The backend preference.
    ///
    /// This defaults to `Auto`, leaving the choice to the capability probe.
    pub backend: Preference,
}

impl Settings {
    /// Preset which always runs the portable implementation.
    pub fn portable() -> Settings {
        Settings {
            backend: Preference::Force(Backend::Portable),
        }
    }

    /// Read the settings from the environment.
    ///
    /// `HIGHWAY_BACKEND` may be `auto`, `portable` or `sse41` (case-insensitive). If it is unset,
    /// the default settings are used.
    pub fn from_env() -> Result<Settings, Error> {
        Settings::from_var(env::var(BACKEND_VAR))
    }

    /// Build the settings from the value of `HIGHWAY_BACKEND`, as returned by `env::var`.
    pub(crate) fn from_var(var: Result<String, env::VarError>) -> Result<Settings, Error> {
        match var {
            Ok(value) => Ok(Settings {
                backend: value.parse()?,
            }),
            Err(env::VarError::NotPresent) => Ok(Settings::default()),
            Err(env::VarError::NotUnicode(value)) => Err(Error::UnknownBackend {
                name: value.to_string_lossy().into_owned(),
            }),
        }
    }
}
