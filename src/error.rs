//! Errors.

use backend::Backend;

quick_error! {
    /// An error.
    ///
    /// Hashing itself never fails; these come from parsing keys and from configuring the backend.
    #[derive(Debug, Clone, PartialEq, Eq)]
    #[allow(missing_docs)]
    pub enum Error {
        /// A key was not exactly 32 bytes long. `len` is the length of the rejected key.
        InvalidKeyLength {
            len: usize,
        } {
            display("Invalid key length - expected 32 bytes, found {}.", len)
        }
        /// The configured backend name, `name`, is not known.
        UnknownBackend {
            name: String,
        } {
            display("Unknown backend {:?}.", name)
        }
        /// The requested `backend` cannot run on this host.
        UnsupportedBackend {
            backend: Backend,
        } {
            display("Backend {} is not supported on this host.", backend.name())
        }
    }
}
