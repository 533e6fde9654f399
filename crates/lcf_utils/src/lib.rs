//! Small set of shared helpers used across the `lcf` workspace.
//!
//! Mirrors the shape of a typical internal utility crate: a couple of type aliases and
//! extension traits that otherwise would get copy-pasted between modules.

mod result_ext;

pub use result_ext::AnyhowResultExt;

pub type AnyResult<T = (), E = anyhow::Error> = anyhow::Result<T, E>;

/// Shorthand for `Ok(())`, used at the end of functions that only return errors.
pub const fn ok<E>() -> Result<(), E> {
    Ok(())
}
