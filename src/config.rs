//! Conversion configuration.
//!
//! [`Marc8Config`] holds everything that shapes a conversion: the error
//! policy, the fallback encoding and the initial G0/G1 designations. A
//! process-wide default is kept here and read through the free accessor
//! functions; each top-level conversion takes one [`snapshot`] of it on
//! entry, so concurrent updates never change a conversion already running.
//!
//! # Examples
//!
//! ```
//! use mrrc_marc8::config::{self, Marc8Config};
//! use mrrc_marc8::Marc8Converter;
//!
//! # fn main() -> mrrc_marc8::Result<()> {
//! // Process-wide: skip unmapped bytes, fall back to Latin-1 for the whole input
//! config::set_ignore_errors(true);
//! config::set_assume_encoding(Some("iso-8859-1"))?;
//! assert_eq!(mrrc_marc8::marc8_to_utf8(b"caf\xE9\x7F", None)?, "caf\u{E9}\u{7F}");
//!
//! // Or an explicit configuration for one converter
//! let converter = Marc8Converter::with_config(Marc8Config {
//!     ignore_errors: true,
//!     ..Default::default()
//! });
//! assert_eq!(converter.marc8_to_utf8(b"ab\x01cd")?, "abcd");
//! # Ok(())
//! # }
//! ```

use std::sync::{PoisonError, RwLock};

use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::charset::{CharsetId, CharsetState};
use crate::error::{Marc8Error, Result};

/// Options controlling a MARC-8 conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marc8Config {
    /// Skip unmapped units instead of failing.
    pub ignore_errors: bool,

    /// Encoding label used to decode the whole input when an unmapped byte
    /// is met while `ignore_errors` is set.
    pub assume_encoding: Option<String>,

    /// Character set designated to G0 at the start of every conversion.
    pub default_g0: CharsetId,

    /// Character set designated to G1 at the start of every conversion.
    pub default_g1: CharsetId,
}

impl Default for Marc8Config {
    fn default() -> Self {
        let state = CharsetState::default();
        Marc8Config {
            ignore_errors: false,
            assume_encoding: None,
            default_g0: state.g0,
            default_g1: state.g1,
        }
    }
}

impl Marc8Config {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Marc8Error::InvalidConfig` if the JSON does not describe a
    /// configuration, or `Marc8Error::UnknownEncoding` if `assume_encoding`
    /// names an encoding `encoding_rs` does not know.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Marc8Config =
            serde_json::from_str(json).map_err(|e| Marc8Error::InvalidConfig(e.to_string()))?;
        if config.assume_encoding.as_deref() == Some("") {
            config.assume_encoding = None;
        }
        if let Some(label) = &config.assume_encoding {
            resolve_encoding(label)?;
        }
        Ok(config)
    }

    /// The same configuration with `ignore_errors` overridden when
    /// `ignore_errors` is `Some`.
    #[must_use]
    pub fn with_ignore_errors(mut self, ignore_errors: Option<bool>) -> Self {
        if let Some(ignore) = ignore_errors {
            self.ignore_errors = ignore;
        }
        self
    }

    /// Whether the fallback encoding is a UTF-8 label.
    #[must_use]
    pub fn assume_unicode(&self) -> bool {
        self.assume_encoding
            .as_deref()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .is_some_and(|encoding| encoding == UTF_8)
    }

    /// The initial working-set state.
    #[must_use]
    pub fn initial_state(&self) -> CharsetState {
        CharsetState::new(self.default_g0, self.default_g1)
    }

    /// The fallback encoding, if fallback decoding is in effect.
    ///
    /// # Errors
    ///
    /// Returns `Marc8Error::UnknownEncoding` if the label is not recognized.
    pub fn fallback_encoding(&self) -> Result<Option<&'static Encoding>> {
        match self.assume_encoding.as_deref() {
            Some(label) if self.ignore_errors && !label.is_empty() => {
                resolve_encoding(label).map(Some)
            },
            _ => Ok(None),
        }
    }
}

fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Marc8Error::UnknownEncoding(label.to_string()))
}

lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Marc8Config> = RwLock::new(Marc8Config::default());
}

fn update<F: FnOnce(&mut Marc8Config)>(f: F) {
    let mut config = GLOBAL_CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut config);
}

/// A consistent copy of the process-wide configuration.
#[must_use]
pub fn snapshot() -> Marc8Config {
    GLOBAL_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide configuration.
pub fn replace(config: Marc8Config) {
    update(|current| *current = config);
}

/// Restore the process-wide configuration to its defaults.
pub fn reset() {
    replace(Marc8Config::default());
}

/// Whether unmapped units are skipped by default.
#[must_use]
pub fn ignore_errors() -> bool {
    snapshot().ignore_errors
}

/// Set whether unmapped units are skipped by default.
pub fn set_ignore_errors(ignore: bool) {
    update(|config| config.ignore_errors = ignore);
}

/// Whether the fallback encoding is UTF-8.
#[must_use]
pub fn assume_unicode() -> bool {
    snapshot().assume_unicode()
}

/// Use UTF-8 as the fallback encoding, or stop doing so.
///
/// Turning it off clears the fallback only when it is currently UTF-8.
pub fn set_assume_unicode(assume: bool) {
    update(|config| {
        if assume {
            config.assume_encoding = Some(UTF_8.name().to_string());
        } else if config.assume_unicode() {
            config.assume_encoding = None;
        }
    });
}

/// The fallback encoding label, if any.
#[must_use]
pub fn assume_encoding() -> Option<String> {
    snapshot().assume_encoding
}

/// Set the fallback encoding label. `None` or an empty label clears it.
///
/// # Errors
///
/// Returns `Marc8Error::UnknownEncoding` if the label is not known to
/// `encoding_rs`; the current setting is left unchanged.
pub fn set_assume_encoding(label: Option<&str>) -> Result<()> {
    let label = label.map(str::trim).filter(|label| !label.is_empty());
    if let Some(label) = label {
        resolve_encoding(label)?;
    }
    update(|config| config.assume_encoding = label.map(ToString::to_string));
    Ok(())
}

/// Character set designated to G0 at the start of a conversion.
#[must_use]
pub fn default_g0() -> CharsetId {
    snapshot().default_g0
}

/// Set the character set designated to G0 at the start of a conversion.
pub fn set_default_g0(charset: CharsetId) {
    update(|config| config.default_g0 = charset);
}

/// Character set designated to G1 at the start of a conversion.
#[must_use]
pub fn default_g1() -> CharsetId {
    snapshot().default_g1
}

/// Set the character set designated to G1 at the start of a conversion.
pub fn set_default_g1(charset: CharsetId) {
    update(|config| config.default_g1 = charset);
}
