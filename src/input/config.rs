use std::io::Read;
use std::path::Path;

use crate::error::ConfigError;
use crate::input::open_maybe_gz;
use crate::model::instrument::Instrument;

/// Reads one instrument or an array of instruments from a JSON file and
/// validates each definition.
pub fn load_instruments(path: &Path) -> Result<Vec<Instrument>, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut text = String::new();
    open_maybe_gz(path)
        .map_err(io_err)?
        .read_to_string(&mut text)
        .map_err(io_err)?;
    parse_instruments(&text).map_err(|e| match e {
        ConfigError::Parse(source) => ConfigError::Json {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parses one instrument or an array of instruments and validates each.
/// Malformed JSON is reported as [`ConfigError::Parse`].
pub fn parse_instruments(text: &str) -> Result<Vec<Instrument>, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let instruments = if value.is_array() {
        serde_json::from_value::<Vec<Instrument>>(value)?
    } else {
        vec![serde_json::from_value::<Instrument>(value)?]
    };
    for instrument in &instruments {
        instrument.validate()?;
    }
    Ok(instruments)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/config.rs"]
mod tests;
