use serde::Serialize;
use std::fmt::{self, Write};

use crate::level::rewrite_level;

/// Line emitted when neither the record nor its `Debug` rendering can be
/// encoded.
pub const UNSERIALIZABLE_LINE: &str = "\"error serializing log line\"";

/// Encode a record into a single JSON line.
///
/// Tries, in order:
/// 1. the record's own `Serialize` impl (with level rewriting applied when
///    `rewrite_levels` is set and the record fits a `serde_json::Value`),
/// 2. the JSON string of its `Debug` rendering,
/// 3. [`UNSERIALIZABLE_LINE`].
///
/// Never fails.
pub fn encode_line<R>(record: &R, rewrite_levels: bool) -> String
where
    R: Serialize + fmt::Debug + ?Sized,
{
    encode_json(record, rewrite_levels)
        .or_else(|_| encode_debug(record))
        .unwrap_or_else(|_| UNSERIALIZABLE_LINE.to_string())
}

fn encode_json<R>(record: &R, rewrite_levels: bool) -> Result<String, serde_json::Error>
where
    R: Serialize + ?Sized,
{
    if !rewrite_levels {
        return serde_json::to_string(record);
    }

    // `to_value` rejects some values the writer accepts (e.g. u128 above
    // u64::MAX); those are shipped without rewriting.
    match serde_json::to_value(record) {
        Ok(mut value) => {
            rewrite_level(&mut value);
            serde_json::to_string(&value)
        }
        Err(_) => serde_json::to_string(record),
    }
}

fn encode_debug<R>(record: &R) -> Result<String, EncodeError>
where
    R: fmt::Debug + ?Sized,
{
    let mut coerced = String::new();
    write!(coerced, "{:?}", record).map_err(|_| EncodeError::Format)?;
    serde_json::to_string(&coerced).map_err(EncodeError::Json)
}

#[derive(thiserror::Error, Debug)]
enum EncodeError {
    #[error("debug formatting failed")]
    Format,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Join buffered lines into one newline-delimited request body.
pub fn join_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut body = String::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        body.push_str(line);
    }
    body
}
