//! Tolerant field readers for persisted documents
//!
//! Every reader resolves an absent or malformed field to the supplied
//! default and logs a warning for the malformed case. A bad field never
//! aborts a load.

use toml::{Table, Value};
use tracing::warn;

pub fn read_bool(table: &Table, key: &str, default: bool) -> bool {
    match table.get(key) {
        None => default,
        Some(Value::Boolean(b)) => *b,
        Some(other) => {
            warn!(key = key, found = %other, "malformed boolean field, using default");
            default
        }
    }
}

pub fn read_u32(table: &Table, key: &str, default: u32) -> u32 {
    match table.get(key) {
        None => default,
        Some(Value::Integer(n)) => match u32::try_from(*n) {
            Ok(v) => v,
            Err(_) => {
                warn!(key = key, found = n, "integer field out of range, using default");
                default
            }
        },
        Some(other) => {
            warn!(key = key, found = %other, "malformed integer field, using default");
            default
        }
    }
}

pub fn read_u64(table: &Table, key: &str, default: u64) -> u64 {
    match table.get(key) {
        None => default,
        Some(Value::Integer(n)) => match u64::try_from(*n) {
            Ok(v) => v,
            Err(_) => {
                warn!(key = key, found = n, "integer field out of range, using default");
                default
            }
        },
        Some(other) => {
            warn!(key = key, found = %other, "malformed integer field, using default");
            default
        }
    }
}

pub fn read_string(table: &Table, key: &str, default: &str) -> String {
    match table.get(key) {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            warn!(key = key, found = %other, "malformed string field, using default");
            default.to_string()
        }
    }
}
