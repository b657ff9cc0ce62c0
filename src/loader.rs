//! Turns raw `A_*`/`CNAME_*`/`MX_*`/`TXT_*` environment declarations into
//! validated `ZoneRecord`s. Grounded on the teacher's
//! `TryFrom<FileZoneRecord> for InternalResourceRecord` in
//! `resourcerecord.rs`, which follows the same "parse, warn, skip" shape.

use tracing::warn;

use crate::error::EngineError;
use crate::record::{ZoneRecord, DEFAULT_TTL, SERVICE_PREFIX};
use crate::utils::canonicalize;

const A_PREFIX: &str = "A_";
const CNAME_PREFIX: &str = "CNAME_";
const MX_PREFIX: &str = "MX_";
const TXT_PREFIX: &str = "TXT_";

/// Parses every `(key, value)` pair from an environment-like iterator into
/// `ZoneRecord`s, skipping keys that don't match a known prefix and
/// logging a warning for any declaration that fails to parse.
pub fn load_records<I, K, V>(vars: I) -> Vec<ZoneRecord>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut records = Vec::new();
    for (key, value) in vars {
        let key = key.as_ref();
        let value = value.as_ref();
        let parsed = if key.starts_with(A_PREFIX) {
            parse_a(key, value)
        } else if key.starts_with(CNAME_PREFIX) {
            parse_cname(key, value)
        } else if key.starts_with(MX_PREFIX) {
            parse_mx(key, value)
        } else if key.starts_with(TXT_PREFIX) {
            parse_txt(key, value)
        } else {
            continue;
        };
        match parsed {
            Ok(record) => records.push(record),
            Err(EngineError::MalformedRecord { key, reason }) => {
                warn!(key, reason, "dropping malformed record declaration")
            }
            Err(other) => warn!(%other, "dropping malformed record declaration"),
        }
    }
    records
}

fn fields(value: &str) -> Vec<&str> {
    value.split('|').collect()
}

fn parse_ttl(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.parse::<u32>().ok()).unwrap_or(DEFAULT_TTL)
}

fn malformed(key: &str, reason: impl Into<String>) -> EngineError {
    EngineError::MalformedRecord {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_a(key: &str, value: &str) -> Result<ZoneRecord, EngineError> {
    let parts = fields(value);
    if parts.len() < 2 {
        return Err(malformed(key, "expected owner|ipv4-or-service[|ttl]"));
    }
    let owner = canonicalize(parts[0]);
    let ttl = parse_ttl(parts.get(2).copied());
    let (is_service, value) = match parts[1].strip_prefix(SERVICE_PREFIX) {
        Some(label) => (true, label.to_string()),
        None => (false, parts[1].to_string()),
    };
    Ok(ZoneRecord::A {
        owner,
        value,
        ttl,
        is_service,
    })
}

fn parse_cname(key: &str, value: &str) -> Result<ZoneRecord, EngineError> {
    let parts = fields(value);
    if parts.len() < 2 {
        return Err(malformed(key, "expected owner|target[|ttl]"));
    }
    let owner = canonicalize(parts[0]);
    let target = canonicalize(parts[1]);
    let ttl = parse_ttl(parts.get(2).copied());
    Ok(ZoneRecord::Cname { owner, target, ttl })
}

fn parse_mx(key: &str, value: &str) -> Result<ZoneRecord, EngineError> {
    let parts = fields(value);
    if parts.len() < 3 {
        return Err(malformed(key, "expected owner|priority|target[|ttl]"));
    }
    let owner = canonicalize(parts[0]);
    let priority = parts[1]
        .parse::<u16>()
        .map_err(|_| malformed(key, format!("invalid priority {:?}", parts[1])))?;
    let target = canonicalize(parts[2]);
    let ttl = parse_ttl(parts.get(3).copied());
    Ok(ZoneRecord::Mx {
        owner,
        target,
        ttl,
        priority,
    })
}

fn parse_txt(key: &str, value: &str) -> Result<ZoneRecord, EngineError> {
    let parts = fields(value);
    if parts.len() < 2 {
        return Err(malformed(key, "expected owner|text[|ttl]"));
    }
    let owner = canonicalize(parts[0]);
    let text = parts[1].to_string();
    let ttl = parse_ttl(parts.get(2).copied());
    Ok(ZoneRecord::Txt { owner, text, ttl })
}
