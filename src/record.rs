//! The record table's data model: a tagged variant per record kind, as the
//! teacher's own Design Notes recommend over a single struct with a
//! discriminant and a pile of fields that only apply to some kinds
//! (see `resourcerecord.rs`'s `InternalResourceRecord`).

use hickory_proto::rr::RecordType as WireRecordType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    A,
    Cname,
    Mx,
    Txt,
}

impl From<RecordKind> for WireRecordType {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::A => WireRecordType::A,
            RecordKind::Cname => WireRecordType::CNAME,
            RecordKind::Mx => WireRecordType::MX,
            RecordKind::Txt => WireRecordType::TXT,
        }
    }
}

/// A single declared record at some owner name. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneRecord {
    A {
        owner: String,
        value: String,
        ttl: u32,
        is_service: bool,
    },
    Cname {
        owner: String,
        target: String,
        ttl: u32,
    },
    Mx {
        owner: String,
        target: String,
        ttl: u32,
        priority: u16,
    },
    Txt {
        owner: String,
        text: String,
        ttl: u32,
    },
}

impl ZoneRecord {
    pub fn owner(&self) -> &str {
        match self {
            ZoneRecord::A { owner, .. } => owner,
            ZoneRecord::Cname { owner, .. } => owner,
            ZoneRecord::Mx { owner, .. } => owner,
            ZoneRecord::Txt { owner, .. } => owner,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            ZoneRecord::A { .. } => RecordKind::A,
            ZoneRecord::Cname { .. } => RecordKind::Cname,
            ZoneRecord::Mx { .. } => RecordKind::Mx,
            ZoneRecord::Txt { .. } => RecordKind::Txt,
        }
    }
}

pub const DEFAULT_TTL: u32 = 60;
pub const SERVICE_PREFIX: &str = "service:";
