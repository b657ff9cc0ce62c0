//! The per-question state machine: classify, assemble answers (with CNAME
//! chaining and MX glue), and decide the response code. This is the core
//! of the engine; `server.rs` is deliberately thin glue around it.

use std::net::Ipv4Addr;
use std::sync::Arc;

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{CNAME, MX, TXT};
use hickory_proto::rr::{rdata, Name, RData, Record, RecordType};
use tracing::warn;

use crate::error::EngineError;
use crate::record::ZoneRecord;
use crate::relay::RelayClient;
use crate::service::ServiceResolver;
use crate::utils::canonicalize;
use crate::zone::Zone;

/// What a single question resolved to: sections to merge into the reply,
/// plus the rcode and authoritative bit that question contributes.
pub struct QuestionOutcome {
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
    pub rcode: ResponseCode,
    pub authoritative: bool,
}

impl QuestionOutcome {
    fn local(answers: Vec<Record>, rcode: ResponseCode) -> Self {
        Self {
            answers,
            authority: Vec::new(),
            additional: Vec::new(),
            rcode,
            authoritative: true,
        }
    }
}

pub struct Resolver {
    zone: Arc<Zone>,
    relay: Option<Arc<RelayClient>>,
    service: Option<Arc<ServiceResolver>>,
}

impl Resolver {
    pub fn new(
        zone: Arc<Zone>,
        relay: Option<Arc<RelayClient>>,
        service: Option<Arc<ServiceResolver>>,
    ) -> Self {
        Self {
            zone,
            relay,
            service,
        }
    }

    /// Resolves one question. `request_id` is the inbound message's id,
    /// reused verbatim for any relayed query.
    pub async fn resolve_question(
        &self,
        name: &Name,
        qtype: RecordType,
        request_id: u16,
    ) -> QuestionOutcome {
        let canonical = canonicalize(&name.to_ascii());
        let hit = self.zone.lookup(&canonical);
        if !hit.is_empty() {
            let owner = match parse_name(&canonical) {
                Ok(owner) => owner,
                Err(_) => return QuestionOutcome::local(Vec::new(), ResponseCode::NoError),
            };
            let answers = self.assemble(&hit, qtype, &owner).await;
            return QuestionOutcome::local(answers, ResponseCode::NoError);
        }
        self.relay_miss(name, qtype, request_id).await
    }

    async fn relay_miss(&self, name: &Name, qtype: RecordType, request_id: u16) -> QuestionOutcome {
        let Some(relay) = &self.relay else {
            return QuestionOutcome::local(Vec::new(), ResponseCode::NXDomain);
        };
        let query = build_query_message(request_id, name.clone(), qtype);
        match relay.relay(&query).await {
            Err(error) => {
                warn!(%error, "relay exhausted, answering NXDOMAIN");
                QuestionOutcome::local(Vec::new(), ResponseCode::NXDomain)
            }
            Ok(reply) => match reply.response_code() {
                ResponseCode::ServFail => QuestionOutcome::local(Vec::new(), ResponseCode::NXDomain),
                ResponseCode::NoError => {
                    let authoritative = reply.answers().is_empty();
                    QuestionOutcome {
                        answers: reply.answers().to_vec(),
                        authority: reply.name_servers().to_vec(),
                        additional: reply.additionals().to_vec(),
                        rcode: ResponseCode::NoError,
                        authoritative,
                    }
                }
                other => QuestionOutcome::local(Vec::new(), other),
            },
        }
    }

    async fn assemble(&self, records: &[ZoneRecord], qtype: RecordType, owner: &Name) -> Vec<Record> {
        let mut answers = Vec::new();
        for record in records {
            match record {
                ZoneRecord::Cname { target, ttl, .. } => {
                    if let Ok(target_name) = parse_name(target) {
                        answers.push(cname_record(owner, *ttl, target_name));
                    }
                    if qtype == RecordType::A {
                        answers.extend(self.follow_cname(target, owner).await);
                    }
                }
                ZoneRecord::A { value, ttl, is_service, .. } if qtype == RecordType::A => {
                    if let Some(record) = self.assemble_a(value, *ttl, *is_service, owner).await {
                        answers.push(record);
                    }
                }
                ZoneRecord::Mx { target, ttl, priority, .. } if qtype == RecordType::MX => {
                    if let Ok(target_name) = parse_name(target) {
                        answers.push(mx_record(owner, *ttl, *priority, target_name.clone()));
                        answers.extend(self.mx_glue(target, &target_name).await);
                    }
                }
                ZoneRecord::Txt { text, ttl, .. } if qtype == RecordType::TXT => {
                    answers.push(txt_record(owner, *ttl, text));
                }
                _ => {}
            }
        }
        answers
    }

    async fn assemble_a(
        &self,
        value: &str,
        ttl: u32,
        is_service: bool,
        owner: &Name,
    ) -> Option<Record> {
        let ip = if is_service {
            match &self.service {
                Some(resolver) => match resolver.resolve_v4(value).await {
                    Ok(ip) => ip,
                    Err(error) => {
                        warn!(%error, label = value, "dropping service-backed A answer");
                        return None;
                    }
                },
                None => {
                    warn!(label = value, "service record with no service resolver configured");
                    return None;
                }
            }
        } else {
            value.to_string()
        };
        match ip.parse::<Ipv4Addr>() {
            Ok(ip) => Some(a_record(owner, ttl, ip)),
            Err(_) => {
                warn!(ip, "dropping A answer with invalid ipv4 literal");
                None
            }
        }
    }

    async fn follow_cname(&self, target: &str, owner: &Name) -> Vec<Record> {
        let mut out = Vec::new();
        for record in self.zone.lookup(target) {
            if let ZoneRecord::A { value, ttl, is_service, .. } = record {
                if let Some(record) = self.assemble_a(&value, ttl, is_service, owner).await {
                    out.push(record);
                }
            }
        }
        out
    }

    async fn mx_glue(&self, target: &str, target_name: &Name) -> Vec<Record> {
        let mut out = Vec::new();
        for record in self.zone.lookup(target) {
            if let ZoneRecord::A { value, ttl, is_service, .. } = record {
                if let Some(record) = self.assemble_a(&value, ttl, is_service, target_name).await {
                    out.push(record);
                }
            }
        }
        out
    }
}

fn parse_name(canonical: &str) -> Result<Name, EngineError> {
    Name::from_ascii(canonical).map_err(EngineError::from)
}

fn a_record(owner: &Name, ttl: u32, ip: Ipv4Addr) -> Record {
    Record::from_rdata(owner.clone(), ttl, RData::A(rdata::A(ip)))
}

fn cname_record(owner: &Name, ttl: u32, target: Name) -> Record {
    Record::from_rdata(owner.clone(), ttl, RData::CNAME(CNAME(target)))
}

fn mx_record(owner: &Name, ttl: u32, priority: u16, exchange: Name) -> Record {
    Record::from_rdata(owner.clone(), ttl, RData::MX(MX::new(priority, exchange)))
}

fn txt_record(owner: &Name, ttl: u32, text: &str) -> Record {
    let strings: Vec<String> = text
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    Record::from_rdata(owner.clone(), ttl, RData::TXT(TXT::new(strings)))
}

fn build_query_message(request_id: u16, name: Name, qtype: RecordType) -> Message {
    let mut message = Message::new();
    message.set_id(request_id);
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(name, qtype));
    message
}
