//! Binds UDP, hands each inbound message's questions to the resolver, and
//! writes the reply. Thin glue over `hickory-server`, grounded directly on
//! `fwxs-hunk/shelter/src/commands/dns.rs`'s `DNSHandler`.

use std::sync::Arc;

use async_trait::async_trait;
use hickory_proto::op::{Header, ResponseCode};
use hickory_proto::rr::Name;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use tokio::net::UdpSocket;
use tracing::{error, info};

use crate::error::EngineError;
use crate::resolver::Resolver;

pub struct DnsHandler {
    resolver: Arc<Resolver>,
}

impl DnsHandler {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl RequestHandler for DnsHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handler: R,
    ) -> ResponseInfo {
        match self.handle(request, &mut response_handler).await {
            Ok(info) => info,
            Err(error) => {
                error!(%error, "failed to answer request");
                let mut header = Header::response_from_request(request.header());
                header.set_response_code(ResponseCode::ServFail);
                header.into()
            }
        }
    }
}

impl DnsHandler {
    async fn handle<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handler: &mut R,
    ) -> Result<ResponseInfo, EngineError> {
        let builder = MessageResponseBuilder::from_message_request(request);
        let mut header = Header::response_from_request(request.header());

        let mut answers = Vec::new();
        let mut authority = Vec::new();
        let mut additional = Vec::new();
        let mut rcode = ResponseCode::NoError;
        let mut authoritative = true;

        for query in request.queries() {
            let name = Name::from(query.name().clone());
            let outcome = self
                .resolver
                .resolve_question(&name, query.query_type(), request.id())
                .await;
            answers.extend(outcome.answers);
            authority.extend(outcome.authority);
            additional.extend(outcome.additional);
            authoritative = authoritative && outcome.authoritative;
            if rcode == ResponseCode::NoError {
                rcode = outcome.rcode;
            }
        }

        header.set_authoritative(authoritative);
        header.set_response_code(rcode);

        let response = builder.build(
            header,
            answers.iter(),
            authority.iter(),
            &[],
            additional.iter(),
        );
        Ok(response_handler.send_response(response).await?)
    }
}

/// Binds the configured UDP port and serves requests until the process is
/// killed or the socket is dropped.
pub async fn serve(port: u16, resolver: Arc<Resolver>) -> Result<(), EngineError> {
    let handler = DnsHandler::new(resolver);
    let mut dns_server = hickory_server::server::ServerFuture::new(handler);
    let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
    info!(port, "listening for dns queries");
    dns_server.register_socket(socket);
    dns_server.block_until_done().await?;
    Ok(())
}
