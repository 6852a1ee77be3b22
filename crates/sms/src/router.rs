use async_trait::async_trait;
use menucheck_core::errors::{ApplicationError, PipelineError};
use menucheck_core::governor::cap_reply;
use menucheck_core::pipeline::{MenuChecker, MenuOutcome, MenuReply};
use tracing::{error, info, warn};

use crate::inbound::{parse_menu_query, InboundSms, LocationDefaults};
use crate::twiml::MessagingResponse;

#[async_trait]
pub trait MenuCheckService: Send + Sync {
    async fn check_menu(&self, query: &str, location: &str) -> Result<MenuReply, PipelineError>;
}

#[async_trait]
impl<T> MenuCheckService for std::sync::Arc<T>
where
    T: MenuCheckService + ?Sized,
{
    async fn check_menu(&self, query: &str, location: &str) -> Result<MenuReply, PipelineError> {
        self.as_ref().check_menu(query, location).await
    }
}

#[async_trait]
impl MenuCheckService for MenuChecker {
    async fn check_menu(&self, query: &str, location: &str) -> Result<MenuReply, PipelineError> {
        self.check(query, location).await
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    Checked(MenuOutcome),
    Rejected,
    Failed,
}

impl ReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checked(outcome) => outcome.as_str(),
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsReply {
    pub kind: ReplyKind,
    pub truncated: bool,
    pub response: MessagingResponse,
}

impl SmsReply {
    pub fn text(&self) -> &str {
        self.response.messages().first().map(String::as_str).unwrap_or_default()
    }
}

pub struct SmsRouter<S> {
    service: S,
    defaults: LocationDefaults,
    max_message_size: usize,
}

impl<S> SmsRouter<S>
where
    S: MenuCheckService,
{
    pub fn new(service: S, defaults: LocationDefaults, max_message_size: usize) -> Self {
        Self { service, defaults, max_message_size }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Answers one inbound text. Every path yields a reply; failures are
    /// logged here and turned into user-facing text.
    pub async fn route(&self, payload: &InboundSms, correlation_id: &str) -> SmsReply {
        let (kind, text) = match parse_menu_query(payload, &self.defaults) {
            Ok(menu_query) => {
                info!(
                    event_name = "sms.check.started",
                    correlation_id,
                    query = %menu_query.query,
                    location = %menu_query.location,
                    "checking menu"
                );
                match self.service.check_menu(&menu_query.query, &menu_query.location).await {
                    Ok(reply) => (ReplyKind::Checked(reply.outcome), reply.text),
                    Err(pipeline_error) => {
                        let interface =
                            ApplicationError::from(pipeline_error).into_interface(correlation_id);
                        error!(
                            event_name = "sms.check.failed",
                            correlation_id,
                            error = %interface,
                            "menu check failed"
                        );
                        (ReplyKind::Failed, interface.user_message().to_owned())
                    }
                }
            }
            Err(inbound_error) => {
                let interface = ApplicationError::InvalidRequest(inbound_error.to_string())
                    .into_interface(correlation_id);
                warn!(
                    event_name = "sms.request.rejected",
                    correlation_id,
                    error = %interface,
                    "inbound message rejected"
                );
                (ReplyKind::Rejected, interface.user_message().to_owned())
            }
        };

        let capped = cap_reply(&text, self.max_message_size);
        let truncated = capped != text;
        if truncated {
            info!(
                event_name = "sms.reply.truncated",
                correlation_id,
                max_message_size = self.max_message_size,
                "reply truncated"
            );
        }

        SmsReply { kind, truncated, response: MessagingResponse::new().message(capped) }
    }
}
