// ABOUTME: Message value types exchanged between the host application and the session manager
// ABOUTME: Provides outbound/inbound message structs and the synchronous submission result

/// Outbound short message handed to [`crate::session::SessionManager::submit_message`]
///
/// A high-level message value constructed per submit call. The protocol
/// engine is responsible for charset encoding and PDU construction; this
/// type only carries the text and addressing the host application knows.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Destination phone number
    pub to: String,
    /// Source phone number
    pub from: String,
    /// Message text content
    pub text: String,
    /// Request an SMSC delivery receipt for this message
    pub request_delivery_receipt: bool,
}

impl OutboundMessage {
    /// Create a new outbound message without a delivery receipt request
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
            request_delivery_receipt: false,
        }
    }

    /// Create a builder for constructing outbound messages
    pub fn builder() -> OutboundMessageBuilder {
        OutboundMessageBuilder::default()
    }
}

/// Builder for constructing outbound messages with fluent API
#[derive(Debug, Default)]
pub struct OutboundMessageBuilder {
    to: Option<String>,
    from: Option<String>,
    text: Option<String>,
    request_delivery_receipt: bool,
}

impl OutboundMessageBuilder {
    /// Set destination phone number
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set source phone number
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set message text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Request a delivery receipt from the SMSC
    pub fn with_delivery_receipt(mut self) -> Self {
        self.request_delivery_receipt = true;
        self
    }

    /// Build the outbound message
    pub fn build(self) -> Result<OutboundMessage, String> {
        let to = self.to.ok_or("Destination phone number is required")?;
        let from = self.from.ok_or("Source phone number is required")?;
        let text = self.text.ok_or("Message text is required")?;

        Ok(OutboundMessage {
            to,
            from,
            text,
            request_delivery_receipt: self.request_delivery_receipt,
        })
    }
}

/// Inbound mobile-originated message delivered to registered listeners
///
/// Constructed by the protocol engine when a handset-originated message
/// arrives and passed by value through the dispatcher. Not retained.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Message text content
    pub text: String,
    /// Originating phone number
    pub from: String,
    /// Destination phone number (this client's address)
    pub to: String,
}

impl InboundMessage {
    /// Create a new inbound message
    pub fn new(text: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Outcome of a single submit call, returned synchronously to the caller
///
/// A failed submit is a value, not an error: timeouts, transport errors and
/// malformed addresses all surface as [`SubmissionResult::NotSubmitted`]
/// with the cause, never as an `Err` to the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The SMSC accepted the message and assigned an identifier
    Submitted {
        /// Provider-assigned message identifier
        message_id: String,
    },
    /// The message was not submitted
    NotSubmitted {
        /// Human-readable cause of the failure
        reason: String,
    },
}

impl SubmissionResult {
    /// True if the SMSC accepted the message
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmissionResult::Submitted { .. })
    }

    /// The provider-assigned message identifier, if the submit succeeded
    pub fn message_id(&self) -> Option<&str> {
        match self {
            SubmissionResult::Submitted { message_id } => Some(message_id),
            SubmissionResult::NotSubmitted { .. } => None,
        }
    }

    /// The failure cause, if the submit failed
    pub fn reason(&self) -> Option<&str> {
        match self {
            SubmissionResult::Submitted { .. } => None,
            SubmissionResult::NotSubmitted { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for SubmissionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionResult::Submitted { message_id } => {
                write!(f, "submitted with message id {message_id}")
            }
            SubmissionResult::NotSubmitted { reason } => {
                write!(f, "not submitted: {reason}")
            }
        }
    }
}
