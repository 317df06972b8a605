use std::sync::Arc;

use log::{debug, warn};
use paysign_core::{
    wire, ParameterSet, Result, SignedEnvelope, SigningOptions, WireFormat, RETURN_CODE,
    RETURN_MSG, SUCCESS,
};

use crate::constants::DEFAULT_REPLY_MSG;

const FAIL: &str = "FAIL";

/// NotifyHandler checks asynchronous payment notifications and hands them to
/// the application.
///
/// A notification is passed to the application only after it passed every
/// check of [`SignedEnvelope::check_result`]. The provider always gets a
/// [`NotifyReply`], telling it whether to stop or keep retrying.
#[derive(Debug, Clone)]
pub struct NotifyHandler {
    options: Arc<SigningOptions>,
}

impl NotifyHandler {
    /// Create a handler verifying notifications with `options`.
    pub fn new(options: Arc<SigningOptions>) -> Self {
        Self { options }
    }

    /// Decode and check a notification body without dispatching it.
    pub fn verify(&self, body: &str) -> Result<SignedEnvelope> {
        let mut notify = SignedEnvelope::decode(body, WireFormat::Xml, self.options.clone())?;
        notify.check_result()?;
        Ok(notify)
    }

    /// Check a notification body and dispatch it to `callback`.
    ///
    /// The callback returns the message to reply with, `OK` if it returns
    /// `None`. Any failed check or callback error turns into a `FAIL` reply
    /// carrying the error message.
    pub fn handle<F>(&self, body: &str, callback: F) -> NotifyReply
    where
        F: FnOnce(&SignedEnvelope) -> anyhow::Result<Option<String>>,
    {
        let result = self.verify(body).and_then(|notify| {
            debug!("notification verified, dispatching to callback");
            Ok(callback(&notify)?)
        });

        match result {
            Ok(msg) => NotifyReply::success(msg.unwrap_or_else(|| DEFAULT_REPLY_MSG.to_string())),
            Err(err) => {
                warn!("notification rejected: {} ({})", err, err.kind());
                NotifyReply::fail(err.to_string())
            }
        }
    }
}

/// NotifyReply is the acknowledgement sent back to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReply {
    success: bool,
    message: String,
}

impl NotifyReply {
    /// Acknowledge the notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Reject the notification, the provider will retry.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Whether the notification was accepted.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The reply message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render the reply body.
    ///
    /// Replies are not signed.
    pub fn to_xml(&self) -> Result<String> {
        let code = if self.success { SUCCESS } else { FAIL };
        let fields = ParameterSet::new()
            .with(RETURN_CODE, code)
            .with(RETURN_MSG, self.message.as_str());
        wire::to_xml(&fields)
    }
}
