//! The `finish` phase listener that hands the response to a sender.

use super::priority;
use sluice_core::{
    EventBus, ListenerAggregate, ListenerHandle, ListenerResult, MvcContext, ResponseSender, event,
};
use std::sync::Arc;
use tracing::debug;

/// Sends the context response through a [`ResponseSender`] on `finish`.
#[derive(Clone)]
pub struct SendResponseListener {
    sender: Arc<dyn ResponseSender>,
}

impl SendResponseListener {
    /// Create a listener sending through `sender`.
    pub fn new(sender: Arc<dyn ResponseSender>) -> Self {
        Self { sender }
    }

    /// Handle the `finish` event.
    pub fn on_finish(&self, ctx: &mut MvcContext) -> ListenerResult {
        debug!(status = ctx.response().status().as_u16(), "sending response");
        self.sender.send(ctx.response())?;
        Ok(None)
    }
}

impl ListenerAggregate for SendResponseListener {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let this = self.clone();
        vec![bus.attach(
            event::FINISH,
            move |ctx: &mut MvcContext, _: &EventBus| this.on_finish(ctx),
            priority::SEND_RESPONSE,
        )]
    }
}
