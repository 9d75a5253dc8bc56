//! The default `render` strategy.

use super::priority;
use sluice_core::{
    ActionResult, BoxError, ErrorCode, EventBus, ListenerAggregate, ListenerHandle,
    ListenerResult, MvcContext, MvcError, Renderer, ViewModel, event,
};
use std::sync::Arc;
use tracing::debug;

/// Renders the context result into the response.
///
/// - A response result (including one that short-circuited `route` or
///   `dispatch`) replaces the context response.
/// - A view model is passed to the renderer and its output becomes the
///   response content.
/// - Anything else is left alone.
///
/// A renderer failure records `EXCEPTION`, fires `render.error`, and renders
/// whatever view the error listeners left behind. A second failure is
/// returned to the caller.
#[derive(Clone)]
pub struct ViewListener {
    renderer: Arc<dyn Renderer>,
}

impl ViewListener {
    /// Create a listener rendering through `renderer`.
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { renderer }
    }

    /// Handle the `render` event.
    pub fn on_render(&self, ctx: &mut MvcContext, bus: &EventBus) -> ListenerResult {
        let view = match ctx.result() {
            Some(ActionResult::Response(response)) => {
                let response = response.clone();
                ctx.set_response(response);
                return Ok(None);
            }
            Some(ActionResult::View(view)) => view.clone(),
            _ => return Ok(None),
        };

        match self.renderer.render(&view) {
            Ok(content) => {
                debug!(template = view.template().unwrap_or("-"), "view rendered");
                ctx.response_mut().set_content(content);
                Ok(None)
            }
            Err(e) => {
                let error = MvcError::new(ErrorCode::Exception).with_cause(e);
                bus.escalate(event::RENDER_ERROR, ctx, error)?;
                self.render_error_view(ctx, &view)
            }
        }
    }

    fn render_error_view(&self, ctx: &mut MvcContext, failed: &ViewModel) -> ListenerResult {
        let error_view = match ctx.result() {
            Some(ActionResult::Response(response)) => {
                let response = response.clone();
                ctx.set_response(response);
                return Ok(None);
            }
            Some(ActionResult::View(view)) if view != failed => view.clone(),
            _ => return Ok(None),
        };
        let content = self.renderer.render(&error_view)?;
        ctx.response_mut().set_content(content);
        Ok(None)
    }
}

impl ListenerAggregate for ViewListener {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let this = self.clone();
        vec![bus.attach(
            event::RENDER,
            move |ctx: &mut MvcContext, bus: &EventBus| this.on_render(ctx, bus),
            priority::RENDER,
        )]
    }
}

/// A renderer with no templates: it emits the view's `content` variable, or
/// `name=value` lines when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentRenderer;

impl Renderer for ContentRenderer {
    fn render(&self, view: &ViewModel) -> Result<String, BoxError> {
        if let Some(content) = view.variable("content") {
            return Ok(content.to_string());
        }
        let lines: Vec<String> = view
            .variables()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FailingRenderer;
    use sluice_core::{Request, Response, StatusCode};

    fn bus_with(renderer: Arc<dyn Renderer>) -> EventBus {
        let mut bus = EventBus::new();
        ViewListener::new(renderer).attach(&mut bus);
        bus
    }

    #[test]
    fn renders_view_content() {
        let bus = bus_with(Arc::new(ContentRenderer));
        let mut ctx = MvcContext::new(Request::get("/"));
        ctx.set_result(ViewModel::new().with_variable("content", "PathController").into());

        bus.trigger(event::RENDER, &mut ctx).unwrap();

        assert_eq!(ctx.response().content(), "PathController");
    }

    #[test]
    fn response_result_replaces_response() {
        let bus = bus_with(Arc::new(ContentRenderer));
        let mut ctx = MvcContext::new(Request::get("/"));
        ctx.set_result(
            Response::new()
                .with_status(StatusCode::ACCEPTED)
                .with_content("early")
                .into(),
        );

        bus.trigger(event::RENDER, &mut ctx).unwrap();

        assert_eq!(ctx.response().status(), StatusCode::ACCEPTED);
        assert_eq!(ctx.response().content(), "early");
    }

    #[test]
    fn renderer_failure_fires_render_error() {
        let mut bus = bus_with(Arc::new(FailingRenderer::new("broken template")));
        let seen = Arc::new(std::sync::Mutex::new(None));
        let s = Arc::clone(&seen);
        bus.attach(
            event::RENDER_ERROR,
            move |ctx: &mut MvcContext, _: &EventBus| {
                *s.lock().unwrap() = ctx.error_code();
                ctx.response_mut().set_content("fallback");
            },
            1,
        );
        let mut ctx = MvcContext::new(Request::get("/"));
        ctx.set_result(ViewModel::new().with_template("index").into());

        bus.trigger(event::RENDER, &mut ctx).unwrap();

        assert_eq!(*seen.lock().unwrap(), Some(ErrorCode::Exception));
        assert_eq!(ctx.response().content(), "fallback");
    }

    #[test]
    fn content_renderer_lists_variables_without_content() {
        let view = ViewModel::new().with_variable("b", "2").with_variable("a", "1");
        assert_eq!(ContentRenderer.render(&view).unwrap(), "a=1\nb=2");
    }
}
