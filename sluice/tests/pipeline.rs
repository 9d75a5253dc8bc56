use sluice::{
    ActionResult, Application, ApplicationConfig, ApplicationError, ApplicationState, ErrorCode,
    EventBus, MvcContext, Request, Response, StatusCode, event,
    testing::{CountingListener, FailingRenderer, RecordingListener},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{Labelled, RouteMatchSpy, app};

#[test]
fn scenario_a_controller_result_is_rendered_and_sent() {
    let (mut app, sender) = app("/path", ApplicationConfig::default());

    let ctx = app.run().unwrap();

    assert!(!ctx.is_error());
    assert_eq!(ctx.controller_name(), Some("path"));
    assert_eq!(ctx.response().content(), "PathController");

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content(), "PathController");
}

#[test]
fn scenario_c_no_route_still_finishes_once() {
    let (mut app, sender) = app("/nowhere", ApplicationConfig::default());
    let finish = CountingListener::new();
    app.events_mut().attach(event::FINISH, finish.clone(), 1);

    let ctx = app.run().unwrap();

    assert_eq!(ctx.error_code(), Some(ErrorCode::RouterNoMatch));
    assert!(ctx.route_match().is_none());
    assert!(ctx.controller_name().is_none());
    assert_eq!(finish.count(), 1);
    assert_eq!(sender.sent().len(), 1);
}

#[test]
fn finish_fires_exactly_once_for_every_outcome() {
    for path in ["/path", "/nowhere", "/bad", "/missing", "/mw"] {
        let (mut app, _) = app(path, ApplicationConfig::default());
        let finish = CountingListener::new();
        app.events_mut().attach(event::FINISH, finish.clone(), 1);

        app.run().unwrap();

        assert_eq!(finish.count(), 1, "finish count for {path}");
    }
}

#[test]
fn listener_failure_in_dispatch_becomes_exception() {
    let (mut app, sender) = app("/path", ApplicationConfig::default());
    app.events_mut().attach(
        event::DISPATCH,
        |_: &mut MvcContext, _: &EventBus| Err::<(), _>("listener blew up"),
        100,
    );
    let errors = RecordingListener::new();
    app.events_mut().attach(event::DISPATCH_ERROR, errors.clone(), 1);

    let ctx = app.run().unwrap();

    assert_eq!(ctx.error_code(), Some(ErrorCode::Exception));
    assert_eq!(
        ctx.error().unwrap().cause().unwrap().to_string(),
        "listener blew up"
    );
    // the controller never ran
    assert!(ctx.controller_name().is_none());
    assert_eq!(errors.count(), 1);
    assert_eq!(sender.sent().len(), 1);
}

#[test]
fn middleware_route_without_middleware_is_reported() {
    let (mut app, sender) = app("/mw", ApplicationConfig::default());

    let ctx = app.run().unwrap();

    assert_eq!(ctx.error_code(), Some(ErrorCode::MiddlewareCannotDispatch));
    assert_eq!(ctx.error().unwrap().controller(), Some("auth"));
    assert_eq!(sender.sent().len(), 1);
}

#[test]
fn listener_failure_in_route_becomes_exception() {
    let (mut app, sender) = app("/path", ApplicationConfig::default());
    app.events_mut().attach(
        event::ROUTE,
        |_: &mut MvcContext, _: &EventBus| Err::<(), _>("router offline"),
        100,
    );
    let dispatch = RecordingListener::new();
    app.events_mut().attach(event::DISPATCH, dispatch.clone(), 100);
    let errors = RecordingListener::new();
    app.events_mut().attach(event::DISPATCH_ERROR, errors.clone(), 1);
    let finish = CountingListener::new();
    app.events_mut().attach(event::FINISH, finish.clone(), 1);

    let ctx = app.run().unwrap();

    assert_eq!(ctx.error_code(), Some(ErrorCode::Exception));
    assert_eq!(
        ctx.error().unwrap().cause().unwrap().to_string(),
        "router offline"
    );
    assert!(ctx.route_match().is_none());
    assert!(ctx.controller_name().is_none());
    assert_eq!(dispatch.count(), 0);
    assert_eq!(errors.count(), 1);
    assert_eq!(finish.count(), 1);
    assert_eq!(sender.sent().len(), 1);
}

#[test]
fn failing_error_listener_runs_once_and_keeps_the_code() {
    let cases = [
        ("/nowhere", ErrorCode::RouterNoMatch),
        ("/missing", ErrorCode::ControllerNotFound),
    ];
    for (path, code) in cases {
        let (mut app, _) = app(path, ApplicationConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        app.events_mut().attach(
            event::DISPATCH_ERROR,
            move |_: &mut MvcContext, _: &EventBus| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("error page broke")
            },
            1,
        );
        let finish = CountingListener::new();
        app.events_mut().attach(event::FINISH, finish.clone(), 1);

        let err = app.run().unwrap_err();

        assert!(
            matches!(err, ApplicationError::Listener { event: "dispatch.error", .. }),
            "error for {path}: {err:?}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1, "calls for {path}");
        assert_eq!(app.context().error_code(), Some(code));
        assert_eq!(finish.count(), 1, "finish count for {path}");
    }
}

#[test]
fn route_short_circuit_skips_dispatch_but_renders() {
    let (mut app, sender) = app("/path", ApplicationConfig::default());
    let log = Arc::new(Mutex::new(Vec::new()));

    app.events_mut().attach(
        event::ROUTE,
        |ctx: &mut MvcContext, _: &EventBus| {
            ctx.stop_propagation(true);
            Response::new()
                .with_status(StatusCode::SERVICE_UNAVAILABLE)
                .with_content("maintenance")
        },
        100,
    );
    app.events_mut()
        .attach(event::ROUTE, Labelled::new("late-route", &log), 50);
    app.events_mut()
        .attach(event::DISPATCH, Labelled::new("dispatch", &log), 100);

    let seen_at_render = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_at_render);
    app.events_mut().attach(
        event::RENDER,
        move |ctx: &mut MvcContext, _: &EventBus| {
            *seen.lock().unwrap() = ctx.result().and_then(ActionResult::as_response).cloned();
        },
        100,
    );

    let ctx = app.run().unwrap();

    assert!(log.lock().unwrap().is_empty());
    assert!(ctx.route_match().is_none());
    let rendered = seen_at_render.lock().unwrap().clone().unwrap();
    assert_eq!(rendered.content(), "maintenance");
    assert_eq!(ctx.response().status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(sender.sent()[0].content(), "maintenance");
}

#[test]
fn route_match_survives_until_render() {
    let (mut app, _) = app("/path", ApplicationConfig::default());
    let spy = RouteMatchSpy::default();
    for name in [event::DISPATCH, event::RENDER, event::FINISH] {
        app.events_mut().attach(name, spy.clone(), 1000);
    }

    app.run().unwrap();

    let seen = spy.seen.lock().unwrap();
    let events: Vec<_> = seen.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(events, [event::DISPATCH, event::RENDER, event::FINISH]);
    for (_, route_match) in seen.iter() {
        let route_match = route_match.as_ref().unwrap();
        assert_eq!(route_match.matched_route_name(), "path");
        assert_eq!(route_match.param("controller"), Some("path"));
    }
}

#[test]
fn lifecycle_events_fire_in_order() {
    let (mut app, _) = app("/path", ApplicationConfig::default());
    let recorder = RecordingListener::new();
    app.events_mut().attach(event::WILDCARD, recorder.clone(), 1000);

    app.run().unwrap();

    assert_eq!(recorder.events(), event::LIFECYCLE);
}

#[test]
fn render_failure_is_returned_after_finish() {
    let finish = CountingListener::new();
    let mut app = Application::builder()
        .request(Request::get("/path"))
        .router(common::router())
        .controllers(common::controllers())
        .renderer(FailingRenderer::new("template missing"))
        .build();
    app.events_mut().attach(event::FINISH, finish.clone(), 1);
    let render_errors = RecordingListener::new();
    app.events_mut()
        .attach(event::RENDER_ERROR, render_errors.clone(), 1);
    app.bootstrap(&[]).unwrap();

    // no error view replaces the result, so nothing else is rendered
    let ctx = app.run().unwrap();
    assert_eq!(ctx.error_code(), Some(ErrorCode::Exception));
    assert_eq!(render_errors.count(), 1);
    assert_eq!(finish.count(), 1);

    // a failing render listener propagates
    app.reset(Request::get("/path")).unwrap();
    app.events_mut().attach(
        event::RENDER,
        |_: &mut MvcContext, _: &EventBus| Err::<(), _>("render listener failed"),
        1,
    );
    let err = app.run().unwrap_err();
    assert!(matches!(err, ApplicationError::Listener { event: "render", .. }));
    assert_eq!(finish.count(), 2);
}

#[test]
fn reset_serves_a_second_request() {
    let (mut app, sender) = app("/path", ApplicationConfig::default());
    app.run().unwrap();

    app.reset(Request::get("/nowhere")).unwrap();
    let ctx = app.run().unwrap();

    assert_eq!(ctx.error_code(), Some(ErrorCode::RouterNoMatch));
    assert_eq!(sender.sent().len(), 2);
    assert_eq!(sender.sent()[1].content(), "");
}

#[test]
fn finish_failure_is_returned() {
    let (mut app, _) = app("/path", ApplicationConfig::default());
    app.events_mut().attach(
        event::FINISH,
        |_: &mut MvcContext, _: &EventBus| Err::<(), _>("sender unplugged"),
        100,
    );

    let err = app.run().unwrap_err();

    assert!(matches!(err, ApplicationError::Listener { event: "finish", .. }));
    assert_eq!(app.state(), ApplicationState::Finished);
    assert_eq!(app.context().response().content(), "PathController");
}

#[test]
fn render_error_wins_when_finish_also_fails() {
    let (mut app, _) = app("/path", ApplicationConfig::default());
    app.events_mut().attach(
        event::RENDER,
        |_: &mut MvcContext, _: &EventBus| Err::<(), _>("render listener failed"),
        100,
    );
    app.events_mut().attach(
        event::FINISH,
        |_: &mut MvcContext, _: &EventBus| Err::<(), _>("sender unplugged"),
        100,
    );

    let err = app.run().unwrap_err();

    assert!(matches!(err, ApplicationError::Listener { event: "render", .. }));
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "render listener failed");
}
