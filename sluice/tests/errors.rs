use sluice::{
    ActionResult, Application, ApplicationConfig, ErrorCode, EventBus, MvcContext, Request,
    RouteMatch, StatusCode, ViewModel, event,
    controller::{ActionController, ControllerManager, PluginManager, Plugins},
    listeners::LoggingListener,
    testing::{CountingListener, RecordingListener, StubRouter},
};
use std::{error::Error, sync::Arc};

mod common;
use common::app;

#[test]
fn resolver_failure_round_trips_through_dispatch_error() {
    let (mut app, _) = app("/missing", ApplicationConfig::default());
    let errors = RecordingListener::new();
    let finish = CountingListener::new();
    app.events_mut().attach(event::DISPATCH_ERROR, errors.clone(), 1);
    app.events_mut().attach(event::FINISH, finish.clone(), 1);

    let ctx = app.run().unwrap();

    assert!(ctx.is_error());
    assert_eq!(ctx.error_code(), Some(ErrorCode::ControllerNotFound));
    assert_eq!(ctx.error().unwrap().controller(), Some("missing"));
    assert_eq!(errors.events(), [event::DISPATCH_ERROR]);
    assert_eq!(finish.count(), 1);
}

#[test]
fn scenario_b_error_listener_writes_exception_message() {
    let (mut app, sender) = app("/bad", ApplicationConfig::default());
    app.events_mut().attach(
        event::DISPATCH_ERROR,
        |ctx: &mut MvcContext, _: &EventBus| {
            let message = ctx
                .error()
                .and_then(|e| e.cause())
                .and_then(|cause| cause.source())
                .map(ToString::to_string)
                .unwrap_or_default();
            ctx.response_mut().set_content(message);
        },
        1,
    );

    let ctx = app.run().unwrap();

    assert_eq!(ctx.error_code(), Some(ErrorCode::Exception));
    assert_eq!(ctx.controller_name(), Some("bad"));
    assert_eq!(ctx.response().content(), "factory exploded");
    assert_eq!(sender.sent()[0].content(), "factory exploded");
}

#[test]
fn no_error_page_without_error_views() {
    let (mut app, _) = app("/nowhere", ApplicationConfig::default());
    let ctx = app.run().unwrap();

    assert!(ctx.result().is_none());
    assert_eq!(ctx.response().status(), StatusCode::OK);
    assert_eq!(ctx.response().content(), "");
}

#[test]
fn error_views_render_not_found_page() {
    let config = ApplicationConfig::default()
        .with_error_views(true)
        .with_display_exceptions(true);
    let (mut app, _) = app("/nowhere", config);

    let ctx = app.run().unwrap();

    assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
    let view = ctx.result().and_then(ActionResult::as_view).unwrap();
    assert_eq!(view.template(), Some("error/404"));
    assert_eq!(view.variable("reason"), Some("error-router-no-match"));
    assert!(ctx.response().content().contains("message=Page not found."));
}

#[test]
fn error_views_render_exception_page() {
    let config = ApplicationConfig::default()
        .with_error_views(true)
        .with_display_exceptions(true)
        .with_exception_template("error/500");
    let (mut app, _) = app("/bad", config);

    let ctx = app.run().unwrap();

    assert_eq!(ctx.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    let view = ctx.result().and_then(ActionResult::as_view).unwrap();
    assert_eq!(view.template(), Some("error/500"));
    assert_eq!(view.variable("reason"), Some("error-exception"));
    assert!(view.variable("exception").is_some());
}

#[test]
fn unknown_action_becomes_not_found_view() {
    let plugins = Arc::new(PluginManager::with_defaults());
    let users = ActionController::new("users", plugins).action(
        "list",
        |_: &mut MvcContext, _: &Plugins| ViewModel::new().with_variable("content", "all users"),
    );
    let router = StubRouter::new().route(
        "/users/remove",
        RouteMatch::new("users")
            .with_param("controller", "users")
            .with_param("action", "remove"),
    );

    let mut app = Application::builder()
        .request(Request::get("/users/remove"))
        .router(router)
        .controllers(ControllerManager::new().register("users", users))
        .config(ApplicationConfig::default().with_error_views(true))
        .build();
    let logging = LoggingListener::named("users");
    app.bootstrap(&[&logging]).unwrap();

    let ctx = app.run().unwrap();

    assert!(!ctx.is_error());
    assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
    let view = ctx.result().and_then(ActionResult::as_view).unwrap();
    assert_eq!(view.template(), Some("error/404"));
}
