//! The user directory demo application.
//!
//! | Method | Pattern               | Target               | Roles     |
//! |--------|-----------------------|----------------------|-----------|
//! | GET    | `/`                   | view `home`          | anyone    |
//! | GET    | `/users`              | view `user-list`     | anyone    |
//! | GET    | `/users/:user-id`     | view `user-profile`  | logged-in |
//! | GET    | `/api/users`          | handler `list-users` | anyone    |
//! | GET    | `/api/users/:user-id` | handler `get-user`   | logged-in |
//!
//! Unmatched paths render `not-found`. Every view receives
//! `{ "currentUser": <username or null> }`.

use std::sync::Arc;

use atrium_config::{AtriumConfig, StoreConfig};
use atrium_core::{AtriumError, AtriumResult, RequestContext, Role, StatePayload};
use atrium_server::{configure, App, HandlerError, ServerResult};
use atrium_store::{Record, RecordStore, StoreResult};
use http::StatusCode;

/// Client components known to the demo.
pub const COMPONENTS: [&str; 4] = ["home", "user-list", "user-profile", "not-found"];

/// The demo state function. `currentUser` is null unless the caller verified.
pub fn current_user_state(ctx: &RequestContext) -> AtriumResult<StatePayload> {
    Ok(StatePayload::new().with("currentUser", ctx.username()))
}

/// Opens the record store named by `[store]`, or the built-in directory.
pub fn store(config: &StoreConfig) -> StoreResult<RecordStore> {
    match &config.seed_path {
        Some(path) => RecordStore::from_seed_file(path),
        None => Ok(RecordStore::demo()),
    }
}

/// Assembles the demo application.
///
/// Routes declared in configuration are matched after the built-in ones.
pub fn app(config: &AtriumConfig, store: Arc<RecordStore>) -> ServerResult<App> {
    let mut views = configure::view_builder(&config.view)?.state_fn(current_user_state);
    for component in COMPONENTS {
        views = views.component_with_script(component, format!("/components/{component}.js"));
    }

    let list_store = Arc::clone(&store);
    let get_store = store;

    App::builder()
        .view_config(views.build()?)
        .view("/", "home", Role::Anyone)
        .view("/users", "user-list", Role::Anyone)
        .view("/users/:user-id", "user-profile", Role::LoggedIn)
        .api("/api/users", "list-users", Role::Anyone)
        .api("/api/users/:user-id", "get-user", Role::LoggedIn)
        .fallback(StatusCode::NOT_FOUND, "not-found", Role::Anyone)
        .handler("list-users", move |_ctx: RequestContext| {
            let store = Arc::clone(&list_store);
            async move { Ok::<_, HandlerError>(store.list_all()) }
        })
        .handler("get-user", move |ctx: RequestContext| {
            let store = Arc::clone(&get_store);
            async move { get_user(&store, &ctx) }
        })
        .configure(config)?
        .build()
}

fn get_user(store: &RecordStore, ctx: &RequestContext) -> Result<Record, HandlerError> {
    let id = ctx
        .path_param("user-id")
        .ok_or_else(|| AtriumError::validation("missing path parameter 'user-id'"))?;
    Ok(store.get_by_id(id).map_err(AtriumError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_carries_username() {
        let anonymous = current_user_state(&RequestContext::mock()).unwrap();
        assert_eq!(anonymous.get("currentUser"), Some(&serde_json::Value::Null));

        let ctx = RequestContext::mock()
            .with_credentials(atrium_core::Credentials::new("dave", "pw"));
        let state = current_user_state(&ctx).unwrap();
        assert_eq!(state.get("currentUser").and_then(|v| v.as_str()), Some("dave"));
    }

    #[test]
    fn test_app_registers_demo_routes() {
        let app = app(&AtriumConfig::default(), Arc::new(RecordStore::demo())).unwrap();
        assert_eq!(app.routes().len(), 5);
        assert_eq!(app.handlers().len(), 2);
        for component in COMPONENTS {
            assert!(app.views().has_component(component));
        }
    }

    #[test]
    fn test_default_store_is_demo() {
        assert_eq!(store(&StoreConfig::default()).unwrap().len(), 4);
    }
}
