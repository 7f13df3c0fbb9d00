pub mod evaluators;
pub mod health;
pub mod home;
pub mod overview;
pub mod playground;
pub mod settings;
pub mod testsets;

use leptos::prelude::*;
use leptos_router::hooks::{use_params_map, use_query_map};

/// The `:app_id` segment of the current route.
pub fn use_app_id() -> Memo<String> {
    let params = use_params_map();
    Memo::new(move |_| params.with(|p| p.get("app_id").unwrap_or_default()))
}

/// The `?variant=` query of the current route, if any.
pub fn use_variant_query() -> Memo<Option<String>> {
    let query = use_query_map();
    Memo::new(move |_| query.with(|q| q.get("variant")))
}

/// Link to an app's playground, optionally opening one variant.
pub fn playground_href(app_id: &str, variant: Option<&str>) -> String {
    match variant {
        Some(name) => format!(
            "/apps/{}/playground?variant={}",
            app_id,
            String::from(js_sys::encode_uri_component(name))
        ),
        None => format!("/apps/{}/playground", app_id),
    }
}
