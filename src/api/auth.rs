use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    response::{Html, Redirect},
};

use crate::{error::Result, server::AppState, success, utils};

pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Result<Redirect> {
    let state_param = utils::generate_state();
    let url = state.tokens.authorize_url(Some(&state_param))?;
    Ok(Redirect::temporary(&url))
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<&'static str>> {
    let code = params.get("code").map(String::as_str).unwrap_or_default();
    state.tokens.complete_authorization(code).await?;

    success!("Authorization successful.");
    Ok(Html(
        "<h2>Authorization successful.</h2><p>You can now access the /spotify endpoint and close this window.</p>",
    ))
}
