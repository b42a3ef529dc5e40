use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    embed::{self, EmbedAttrs},
    models::EmbedSettings,
    AppState,
};

fn storage_error(e: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("storage error: {e}")),
    )
        .into_response()
}

fn html_or_500(res: Result<String, String>) -> Response {
    match res {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("template error: {e}")),
        )
            .into_response(),
    }
}

// GET /embed
pub async fn get_embed(State(state): State<AppState>, Query(attrs): Query<EmbedAttrs>) -> Response {
    let defaults = match state.store.embed_settings().await {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    html_or_500(embed::render_embed(
        &state.hbs,
        &state.settings.embed_url,
        &attrs,
        &defaults,
    ))
}

// GET /admin/embed
pub async fn get_embed_settings(State(state): State<AppState>) -> Response {
    let settings = match state.store.embed_settings().await {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    html_or_500(embed::render_admin(&state.hbs, &settings, false, None))
}

#[derive(Deserialize)]
pub struct EmbedSettingsForm {
    #[serde(default)]
    pub custom_css: String,
    #[serde(default)]
    pub default_height: String,
    #[serde(default)]
    pub default_theme: String,
}

// POST /admin/embed
pub async fn post_embed_settings(
    State(state): State<AppState>,
    Form(form): Form<EmbedSettingsForm>,
) -> Response {
    let theme = form.default_theme.trim().to_lowercase();
    let height = form.default_height.trim().to_string();

    let current = match state.store.embed_settings().await {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    if theme != "light" && theme != "dark" {
        return html_or_500(embed::render_admin(
            &state.hbs,
            &current,
            false,
            Some("Please choose a valid theme."),
        ));
    }

    let settings = EmbedSettings {
        custom_css: form.custom_css,
        default_height: if height.is_empty() {
            EmbedSettings::default().default_height
        } else {
            height
        },
        default_theme: theme,
    };

    if let Err(e) = state.store.save_embed_settings(&settings).await {
        return storage_error(e);
    }

    tracing::info!("embed settings saved");
    html_or_500(embed::render_admin(&state.hbs, &settings, true, None))
}
