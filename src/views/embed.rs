use serde::Deserialize;
use serde_json::json;

use crate::{models::EmbedSettings, templates::Hbs};

/// Options for one embed block. Anything left out falls back to the saved defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbedAttrs {
    pub height: Option<String>,
    pub width: Option<String>,
    pub show_header: Option<String>,
    pub show_button: Option<String>,
    pub theme: Option<String>,
    pub class: Option<String>,
}

fn flag(v: &Option<String>) -> bool {
    v.as_deref().map(|s| s.trim() == "yes").unwrap_or(true)
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn render_embed(
    hbs: &Hbs,
    embed_url: &str,
    attrs: &EmbedAttrs,
    defaults: &EmbedSettings,
) -> Result<String, String> {
    // keep admin CSS inside its <style> element
    let custom_css = defaults.custom_css.replace("</", "<\\/");

    let ctx = json!({
        "embed_url": embed_url,
        "height": non_empty(&attrs.height).unwrap_or(defaults.default_height.as_str()),
        "width": non_empty(&attrs.width).unwrap_or("100%"),
        "show_header": flag(&attrs.show_header),
        "show_button": flag(&attrs.show_button),
        "theme": non_empty(&attrs.theme).unwrap_or(defaults.default_theme.as_str()),
        "class": non_empty(&attrs.class).unwrap_or(""),
        "custom_css": custom_css,
    });

    hbs.render("embed", &ctx).map_err(|e| e.to_string())
}

pub fn render_admin(
    hbs: &Hbs,
    settings: &EmbedSettings,
    saved: bool,
    error: Option<&str>,
) -> Result<String, String> {
    let ctx = json!({
        "settings": settings,
        "is_light": settings.default_theme == "light",
        "is_dark": settings.default_theme == "dark",
        "saved": saved,
        "error": error,
    });

    hbs.render("admin/embed", &ctx).map_err(|e| e.to_string())
}
