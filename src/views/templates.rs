use handlebars::Handlebars;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

pub fn build_handlebars() -> Hbs {
    let mut hb = Handlebars::new();

    hb.register_template_string("embed", include_str!("../../templates/embed.hbs"))
        .expect("template embed");
    hb.register_template_string("admin/embed", include_str!("../../templates/admin_embed.hbs"))
        .expect("template admin/embed");

    Arc::new(hb)
}
