use chrono::{DateTime, Utc};
use domain_helpdesk::model::vo::{TicketCategory, TicketPriority, TicketStatus};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use serde_json::Value as Json;

const PAGES: [(&str, &str); 15] = [
    ("layout", include_str!("../../templates/layout.hbs")),
    ("login", include_str!("../../templates/login.hbs")),
    ("logged_out", include_str!("../../templates/logged_out.hbs")),
    ("logout_confirm", include_str!("../../templates/logout_confirm.hbs")),
    ("dashboard", include_str!("../../templates/dashboard.hbs")),
    ("ticket_form", include_str!("../../templates/ticket_form.hbs")),
    ("ticket_detail", include_str!("../../templates/ticket_detail.hbs")),
    ("admin_dashboard", include_str!("../../templates/admin_dashboard.hbs")),
    ("ticket_update", include_str!("../../templates/ticket_update.hbs")),
    ("ticket_delete", include_str!("../../templates/ticket_delete.hbs")),
    ("user_list", include_str!("../../templates/user_list.hbs")),
    ("user_form", include_str!("../../templates/user_form.hbs")),
    ("user_delete", include_str!("../../templates/user_delete.hbs")),
    ("not_found", include_str!("../../templates/not_found.hbs")),
    ("server_error", include_str!("../../templates/server_error.hbs")),
];

pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%b %d, %Y %H:%M";

fn plain(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}

/// Human label of a stored status, priority or category value.
fn choice_label(value: &str) -> String {
    if let Ok(status) = value.parse::<TicketStatus>() {
        return status.label().to_owned();
    }
    if let Ok(priority) = value.parse::<TicketPriority>() {
        return priority.label().to_owned();
    }
    if let Ok(category) = value.parse::<TicketCategory>() {
        return category.label().to_owned();
    }
    value.to_owned()
}

fn display_name(account: &serde_json::Map<String, Json>) -> String {
    let field = |key: &str| account.get(key).map(plain).unwrap_or_default();
    let full_name = format!("{} {}", field("first_name"), field("last_name")).trim().to_owned();
    if full_name.is_empty() {
        field("username")
    } else {
        full_name
    }
}

handlebars_helper!(fmt_datetime: |at: Json| {
    let at = plain(at);
    DateTime::parse_from_rfc3339(&at)
        .map(|d| d.with_timezone(&Utc).format(DISPLAY_TIMESTAMP_FORMAT).to_string())
        .unwrap_or(at)
});
handlebars_helper!(fmt_label: |value: Json| choice_label(&plain(value)));
handlebars_helper!(fmt_name: |account: Json| {
    account.as_object().map(display_name).unwrap_or_default()
});
handlebars_helper!(is_same: |a: Json, b: Json| plain(a) == plain(b));
handlebars_helper!(item_count: |items: Json| items.as_array().map(Vec::len).unwrap_or_default());

/// Page templates compiled into the binary.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        for (name, source) in PAGES {
            registry.register_template_string(name, source)?;
        }
        registry.register_helper("datetime", Box::new(fmt_datetime));
        registry.register_helper("choice_label", Box::new(fmt_label));
        registry.register_helper("display_name", Box::new(fmt_name));
        registry.register_helper("same", Box::new(is_same));
        registry.register_helper("count", Box::new(item_count));
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> anyhow::Result<String> {
        Ok(self.registry.render(template, data)?)
    }
}
