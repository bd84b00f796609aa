use actix_web::{
    cookie::{Cookie, SameSite},
    get,
    http::StatusCode,
    post, web, HttpMessage, HttpRequest, HttpResponse,
};
use domain_helpdesk::{command::LoginCommand, exception::HelpdeskException};
use serde::Deserialize;
use serde_json::json;

use super::{render_anonymous, services, WebError, DASHBOARD_PATH};
use crate::infrastructure::{middleware::Visitor, ServiceProvider};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextParam {
    next: Option<String>,
}

impl NextParam {
    /// Local paths only; anything else falls back to the dashboard.
    fn target(&self) -> &str {
        match self.next.as_deref() {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
            _ => DASHBOARD_PATH,
        }
    }
}

fn session_cookie(sp: &ServiceProvider, token: String) -> Cookie<'static> {
    let session = sp.config().session();
    Cookie::build(session.cookie_name().clone(), token)
        .path("/")
        .http_only(true)
        .secure(*session.secure())
        .same_site(SameSite::Lax)
        .finish()
}

#[get("/login/")]
pub async fn login_form(
    req: HttpRequest,
    next: web::Query<NextParam>,
) -> Result<HttpResponse, WebError> {
    let sp = services(&req)?;
    let view = json!({ "next": next.target(), "form": LoginCommand::default() });
    render_anonymous(&sp, "login", StatusCode::OK, &view)
}

#[post("/login/")]
pub async fn login(
    req: HttpRequest,
    next: web::Query<NextParam>,
    form: web::Form<LoginCommand>,
) -> Result<HttpResponse, WebError> {
    let sp = services(&req)?;
    let form = form.into_inner();
    match sp.auth_service().login(form.clone()).await {
        Ok(session) => Ok(HttpResponse::SeeOther()
            .cookie(session_cookie(&sp, session.token))
            .insert_header((actix_web::http::header::LOCATION, next.target()))
            .finish()),
        Err(HelpdeskException::Validation { errors }) => {
            let view = json!({ "next": next.target(), "form": form, "errors": errors });
            render_anonymous(&sp, "login", StatusCode::BAD_REQUEST, &view)
        }
        Err(e) => Err(e.into()),
    }
}

/// Asks for confirmation; only `POST /logout/` ends the session.
#[get("/logout/")]
pub async fn logout_confirm(req: HttpRequest) -> Result<HttpResponse, WebError> {
    let sp = services(&req)?;
    let visitor = req.extensions().get::<Visitor>().cloned();
    let (template, context) = match visitor {
        Some(visitor) => {
            ("logout_confirm", super::page_context(&json!({}), Some(&visitor.account), None)?)
        }
        None => ("logged_out", super::page_context(&json!({}), None, None)?),
    };
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(sp.templates().render(template, &context)?))
}

#[post("/logout/")]
pub async fn logout(req: HttpRequest) -> Result<HttpResponse, WebError> {
    let sp = services(&req)?;
    let visitor = req.extensions().get::<Visitor>().cloned();
    if let Some(visitor) = visitor {
        sp.auth_service().logout(&visitor.token).await?;
        tracing::info!("{} logged out.", visitor.account.username);
    }
    let mut removal = session_cookie(&sp, String::new());
    removal.make_removal();
    let context = super::page_context(&json!({}), None, None)?;
    Ok(HttpResponse::Ok()
        .cookie(removal)
        .content_type("text/html; charset=utf-8")
        .body(sp.templates().render("logged_out", &context)?))
}
