use std::future::{ready, Ready};

use actix_web::{
    dev::Payload,
    http::{header, StatusCode},
    web, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use domain_helpdesk::{
    exception::HelpdeskException,
    model::{entity::Account, vo::{ActingIdentity, Notice}},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::infrastructure::{middleware::Visitor, ServiceProvider};

pub mod admin;
pub mod auth;
pub mod tickets;
pub mod users;

pub const DASHBOARD_PATH: &str = "/tickets/";
pub const ADMIN_PATH: &str = "/tickets/admin/";
pub const USERS_PATH: &str = "/tickets/admin/users/";
pub const LOGIN_PATH: &str = "/login/";

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Login required for {next}")]
    LoginRequired { next: String },
    #[error(transparent)]
    Helpdesk(#[from] HelpdeskException),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebError::LoginRequired { .. } => StatusCode::SEE_OTHER,
            WebError::Helpdesk(HelpdeskException::Validation { .. }) => StatusCode::BAD_REQUEST,
            WebError::Helpdesk(HelpdeskException::PermissionDenied { .. }) => StatusCode::FORBIDDEN,
            WebError::Helpdesk(HelpdeskException::NotFound { .. }) => StatusCode::NOT_FOUND,
            WebError::Helpdesk(_) | WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            WebError::LoginRequired { next } => see_other(&login_url(next)),
            _ if status.is_server_error() => {
                tracing::error!("Request failed: {self:?}");
                HttpResponse::build(status)
                    .content_type("text/html; charset=utf-8")
                    .body(include_str!("../../templates/server_error.hbs"))
            }
            _ => HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(status.canonical_reason().unwrap_or_default()),
        }
    }
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}

/// `/login/?next=...` with the path url-encoded.
pub fn login_url(next: &str) -> String {
    let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_PATH}?next={next}")
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status).content_type("text/html; charset=utf-8").body(body)
}

fn services(req: &HttpRequest) -> Result<web::Data<ServiceProvider>, WebError> {
    req.app_data::<web::Data<ServiceProvider>>()
        .cloned()
        .ok_or_else(|| WebError::Internal(anyhow::anyhow!("Service provider is not registered.")))
}

/// Merges the view into the page context next to the signed-in user and the
/// pending notice.
fn page_context<T: Serialize>(
    view: &T,
    user: Option<&Account>,
    notice: Option<Notice>,
) -> Result<Value, WebError> {
    let mut context = match serde_json::to_value(view).map_err(anyhow::Error::from)? {
        Value::Object(map) => map,
        Value::Null => serde_json::Map::new(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("view".to_owned(), other);
            map
        }
    };
    if let Some(user) = user {
        context.insert("user".to_owned(), serde_json::to_value(user).map_err(anyhow::Error::from)?);
        context.insert("is_staff".to_owned(), Value::Bool(user.can_administer()));
    }
    context.insert("notice".to_owned(), json!(notice));
    Ok(Value::Object(context))
}

/// Renders a page for a visitor without a session.
pub fn render_anonymous<T: Serialize>(
    sp: &ServiceProvider,
    template: &str,
    status: StatusCode,
    view: &T,
) -> Result<HttpResponse, WebError> {
    let context = page_context(view, None, None)?;
    Ok(html(status, sp.templates().render(template, &context)?))
}

/// Request context of a signed-in visitor. Extracting it redirects anonymous
/// visitors to the login page.
pub struct Page {
    sp: web::Data<ServiceProvider>,
    visitor: Visitor,
}

impl FromRequest for Page {
    type Error = WebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let visitor = req.extensions().get::<Visitor>().cloned();
        ready(match visitor {
            Some(visitor) => services(req).map(|sp| Page { sp, visitor }),
            None => {
                let next = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str().to_owned())
                    .unwrap_or_else(|| req.path().to_owned());
                Err(WebError::LoginRequired { next })
            }
        })
    }
}

impl Page {
    pub fn sp(&self) -> &ServiceProvider {
        &self.sp
    }

    pub fn actor(&self) -> ActingIdentity {
        self.visitor.account.identity()
    }

    pub fn account(&self) -> &Account {
        &self.visitor.account
    }

    pub fn token(&self) -> &str {
        &self.visitor.token
    }

    /// Renders `template`, consuming the pending notice.
    pub async fn render<T: Serialize>(
        &self,
        template: &str,
        status: StatusCode,
        view: &T,
    ) -> Result<HttpResponse, WebError> {
        let notice = self.sp.auth_service().take_notice(self.token()).await?;
        let context = page_context(view, Some(&self.visitor.account), notice)?;
        Ok(html(status, self.sp.templates().render(template, &context)?))
    }

    /// `303 See Other` to `location`, leaving `notice` for the next page.
    pub async fn redirect(&self, location: &str, notice: Notice) -> Result<HttpResponse, WebError> {
        self.sp.auth_service().push_notice(self.token(), notice).await?;
        Ok(see_other(location))
    }

    /// Turns a refused operation into the matching page: denied access
    /// redirects to `fallback` with the notice, a missing record shows the
    /// not-found page. Anything else is an error response.
    pub async fn fail(&self, e: HelpdeskException, fallback: &str) -> Result<HttpResponse, WebError> {
        match e {
            HelpdeskException::PermissionDenied { notice } => {
                tracing::warn!("{} was refused: {notice}", self.visitor.account.username);
                self.redirect(fallback, Notice::error(notice)).await
            }
            HelpdeskException::NotFound { entity, id } => {
                tracing::debug!("{entity} {id} not found.");
                self.render("not_found", StatusCode::NOT_FOUND, &json!({ "entity": entity })).await
            }
            e => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_encodes_the_next_path() {
        assert_eq!("/login/?next=%2Ftickets%2F", login_url("/tickets/"));
        assert_eq!(
            "/login/?next=%2Ftickets%2Fadmin%2F%3Fstatus%3Dopen",
            login_url("/tickets/admin/?status=open")
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let e = WebError::Internal(anyhow::anyhow!("connection refused"));
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, e.status_code());
        let e = WebError::Helpdesk(HelpdeskException::not_found("Ticket", 3));
        assert_eq!(StatusCode::NOT_FOUND, e.status_code());
        let e = WebError::LoginRequired { next: "/tickets/".into() };
        assert_eq!(StatusCode::SEE_OTHER, e.status_code());
    }
}
