use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use domain_helpdesk::{model::entity::Account, service::AuthService};
use futures::future::LocalBoxFuture;

/// The signed-in account behind the session cookie of a request.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub token: String,
    pub account: Account,
}

/// Resolves the session cookie to a [`Visitor`] stored in the request extensions.
/// Requests without a valid session pass through anonymously.
pub struct SessionIdentity {
    auth_service: Arc<dyn AuthService>,
    cookie_name: String,
}

impl SessionIdentity {
    pub fn new(auth_service: Arc<dyn AuthService>, cookie_name: impl Into<String>) -> Self {
        Self { auth_service, cookie_name: cookie_name.into() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityMiddleware {
            service: Rc::new(service),
            auth_service: self.auth_service.clone(),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct SessionIdentityMiddleware<S> {
    service: Rc<S>,
    auth_service: Arc<dyn AuthService>,
    cookie_name: String,
}

impl<S, B> Service<ServiceRequest> for SessionIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let auth_service = self.auth_service.clone();
        let token = req.cookie(&self.cookie_name).map(|c| c.value().to_owned());
        Box::pin(async move {
            let Some(token) = token.filter(|t| !t.is_empty()) else {
                return service.call(req).await;
            };
            match auth_service.authenticate(&token).await {
                Ok(Some(account)) => {
                    req.extensions_mut().insert(Visitor { token, account });
                }
                Ok(None) => tracing::debug!("Session cookie does not match an active session."),
                Err(e) => tracing::warn!("Cannot resolve session: {e}"),
            }
            service.call(req).await
        })
    }
}
