use std::sync::Arc;

use actix_web::web;
use colored::Colorize;
use tracing::{error, info};

use crate::api;
use crate::infrastructure::{
    config::HelpdeskConfig, middleware::SessionIdentity, telemetry::initialize_telemetry,
    ServiceProvider,
};

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(x) => x,
        Err(e) => return eprintln!("{}: {}", "Cannot build runtime".red(), e),
    };
    runtime.block_on(async_run());
}

pub async fn async_run() {
    let config = match HelpdeskConfig::load() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };
    if let Err(e) = initialize_telemetry(config.telemetry()) {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };
    let service_provider = match ServiceProvider::build(config).await {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };
    tokio::select! {
        _ = initialize_web_host(service_provider) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Stopping services (ctrl-c handling).");
        }
    }
}

/// Every route of the helpdesk. Shared by the web host and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api::auth::login_form)
        .service(api::auth::login)
        .service(api::auth::logout_confirm)
        .service(api::auth::logout)
        .service(api::tickets::home)
        .service(api::tickets::dashboard)
        .service(api::tickets::create_form)
        .service(api::tickets::create)
        .service(api::tickets::detail)
        .service(api::tickets::comment)
        .service(api::tickets::report)
        .service(api::admin::dashboard)
        .service(api::admin::update_form)
        .service(api::admin::update)
        .service(api::admin::delete_confirm)
        .service(api::admin::delete)
        .service(api::users::list)
        .service(api::users::create_form)
        .service(api::users::create)
        .service(api::users::edit_form)
        .service(api::users::edit)
        .service(api::users::delete_confirm)
        .service(api::users::delete);
}

pub async fn initialize_web_host(sp: Arc<ServiceProvider>) {
    let host = sp.config().host().clone();
    let server = actix_web::HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(86400);
        actix_web::App::new()
            .wrap(SessionIdentity::new(
                sp.auth_service().clone(),
                sp.config().session().cookie_name().clone(),
            ))
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(web::Data::from(sp.clone()))
            .configure(configure)
    });
    let server = match server.bind((host.bind_address().to_owned(), *host.bind_port())) {
        Ok(x) => x,
        Err(e) => return error!("Cannot bind {}:{}: {}", host.bind_address(), host.bind_port(), e),
    };
    info!("Listening on {}:{}.", host.bind_address(), host.bind_port());
    match server.disable_signals().run().await {
        Ok(_) => info!("Web server stopped successfully."),
        Err(e) => error!("Web server into error: {}", e),
    }
}
