use actix_web::{get, http::StatusCode, post, web, HttpResponse};
use domain_helpdesk::{
    command::UpdateTicketCommand,
    exception::{FieldErrors, HelpdeskException},
    model::{
        entity::TicketRecord,
        vo::{Notice, TicketFilterParams, TicketPriority, TicketStatus},
    },
    Id,
};
use serde_json::json;

use super::{Page, WebError, ADMIN_PATH, DASHBOARD_PATH};

#[get("/tickets/admin/")]
pub async fn dashboard(
    page: Page,
    params: web::Query<TicketFilterParams>,
) -> Result<HttpResponse, WebError> {
    let query = page.sp().ticket_query_service();
    match query.admin_dashboard(&page.actor(), params.into_inner()).await {
        Ok(dashboard) => page.render("admin_dashboard", StatusCode::OK, &dashboard).await,
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

async fn update_page(
    page: &Page,
    status: StatusCode,
    record: &TicketRecord,
    form: &UpdateTicketCommand,
    errors: &FieldErrors,
) -> Result<HttpResponse, WebError> {
    let assignable = match page.sp().ticket_query_service().assignable_accounts(&page.actor()).await {
        Ok(accounts) => accounts,
        Err(e) => return page.fail(e, DASHBOARD_PATH).await,
    };
    let view = json!({
        "record": record,
        "form": form,
        "errors": errors,
        "status_choices": TicketStatus::choices(),
        "priority_choices": TicketPriority::choices(),
        "assignable": assignable,
    });
    page.render("ticket_update", status, &view).await
}

#[get("/tickets/admin/ticket/{id}/update/")]
pub async fn update_form(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().ticket_service().ticket_for_staff(&page.actor(), *id).await {
        Ok(record) => {
            let ticket = &record.ticket;
            let form = UpdateTicketCommand {
                status: ticket.status.as_str().to_owned(),
                priority: ticket.priority.as_str().to_owned(),
                assigned_to: ticket.assigned_to_id.map(|id| id.to_string()).unwrap_or_default(),
            };
            update_page(&page, StatusCode::OK, &record, &form, &FieldErrors::new()).await
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

#[post("/tickets/admin/ticket/{id}/update/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username, ticket = *id))]
pub async fn update(
    page: Page,
    id: web::Path<Id>,
    form: web::Form<UpdateTicketCommand>,
) -> Result<HttpResponse, WebError> {
    let id = id.into_inner();
    let form = form.into_inner();
    let service = page.sp().ticket_service();
    match service.update_ticket(&page.actor(), id, form.clone()).await {
        Ok(ticket) => {
            let notice =
                Notice::success(format!("Ticket {} updated successfully.", ticket.ticket_number));
            page.redirect(ADMIN_PATH, notice).await
        }
        Err(HelpdeskException::Validation { errors }) => {
            match service.ticket_for_staff(&page.actor(), id).await {
                Ok(record) => update_page(&page, StatusCode::BAD_REQUEST, &record, &form, &errors).await,
                Err(e) => page.fail(e, DASHBOARD_PATH).await,
            }
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

#[get("/tickets/admin/ticket/{id}/delete/")]
pub async fn delete_confirm(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().ticket_service().ticket_for_staff(&page.actor(), *id).await {
        Ok(record) => page.render("ticket_delete", StatusCode::OK, &json!({ "record": record })).await,
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

#[post("/tickets/admin/ticket/{id}/delete/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username, ticket = *id))]
pub async fn delete(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().ticket_service().delete_ticket(&page.actor(), *id).await {
        Ok(number) => {
            page.redirect(ADMIN_PATH, Notice::success(format!("Ticket {number} deleted successfully.")))
                .await
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}
