use actix_web::{get, http::header, http::StatusCode, post, web, HttpResponse};
use domain_helpdesk::{
    command::{AddCommentCommand, CreateTicketCommand},
    exception::{FieldErrors, HelpdeskException},
    model::vo::{Notice, TicketCategory, TicketDetail, TicketPriority},
    Id,
};
use serde_json::json;

use super::{Page, WebError, DASHBOARD_PATH};

fn ticket_path(id: Id) -> String {
    format!("/tickets/ticket/{id}/")
}

#[get("/")]
pub async fn home(_page: Page) -> HttpResponse {
    super::see_other(DASHBOARD_PATH)
}

#[get("/tickets/")]
pub async fn dashboard(page: Page) -> Result<HttpResponse, WebError> {
    match page.sp().ticket_service().requester_dashboard(&page.actor()).await {
        Ok(dashboard) => page.render("dashboard", StatusCode::OK, &dashboard).await,
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

async fn ticket_form(
    page: &Page,
    status: StatusCode,
    form: &CreateTicketCommand,
    errors: &FieldErrors,
) -> Result<HttpResponse, WebError> {
    let view = json!({
        "form": form,
        "errors": errors,
        "category_choices": TicketCategory::choices(),
        "priority_choices": TicketPriority::choices(),
    });
    page.render("ticket_form", status, &view).await
}

#[get("/tickets/create/")]
pub async fn create_form(page: Page) -> Result<HttpResponse, WebError> {
    let form = CreateTicketCommand {
        category: TicketCategory::default().as_str().to_owned(),
        priority: TicketPriority::default().as_str().to_owned(),
        ..Default::default()
    };
    ticket_form(&page, StatusCode::OK, &form, &FieldErrors::new()).await
}

#[post("/tickets/create/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username))]
pub async fn create(
    page: Page,
    form: web::Form<CreateTicketCommand>,
) -> Result<HttpResponse, WebError> {
    let form = form.into_inner();
    match page.sp().ticket_service().create_ticket(&page.actor(), form.clone()).await {
        Ok(ticket) => {
            let notice =
                Notice::success(format!("Ticket {} created successfully.", ticket.ticket_number));
            page.redirect(DASHBOARD_PATH, notice).await
        }
        Err(HelpdeskException::Validation { errors }) => {
            ticket_form(&page, StatusCode::BAD_REQUEST, &form, &errors).await
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

async fn detail_page(
    page: &Page,
    status: StatusCode,
    ticket_detail: &TicketDetail,
    form: &AddCommentCommand,
    errors: &FieldErrors,
) -> Result<HttpResponse, WebError> {
    let view = json!({
        "detail": ticket_detail,
        "form": form,
        "errors": errors,
    });
    page.render("ticket_detail", status, &view).await
}

#[get("/tickets/ticket/{id}/")]
pub async fn detail(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().ticket_service().ticket_detail(&page.actor(), *id).await {
        Ok(ticket_detail) => {
            detail_page(&page, StatusCode::OK, &ticket_detail, &Default::default(), &FieldErrors::new())
                .await
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

#[post("/tickets/ticket/{id}/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username, ticket = *id))]
pub async fn comment(
    page: Page,
    id: web::Path<Id>,
    form: web::Form<AddCommentCommand>,
) -> Result<HttpResponse, WebError> {
    let id = id.into_inner();
    let form = form.into_inner();
    let service = page.sp().ticket_service();
    match service.add_comment(&page.actor(), id, form.clone()).await {
        Ok(_) => {
            page.redirect(&ticket_path(id), Notice::success("Comment added successfully.")).await
        }
        Err(HelpdeskException::Validation { errors }) => {
            match service.ticket_detail(&page.actor(), id).await {
                Ok(ticket_detail) => detail_page(&page, StatusCode::BAD_REQUEST, &ticket_detail, &form, &errors).await,
                Err(e) => page.fail(e, DASHBOARD_PATH).await,
            }
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

#[get("/tickets/ticket/{id}/pdf/")]
pub async fn report(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().report_service().render_report(&page.actor(), *id).await {
        Ok(report) => Ok(HttpResponse::Ok()
            .content_type(report.content_type)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename),
            ))
            .body(report.content)),
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}
