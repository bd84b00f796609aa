use actix_web::{get, http::StatusCode, post, web, HttpResponse};
use domain_helpdesk::{
    command::{CreateAccountCommand, EditAccountCommand},
    exception::{FieldErrors, HelpdeskException},
    model::{entity::Account, vo::Notice},
    Id,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use service_helpdesk::STAFF_ONLY_NOTICE;

use super::{Page, WebError, DASHBOARD_PATH, USERS_PATH};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccountSearch {
    search: Option<String>,
}

/// Staff land back on the account list; everyone else on their dashboard.
fn fallback(page: &Page) -> &'static str {
    if page.actor().can_administer() {
        USERS_PATH
    } else {
        DASHBOARD_PATH
    }
}

async fn account_form<T: Serialize>(
    page: &Page,
    status: StatusCode,
    form: &T,
    errors: &FieldErrors,
    editing: Option<&Account>,
) -> Result<HttpResponse, WebError> {
    let view = json!({
        "form": form,
        "errors": errors,
        "editing": editing,
    });
    page.render("user_form", status, &view).await
}

#[get("/tickets/admin/users/")]
pub async fn list(page: Page, query: web::Query<AccountSearch>) -> Result<HttpResponse, WebError> {
    let search = query.into_inner().search;
    match page.sp().account_service().list_accounts(&page.actor(), search).await {
        Ok(listing) => page.render("user_list", StatusCode::OK, &listing).await,
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

#[get("/tickets/admin/users/create/")]
pub async fn create_form(page: Page) -> Result<HttpResponse, WebError> {
    if !page.actor().can_administer() {
        return page.fail(HelpdeskException::permission_denied(STAFF_ONLY_NOTICE), DASHBOARD_PATH).await;
    }
    account_form(&page, StatusCode::OK, &CreateAccountCommand::default(), &FieldErrors::new(), None)
        .await
}

#[post("/tickets/admin/users/create/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username))]
pub async fn create(
    page: Page,
    form: web::Form<CreateAccountCommand>,
) -> Result<HttpResponse, WebError> {
    let form = form.into_inner();
    match page.sp().account_service().create_account(&page.actor(), form.clone()).await {
        Ok(account) => {
            let notice = Notice::success(format!("User {} created successfully.", account.username));
            page.redirect(USERS_PATH, notice).await
        }
        Err(HelpdeskException::Validation { errors }) => {
            account_form(&page, StatusCode::BAD_REQUEST, &form, &errors, None).await
        }
        Err(e) => page.fail(e, DASHBOARD_PATH).await,
    }
}

fn edit_command(account: &Account) -> EditAccountCommand {
    let profile = account.profile.clone();
    EditAccountCommand {
        username: account.username.clone(),
        email: account.email.clone(),
        first_name: account.first_name.clone(),
        last_name: account.last_name.clone(),
        is_staff: account.is_staff,
        is_active: account.is_active,
        job_title: profile.job_title,
        department: profile.department,
        phone: profile.phone,
        extension: profile.extension,
        mobile: profile.mobile,
    }
}

#[get("/tickets/admin/users/{id}/edit/")]
pub async fn edit_form(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().account_service().get_account(&page.actor(), *id).await {
        Ok(account) => {
            let form = edit_command(&account);
            account_form(&page, StatusCode::OK, &form, &FieldErrors::new(), Some(&account)).await
        }
        Err(e) => page.fail(e, fallback(&page)).await,
    }
}

#[post("/tickets/admin/users/{id}/edit/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username, account = *id))]
pub async fn edit(
    page: Page,
    id: web::Path<Id>,
    form: web::Form<EditAccountCommand>,
) -> Result<HttpResponse, WebError> {
    let id = id.into_inner();
    let form = form.into_inner();
    let service = page.sp().account_service();
    match service.edit_account(&page.actor(), id, form.clone()).await {
        Ok(account) => {
            let notice = Notice::success(format!("User {} updated successfully.", account.username));
            page.redirect(USERS_PATH, notice).await
        }
        Err(HelpdeskException::Validation { errors }) => match service.get_account(&page.actor(), id).await {
            Ok(account) => {
                account_form(&page, StatusCode::BAD_REQUEST, &form, &errors, Some(&account)).await
            }
            Err(e) => page.fail(e, fallback(&page)).await,
        },
        Err(e) => page.fail(e, fallback(&page)).await,
    }
}

#[get("/tickets/admin/users/{id}/delete/")]
pub async fn delete_confirm(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().account_service().account_for_deletion(&page.actor(), *id).await {
        Ok(account) => {
            page.render("user_delete", StatusCode::OK, &json!({ "account": account })).await
        }
        Err(e) => page.fail(e, fallback(&page)).await,
    }
}

#[post("/tickets/admin/users/{id}/delete/")]
#[tracing::instrument(skip_all, fields(user = %page.account().username, account = *id))]
pub async fn delete(page: Page, id: web::Path<Id>) -> Result<HttpResponse, WebError> {
    match page.sp().account_service().delete_account(&page.actor(), *id).await {
        Ok(username) => {
            page.redirect(USERS_PATH, Notice::success(format!("User {username} deleted successfully.")))
                .await
        }
        Err(e) => page.fail(e, fallback(&page)).await,
    }
}
