#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use domain_helpdesk::{
    model::{
        entity::{Account, NewAccount, NewTicket, Profile, Ticket},
        vo::{TicketCategory, TicketNumber, TicketPriority},
    },
    repository::{AccountRepo, TicketRepo},
};
use helpdesk_server::infrastructure::{
    config::HelpdeskConfig,
    database::{Database, SeaOrmDbRepository},
    ServiceProvider,
};
use sea_orm::ConnectOptions;
use service_helpdesk::password::hash_password;

pub const PASSWORD: &str = "correct-horse";

/// Fresh migrated in-memory SQLite database. One connection keeps the
/// database alive for the whole test.
pub async fn database() -> Arc<Database> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let database = Database::connect_with(options).await.unwrap();
    database.migrate().await.unwrap();
    Arc::new(database)
}

pub async fn store() -> SeaOrmDbRepository {
    SeaOrmDbRepository::builder().db(database().await).build()
}

pub fn services(database: Arc<Database>) -> ServiceProvider {
    ServiceProvider::from_database(database, HelpdeskConfig::default()).unwrap()
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub fn new_account(username: &str, first_name: &str, is_staff: bool) -> NewAccount {
    NewAccount {
        username: username.to_owned(),
        first_name: first_name.to_owned(),
        last_name: "Tester".to_owned(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(PASSWORD),
        is_active: true,
        is_staff,
        is_superuser: false,
        date_joined: at(2025, 1, 1),
        profile: Profile { department: "Finance".to_owned(), ..Default::default() },
    }
}

pub async fn account(store: &SeaOrmDbRepository, username: &str, is_staff: bool) -> Account {
    let first_name = username[..1].to_uppercase() + &username[1..];
    AccountRepo::insert(store, &new_account(username, &first_name, is_staff)).await.unwrap()
}

/// Inserts a ticket with the next free number and a fixed creation time.
pub async fn ticket_at(
    store: &SeaOrmDbRepository,
    requester: &Account,
    title: &str,
    created_at: DateTime<Utc>,
) -> Ticket {
    let last = store.last_inserted_number().await.unwrap();
    let ticket = NewTicket::open(
        requester.id,
        title.to_owned(),
        format!("{title} details"),
        TicketCategory::Hardware,
        TicketPriority::Medium,
        created_at,
    );
    TicketRepo::insert(store, &ticket, &TicketNumber::after(last.as_ref())).await.unwrap()
}
