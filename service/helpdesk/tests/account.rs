mod common;

use std::sync::Arc;

use common::*;
use domain_helpdesk::{
    command::{CreateAccountCommand, EditAccountCommand},
    exception::HelpdeskException,
    mock::MockAccountRepo,
    model::entity::Account,
    service::AccountService,
};
use mockall::predicate::eq;
use service_helpdesk::{password::verify_password, AccountServiceImpl};

fn service(accounts: MockAccountRepo) -> AccountServiceImpl {
    AccountServiceImpl::builder().account_repo(Arc::new(accounts)).build()
}

fn create_command() -> CreateAccountCommand {
    CreateAccountCommand {
        username: "maria".to_owned(),
        email: "maria@example.com".to_owned(),
        first_name: "Maria".to_owned(),
        last_name: "Perez".to_owned(),
        password1: "winter-2025".to_owned(),
        password2: "winter-2025".to_owned(),
        is_staff: true,
        job_title: "Analyst".to_owned(),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_writes_account_with_profile_and_hash() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_find_by_username().returning(|_| Ok(None));
    accounts
        .expect_insert()
        .withf(|a| {
            a.username == "maria"
                && a.is_staff
                && !a.is_superuser
                && a.is_active
                && a.profile.job_title == "Analyst"
                && verify_password("winter-2025", &a.password_hash)
        })
        .times(1)
        .returning(|a| {
            Ok(Account { profile: a.profile.clone(), ..account(5, &a.username, a.is_staff) })
        });

    let account = service(accounts).create_account(&staff(), create_command()).await.unwrap();
    assert_eq!("Analyst", account.profile.job_title);
}

#[tokio::test]
async fn duplicate_username_is_a_field_error() {
    let mut accounts = MockAccountRepo::new();
    accounts
        .expect_find_by_username()
        .returning(|username| Ok(Some(account(3, username, false))));
    accounts.expect_insert().never();

    match service(accounts).create_account(&staff(), create_command()).await {
        Err(HelpdeskException::Validation { errors }) => assert!(errors.contains("username")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn requester_cannot_manage_accounts() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_list().never();
    let err = service(accounts).list_accounts(&requester(), None).await.unwrap_err();
    assert!(matches!(err, HelpdeskException::PermissionDenied { .. }));
}

#[tokio::test]
async fn listing_counts_staff_and_active() {
    let mut accounts = MockAccountRepo::new();
    accounts
        .expect_list()
        .with(eq(Some("ma".to_owned())))
        .returning(|_| {
            let mut inactive = account(3, "mark", false);
            inactive.is_active = false;
            Ok(vec![account(1, "maria", true), inactive])
        });

    let listing = service(accounts)
        .list_accounts(&staff(), Some("  ma ".to_owned()))
        .await
        .unwrap();
    assert_eq!("ma", listing.search);
    assert_eq!(1, listing.staff_count);
    assert_eq!(1, listing.active_count);
}

#[tokio::test]
async fn edit_keeps_own_username() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_get_by_id().returning(|id| Ok(Some(account(id, "maria", false))));
    accounts
        .expect_find_by_username()
        .returning(|username| Ok(Some(account(4, username, false))));
    accounts
        .expect_update()
        .withf(|id, changes| *id == 4 && changes.is_active && changes.profile.mobile == "0999")
        .times(1)
        .returning(|id, changes| Ok(account(id, &changes.username, changes.is_staff)));

    let command = EditAccountCommand {
        username: "maria".to_owned(),
        email: "maria@example.com".to_owned(),
        first_name: "Maria".to_owned(),
        last_name: "Perez".to_owned(),
        is_active: true,
        mobile: "0999".to_owned(),
        ..Default::default()
    };
    service(accounts).edit_account(&staff(), 4, command).await.unwrap();
}

#[tokio::test]
async fn cannot_delete_self() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_get_by_id().returning(|id| Ok(Some(account(id, "tech", true))));
    accounts.expect_delete_cascade().never();

    let actor = staff();
    let err = service(accounts).delete_account(&actor, actor.id).await.unwrap_err();
    assert!(matches!(err, HelpdeskException::PermissionDenied { .. }));
}

#[tokio::test]
async fn cannot_delete_superuser() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_get_by_id().returning(|id| {
        Ok(Some(Account { is_superuser: true, ..account(id, "root", true) }))
    });
    accounts.expect_delete_cascade().never();

    let err = service(accounts).delete_account(&staff(), 1).await.unwrap_err();
    match err {
        HelpdeskException::PermissionDenied { notice } => assert!(notice.contains("superuser")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn delete_cascades_through_repository() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_get_by_id().returning(|id| Ok(Some(account(id, "bob", false))));
    accounts.expect_delete_cascade().with(eq(2)).times(1).returning(|_| Ok(()));

    let username = service(accounts).delete_account(&staff(), 2).await.unwrap();
    assert_eq!("bob", username);
}

#[tokio::test]
async fn bootstrap_skips_existing_username() {
    let mut accounts = MockAccountRepo::new();
    accounts
        .expect_find_by_username()
        .returning(|username| Ok(Some(account(1, username, true))));
    accounts.expect_insert().never();

    let created = service(accounts).bootstrap_superuser("admin", "pw", "a@b.c").await.unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn bootstrap_creates_superuser() {
    let mut accounts = MockAccountRepo::new();
    accounts.expect_find_by_username().returning(|_| Ok(None));
    accounts
        .expect_insert()
        .withf(|a| a.is_superuser && a.is_staff && a.username == "admin")
        .times(1)
        .returning(|a| Ok(Account { is_superuser: true, ..account(1, &a.username, true) }));

    let created = service(accounts).bootstrap_superuser("admin", "pw", "a@b.c").await.unwrap();
    assert!(created.unwrap().is_superuser);
}
