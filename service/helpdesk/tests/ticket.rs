mod common;

use std::sync::Arc;

use common::*;
use domain_helpdesk::{
    command::{AddCommentCommand, CreateTicketCommand, UpdateTicketCommand},
    exception::HelpdeskException,
    mock::{MockAccountRepo, MockCommentRepo, MockTicketRepo},
    model::{
        entity::{Comment, Ticket},
        vo::{TicketNumber, TicketPriority, TicketStatus},
    },
    service::TicketService,
};
use mockall::predicate::eq;
use service_helpdesk::TicketServiceImpl;

fn service(
    tickets: MockTicketRepo,
    comments: MockCommentRepo,
    accounts: MockAccountRepo,
) -> TicketServiceImpl {
    TicketServiceImpl::builder()
        .ticket_repo(Arc::new(tickets))
        .comment_repo(Arc::new(comments))
        .account_repo(Arc::new(accounts))
        .build()
}

fn create_command() -> CreateTicketCommand {
    CreateTicketCommand {
        title: "Printer".to_owned(),
        description: "Paper jam".to_owned(),
        category: "hardware".to_owned(),
        priority: "high".to_owned(),
    }
}

fn integrity() -> anyhow::Error {
    anyhow::Error::new(HelpdeskException::Integrity {
        detail: "ticket.ticket_number".to_owned(),
    })
}

fn inserted(number: &TicketNumber) -> Ticket {
    Ticket { ticket_number: *number, ..ticket(number.sequence() as i32, 1) }
}

#[tokio::test]
async fn first_ticket_gets_first_number() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_last_inserted_number().times(1).returning(|| Ok(None));
    tickets
        .expect_insert()
        .withf(|new_ticket, number| {
            new_ticket.status == TicketStatus::Open
                && new_ticket.requester_id == 1
                && new_ticket.priority == TicketPriority::High
                && number.to_string() == "TKT-00001"
        })
        .times(1)
        .returning(|_, number| Ok(inserted(number)));
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let ticket = service.create_ticket(&requester(), create_command()).await.unwrap();
    assert_eq!("TKT-00001", ticket.ticket_number.to_string());
}

#[tokio::test]
async fn number_follows_last_inserted() {
    let mut tickets = MockTicketRepo::new();
    tickets
        .expect_last_inserted_number()
        .returning(|| Ok(Some(number("TKT-00041"))));
    tickets
        .expect_insert()
        .withf(|_, number| number.to_string() == "TKT-00042")
        .returning(|_, number| Ok(inserted(number)));
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let ticket = service.create_ticket(&requester(), create_command()).await.unwrap();
    assert_eq!("TKT-00042", ticket.ticket_number.to_string());
}

#[tokio::test]
async fn numbering_retries_once_after_a_collision() {
    let mut seq = mockall::Sequence::new();
    let mut tickets = MockTicketRepo::new();
    tickets
        .expect_last_inserted_number()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(Some(number("TKT-00004"))));
    tickets
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(integrity()));
    tickets
        .expect_last_inserted_number()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(Some(number("TKT-00005"))));
    tickets
        .expect_insert()
        .withf(|_, number| number.to_string() == "TKT-00006")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, number| Ok(inserted(number)));
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let ticket = service.create_ticket(&requester(), create_command()).await.unwrap();
    assert_eq!("TKT-00006", ticket.ticket_number.to_string());
}

#[tokio::test]
async fn second_collision_is_fatal() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_last_inserted_number().times(2).returning(|| Ok(None));
    tickets.expect_insert().times(2).returning(|_, _| Err(integrity()));
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let err = service.create_ticket(&requester(), create_command()).await.unwrap_err();
    assert!(err.is_integrity());
}

#[tokio::test]
async fn empty_title_never_reaches_the_store() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_last_inserted_number().never();
    tickets.expect_insert().never();
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let command = CreateTicketCommand { title: " ".to_owned(), ..create_command() };
    match service.create_ticket(&requester(), command).await {
        Err(HelpdeskException::Validation { errors }) => assert!(errors.contains("title")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn requester_cannot_read_foreign_ticket() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_record().with(eq(7)).returning(|id| Ok(Some(record(id, 1))));
    let mut comments = MockCommentRepo::new();
    comments.expect_list_for_ticket().never();
    let service = service(tickets, comments, MockAccountRepo::new());

    let err = service.ticket_detail(&other_requester(), 7).await.unwrap_err();
    assert!(matches!(err, HelpdeskException::PermissionDenied { .. }));
}

#[tokio::test]
async fn owner_and_staff_read_ticket_with_comments() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_record().returning(|id| Ok(Some(record(id, 1))));
    let mut comments = MockCommentRepo::new();
    comments.expect_list_for_ticket().times(2).returning(|_| Ok(vec![]));
    let service = service(tickets, comments, MockAccountRepo::new());

    let detail = service.ticket_detail(&requester(), 7).await.unwrap();
    assert_eq!(7, detail.record.ticket.id);
    service.ticket_detail(&staff(), 7).await.unwrap();
}

#[tokio::test]
async fn missing_ticket_is_not_found() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_record().returning(|_| Ok(None));
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let err = service.ticket_detail(&staff(), 404).await.unwrap_err();
    assert!(matches!(err, HelpdeskException::NotFound { entity: "Ticket", .. }));
}

#[tokio::test]
async fn comment_is_authored_by_actor() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_by_id().returning(|id| Ok(Some(ticket(id, 1))));
    let mut comments = MockCommentRepo::new();
    comments
        .expect_insert()
        .withf(|c| c.author_id == 9 && c.ticket_id == 3 && c.text == "On my way")
        .times(1)
        .returning(|c| {
            Ok(Comment {
                id: 1,
                ticket_id: c.ticket_id,
                author_id: c.author_id,
                text: c.text.clone(),
                created_at: c.created_at,
            })
        });
    let service = service(tickets, comments, MockAccountRepo::new());

    let command = AddCommentCommand { text: "  On my way ".to_owned() };
    let comment = service.add_comment(&staff(), 3, command).await.unwrap();
    assert_eq!("On my way", comment.text);
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_by_id().returning(|id| Ok(Some(ticket(id, 1))));
    let mut comments = MockCommentRepo::new();
    comments.expect_insert().never();
    let service = service(tickets, comments, MockAccountRepo::new());

    let err = service
        .add_comment(&requester(), 3, AddCommentCommand { text: String::new() })
        .await
        .unwrap_err();
    assert!(matches!(err, HelpdeskException::Validation { .. }));
}

#[tokio::test]
async fn staff_closes_open_ticket_directly() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_by_id().returning(|id| Ok(Some(ticket(id, 1))));
    tickets
        .expect_update()
        .withf(|t| {
            t.status == TicketStatus::Closed
                && t.ticket_number.to_string() == "TKT-00003"
                && t.created_at == at(9)
                && t.updated_at > at(9)
                && t.assigned_to_id == Some(9)
        })
        .times(1)
        .returning(|t| Ok(t.clone()));
    let mut accounts = MockAccountRepo::new();
    accounts
        .expect_get_by_id()
        .with(eq(9))
        .returning(|id| Ok(Some(account(id, "tech", true))));
    let service = service(tickets, MockCommentRepo::new(), accounts);

    let command = UpdateTicketCommand {
        status: "closed".to_owned(),
        priority: "medium".to_owned(),
        assigned_to: "9".to_owned(),
    };
    let ticket = service.update_ticket(&staff(), 3, command).await.unwrap();
    assert_eq!(TicketStatus::Closed, ticket.status);
}

#[tokio::test]
async fn unknown_assignee_is_a_validation_error() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_by_id().returning(|id| Ok(Some(ticket(id, 1))));
    tickets.expect_update().never();
    let mut accounts = MockAccountRepo::new();
    accounts.expect_get_by_id().returning(|_| Ok(None));
    let service = service(tickets, MockCommentRepo::new(), accounts);

    let command = UpdateTicketCommand {
        status: "open".to_owned(),
        priority: "low".to_owned(),
        assigned_to: "77".to_owned(),
    };
    match service.update_ticket(&staff(), 3, command).await {
        Err(HelpdeskException::Validation { errors }) => assert!(errors.contains("assigned_to")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn requester_cannot_update_or_delete() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_by_id().never();
    tickets.expect_update().never();
    tickets.expect_delete_cascade().never();
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let err = service
        .update_ticket(&requester(), 3, UpdateTicketCommand::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HelpdeskException::PermissionDenied { .. }));
    let err = service.delete_ticket(&requester(), 3).await.unwrap_err();
    assert!(matches!(err, HelpdeskException::PermissionDenied { .. }));
}

#[tokio::test]
async fn delete_returns_removed_number() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_by_id().returning(|id| Ok(Some(ticket(id, 1))));
    tickets.expect_delete_cascade().with(eq(12)).times(1).returning(|_| Ok(()));
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let number = service.delete_ticket(&staff(), 12).await.unwrap();
    assert_eq!("TKT-00012", number.to_string());
}

#[tokio::test]
async fn requester_dashboard_counts_own_tickets() {
    let mut tickets = MockTicketRepo::new();
    tickets.expect_list_by_requester().with(eq(1)).returning(|requester_id| {
        let mut in_progress = ticket(2, requester_id);
        in_progress.status = TicketStatus::InProgress;
        let mut closed = ticket(3, requester_id);
        closed.status = TicketStatus::Closed;
        Ok(vec![closed, in_progress, ticket(1, requester_id)])
    });
    let service = service(tickets, MockCommentRepo::new(), MockAccountRepo::new());

    let dashboard = service.requester_dashboard(&requester()).await.unwrap();
    assert_eq!(3, dashboard.stats.total);
    assert_eq!(1, dashboard.stats.open);
    assert_eq!(1, dashboard.stats.in_progress);
}
