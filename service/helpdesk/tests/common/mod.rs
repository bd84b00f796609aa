#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use domain_helpdesk::{
    model::{
        entity::{Account, Profile, Ticket, TicketRecord},
        vo::{ActingIdentity, TicketCategory, TicketNumber, TicketPriority, TicketStatus},
    },
    Id,
};

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, hour, 0, 0).unwrap()
}

pub fn account(id: Id, username: &str, is_staff: bool) -> Account {
    Account {
        id,
        username: username.to_owned(),
        first_name: username.to_uppercase(),
        last_name: String::new(),
        email: format!("{username}@example.com"),
        is_active: true,
        is_staff,
        is_superuser: false,
        date_joined: at(8),
        profile: Profile::default(),
    }
}

pub fn requester() -> ActingIdentity {
    account(1, "alice", false).identity()
}

pub fn other_requester() -> ActingIdentity {
    account(2, "bob", false).identity()
}

pub fn staff() -> ActingIdentity {
    account(9, "tech", true).identity()
}

pub fn number(raw: &str) -> TicketNumber {
    raw.parse().unwrap()
}

pub fn ticket(id: Id, requester_id: Id) -> Ticket {
    Ticket {
        id,
        ticket_number: number(&format!("TKT-{id:05}")),
        requester_id,
        title: "Printer".to_owned(),
        description: "Paper jam".to_owned(),
        category: TicketCategory::Hardware,
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
        assigned_to_id: None,
        created_at: at(9),
        updated_at: at(9),
    }
}

pub fn record(id: Id, requester_id: Id) -> TicketRecord {
    TicketRecord {
        ticket: ticket(id, requester_id),
        requester: account(requester_id, "alice", false),
        assignee: None,
    }
}
