use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TicketNumber;
use crate::model::entity::{Account, CommentRecord, TicketRecord};

/// Organisation lines printed in every page header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    pub organisation: String,
    pub area_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportField {
    pub label: &'static str,
    pub value: String,
}

impl ReportField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentEntry {
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

/// Logical sections of a ticket report. Layout is left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBlock {
    Requester { fields: Vec<ReportField> },
    Ticket { fields: Vec<ReportField> },
    Description { title: String, text: String },
    Assignee { fields: Vec<ReportField> },
    Comments { entries: Vec<CommentEntry> },
    Signatures { requester: String, assignee: String },
}

impl ReportBlock {
    pub fn heading(&self) -> String {
        match self {
            ReportBlock::Requester { .. } => "REQUESTER INFORMATION".to_owned(),
            ReportBlock::Ticket { .. } => "TICKET INFORMATION".to_owned(),
            ReportBlock::Description { .. } => "PROBLEM DESCRIPTION".to_owned(),
            ReportBlock::Assignee { .. } => "ASSIGNED TO".to_owned(),
            ReportBlock::Comments { entries } => format!("COMMENTS ({})", entries.len()),
            ReportBlock::Signatures { .. } => "SIGNATURES".to_owned(),
        }
    }
}

/// Everything the renderer needs for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub header: ReportHeader,
    pub ticket_number: TicketNumber,
    pub ticket_created_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub blocks: Vec<ReportBlock>,
}

pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn push_non_empty(fields: &mut Vec<ReportField>, label: &'static str, value: &str) {
    if !value.is_empty() {
        fields.push(ReportField::new(label, value));
    }
}

fn requester_fields(requester: &Account) -> Vec<ReportField> {
    let mut fields = vec![
        ReportField::new("Name", requester.display_name()),
        ReportField::new("Username", requester.username.as_str()),
    ];
    push_non_empty(&mut fields, "Job title", &requester.profile.job_title);
    push_non_empty(&mut fields, "Department", &requester.profile.department);
    push_non_empty(&mut fields, "Email", &requester.email);
    push_non_empty(&mut fields, "Phone", &requester.profile.phone_with_extension());
    fields
}

fn assignee_fields(assignee: &Account) -> Vec<ReportField> {
    let mut fields = vec![ReportField::new("Name", assignee.display_name())];
    push_non_empty(&mut fields, "Job title", &assignee.profile.job_title);
    push_non_empty(&mut fields, "Department", &assignee.profile.department);
    push_non_empty(&mut fields, "Email", &assignee.email);
    push_non_empty(&mut fields, "Mobile", &assignee.profile.mobile);
    fields
}

impl ReportDocument {
    /// Blocks come out as requester, ticket, description, assignee (when
    /// assigned), comments (when any) and signatures.
    pub fn assemble(
        record: &TicketRecord,
        comments: &[CommentRecord],
        header: ReportHeader,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let TicketRecord { ticket, requester, assignee } = record;
        let mut blocks = vec![
            ReportBlock::Requester { fields: requester_fields(requester) },
            ReportBlock::Ticket {
                fields: vec![
                    ReportField::new("Ticket number", ticket.ticket_number.to_string()),
                    ReportField::new("Requester", requester.display_name()),
                    ReportField::new(
                        "Created",
                        ticket.created_at.format(REPORT_TIMESTAMP_FORMAT).to_string(),
                    ),
                    ReportField::new("Status", ticket.status.label()),
                    ReportField::new("Priority", ticket.priority.label()),
                    ReportField::new("Category", ticket.category.label()),
                ],
            },
            ReportBlock::Description {
                title: ticket.title.clone(),
                text: ticket.description.clone(),
            },
        ];
        if let Some(assignee) = assignee {
            blocks.push(ReportBlock::Assignee { fields: assignee_fields(assignee) });
        }
        if !comments.is_empty() {
            let entries = comments
                .iter()
                .map(|c| CommentEntry {
                    author: c.author.display_name(),
                    created_at: c.comment.created_at,
                    text: c.comment.text.clone(),
                })
                .collect();
            blocks.push(ReportBlock::Comments { entries });
        }
        blocks.push(ReportBlock::Signatures {
            requester: requester.display_name(),
            assignee: assignee.as_ref().map(Account::display_name).unwrap_or_default(),
        });
        Self {
            header,
            ticket_number: ticket.ticket_number,
            ticket_created_at: ticket.created_at,
            generated_at,
            blocks,
        }
    }

    /// `Ticket_{number}_{YYYYMMDD_HHMMSS}.pdf`, stamped with the generation time.
    pub fn filename(&self) -> String {
        format!(
            "Ticket_{}_{}.pdf",
            self.ticket_number,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::entity::{Comment, Profile, Ticket};
    use crate::model::vo::{TicketCategory, TicketPriority, TicketStatus};

    fn account(id: i32, username: &str, first_name: &str) -> Account {
        Account {
            id,
            username: username.into(),
            first_name: first_name.into(),
            last_name: String::new(),
            email: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            profile: Profile::default(),
        }
    }

    fn record(assignee: Option<Account>) -> TicketRecord {
        let at = Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 0).unwrap();
        TicketRecord {
            ticket: Ticket {
                id: 1,
                ticket_number: TicketNumber::FIRST,
                requester_id: 1,
                title: "Printer".into(),
                description: "Jammed".into(),
                category: TicketCategory::Hardware,
                priority: TicketPriority::High,
                status: TicketStatus::InProgress,
                assigned_to_id: assignee.as_ref().map(|a| a.id),
                created_at: at,
                updated_at: at,
            },
            requester: account(1, "jdoe", "Jane"),
            assignee,
        }
    }

    fn kinds(document: &ReportDocument) -> Vec<String> {
        document.blocks.iter().map(ReportBlock::heading).collect()
    }

    #[test]
    fn blocks_follow_reading_order() {
        let record = record(Some(account(2, "tech", "Tom")));
        let comment = CommentRecord {
            comment: Comment {
                id: 1,
                ticket_id: 1,
                author_id: 2,
                text: "On it".into(),
                created_at: record.ticket.created_at,
            },
            author: account(2, "tech", "Tom"),
        };
        let document = ReportDocument::assemble(
            &record,
            &[comment],
            ReportHeader::default(),
            record.ticket.created_at,
        );
        assert_eq!(
            vec![
                "REQUESTER INFORMATION",
                "TICKET INFORMATION",
                "PROBLEM DESCRIPTION",
                "ASSIGNED TO",
                "COMMENTS (1)",
                "SIGNATURES",
            ],
            kinds(&document)
        );
    }

    #[test]
    fn unassigned_ticket_has_no_assignee_block() {
        let record = record(None);
        let document =
            ReportDocument::assemble(&record, &[], ReportHeader::default(), record.ticket.created_at);
        assert_eq!(
            vec!["REQUESTER INFORMATION", "TICKET INFORMATION", "PROBLEM DESCRIPTION", "SIGNATURES"],
            kinds(&document)
        );
        assert_eq!(
            Some(&ReportBlock::Signatures { requester: "Jane".into(), assignee: String::new() }),
            document.blocks.last()
        );
    }

    #[test]
    fn optional_contact_fields_are_skipped() {
        let record = record(None);
        let document =
            ReportDocument::assemble(&record, &[], ReportHeader::default(), record.ticket.created_at);
        let ReportBlock::Requester { fields } = &document.blocks[0] else {
            panic!("requester block first");
        };
        let labels: Vec<_> = fields.iter().map(|f| f.label).collect();
        assert_eq!(vec!["Name", "Username"], labels);
    }

    #[test]
    fn filename_uses_generation_time() {
        let record = record(None);
        let generated_at = Utc.with_ymd_and_hms(2025, 10, 2, 14, 5, 9).unwrap();
        let document =
            ReportDocument::assemble(&record, &[], ReportHeader::default(), generated_at);
        assert_eq!("Ticket_TKT-00001_20251002_140509.pdf", document.filename());
    }
}
