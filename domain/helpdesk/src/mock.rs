use async_trait::async_trait;
use mockall::mock;

use crate::{
    model::{
        entity::{
            Account, AccountChanges, AccountCredentials, Comment, CommentRecord, NewAccount,
            NewComment, NewTicket, Session, Ticket, TicketRecord,
        },
        vo::{ReportDocument, TicketFilter, TicketNumber},
    },
    repository::{AccountRepo, CommentRepo, SessionRepo, TicketCountQuery, TicketRepo},
    service::ReportRenderer,
    Id,
};

mock! {
    pub AccountRepo {}
    #[async_trait]
    impl AccountRepo for AccountRepo {
        async fn get_by_id(&self, id: Id) -> anyhow::Result<Option<Account>>;
        async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<Account>>;
        async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<AccountCredentials>>;
        async fn list(&self, search: Option<String>) -> anyhow::Result<Vec<Account>>;
        async fn list_assignable(&self) -> anyhow::Result<Vec<Account>>;
        async fn insert(&self, account: &NewAccount) -> anyhow::Result<Account>;
        async fn update(&self, id: Id, changes: &AccountChanges) -> anyhow::Result<Account>;
        async fn delete_cascade(&self, id: Id) -> anyhow::Result<()>;
    }
}

mock! {
    pub TicketRepo {}
    #[async_trait]
    impl TicketRepo for TicketRepo {
        async fn last_inserted_number(&self) -> anyhow::Result<Option<TicketNumber>>;
        async fn insert(&self, ticket: &NewTicket, number: &TicketNumber) -> anyhow::Result<Ticket>;
        async fn get_by_id(&self, id: Id) -> anyhow::Result<Option<Ticket>>;
        async fn get_record(&self, id: Id) -> anyhow::Result<Option<TicketRecord>>;
        async fn list_by_requester(&self, requester_id: Id) -> anyhow::Result<Vec<Ticket>>;
        async fn search(&self, filter: &TicketFilter) -> anyhow::Result<Vec<TicketRecord>>;
        async fn count(&self, query: TicketCountQuery) -> anyhow::Result<u64>;
        async fn creation_years(&self) -> anyhow::Result<Vec<i32>>;
        async fn update(&self, ticket: &Ticket) -> anyhow::Result<Ticket>;
        async fn delete_cascade(&self, id: Id) -> anyhow::Result<()>;
    }
}

mock! {
    pub CommentRepo {}
    #[async_trait]
    impl CommentRepo for CommentRepo {
        async fn list_for_ticket(&self, ticket_id: Id) -> anyhow::Result<Vec<CommentRecord>>;
        async fn insert(&self, comment: &NewComment) -> anyhow::Result<Comment>;
    }
}

mock! {
    pub SessionRepo {}
    #[async_trait]
    impl SessionRepo for SessionRepo {
        async fn insert(&self, session: &Session) -> anyhow::Result<()>;
        async fn get(&self, token: &str) -> anyhow::Result<Option<Session>>;
        async fn set_flash(&self, token: &str, flash: Option<String>) -> anyhow::Result<()>;
        async fn delete(&self, token: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub ReportRenderer {}
    impl ReportRenderer for ReportRenderer {
        fn content_type(&self) -> &'static str;
        fn render(&self, document: &ReportDocument) -> anyhow::Result<Vec<u8>>;
    }
}
