use std::collections::{BTreeSet, HashMap};

use chrono::Datelike;
use database_model::prelude::*;
use domain_helpdesk::{
    model::{
        entity::{Account, NewTicket, Ticket, TicketRecord},
        vo::{AssigneeFilter, TicketFilter, TicketNumber},
    },
    repository::{TicketCountQuery, TicketRepo},
    Id,
};
use sea_orm::{
    prelude::*,
    sea_query::{Expr, Query, SimpleExpr},
    Condition, ConnectionTrait, PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::account::contains_ci;
use crate::infrastructure::database::{translate, SeaOrmDbRepository};

/// Loads the requester and assignee of every ticket in one query.
pub(super) async fn accounts_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = Id>,
) -> anyhow::Result<HashMap<Id, Account>> {
    let ids: BTreeSet<Id> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(AccountEntity::find()
        .filter(AccountColumn::Id.is_in(ids))
        .find_also_related(ProfileEntity)
        .all(conn)
        .await?
        .into_iter()
        .map(|(account, profile)| (account.id, Account::from_models(account, profile)))
        .collect())
}

async fn into_records<C: ConnectionTrait>(
    conn: &C,
    models: Vec<TicketModel>,
) -> anyhow::Result<Vec<TicketRecord>> {
    let accounts = accounts_by_id(
        conn,
        models.iter().flat_map(|m| std::iter::once(m.requester_id).chain(m.assigned_to_id)),
    )
    .await?;
    models
        .into_iter()
        .map(|model| {
            let ticket = Ticket::try_from(model)?;
            let requester = accounts.get(&ticket.requester_id).cloned().ok_or_else(|| {
                anyhow::anyhow!("Requester {} of ticket {} is missing.", ticket.requester_id, ticket.id)
            })?;
            let assignee = ticket.assigned_to_id.and_then(|id| accounts.get(&id).cloned());
            Ok(TicketRecord { ticket, requester, assignee })
        })
        .collect()
}

/// Ticket ids whose requester or assignee name contains `search`.
fn name_matches(column: TicketColumn, search: &str) -> SimpleExpr {
    column.in_subquery(
        Query::select()
            .column(AccountColumn::Id)
            .from(AccountEntity)
            .cond_where(
                Condition::any()
                    .add(contains_ci(AccountColumn::Username, search))
                    .add(contains_ci(AccountColumn::FirstName, search))
                    .add(contains_ci(AccountColumn::LastName, search)),
            )
            .to_owned(),
    )
}

fn filter_condition(filter: &TicketFilter) -> Condition {
    let mut condition = Condition::all();
    if filter.matches_nothing {
        return condition.add(Expr::val(1).eq(0));
    }
    if let Some(search) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(TicketColumn::TicketNumber, search))
                .add(contains_ci(TicketColumn::Title, search))
                .add(name_matches(TicketColumn::RequesterId, search))
                .add(name_matches(TicketColumn::AssignedToId, search)),
        );
    }
    if let Some(status) = filter.status {
        condition = condition.add(TicketColumn::Status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        condition = condition.add(TicketColumn::Priority.eq(priority.as_str()));
    }
    if let Some(category) = filter.category {
        condition = condition.add(TicketColumn::Category.eq(category.as_str()));
    }
    match filter.assignee {
        Some(AssigneeFilter::Unassigned) => {
            condition = condition.add(TicketColumn::AssignedToId.is_null());
        }
        Some(AssigneeFilter::Account(id)) => {
            condition = condition.add(TicketColumn::AssignedToId.eq(id));
        }
        None => {}
    }
    if let Some(window) = filter.created {
        let (start, end) = window.bounds();
        condition = condition
            .add(TicketColumn::CreatedAt.gte(start))
            .add(TicketColumn::CreatedAt.lt(end));
    }
    condition
}

#[async_trait::async_trait]
impl TicketRepo for SeaOrmDbRepository {
    async fn last_inserted_number(&self) -> anyhow::Result<Option<TicketNumber>> {
        let last = TicketEntity::find()
            .order_by_desc(TicketColumn::Id)
            .one(self.db.get_connection())
            .await?;
        Ok(match last {
            Some(model) => Some(model.ticket_number.parse()?),
            None => None,
        })
    }

    async fn insert(&self, ticket: &NewTicket, number: &TicketNumber) -> anyhow::Result<Ticket> {
        TicketActiveModel {
            ticket_number: Set(number.to_string()),
            requester_id: Set(ticket.requester_id),
            title: Set(ticket.title.clone()),
            description: Set(ticket.description.clone()),
            category: Set(ticket.category.as_str().to_owned()),
            priority: Set(ticket.priority.as_str().to_owned()),
            status: Set(ticket.status.as_str().to_owned()),
            assigned_to_id: Set(None),
            created_at: Set(ticket.created_at),
            updated_at: Set(ticket.created_at),
            ..Default::default()
        }
        .insert(self.db.get_connection())
        .await
        .map_err(translate)?
        .try_into()
    }

    async fn get_by_id(&self, id: Id) -> anyhow::Result<Option<Ticket>> {
        TicketEntity::find_by_id(id)
            .one(self.db.get_connection())
            .await?
            .map(Ticket::try_from)
            .transpose()
    }

    async fn get_record(&self, id: Id) -> anyhow::Result<Option<TicketRecord>> {
        let conn = self.db.get_connection();
        let Some(model) = TicketEntity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        Ok(into_records(conn, vec![model]).await?.pop())
    }

    async fn list_by_requester(&self, requester_id: Id) -> anyhow::Result<Vec<Ticket>> {
        TicketEntity::find()
            .filter(TicketColumn::RequesterId.eq(requester_id))
            .order_by_desc(TicketColumn::CreatedAt)
            .order_by_desc(TicketColumn::Id)
            .all(self.db.get_connection())
            .await?
            .into_iter()
            .map(Ticket::try_from)
            .collect()
    }

    async fn search(&self, filter: &TicketFilter) -> anyhow::Result<Vec<TicketRecord>> {
        let conn = self.db.get_connection();
        let models = TicketEntity::find()
            .filter(filter_condition(filter))
            .order_by_desc(TicketColumn::CreatedAt)
            .order_by_desc(TicketColumn::Id)
            .all(conn)
            .await?;
        into_records(conn, models).await
    }

    async fn count(&self, query: TicketCountQuery) -> anyhow::Result<u64> {
        let mut condition = Condition::all();
        if let Some(status) = query.status {
            condition = condition.add(TicketColumn::Status.eq(status.as_str()));
        }
        if query.unassigned {
            condition = condition.add(TicketColumn::AssignedToId.is_null());
        }
        Ok(TicketEntity::find().filter(condition).count(self.db.get_connection()).await?)
    }

    async fn creation_years(&self) -> anyhow::Result<Vec<i32>> {
        let created = TicketEntity::find()
            .select_only()
            .column(TicketColumn::CreatedAt)
            .into_tuple::<DateTimeUtc>()
            .all(self.db.get_connection())
            .await?;
        let years: BTreeSet<i32> = created.iter().map(|at| at.year()).collect();
        Ok(years.into_iter().rev().collect())
    }

    async fn update(&self, ticket: &Ticket) -> anyhow::Result<Ticket> {
        TicketActiveModel {
            id: Set(ticket.id),
            status: Set(ticket.status.as_str().to_owned()),
            priority: Set(ticket.priority.as_str().to_owned()),
            assigned_to_id: Set(ticket.assigned_to_id),
            updated_at: Set(ticket.updated_at),
            ..Default::default()
        }
        .update(self.db.get_connection())
        .await?
        .try_into()
    }

    async fn delete_cascade(&self, id: Id) -> anyhow::Result<()> {
        let txn = self.db.get_connection().begin().await?;
        CommentEntity::delete_many().filter(CommentColumn::TicketId.eq(id)).exec(&txn).await?;
        TicketEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}
