use database_model::prelude::*;
use domain_helpdesk::{
    model::entity::{Account, AccountChanges, AccountCredentials, NewAccount, Profile},
    repository::AccountRepo,
    Id,
};
use sea_orm::{
    prelude::*,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    Condition, ConnectionTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::infrastructure::database::{translate, SeaOrmDbRepository};

fn like_pattern(needle: &str) -> LikeExpr {
    let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Case-insensitive `LIKE '%term%'` over a column, compared in both lower and
/// upper case. Postgres folds all of Unicode. SQLite folds ASCII only, so a
/// non-ASCII letter there matches when the stored letter is already in the
/// lower or upper form of the term's letter.
pub(super) fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let column = Expr::col((column.entity_name(), column));
    Expr::expr(Func::lower(column.clone()))
        .like(like_pattern(&needle.to_lowercase()))
        .or(Expr::expr(Func::upper(column)).like(like_pattern(&needle.to_uppercase())))
}

fn profile_model(account_id: Id, profile: &Profile) -> ProfileActiveModel {
    ProfileActiveModel {
        account_id: Set(account_id),
        job_title: Set(profile.job_title.clone()),
        department: Set(profile.department.clone()),
        phone: Set(profile.phone.clone()),
        extension: Set(profile.extension.clone()),
        mobile: Set(profile.mobile.clone()),
        ..Default::default()
    }
}

async fn load_account<C: ConnectionTrait>(conn: &C, id: Id) -> anyhow::Result<Option<Account>> {
    Ok(AccountEntity::find_by_id(id)
        .find_also_related(ProfileEntity)
        .one(conn)
        .await?
        .map(|(account, profile)| Account::from_models(account, profile)))
}

#[async_trait::async_trait]
impl AccountRepo for SeaOrmDbRepository {
    async fn get_by_id(&self, id: Id) -> anyhow::Result<Option<Account>> {
        load_account(self.db.get_connection(), id).await
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<Account>> {
        Ok(AccountEntity::find()
            .filter(AccountColumn::Username.eq(username))
            .find_also_related(ProfileEntity)
            .one(self.db.get_connection())
            .await?
            .map(|(account, profile)| Account::from_models(account, profile)))
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<AccountCredentials>> {
        Ok(AccountEntity::find()
            .filter(AccountColumn::Username.eq(username))
            .find_also_related(ProfileEntity)
            .one(self.db.get_connection())
            .await?
            .map(|(account, profile)| {
                let password_hash = account.password_hash.clone();
                AccountCredentials { account: Account::from_models(account, profile), password_hash }
            }))
    }

    async fn list(&self, search: Option<String>) -> anyhow::Result<Vec<Account>> {
        let mut query = AccountEntity::find().find_also_related(ProfileEntity);
        if let Some(search) = search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(AccountColumn::Username, &search))
                    .add(contains_ci(AccountColumn::FirstName, &search))
                    .add(contains_ci(AccountColumn::LastName, &search))
                    .add(contains_ci(AccountColumn::Email, &search)),
            );
        }
        Ok(query
            .order_by_asc(AccountColumn::Username)
            .all(self.db.get_connection())
            .await?
            .into_iter()
            .map(|(account, profile)| Account::from_models(account, profile))
            .collect())
    }

    async fn list_assignable(&self) -> anyhow::Result<Vec<Account>> {
        Ok(AccountEntity::find()
            .filter(
                Condition::any()
                    .add(AccountColumn::IsStaff.eq(true))
                    .add(AccountColumn::IsSuperuser.eq(true)),
            )
            .find_also_related(ProfileEntity)
            .order_by_asc(AccountColumn::FirstName)
            .order_by_asc(AccountColumn::Username)
            .all(self.db.get_connection())
            .await?
            .into_iter()
            .map(|(account, profile)| Account::from_models(account, profile))
            .collect())
    }

    async fn insert(&self, account: &NewAccount) -> anyhow::Result<Account> {
        let txn = self.db.get_connection().begin().await?;
        let inserted = AccountActiveModel {
            username: Set(account.username.clone()),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            is_active: Set(account.is_active),
            is_staff: Set(account.is_staff),
            is_superuser: Set(account.is_superuser),
            date_joined: Set(account.date_joined),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(translate)?;
        let profile = profile_model(inserted.id, &account.profile).insert(&txn).await?;
        txn.commit().await?;
        Ok(Account::from_models(inserted, Some(profile)))
    }

    async fn update(&self, id: Id, changes: &AccountChanges) -> anyhow::Result<Account> {
        let txn = self.db.get_connection().begin().await?;
        AccountActiveModel {
            id: Set(id),
            username: Set(changes.username.clone()),
            first_name: Set(changes.first_name.clone()),
            last_name: Set(changes.last_name.clone()),
            email: Set(changes.email.clone()),
            is_active: Set(changes.is_active),
            is_staff: Set(changes.is_staff),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(translate)?;
        match ProfileEntity::find().filter(ProfileColumn::AccountId.eq(id)).one(&txn).await? {
            Some(existing) => {
                let mut profile = profile_model(id, &changes.profile);
                profile.id = Set(existing.id);
                profile.update(&txn).await?;
            }
            None => {
                profile_model(id, &changes.profile).insert(&txn).await?;
            }
        }
        let account = load_account(&txn, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Account {id} vanished during update."))?;
        txn.commit().await?;
        Ok(account)
    }

    async fn delete_cascade(&self, id: Id) -> anyhow::Result<()> {
        let txn = self.db.get_connection().begin().await?;
        let owned = TicketEntity::find()
            .select_only()
            .column(TicketColumn::Id)
            .filter(TicketColumn::RequesterId.eq(id))
            .into_tuple::<Id>()
            .all(&txn)
            .await?;
        CommentEntity::delete_many()
            .filter(
                Condition::any()
                    .add(CommentColumn::AuthorId.eq(id))
                    .add(CommentColumn::TicketId.is_in(owned)),
            )
            .exec(&txn)
            .await?;
        TicketEntity::delete_many().filter(TicketColumn::RequesterId.eq(id)).exec(&txn).await?;
        TicketEntity::update_many()
            .col_expr(TicketColumn::AssignedToId, Expr::value(Option::<Id>::None))
            .filter(TicketColumn::AssignedToId.eq(id))
            .exec(&txn)
            .await?;
        ProfileEntity::delete_many().filter(ProfileColumn::AccountId.eq(id)).exec(&txn).await?;
        SessionEntity::delete_many().filter(SessionColumn::AccountId.eq(id)).exec(&txn).await?;
        AccountEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}
