//! Relational schema of the helpdesk, expressed as sea-orm entities.

pub mod account;
pub mod comment;
pub mod profile;
pub mod session;
pub mod ticket;

pub mod prelude {
    pub use super::{
        account::{
            ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as AccountEntity,
            Model as AccountModel, PrimaryKey as AccountPrimaryKey, Relation as AccountRelation,
        },
        comment::{
            ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as CommentEntity,
            Model as CommentModel, PrimaryKey as CommentPrimaryKey, Relation as CommentRelation,
        },
        profile::{
            ActiveModel as ProfileActiveModel, Column as ProfileColumn, Entity as ProfileEntity,
            Model as ProfileModel, PrimaryKey as ProfilePrimaryKey, Relation as ProfileRelation,
        },
        session::{
            ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as SessionEntity,
            Model as SessionModel, PrimaryKey as SessionPrimaryKey, Relation as SessionRelation,
        },
        ticket::{
            ActiveModel as TicketActiveModel, Column as TicketColumn, Entity as TicketEntity,
            Model as TicketModel, PrimaryKey as TicketPrimaryKey, Relation as TicketRelation,
        },
    };
}
