use sea_orm::entity::prelude::*;

/// One email-authentication challenge. `token_hash` is the hex sha-256 of
/// the raw secret bytes; the plaintext secret is never stored. For a given
/// user only the row with the greatest `sent_at` is ever considered live.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "email_challenges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub sent_at: i64,
    pub completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
