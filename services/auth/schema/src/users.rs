use sea_orm::entity::prelude::*;

/// Directory user record. Timestamps are unix milliseconds; `status` holds
/// the wire form of the lifecycle state (`ACTIVE` / `SUSPENDED`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_login_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::email_challenges::Entity")]
    EmailChallenges,
    #[sea_orm(has_many = "super::user_grants::Entity")]
    UserGrants,
}

impl Related<super::email_challenges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmailChallenges.def()
    }
}

impl Related<super::user_grants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGrants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
