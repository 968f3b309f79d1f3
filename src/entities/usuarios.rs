use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,

    /// Hex SHA-256 password digest
    pub password_hash: String,

    pub email: String,

    /// "admin" or "user"
    pub role: String,

    pub created_at: String,

    pub last_login: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::perfiles::Entity")]
    Perfiles,
}

impl Related<super::perfiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Perfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
