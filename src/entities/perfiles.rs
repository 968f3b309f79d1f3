use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "perfiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,

    pub nombre_completo: Option<String>,

    pub edad: Option<String>,

    pub ciudad: Option<String>,

    /// JSON-encoded array of interest tags
    pub intereses: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::Username",
        to = "super::usuarios::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Usuarios,
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuarios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
