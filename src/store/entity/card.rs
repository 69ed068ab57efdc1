use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub type_line: String,
    #[sea_orm(column_name = "text")]
    pub oracle_text: String,
    #[sea_orm(column_name = "manaCost")]
    pub mana_cost: String,
    pub colors: String,
    pub rarity: String,
    #[sea_orm(column_name = "setCode")]
    pub set_code: String,
    #[sea_orm(column_name = "scryfallId")]
    pub scryfall_id: Option<Uuid>,
    #[sea_orm(column_name = "tcgplayerProductId")]
    pub tcgplayer_product_id: Option<i64>,
    pub variant: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_card::Entity")]
    UserCard,
}

impl Related<super::user_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
