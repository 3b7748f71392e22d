//! `SeaORM` Entity for documents table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{DocumentState, DteCode};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub dte_type: DteCode,
    #[sea_orm(unique)]
    pub control_number: String,
    pub issued_at: DateTimeWithTimeZone,
    pub payment_terms: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub iva: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total: Decimal,
    pub generation_code: Option<String>,
    pub reception_seal: Option<String>,
    pub status: DocumentState,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_delete = "Restrict"
    )]
    Clients,
    #[sea_orm(has_many = "super::document_lines::Entity")]
    DocumentLines,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::document_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
