use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Denormalized snapshot of a student identity as last seen at login.
/// One row per upstream id; every login overwrites the previous snapshot.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Upstream-assigned student id (the token's `sub` claim).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: Option<String>,
    #[sea_orm(unique)]
    pub hall_ticket: Option<String>,
    pub roll_number: Option<String>,
    pub branch_name: Option<String>,
    pub branch_code: Option<String>,
    pub course_name: Option<String>,
    pub section_name: Option<String>,
    pub regulation_name: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub admission_year: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub father_name: Option<String>,
    pub father_mobile: Option<String>,
    pub gender: Option<String>,
    pub qr_key: Option<String>,
    pub student_type: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
