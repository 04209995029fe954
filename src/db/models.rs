use serde::Serialize;
use sqlx::FromRow;

/// One row of the `passengers` table.
///
/// Field names serialize to the table's column names, which is the shape the
/// web frontend reads. No column is declared NOT NULL, so every field is
/// optional.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct Passenger {
    pub passenger_id: Option<i32>,
    pub survived: Option<i32>,
    pub pclass: Option<i32>,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<f32>,
    pub sib_sp: Option<i32>,
    pub parch: Option<i32>,
    pub ticket: Option<String>,
    pub fare: Option<f32>,
    pub cabin: Option<String>,
    pub embarked: Option<String>,
}
