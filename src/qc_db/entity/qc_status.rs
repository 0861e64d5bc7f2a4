use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::*;
use std::io::Write;

/// The pass/fail decision on an entity. Entities start out unrated.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[sql_type = "Integer"]
pub enum QcStatus {
    Unrated = 0,
    Pass = 1,
    Fail = 2,
}

impl QcStatus {
    /// Maps the host facing 'failed' flag (true, false or absent) to a status.
    pub fn from_failed(failed: Option<bool>) -> Self {
        match failed {
            Some(true) => Self::Fail,
            Some(false) => Self::Pass,
            None => Self::Unrated,
        }
    }

    pub fn failed(self) -> Option<bool> {
        match self {
            Self::Fail => Some(true),
            Self::Pass => Some(false),
            Self::Unrated => None,
        }
    }

    /// Label used in exported tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fail => "Fail",
            Self::Pass => "Pass",
            Self::Unrated => "",
        }
    }
}

impl Default for QcStatus {
    fn default() -> Self {
        Self::Unrated
    }
}

impl<DB> FromSql<Integer, DB> for QcStatus
where
    DB: Backend,
    i32: FromSql<Integer, DB>,
{
    fn from_sql(bytes: Option<&DB::RawValue>) -> deserialize::Result<Self> {
        match i32::from_sql(bytes)? {
            x if x == Self::Unrated as i32 => Ok(Self::Unrated),
            x if x == Self::Pass as i32 => Ok(Self::Pass),
            x if x == Self::Fail as i32 => Ok(Self::Fail),
            x => Err(format!("Unrecognized variant {}", x).into()),
        }
    }
}

impl<DB> ToSql<Integer, DB> for QcStatus
where
    DB: Backend,
    i32: ToSql<Integer, DB>,
{
    fn to_sql<W: Write>(&self, out: &mut Output<W, DB>) -> serialize::Result {
        (*self as i32).to_sql(out)
    }
}
