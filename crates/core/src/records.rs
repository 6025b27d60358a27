#![forbid(unsafe_code)]

use crate::locate::NaturalKey;
use crate::parse::{clamp_progress, safe_float};
use crate::schema::{activities, kpis, users};
use crate::table::{Cell, Row};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Owner,
    Viewer,
    Unknown(String),
}

impl Role {
    /// Case- and whitespace-insensitive; `staff` is an alias of `viewer`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "owner" => Self::Owner,
            "viewer" | "staff" => Self::Viewer,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Owner => "Owner",
            Self::Viewer => "Viewer",
            Self::Unknown(raw) => raw.as_str(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    /// Blank or unrecognized values fall back to ascending.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "descending" | "desc" | "تنازلي" => Self::Descending,
            _ => Self::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub assigned_initiative: String,
}

impl User {
    pub fn from_row(row: &Row) -> Self {
        Self {
            username: row.get(users::USERNAME).trimmed_text(),
            password: row.text(users::PASSWORD),
            name: row.text(users::NAME),
            role: Role::parse(&row.text(users::ROLE)),
            assigned_initiative: row.text(users::ASSIGNED_INITIATIVE),
        }
    }

    pub fn assigned_initiatives(&self) -> Vec<String> {
        split_initiatives(&self.assigned_initiative)
    }
}

pub fn split_initiatives(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    pub mabadara: String,
    pub activity: String,
    pub start_date: String,
    pub end_date: String,
    pub progress: u8,
    pub evidence_link: String,
    pub owner_comment: String,
    pub admin_comment: String,
}

impl Activity {
    pub fn from_row(row: &Row) -> Self {
        Self {
            mabadara: row.get(activities::MABADARA).trimmed_text(),
            activity: row.get(activities::ACTIVITY).trimmed_text(),
            start_date: row.text(activities::START_DATE),
            end_date: row.text(activities::END_DATE),
            progress: clamp_progress(row.get(activities::PROGRESS)),
            evidence_link: row.text(activities::EVIDENCE_LINK),
            owner_comment: row.text(activities::OWNER_COMMENT),
            admin_comment: row.text(activities::ADMIN_COMMENT),
        }
    }

    pub fn key(&self) -> NaturalKey {
        NaturalKey::new([&self.mabadara, &self.activity])
    }

    /// Row for a freshly created activity: zero progress, empty logs.
    pub fn new_row(mabadara: &str, activity: &str, start_date: &str, end_date: &str) -> Row {
        Row::new()
            .with(activities::MABADARA, mabadara.trim())
            .with(activities::ACTIVITY, activity.trim())
            .with(activities::START_DATE, start_date.trim())
            .with(activities::END_DATE, end_date.trim())
            .with(activities::PROGRESS, 0i64)
            .with(activities::EVIDENCE_LINK, Cell::Empty)
            .with(activities::OWNER_COMMENT, Cell::Empty)
            .with(activities::ADMIN_COMMENT, Cell::Empty)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Kpi {
    pub name: String,
    pub target: f64,
    pub actual: f64,
    pub direction: Direction,
    pub owner: String,
    pub owner_comment: String,
    pub admin_comment: String,
}

impl Kpi {
    pub fn from_row(row: &Row) -> Self {
        Self {
            name: row.get(kpis::KPI_NAME).trimmed_text(),
            target: safe_float(row.get(kpis::TARGET)),
            actual: safe_float(row.get(kpis::ACTUAL)),
            direction: Direction::parse(&row.text(kpis::DIRECTION)),
            owner: row.get(kpis::OWNER).trimmed_text(),
            owner_comment: row.text(kpis::OWNER_COMMENT),
            admin_comment: row.text(kpis::ADMIN_COMMENT),
        }
    }

    pub fn key(&self) -> NaturalKey {
        NaturalKey::new([&self.name])
    }
}
