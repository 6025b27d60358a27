#![forbid(unsafe_code)]

/// Expected layout of one table: its name, columns in persisted order, and natural key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub key: &'static [&'static str],
}

pub mod users {
    pub const TABLE: &str = "Users";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const NAME: &str = "name";
    pub const ROLE: &str = "role";
    pub const ASSIGNED_INITIATIVE: &str = "assigned_initiative";
}

pub mod activities {
    pub const TABLE: &str = "Activities";
    pub const MABADARA: &str = "Mabadara";
    pub const ACTIVITY: &str = "Activity";
    pub const START_DATE: &str = "Start_Date";
    pub const END_DATE: &str = "End_Date";
    pub const PROGRESS: &str = "Progress";
    pub const EVIDENCE_LINK: &str = "Evidence_Link";
    pub const OWNER_COMMENT: &str = "Owner_Comment";
    pub const ADMIN_COMMENT: &str = "Admin_Comment";
}

pub mod kpis {
    pub const TABLE: &str = "KPIs";
    pub const KPI_NAME: &str = "KPI_Name";
    pub const TARGET: &str = "Target";
    pub const ACTUAL: &str = "Actual";
    pub const DIRECTION: &str = "Direction";
    pub const OWNER: &str = "Owner";
    pub const OWNER_COMMENT: &str = "Owner_Comment";
    pub const ADMIN_COMMENT: &str = "Admin_Comment";
}

pub const USERS: TableSchema = TableSchema {
    name: users::TABLE,
    columns: &[
        users::USERNAME,
        users::PASSWORD,
        users::NAME,
        users::ROLE,
        users::ASSIGNED_INITIATIVE,
    ],
    key: &[users::USERNAME],
};

pub const ACTIVITIES: TableSchema = TableSchema {
    name: activities::TABLE,
    columns: &[
        activities::MABADARA,
        activities::ACTIVITY,
        activities::START_DATE,
        activities::END_DATE,
        activities::PROGRESS,
        activities::EVIDENCE_LINK,
        activities::OWNER_COMMENT,
        activities::ADMIN_COMMENT,
    ],
    key: &[activities::MABADARA, activities::ACTIVITY],
};

pub const KPIS: TableSchema = TableSchema {
    name: kpis::TABLE,
    columns: &[
        kpis::KPI_NAME,
        kpis::TARGET,
        kpis::ACTUAL,
        kpis::DIRECTION,
        kpis::OWNER,
        kpis::OWNER_COMMENT,
        kpis::ADMIN_COMMENT,
    ],
    key: &[kpis::KPI_NAME],
};
