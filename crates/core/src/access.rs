#![forbid(unsafe_code)]

//! Role-based gating of user actions and row visibility.

use crate::locate::FieldUpdates;
use crate::records::{Activity, Kpi, Role, User, split_initiatives};
use crate::schema::{activities, kpis};

/// Identity of the caller for a single request. Built fresh per request from the
/// user record; never stored between actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub assigned_initiatives: Vec<String>,
}

impl RequestContext {
    pub fn new(username: &str, name: &str, role: Role, assigned_initiative: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            name: name.trim().to_string(),
            role,
            assigned_initiatives: split_initiatives(assigned_initiative),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            assigned_initiatives: user.assigned_initiatives(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ListActivities,
    UpdateActivity,
    AddActivity,
    CommentActivities,
    ListKpis,
    SetKpiTarget,
    UpdateKpiActual,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListActivities => "activities.list",
            Self::UpdateActivity => "activities.update",
            Self::AddActivity => "activities.add",
            Self::CommentActivities => "activities.comment",
            Self::ListKpis => "kpis.list",
            Self::SetKpiTarget => "kpis.set_target",
            Self::UpdateKpiActual => "kpis.update_actual",
        }
    }

    pub fn all() -> &'static [Action] {
        &[
            Self::ListActivities,
            Self::UpdateActivity,
            Self::AddActivity,
            Self::CommentActivities,
            Self::ListKpis,
            Self::SetKpiTarget,
            Self::UpdateKpiActual,
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The user record carries a role this system does not know. A configuration
    /// problem, reported distinctly from a plain denial.
    UnknownRole(String),
    Forbidden { role: String, action: Action },
}

impl AccessError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => "unknown role",
            Self::Forbidden { .. } => "action not permitted for role",
        }
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRole(role) => write!(f, "unknown role '{role}'"),
            Self::Forbidden { role, action } => {
                write!(f, "role {role} may not perform {}", action.as_str())
            }
        }
    }
}

impl std::error::Error for AccessError {}

pub fn authorize(ctx: &RequestContext, action: Action) -> Result<(), AccessError> {
    let allowed = match &ctx.role {
        Role::Unknown(raw) => return Err(AccessError::UnknownRole(raw.clone())),
        Role::Admin => matches!(
            action,
            Action::ListActivities
                | Action::CommentActivities
                | Action::ListKpis
                | Action::SetKpiTarget
        ),
        Role::Owner => matches!(
            action,
            Action::ListActivities
                | Action::UpdateActivity
                | Action::AddActivity
                | Action::ListKpis
                | Action::UpdateKpiActual
        ),
        Role::Viewer => matches!(action, Action::ListActivities | Action::ListKpis),
    };
    if allowed {
        Ok(())
    } else {
        Err(AccessError::Forbidden {
            role: ctx.role.as_str().to_string(),
            action,
        })
    }
}

pub fn can_see_initiative(ctx: &RequestContext, mabadara: &str) -> bool {
    match ctx.role {
        Role::Admin | Role::Viewer => true,
        Role::Owner => ctx
            .assigned_initiatives
            .iter()
            .any(|assigned| assigned == mabadara.trim()),
        Role::Unknown(_) => false,
    }
}

pub fn can_see_activity(ctx: &RequestContext, activity: &Activity) -> bool {
    can_see_initiative(ctx, &activity.mabadara)
}

pub fn can_see_kpi(ctx: &RequestContext, kpi: &Kpi) -> bool {
    match ctx.role {
        Role::Admin | Role::Viewer => true,
        Role::Owner => kpi.owner == ctx.username,
        Role::Unknown(_) => false,
    }
}

/// Activity columns the role may change. Comment columns are append-only.
pub fn activity_write_fields(role: &Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[activities::ADMIN_COMMENT],
        Role::Owner => &[
            activities::PROGRESS,
            activities::START_DATE,
            activities::END_DATE,
            activities::EVIDENCE_LINK,
            activities::OWNER_COMMENT,
        ],
        Role::Viewer | Role::Unknown(_) => &[],
    }
}

/// KPI columns the role may change. Comment columns are append-only.
pub fn kpi_write_fields(role: &Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[kpis::TARGET, kpis::ADMIN_COMMENT],
        Role::Owner => &[kpis::ACTUAL, kpis::OWNER_COMMENT],
        Role::Viewer | Role::Unknown(_) => &[],
    }
}

/// Rejects `updates` if it touches a column outside `allowed`.
pub fn authorize_fields(
    ctx: &RequestContext,
    action: Action,
    updates: &FieldUpdates,
    allowed: &[&str],
) -> Result<(), AccessError> {
    if updates.columns().all(|column| allowed.iter().any(|a| *a == column)) {
        Ok(())
    } else {
        Err(AccessError::Forbidden {
            role: ctx.role.as_str().to_string(),
            action,
        })
    }
}
