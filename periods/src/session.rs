use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sheet::Status;

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Agency,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Role::Employee => "EMPLOYEE",
            Role::Manager => "MANAGER",
            Role::Agency => "AGENCY",
            Role::Admin => "ADMIN",
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Edit,
    Submit,
    Review,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::Edit => "edit",
            Action::Submit => "submit",
            Action::Review => "review",
        })
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum SessionError {
    #[error("{role} {user:?} may not {action} a timesheet that is {status}")]
    Forbidden {
        user: String,
        role: Role,
        action: Action,
        status: Status,
    },
}

/// Who is working on a timesheet. Passed explicitly to whatever needs to
/// make a permission decision.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionContext {
    pub user: String,
    pub role: Role,
}

impl SessionContext {
    #[must_use]
    pub fn new(user: impl Into<String>, role: Role) -> Self {
        Self {
            user: user.into(),
            role,
        }
    }

    #[must_use]
    pub fn can(&self, action: Action, status: Status) -> bool {
        let open = matches!(status, Status::Draft | Status::Rejected);
        match action {
            Action::Edit | Action::Submit => open && self.role != Role::Agency,
            Action::Review => {
                status == Status::PendingApproval && self.role != Role::Employee
            }
        }
    }

    pub fn require(&self, action: Action, status: Status) -> Result<(), SessionError> {
        if self.can(action, status) {
            Ok(())
        } else {
            Err(SessionError::Forbidden {
                user: self.user.clone(),
                role: self.role,
                action,
                status,
            })
        }
    }
}
