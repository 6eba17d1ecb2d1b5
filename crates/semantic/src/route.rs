use crate::error::{Result, RouterError};
use std::fmt;
use std::str::FromStr;

/// Top-level operation family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Vault,
    Edit,
    View,
    Workflow,
    System,
}

impl Operation {
    pub const ALL: [Self; 5] = [
        Self::Vault,
        Self::Edit,
        Self::View,
        Self::Workflow,
        Self::System,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::Edit => "edit",
            Self::View => "view",
            Self::Workflow => "workflow",
            Self::System => "system",
        }
    }
}

impl FromStr for Operation {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RouterError::validation(format!("Unknown operation: {s}")))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every `(operation, action)` pair the router can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    VaultList,
    VaultRead,
    VaultFragments,
    VaultCreate,
    VaultUpdate,
    VaultDelete,
    VaultSearch,
    EditWindow,
    EditAppend,
    EditPatch,
    EditAtLine,
    EditFromBuffer,
    ViewFile,
    ViewWindow,
    ViewActive,
    ViewOpenInObsidian,
    WorkflowSuggest,
    SystemInfo,
    SystemCommands,
}

impl Route {
    pub const ALL: [Self; 19] = [
        Self::VaultList,
        Self::VaultRead,
        Self::VaultFragments,
        Self::VaultCreate,
        Self::VaultUpdate,
        Self::VaultDelete,
        Self::VaultSearch,
        Self::EditWindow,
        Self::EditAppend,
        Self::EditPatch,
        Self::EditAtLine,
        Self::EditFromBuffer,
        Self::ViewFile,
        Self::ViewWindow,
        Self::ViewActive,
        Self::ViewOpenInObsidian,
        Self::WorkflowSuggest,
        Self::SystemInfo,
        Self::SystemCommands,
    ];

    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::VaultList
            | Self::VaultRead
            | Self::VaultFragments
            | Self::VaultCreate
            | Self::VaultUpdate
            | Self::VaultDelete
            | Self::VaultSearch => Operation::Vault,
            Self::EditWindow
            | Self::EditAppend
            | Self::EditPatch
            | Self::EditAtLine
            | Self::EditFromBuffer => Operation::Edit,
            Self::ViewFile | Self::ViewWindow | Self::ViewActive | Self::ViewOpenInObsidian => {
                Operation::View
            }
            Self::WorkflowSuggest => Operation::Workflow,
            Self::SystemInfo | Self::SystemCommands => Operation::System,
        }
    }

    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::VaultList => "list",
            Self::VaultRead => "read",
            Self::VaultFragments => "fragments",
            Self::VaultCreate => "create",
            Self::VaultUpdate => "update",
            Self::VaultDelete => "delete",
            Self::VaultSearch => "search",
            Self::EditWindow => "window",
            Self::EditAppend => "append",
            Self::EditPatch => "patch",
            Self::EditAtLine => "at_line",
            Self::EditFromBuffer => "from_buffer",
            Self::ViewFile => "file",
            Self::ViewWindow => "window",
            Self::ViewActive => "active",
            Self::ViewOpenInObsidian => "open_in_obsidian",
            Self::WorkflowSuggest => "suggest",
            Self::SystemInfo => "info",
            Self::SystemCommands => "commands",
        }
    }

    /// Resolve a request's strings into a route
    pub fn resolve(operation: &str, action: &str) -> Result<Self> {
        let operation: Operation = operation.parse()?;
        Self::ALL
            .into_iter()
            .find(|route| route.operation() == operation && route.action() == action)
            .ok_or_else(|| {
                RouterError::validation(format!("Unknown {operation} action: {action}"))
            })
    }

    /// Whether an edit may leave content in the session buffer on failure
    #[must_use]
    pub const fn is_edit(self) -> bool {
        matches!(self.operation(), Operation::Edit)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.operation(), self.action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_route_resolves_to_itself() {
        for route in Route::ALL {
            let resolved = Route::resolve(route.operation().as_str(), route.action()).unwrap();
            assert_eq!(resolved, route);
        }
        let unique: HashSet<_> = Route::ALL
            .iter()
            .map(|r| (r.operation(), r.action()))
            .collect();
        assert_eq!(unique.len(), Route::ALL.len());
    }

    #[test]
    fn unknown_pairs_are_validation_errors() {
        let err = Route::resolve("vault", "explode").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "Unknown vault action: explode");

        let err = Route::resolve("teleport", "read").unwrap_err();
        assert_eq!(err.to_string(), "Unknown operation: teleport");
    }

    #[test]
    fn window_exists_under_edit_and_view() {
        assert_eq!(Route::resolve("edit", "window").unwrap(), Route::EditWindow);
        assert_eq!(Route::resolve("view", "window").unwrap(), Route::ViewWindow);
        assert!(Route::EditWindow.is_edit());
        assert_eq!(Route::ViewWindow.to_string(), "view.window");
    }
}
