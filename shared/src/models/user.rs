//! Operator roles and the permissions they grant

use serde::{Deserialize, Serialize};

/// Role of an operator within a workspace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    ProcessingWorker,
    PackingStaff,
    FinanceClerk,
    Admin,
}

/// Resources that can be accessed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Receiving,
    Processing,
    Packing,
    Inventory,
    Procurement,
    Sales,
    Ledger,
    Report,
    Settings,
    Sync,
}

/// Actions that can be performed on resources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl UserRole {
    /// Whether this role may perform `action` on `resource`
    pub fn can(self, resource: Resource, action: Action) -> bool {
        use Resource::*;
        match self {
            UserRole::Admin => true,
            UserRole::ProcessingWorker => match resource {
                Receiving | Processing => true,
                Inventory | Report => action == Action::View,
                _ => false,
            },
            UserRole::PackingStaff => match resource {
                Packing | Inventory => action != Action::Delete,
                Processing | Report => action == Action::View,
                _ => false,
            },
            UserRole::FinanceClerk => match resource {
                Procurement | Sales | Ledger | Report => true,
                Inventory => action != Action::Delete,
                Receiving | Processing | Packing => action == Action::View,
                Settings | Sync => false,
            },
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::ProcessingWorker => write!(f, "Processing Worker"),
            UserRole::PackingStaff => write!(f, "Packing Staff"),
            UserRole::FinanceClerk => write!(f, "Finance Clerk"),
            UserRole::Admin => write!(f, "Admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_do_everything() {
        assert!(UserRole::Admin.can(Resource::Sync, Action::Create));
        assert!(UserRole::Admin.can(Resource::Settings, Action::Edit));
    }

    #[test]
    fn test_role_boundaries() {
        assert!(UserRole::ProcessingWorker.can(Resource::Receiving, Action::Create));
        assert!(!UserRole::ProcessingWorker.can(Resource::Sales, Action::View));
        assert!(UserRole::PackingStaff.can(Resource::Packing, Action::Create));
        assert!(!UserRole::PackingStaff.can(Resource::Ledger, Action::View));
        assert!(UserRole::FinanceClerk.can(Resource::Ledger, Action::Edit));
        assert!(!UserRole::FinanceClerk.can(Resource::Settings, Action::Edit));
    }
}
