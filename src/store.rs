use crate::data::{AccessScope, ConstraintRule, FacultyId, User};
use crate::error::{AppError, AppResult};
use crate::rules::{self, RuleViolationKind};
use itertools::Itertools;
use log::{debug, info};
use std::iter;
use std::sync::{Mutex, MutexGuard};

/// Role that makes a user eligible as a substitute.
pub const FACULTY_ROLE: &str = "FACULTY";

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    scopes: Vec<AccessScope>,
    constraints: Vec<ConstraintRule>,
}

/// Process-local users, access scopes and constraint rules.
///
/// One mutex guards all three tables; every create runs its check and insert
/// under a single acquisition.
#[derive(Debug, Default)]
pub struct Store {
    tables: Mutex<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    /// Emails are unique across all tenants.
    pub fn create_user(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email already exists"));
        }
        info!("Created user {} for tenant {}.", user.user_id, user.tenant_id);
        tables.users.push(user.clone());
        Ok(user)
    }

    pub fn list_users(&self, tenant_id: Option<&str>) -> AppResult<Vec<User>> {
        let tables = self.tables()?;
        Ok(tables
            .users
            .iter()
            .filter(|u| tenant_id.is_none_or(|t| u.tenant_id == t))
            .cloned()
            .collect())
    }

    /// Re-assigning the same (tenant, user, role, scope) replaces its permissions.
    pub fn assign_scope(&self, scope: AccessScope) -> AppResult<AccessScope> {
        let mut tables = self.tables()?;
        let existing = tables.scopes.iter().position(|s| {
            s.tenant_id == scope.tenant_id
                && s.user_id == scope.user_id
                && s.role_id == scope.role_id
                && s.scope_type == scope.scope_type
                && s.scope_id == scope.scope_id
        });
        match existing {
            Some(i) => {
                debug!(
                    "Updated scope {:?}/{} for user {}.",
                    scope.scope_type, scope.scope_id, scope.user_id
                );
                tables.scopes[i] = scope.clone();
            }
            None => {
                info!(
                    "Assigned scope {:?}/{} to user {} in tenant {}.",
                    scope.scope_type, scope.scope_id, scope.user_id, scope.tenant_id
                );
                tables.scopes.push(scope.clone());
            }
        }
        Ok(scope)
    }

    pub fn list_scopes(&self, tenant_id: Option<&str>) -> AppResult<Vec<AccessScope>> {
        let tables = self.tables()?;
        Ok(tables
            .scopes
            .iter()
            .filter(|s| tenant_id.is_none_or(|t| s.tenant_id == t))
            .cloned()
            .collect())
    }

    /// Validates the candidate against the stored rules and commits it only
    /// when no violation is found. A duplicate name is a conflict; any other
    /// violation is a validation error.
    pub fn create_constraint(&self, rule: ConstraintRule) -> AppResult<ConstraintRule> {
        rules::check_weight(&rule).map_err(AppError::Validation)?;

        let mut tables = self.tables()?;
        let candidates = tables.constraints.iter().chain(iter::once(&rule));
        let violations = rules::validate_constraints(candidates);
        if !violations.is_empty() {
            let message = violations.iter().map(|v| v.message.as_str()).join("; ");
            return Err(if violations.iter().any(|v| v.kind == RuleViolationKind::DuplicateName) {
                AppError::Conflict(message)
            } else {
                AppError::Validation(message)
            });
        }
        info!("Created constraint '{}' for tenant {}.", rule.name, rule.tenant_id);
        tables.constraints.push(rule.clone());
        Ok(rule)
    }

    pub fn list_constraints(&self, tenant_id: Option<&str>) -> AppResult<Vec<ConstraintRule>> {
        let tables = self.tables()?;
        Ok(tables
            .constraints
            .iter()
            .filter(|r| tenant_id.is_none_or(|t| r.tenant_id == t))
            .cloned()
            .collect())
    }

    /// User ids of the tenant's faculty, in registration order.
    pub fn faculty_pool(&self, tenant_id: &str) -> AppResult<Vec<FacultyId>> {
        let tables = self.tables()?;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.tenant_id == tenant_id && u.role.eq_ignore_ascii_case(FACULTY_ROLE))
            .map(|u| u.user_id.clone())
            .collect())
    }
}
