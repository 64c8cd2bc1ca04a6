//! In-memory collaborators for application-layer tests.

use async_trait::async_trait;
use staffdesk_core::directory::{Branch, Department, DirectoryService, Employee};
use staffdesk_core::error::{Result, StaffdeskError};
use staffdesk_core::identity::{Identity, IdentityProvider, RoleSet};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn identity(id: &str, roles: &[&str]) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        roles: RoleSet::new(roles.iter().copied()),
        profile: None,
    }
}

pub fn employee(id: &str, first: &str, last: &str) -> Employee {
    Employee {
        id: id.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        name: None,
        email: None,
        position: None,
        department: None,
    }
}

pub fn department(id: &str, name: &str) -> Department {
    Department {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
    }
}

pub fn branch(id: &str, name: &str) -> Branch {
    Branch {
        id: id.to_string(),
        name: name.to_string(),
        address: None,
        city: None,
    }
}

/// Identity provider with scripted answers per token.
///
/// Unknown tokens are rejected as unauthorized.
#[derive(Default)]
pub struct MockIdentityProvider {
    identities: Mutex<HashMap<String, Identity>>,
    delays: Mutex<HashMap<String, Duration>>,
    credentials: Mutex<HashMap<(String, String), String>>,
    verify_calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(self, token: &str, identity: Identity) -> Self {
        self.identities.lock().unwrap().insert(token.to_string(), identity);
        self
    }

    pub fn delay(self, token: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(token.to_string(), delay);
        self
    }

    pub fn credentials(self, email: &str, password: &str, token: &str) -> Self {
        self.credentials
            .lock()
            .unwrap()
            .insert((email.to_string(), password.to_string()), token.to_string());
        self
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Identity> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().get(token).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.identities
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| StaffdeskError::unauthorized(format!("token {token} rejected")))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        self.credentials
            .lock()
            .unwrap()
            .get(&(email.to_string(), password.to_string()))
            .cloned()
            .ok_or_else(|| StaffdeskError::unauthorized("invalid credentials"))
    }
}

/// Directory with canned collections, per-query latency and failure switches.
#[derive(Default)]
pub struct MockDirectory {
    employees: Mutex<HashMap<String, Vec<Employee>>>,
    employee_delays: Mutex<HashMap<String, Duration>>,
    departments: Vec<Department>,
    branches: Vec<Branch>,
    fail_employees: bool,
    fail_departments: bool,
    fail_branches: bool,
    calls: Mutex<Vec<String>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employees(self, query: &str, employees: Vec<Employee>) -> Self {
        self.employees.lock().unwrap().insert(query.to_string(), employees);
        self
    }

    pub fn employee_delay(self, query: &str, delay: Duration) -> Self {
        self.employee_delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
        self
    }

    pub fn departments(mut self, departments: Vec<Department>) -> Self {
        self.departments = departments;
        self
    }

    pub fn branches(mut self, branches: Vec<Branch>) -> Self {
        self.branches = branches;
        self
    }

    pub fn failing_employees(mut self) -> Self {
        self.fail_employees = true;
        self
    }

    pub fn failing_departments(mut self) -> Self {
        self.fail_departments = true;
        self
    }

    pub fn failing_branches(mut self) -> Self {
        self.fail_branches = true;
        self
    }

    /// Every call made so far, e.g. `employees:jo:5`, `departments`, `branches`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DirectoryService for MockDirectory {
    async fn search_employees(&self, _token: &str, query: &str, limit: usize) -> Result<Vec<Employee>> {
        self.record(format!("employees:{query}:{limit}"));
        let delay = self.employee_delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_employees {
            return Err(StaffdeskError::Network("employees unavailable".to_string()));
        }
        Ok(self
            .employees
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_departments(&self, _token: &str) -> Result<Vec<Department>> {
        self.record("departments".to_string());
        if self.fail_departments {
            return Err(StaffdeskError::from_status(500, "departments exploded"));
        }
        Ok(self.departments.clone())
    }

    async fn list_branches(&self, _token: &str) -> Result<Vec<Branch>> {
        self.record("branches".to_string());
        if self.fail_branches {
            return Err(StaffdeskError::Network("branches unavailable".to_string()));
        }
        Ok(self.branches.clone())
    }
}
