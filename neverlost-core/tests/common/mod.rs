//! In-memory layout service shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use neverlost_core::descriptor::ObjectDescriptor;
use neverlost_core::error::GatewayError;
use neverlost_core::gateway::{AuthResponse, LayoutGateway};
use neverlost_core::layout::{Layout, LayoutId, LayoutSummary, NewLayout};
use neverlost_core::session::UserRecord;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const TOKEN: &str = "test-token";

#[derive(Default)]
struct State {
    layouts: BTreeMap<String, Layout>,
    users: BTreeMap<String, (UserRecord, String)>,
    next_id: u64,
    fail_saves: bool,
    save_count: usize,
}

/// Behaves like the REST service: bearer token required for layouts,
/// `{error}` texts for validation failures
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with a server error
    pub fn fail_saves(&self, fail: bool) {
        self.state.lock().unwrap().fail_saves = fail;
    }

    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap().save_count
    }

    pub fn stored_objects(&self, id: &LayoutId) -> Option<Vec<ObjectDescriptor>> {
        self.state
            .lock()
            .unwrap()
            .layouts
            .get(id.as_str())
            .map(|layout| layout.objects.clone())
    }

    fn authorize(token: Option<&str>) -> Result<(), GatewayError> {
        match token {
            Some(TOKEN) => Ok(()),
            _ => Err(GatewayError::Unauthorized),
        }
    }
}

#[async_trait]
impl LayoutGateway for InMemoryGateway {
    async fn load_layout(&self, id: &LayoutId, token: Option<&str>) -> Result<Layout, GatewayError> {
        Self::authorize(token)?;
        self.state
            .lock()
            .unwrap()
            .layouts
            .get(id.as_str())
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn save_layout(
        &self,
        id: &LayoutId,
        objects: &[ObjectDescriptor],
        token: Option<&str>,
    ) -> Result<(), GatewayError> {
        Self::authorize(token)?;
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(GatewayError::Server {
                status: 500,
                message: String::new(),
            });
        }
        let layout = state.layouts.get_mut(id.as_str()).ok_or(GatewayError::NotFound)?;
        layout.objects = objects.to_vec();
        state.save_count += 1;
        Ok(())
    }

    async fn create_layout(&self, layout: &NewLayout, token: Option<&str>) -> Result<LayoutId, GatewayError> {
        Self::authorize(token)?;
        if layout.name.trim().is_empty() {
            return Err(GatewayError::Validation("Layout name is required".into()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = LayoutId::new(format!("layout-{}", state.next_id));
        state.layouts.insert(
            id.as_str().to_string(),
            Layout {
                id: Some(id.clone()),
                name: layout.name.clone(),
                description: layout.description.clone(),
                objects: layout.objects.clone(),
            },
        );
        Ok(id)
    }

    async fn list_layouts(&self, token: Option<&str>) -> Result<Vec<LayoutSummary>, GatewayError> {
        Self::authorize(token)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .layouts
            .iter()
            .map(|(id, layout)| LayoutSummary {
                id: LayoutId::from(id.as_str()),
                name: layout.name.clone(),
                description: layout.description.clone(),
            })
            .collect())
    }

    async fn delete_layout(&self, id: &LayoutId, token: Option<&str>) -> Result<(), GatewayError> {
        Self::authorize(token)?;
        self.state
            .lock()
            .unwrap()
            .layouts
            .remove(id.as_str())
            .map(|_| ())
            .ok_or(GatewayError::NotFound)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, GatewayError> {
        let state = self.state.lock().unwrap();
        match state.users.get(email) {
            Some((user, stored)) if stored == password => Ok(AuthResponse {
                user: user.clone(),
                token: TOKEN.to_string(),
            }),
            _ => Err(GatewayError::Validation("Invalid email or password".into())),
        }
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.users.contains_key(email) {
            return Err(GatewayError::Validation("User already exists".into()));
        }
        let user = UserRecord {
            id: Some(format!("user-{}", state.users.len() + 1)),
            username: username.to_string(),
            email: email.to_string(),
            ..Default::default()
        };
        state.users.insert(email.to_string(), (user.clone(), password.to_string()));
        Ok(AuthResponse {
            user,
            token: TOKEN.to_string(),
        })
    }
}
