//! Signed-in user, organizations and the selected organization.
//!
//! [`ProfileStore`] owns this state and is the only thing that writes it.
//! Components get it from context and read through its signal.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen_futures::spawn_local;

use crate::commands;

const SELECTED_ORG_KEY: &str = "selected_org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Org {
    pub id: String,
    pub name: String,
    pub owner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Member,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    pub user: Option<User>,
    pub orgs: Vec<Org>,
    pub selected_org: Option<Org>,
    pub loading: bool,
}

impl ProfileState {
    /// Unknown while loading; owner when the selected org belongs to the user.
    pub fn role(&self) -> Option<Role> {
        if self.loading {
            return None;
        }
        let owner = self.selected_org.as_ref().map(|o| o.owner.as_str());
        let user = self.user.as_ref().map(|u| u.id.as_str());
        Some(if owner == user { Role::Owner } else { Role::Member })
    }

    /// Select `org_id`; unknown ids keep the current selection.
    pub fn with_selected_org(&self, org_id: &str) -> Self {
        let selected_org = self
            .orgs
            .iter()
            .find(|o| o.id == org_id)
            .cloned()
            .or_else(|| self.selected_org.clone());
        Self {
            selected_org,
            ..self.clone()
        }
    }
}

/// Saved selection first, then the org the user owns, then the first org.
pub fn pick_selected_org(orgs: &[Org], saved_org_id: Option<&str>, user_id: &str) -> Option<Org> {
    saved_org_id
        .and_then(|id| orgs.iter().find(|o| o.id == id))
        .or_else(|| orgs.iter().find(|o| o.owner == user_id))
        .or_else(|| orgs.first())
        .cloned()
}

#[derive(Clone, Copy)]
pub struct ProfileStore {
    state: RwSignal<ProfileState>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(ProfileState::default()),
        }
    }

    pub fn state(&self) -> Signal<ProfileState> {
        self.state.into()
    }

    /// Load the user and their orgs, then restore the saved selection.
    pub fn refetch(&self) {
        let state = self.state;
        state.update(|s| s.loading = true);
        spawn_local(async move {
            let loaded = async {
                let user = commands::get_profile().await?;
                let orgs = commands::list_orgs().await?;
                let saved = commands::get_preference(SELECTED_ORG_KEY).await.ok().flatten();
                Ok::<_, String>((user, orgs, saved))
            }
            .await;

            match loaded {
                Ok((user, orgs, saved)) => {
                    let selected_org = pick_selected_org(&orgs, saved.as_deref(), &user.id);
                    state.set(ProfileState {
                        user: Some(user),
                        orgs,
                        selected_org,
                        loading: false,
                    });
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to load profile: {}", e).into());
                    state.update(|s| s.loading = false);
                }
            }
        });
    }

    pub fn change_selected_org(&self, org_id: &str) {
        let next = self.state.with_untracked(|s| s.with_selected_org(org_id));
        let saved_id = next.selected_org.as_ref().map(|o| o.id.clone()).unwrap_or_default();
        self.state.set(next);
        spawn_local(async move {
            if let Err(e) = commands::set_preference(SELECTED_ORG_KEY, &saved_id).await {
                web_sys::console::error_1(&format!("Failed to save selected org: {}", e).into());
            }
        });
    }

    pub fn reset(&self) {
        self.state.set(ProfileState::default());
    }
}

pub fn provide_profile_store() -> ProfileStore {
    let store = ProfileStore::new();
    provide_context(store);
    store
}

pub fn use_profile() -> ProfileStore {
    expect_context::<ProfileStore>()
}
