use leptos::prelude::*;

use crate::profile::{use_profile, Role};

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"PromptDeck"</h1>
                <p class="sidebar-subtitle">"Prompt Variant Playground"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">"Apps"</a>
                </li>
                <li class="nav-item">
                    <a href="/settings" class="nav-link">"Settings"</a>
                </li>
                <li class="nav-item">
                    <a href="/health" class="nav-link">"Health Check"</a>
                </li>
            </ul>
            <OrgSwitcher />
        </nav>
    }
}

/// Signed-in user and the organization selector.
#[component]
fn OrgSwitcher() -> impl IntoView {
    let profile = use_profile();
    let state = profile.state();

    view! {
        <div class="sidebar-footer">
            {move || state.with(|s| {
                if s.loading {
                    return view! { <p class="sidebar-subtitle">"Loading profile..."</p> }.into_any();
                }
                let Some(user) = s.user.clone() else {
                    return view! { <p class="sidebar-subtitle">"Not signed in"</p> }.into_any();
                };
                let role = match s.role() {
                    Some(Role::Owner) => "Owner",
                    Some(Role::Member) => "Member",
                    None => "",
                };
                let selected_id = s.selected_org.as_ref().map(|o| o.id.clone()).unwrap_or_default();
                let options = s
                    .orgs
                    .iter()
                    .map(|o| {
                        view! {
                            <option value=o.id.clone() selected=o.id == selected_id>
                                {o.name.clone()}
                            </option>
                        }
                    })
                    .collect_view();
                view! {
                    <div class="org-switcher">
                        <span class="sidebar-user">{user.username}</span>
                        <span class="sidebar-role">{role}</span>
                        <select
                            class="input org-select"
                            on:change=move |ev| profile.change_selected_org(&event_target_value(&ev))
                        >
                            {options}
                        </select>
                    </div>
                }
                .into_any()
            })}
        </div>
    }
}
