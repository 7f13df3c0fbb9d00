use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::sidebar::Sidebar;
use crate::pages::evaluators::EvaluatorsPage;
use crate::pages::health::HealthPage;
use crate::pages::home::HomePage;
use crate::pages::overview::OverviewPage;
use crate::pages::playground::PlaygroundPage;
use crate::pages::settings::SettingsPage;
use crate::pages::testsets::TestsetsPage;
use crate::profile::provide_profile_store;
use crate::theme::{apply_theme, Theme, ThemeContext, THEME_KEY};

#[component]
pub fn App() -> impl IntoView {
    let (theme, set_theme) = signal(Theme::System);
    provide_context(ThemeContext { theme, set_theme });

    let profile = provide_profile_store();

    // Restore the saved theme and load the signed-in user on mount
    Effect::new(move |_| {
        spawn_local(async move {
            if let Ok(Some(saved)) = commands::get_preference(THEME_KEY).await {
                set_theme.set(Theme::parse(&saved));
            }
        });
        profile.refetch();
    });

    Effect::new(move |_| {
        apply_theme(theme.get());
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/apps/:app_id/playground") view=PlaygroundPage />
                        <Route path=path!("/apps/:app_id/overview") view=OverviewPage />
                        <Route path=path!("/apps/:app_id/evaluators") view=EvaluatorsPage />
                        <Route path=path!("/apps/:app_id/testsets") view=TestsetsPage />
                        <Route path=path!("/settings") view=SettingsPage />
                        <Route path=path!("/health") view=HealthPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
