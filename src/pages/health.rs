use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, HealthReport};
use crate::components::status_badge::{CheckStatus, StatusBadge};

#[component]
pub fn HealthPage() -> impl IntoView {
    let (checking, set_checking) = signal(false);
    let (report, set_report) = signal::<Option<HealthReport>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    let do_health_check = move || {
        set_checking.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::run_health_check().await {
                Ok(r) => set_report.set(Some(r)),
                Err(e) => set_error.set(Some(format!("Health check failed: {}", e))),
            }
            set_checking.set(false);
        });
    };

    Effect::new(move |_| do_health_check());

    view! {
        <div class="page health-page">
            <h2>"Health Check"</h2>
            <p class="page-description">"Verify that PromptDeck can reach the platform API."</p>

            <button
                class="btn btn-primary"
                on:click=move |_| do_health_check()
                disabled=move || checking.get()
            >
                {move || if checking.get() { "Checking..." } else { "Run Health Check" }}
            </button>

            {move || error.get().map(|e| view! {
                <div class="health-error">
                    <span class="status-text status-error">{e}</span>
                </div>
            })}

            {move || report.get().map(|r| {
                let passed = [r.api_reachable, r.api_key_set].iter().filter(|&&v| v).count();
                let api_detail = r.error.clone().unwrap_or_else(|| r.api_base_url.clone());
                let (apps_status, apps_detail) = match r.app_count {
                    Some(count) => (CheckStatus::Pass, format!("{} visible", count)),
                    None => (CheckStatus::Unknown, "Not checked".to_string()),
                };
                let key_detail = if r.api_key_set { "Configured" } else { "Not configured" };
                let summary_class = match passed {
                    2 => "summary-all-pass",
                    0 => "summary-all-fail",
                    _ => "summary-partial",
                };

                view! {
                    <div class="health-results">
                        <StatusBadge label="Platform API" status=CheckStatus::from(r.api_reachable) detail=api_detail />
                        <StatusBadge label="Apps" status=apps_status detail=apps_detail />
                        <StatusBadge label="API Key" status=CheckStatus::from(r.api_key_set) detail=key_detail />
                        <div class={format!("health-summary {}", summary_class)}>
                            {format!("{} of 2 checks passed", passed)}
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
