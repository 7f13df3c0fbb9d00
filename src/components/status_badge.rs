use leptos::prelude::*;

/// Outcome of a single health check row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Unknown,
}

impl From<bool> for CheckStatus {
    fn from(passed: bool) -> Self {
        if passed {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }
}

impl CheckStatus {
    fn icon_and_class(self) -> (&'static str, &'static str) {
        match self {
            CheckStatus::Pass => ("\u{2713}", "status-badge status-pass"),
            CheckStatus::Fail => ("\u{2717}", "status-badge status-fail"),
            CheckStatus::Unknown => ("?", "status-badge status-unknown"),
        }
    }
}

#[component]
pub fn StatusBadge(
    #[prop(into)] label: String,
    status: CheckStatus,
    /// Extra context, e.g. the URL that was probed.
    #[prop(optional, into)]
    detail: Option<String>,
) -> impl IntoView {
    let (icon, class) = status.icon_and_class();

    view! {
        <div class="health-item">
            <span class=class>{icon}</span>
            <span class="health-name">{label}</span>
            <span class="health-detail">{detail.unwrap_or_default()}</span>
        </div>
    }
}
