use leptos::prelude::*;

/// Confirmation shown before a variant is removed.
#[component]
pub fn RemovalWarningModal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] message: String,
    /// Disables both buttons while a remote delete is pending.
    #[prop(optional, into)]
    loading: Signal<bool>,
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="modal-overlay" on:click=move |_| {
                if !loading.get_untracked() {
                    on_cancel.run(());
                }
            }>
                <div class="modal-content modal-warning" on:click=|ev| ev.stop_propagation()>
                    <h3>"Remove variant"</h3>
                    <p>{message.clone()}</p>
                    <div class="modal-actions">
                        <button
                            class="btn"
                            disabled=move || loading.get()
                            on:click=move |_| on_cancel.run(())
                        >
                            "Cancel"
                        </button>
                        <button
                            class="btn btn-delete"
                            disabled=move || loading.get()
                            on:click=move |_| on_confirm.run(())
                        >
                            {move || if loading.get() { "Removing..." } else { "Remove" }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
