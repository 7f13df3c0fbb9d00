use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::pages::use_app_id;
use crate::testsets::{TestsetDraft, TestsetSummary};

/// Saved test sets of the app plus a grid editor for a new one.
#[component]
pub fn TestsetsPage() -> impl IntoView {
    let app_id = use_app_id();
    let (testsets, set_testsets) = signal::<Vec<TestsetSummary>>(Vec::new());
    let (list_error, set_list_error) = signal::<Option<String>>(None);

    let draft = RwSignal::new(TestsetDraft::default());
    let headers = RwSignal::new(draft.with_untracked(|d| d.columns().to_vec()));
    let (name, set_name) = signal(String::new());
    let (saving, set_saving) = signal(false);
    let (status, set_status) = signal::<Option<Result<String, String>>>(None);

    let reload = move || {
        let id = app_id.get_untracked();
        spawn_local(async move {
            match commands::list_testsets(&id).await {
                Ok(list) => {
                    set_testsets.set(list);
                    set_list_error.set(None);
                }
                Err(e) => set_list_error.set(Some(format!("Failed to load test sets: {}", e))),
            }
        });
    };

    Effect::new(move |_| {
        let _ = app_id.get();
        reload();
    });

    let add_column = move |_| {
        if let Some(column) = draft.try_update(|d| d.add_column()) {
            headers.update(|h| h.push(column));
        }
    };

    let apply_headers = move |_| {
        let inputs = headers.get_untracked();
        match draft.try_update(|d| d.rename_columns(&inputs)) {
            Some(Ok(())) => {
                headers.set(draft.with_untracked(|d| d.columns().to_vec()));
                set_status.set(None);
            }
            Some(Err(e)) => set_status.set(Some(Err(e.to_string()))),
            None => {}
        }
    };

    let save = move |_| {
        let (testset_name, rows) = match draft.with_untracked(|d| d.build_request(&name.get_untracked())) {
            Ok(request) => request,
            Err(e) => {
                set_status.set(Some(Err(e.to_string())));
                return;
            }
        };
        let id = app_id.get_untracked();
        set_saving.set(true);
        set_status.set(None);
        spawn_local(async move {
            match commands::create_testset(&id, &testset_name, &rows).await {
                Ok(created) => {
                    set_status.set(Some(Ok(format!("Test set {} saved", created.name))));
                    draft.set(TestsetDraft::default());
                    headers.set(draft.with_untracked(|d| d.columns().to_vec()));
                    set_name.set(String::new());
                    reload();
                }
                Err(e) => set_status.set(Some(Err(format!("Failed to save test set: {}", e)))),
            }
            set_saving.set(false);
        });
    };

    let header_count = Memo::new(move |_| headers.with(|h| h.len()));

    // Rebuild the grid only when columns or rows change, not on cell edits
    let shape = Memo::new(move |_| {
        draft.with(|d| {
            (
                d.columns().to_vec(),
                d.rows().iter().map(|r| r.id).collect::<Vec<_>>(),
            )
        })
    });

    view! {
        <div class="page testsets-page">
            <h2>"Test sets"</h2>

            <section class="settings-section">
                <h3>"Saved test sets"</h3>
                {move || list_error.get().map(|e| view! {
                    <div class="health-error"><span class="status-text status-error">{e}</span></div>
                })}
                <Show when=move || list_error.get().is_none() && testsets.with(|t| t.is_empty())>
                    <p class="section-description">"No test sets yet."</p>
                </Show>
                <table class="variants-table">
                    <tbody>
                        <For
                            each=move || testsets.get()
                            key=|t| t.id.clone()
                            children=move |t| view! {
                                <tr>
                                    <td>{t.name.clone()}</td>
                                    <td>{t.created_at.clone().unwrap_or_default()}</td>
                                </tr>
                            }
                        />
                    </tbody>
                </table>
            </section>

            <section class="settings-section testset-editor">
                <h3>"Create a new test set"</h3>

                <div class="form-group">
                    <label for="testset-name">"Name"</label>
                    <input
                        id="testset-name"
                        type="text"
                        class="input"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </div>

                <div class="input-row testset-headers">
                    {move || {
                        (0..header_count.get())
                            .map(|i| view! {
                                <input
                                    type="text"
                                    class="input"
                                    prop:value=move || headers.with(|h| h.get(i).cloned().unwrap_or_default())
                                    on:input=move |ev| {
                                        let text = event_target_value(&ev);
                                        headers.update(|h| {
                                            if let Some(slot) = h.get_mut(i) {
                                                *slot = text;
                                            }
                                        });
                                    }
                                />
                            })
                            .collect_view()
                    }}
                    <button class="btn" title="Add column" on:click=add_column>"+"</button>
                    <button class="btn btn-primary" on:click=apply_headers>"Update column names"</button>
                </div>

                <table class="variants-table testset-grid">
                    {move || {
                        let (columns, row_ids) = shape.get();
                        let width = columns.len();
                        let head = columns.into_iter().map(|c| view! { <th>{c}</th> }).collect_view();
                        let body = row_ids
                            .into_iter()
                            .map(|row_id| {
                                let cells = (0..width)
                                    .map(|column| view! {
                                        <td>
                                            <input
                                                type="text"
                                                class="input"
                                                prop:value=move || draft.with(|d| d.cell(row_id, column).to_string())
                                                on:input=move |ev| {
                                                    let text = event_target_value(&ev);
                                                    draft.update(|d| d.set_cell(row_id, column, text));
                                                }
                                            />
                                        </td>
                                    })
                                    .collect_view();
                                view! {
                                    <tr>
                                        {cells}
                                        <td>
                                            <button
                                                class="btn btn-small"
                                                title="Remove row"
                                                on:click=move |_| draft.update(|d| d.remove_row(row_id))
                                            >
                                                "\u{2717}"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view();
                        view! {
                            <thead><tr>{head}<th></th></tr></thead>
                            <tbody>{body}</tbody>
                        }
                    }}
                </table>

                <div class="input-row testset-actions">
                    <button class="btn" on:click=move |_| draft.update(|d| d.add_row())>"Add row"</button>
                    <button class="btn btn-primary" on:click=save disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save test set" }}
                    </button>
                </div>

                {move || status.get().map(|s| match s {
                    Ok(text) => view! { <span class="status-text status-saved">{text}</span> }.into_any(),
                    Err(text) => view! { <span class="status-text status-error">{text}</span> }.into_any(),
                })}
            </section>
        </div>
    }
}
