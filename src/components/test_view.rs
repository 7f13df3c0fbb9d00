use leptos::prelude::*;
use serde_json::{Map, Value};
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::playground::enhanced::next_sequence;
use crate::playground::parameter::{display_name, Parameter};
use crate::playground::run::{
    format_run_result, serve_error_message, ChatMessage, ChatRole, RunController, RunDisplay, RunOutcome,
};

/// Key of the message-history input on chat variants.
const CHAT_INPUT: &str = "inputs";

/// Rows of test inputs, each runnable against the variant on its own.
#[component]
pub fn TestView(
    inputs: Vec<Parameter>,
    #[prop(into)] options: Signal<Map<String, Value>>,
    #[prop(into)] uri: String,
    is_chat: bool,
) -> impl IntoView {
    let inputs: Vec<Parameter> = inputs
        .into_iter()
        .filter(|p| !(is_chat && p.name == CHAT_INPUT))
        .collect();
    let rows = RwSignal::new(vec![next_sequence()]);
    let removable = Signal::derive(move || rows.with(|r| r.len() > 1));

    view! {
        <section class="test-view">
            <h3>"Test"</h3>
            <For
                each=move || rows.get()
                key=|row| *row
                children=move |row| {
                    view! {
                        <TestRow
                            inputs=inputs.clone()
                            options=options
                            uri=uri.clone()
                            is_chat=is_chat
                            removable=removable
                            on_remove=move |_| rows.update(|r| r.retain(|id| *id != row))
                        />
                    }
                }
            />
            <button class="btn" on:click=move |_| rows.update(|r| r.push(next_sequence()))>
                "Add row"
            </button>
        </section>
    }
}

#[component]
fn TestRow(
    inputs: Vec<Parameter>,
    options: Signal<Map<String, Value>>,
    uri: String,
    is_chat: bool,
    #[prop(into)] removable: Signal<bool>,
    #[prop(into)] on_remove: Callback<()>,
) -> impl IntoView {
    let values = RwSignal::new(initial_values(&inputs));
    let chat = RwSignal::new(if is_chat {
        vec![ChatMessage::new(ChatRole::User, "")]
    } else {
        Vec::new()
    });
    let run = RwSignal::new(RunController::default());
    let (elapsed_ms, set_elapsed_ms) = signal::<Option<f64>>(None);
    let params = StoredValue::new(inputs.clone());
    let uri = StoredValue::new(uri);

    let start_run = move |_| {
        let Some(Ok(ticket)) = run.try_update(|r| r.start()) else {
            return;
        };
        set_elapsed_ms.set(None);
        let started_at = js_sys::Date::now();
        let inputs_now = values.get_untracked();
        let options_now = options.get_untracked();
        let history = chat.get_untracked();

        spawn_local(async move {
            let result = commands::call_variant(
                ticket,
                &inputs_now,
                &params.get_value(),
                &options_now,
                &uri.get_value(),
                &history,
            )
            .await;

            let outcome = match result {
                Ok(value) => RunOutcome::Succeeded(format_run_result(&value)),
                Err(e) => RunOutcome::Failed(serve_error_message(&e)),
            };
            let reply = match &outcome {
                RunOutcome::Succeeded(text) if is_chat => Some(text.clone()),
                _ => None,
            };

            // Stale tickets (cancelled runs) are ignored by the controller
            if run.try_update(|r| r.settle(ticket, outcome)).unwrap_or(false) {
                set_elapsed_ms.set(Some(js_sys::Date::now() - started_at));
                if let Some(reply) = reply {
                    chat.update(|history| {
                        history.push(ChatMessage::new(ChatRole::Assistant, reply));
                        history.push(ChatMessage::new(ChatRole::User, ""));
                    });
                }
            }
        });
    };

    let cancel_run = move |_| {
        if let Some(Some(ticket)) = run.try_update(|r| r.cancel()) {
            spawn_local(async move {
                if let Err(e) = commands::cancel_run(ticket).await {
                    web_sys::console::error_1(&format!("Failed to cancel run: {}", e).into());
                }
            });
        }
    };

    let input_fields = inputs
        .iter()
        .map(|p| {
            let read_key = p.name.clone();
            let write_key = p.name.clone();
            view! {
                <div class="form-group">
                    <label>{display_name(&p.name)}</label>
                    <textarea
                        class="input test-input"
                        rows="2"
                        prop:value=move || values.with(|m| m.get(&read_key).map(value_text).unwrap_or_default())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            values.update(|m| {
                                m.insert(write_key.clone(), Value::String(text));
                            });
                        }
                    ></textarea>
                </div>
            }
        })
        .collect_view();

    let is_loading = move || run.with(|r| r.is_loading());

    view! {
        <div class="test-row">
            <div class="test-row-inputs">
                {input_fields}
                <Show when=move || is_chat>
                    <ChatEditor messages=chat />
                </Show>
            </div>

            <div class="test-row-actions">
                <Show
                    when=is_loading
                    fallback=move || view! {
                        <button class="btn btn-primary" on:click=start_run>"Run"</button>
                    }
                >
                    <button class="btn" on:click=cancel_run>"Cancel"</button>
                </Show>
                <Show when=move || removable.get()>
                    <button class="btn btn-delete" on:click=move |_| on_remove.run(())>"Remove"</button>
                </Show>
            </div>

            <div class="test-row-output">
                <Show when=is_loading>
                    <p class="run-loading">"Loading..."</p>
                </Show>
                {move || {
                    run.with(|r| match r.display() {
                        RunDisplay::Empty => view! {
                            <p class="run-placeholder">"Results will be shown here"</p>
                        }
                        .into_any(),
                        RunDisplay::Output(text) => view! {
                            <pre class="run-output">{text.clone()}</pre>
                        }
                        .into_any(),
                        RunDisplay::Error(text) => view! {
                            <pre class="run-output run-error">{text.clone()}</pre>
                        }
                        .into_any(),
                    })
                }}
                {move || elapsed_ms.get().map(|ms| view! {
                    <span class="run-elapsed">{format!("{:.0} ms", ms)}</span>
                })}
            </div>
        </div>
    }
}

/// Editable message history of a chat variant.
#[component]
fn ChatEditor(messages: RwSignal<Vec<ChatMessage>>) -> impl IntoView {
    view! {
        <div class="chat-editor">
            <For
                each=move || messages.get()
                key=|m| m.id.clone()
                children=move |message| {
                    let id = message.id.clone();
                    let role_id = id.clone();
                    let content_id = id.clone();
                    let read_id = id.clone();
                    let content = move || {
                        messages.with(|all| {
                            all.iter()
                                .find(|m| m.id == read_id)
                                .map(|m| m.content.clone())
                                .unwrap_or_default()
                        })
                    };
                    view! {
                        <div class="chat-message">
                            <select
                                class="input chat-role"
                                on:change=move |ev| {
                                    if let Some(role) = ChatRole::parse(&event_target_value(&ev)) {
                                        messages.update(|all| {
                                            if let Some(m) = all.iter_mut().find(|m| m.id == role_id) {
                                                m.role = role;
                                            }
                                        });
                                    }
                                }
                            >
                                {ChatRole::ALL
                                    .into_iter()
                                    .map(|r| {
                                        view! {
                                            <option value=r.as_str() selected=r == message.role>
                                                {r.as_str()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                            <textarea
                                class="input chat-content"
                                rows="2"
                                prop:value=content
                                on:input=move |ev| {
                                    let text = event_target_value(&ev);
                                    messages.update(|all| {
                                        if let Some(m) = all.iter_mut().find(|m| m.id == content_id) {
                                            m.content = text;
                                        }
                                    });
                                }
                            ></textarea>
                            <button
                                class="btn btn-small"
                                on:click=move |_| messages.update(|all| all.retain(|m| m.id != id))
                            >
                                "\u{2717}"
                            </button>
                        </div>
                    }
                }
            />
            <button
                class="btn btn-small"
                on:click=move |_| messages.update(|all| all.push(ChatMessage::new(ChatRole::User, "")))
            >
                "Add message"
            </button>
        </div>
    }
}

fn initial_values(inputs: &[Parameter]) -> Map<String, Value> {
    inputs
        .iter()
        .filter(|p| !p.default.is_null())
        .map(|p| (p.name.clone(), p.default.clone()))
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
