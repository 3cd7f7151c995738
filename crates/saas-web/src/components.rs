//! UI Components

use leptos::prelude::*;

/// Error line under a form; hidden while the message is empty
#[component]
pub fn ErrorMessage(#[prop(into)] message: Signal<String>) -> impl IntoView {
    view! {
        <Show when=move || !message.get().is_empty()>
            <p class="error-msg">{move || message.get()}</p>
        </Show>
    }
}

/// Plan card with a subscribe button
#[component]
pub fn PlanCard(
    name: &'static str,
    price: &'static str,
    price_id: &'static str,
    #[prop(into)] disabled: Signal<bool>,
    on_subscribe: Callback<&'static str>,
) -> impl IntoView {
    view! {
        <div class="plan">
            <h2>{name}</h2>
            <div class="price">{price}<span>"/month"</span></div>
            <button
                class="btn btn-primary"
                disabled=move || disabled.get()
                on:click=move |_| on_subscribe.run(price_id)
            >
                "Subscribe"
            </button>
        </div>
    }
}
