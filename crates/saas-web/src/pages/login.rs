//! Login / Sign-up Page

use leptos::prelude::*;

use crate::auth::AuthClient;
use crate::components::ErrorMessage;
use crate::config::DASHBOARD_PAGE;
use crate::form::{AuthIntent, Credentials, SIGN_UP_CONFIRMATION};
use crate::session;

#[component]
pub fn LoginPage() -> impl IntoView {
    session::bootstrap();

    let (intent, set_intent) = signal(AuthIntent::default());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(String::new());
    let (notice, set_notice) = signal(String::new());
    let (loading, set_loading) = signal(false);

    let toggle = move |_| {
        set_intent.update(|i| *i = i.toggle());
        set_error.set(String::new());
    };

    let submit = move |_| {
        if loading.get() {
            return;
        }
        set_error.set(String::new());
        set_notice.set(String::new());

        let credentials = match Credentials::validate(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(e) => {
                set_error.set(e.to_string());
                return;
            }
        };

        let intent = intent.get();
        set_loading.set(true);
        leptos::task::spawn_local(async move {
            let client = AuthClient::from_config();
            match intent {
                AuthIntent::Login => match client.sign_in_with_password(&credentials).await {
                    Ok(signed_in) => {
                        session::save(&signed_in);
                        session::redirect(DASHBOARD_PAGE);
                    }
                    Err(e) => set_error.set(e.to_string()),
                },
                AuthIntent::SignUp => match client.sign_up(&credentials).await {
                    Ok(outcome) => {
                        if let Some(signed_in) = outcome.into_session() {
                            session::save(&signed_in);
                        }
                        set_notice.set(SIGN_UP_CONFIRMATION.into());
                    }
                    Err(e) => set_error.set(e.to_string()),
                },
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="auth">
            <h1 id="form-title">{move || intent.get().title()}</h1>

            <div class="field">
                <input
                    id="email"
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
            </div>
            <div class="field">
                <input
                    id="password"
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </div>

            <ErrorMessage message=error />
            <Show when=move || !notice.get().is_empty()>
                <p class="notice">{move || notice.get()}</p>
            </Show>

            <button id="submit-btn" class="btn btn-primary" disabled=move || loading.get() on:click=submit>
                {move || intent.get().title()}
            </button>
            <button id="toggle-form" type="button" class="link" on:click=toggle>
                {move || intent.get().toggle_label()}
            </button>
        </div>
    }
}
