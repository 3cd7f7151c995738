//! Dashboard Page

use leptos::prelude::*;

use crate::api::{self, CheckoutRedirect};
use crate::components::{ErrorMessage, PlanCard};
use crate::config::{BASIC_PRICE_ID, LOGIN_PAGE, PRO_PRICE_ID};
use crate::session;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let Some(current) = session::load() else {
        session::redirect(LOGIN_PAGE);
        return view! { <p>"Redirecting..."</p> }.into_any();
    };

    let (status, set_status) = signal(String::new());
    let (error, set_error) = signal(String::new());
    let (busy, set_busy) = signal(false);

    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();

    match CheckoutRedirect::from_query(&search) {
        CheckoutRedirect::Completed { session_id } => {
            set_status.set("Confirming your payment...".into());
            set_busy.set(true);
            leptos::task::spawn_local(async move {
                match api::verify_checkout(&session_id)
                    .await
                    .and_then(api::VerifiedCheckout::summary)
                {
                    Ok(summary) => set_status.set(summary),
                    Err(e) => {
                        set_status.set(String::new());
                        set_error.set(e);
                    }
                }
                set_busy.set(false);
            });
        }
        CheckoutRedirect::Canceled => set_status.set("Checkout canceled.".into()),
        CheckoutRedirect::None => {}
    }

    let email = current.user.email.clone().unwrap_or_default();
    let user_id = current.user.id.clone();

    let subscribe = Callback::new(move |price_id: &'static str| {
        set_error.set(String::new());
        set_busy.set(true);
        let email = email.clone();
        let user_id = user_id.clone();
        leptos::task::spawn_local(async move {
            match api::create_checkout(price_id, &email, &user_id).await {
                Ok(link) => {
                    leptos::logging::log!("redirecting to checkout {}", link.session_id);
                    session::redirect(&link.url);
                }
                Err(e) => {
                    set_error.set(e);
                    set_busy.set(false);
                }
            }
        });
    });

    let sign_out = move |_| {
        session::clear();
        session::redirect(LOGIN_PAGE);
    };

    let greeting = current.user.email.unwrap_or(current.user.id);

    view! {
        <div class="dashboard">
            <header>
                <h1>"Dashboard"</h1>
                <p class="subtitle">{greeting}</p>
                <button class="btn" on:click=sign_out>"Sign Out"</button>
            </header>

            <Show when=move || !status.get().is_empty()>
                <p class="notice">{move || status.get()}</p>
            </Show>
            <ErrorMessage message=error />

            <div class="plans">
                <PlanCard
                    name="Basic"
                    price="$9"
                    price_id=BASIC_PRICE_ID
                    disabled=busy
                    on_subscribe=subscribe
                />
                <PlanCard
                    name="Pro"
                    price="$19"
                    price_id=PRO_PRICE_ID
                    disabled=busy
                    on_subscribe=subscribe
                />
            </div>
        </div>
    }
    .into_any()
}
