//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{DashboardPage, LoginPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=LoginPage />
                    <Route path=path!("/index.html") view=LoginPage />
                    <Route path=path!("/dashboard.html") view=DashboardPage />
                </Routes>
            </main>
        </Router>
    }
}
