//! Frontend configuration, fixed at build time

/// Supabase project URL
pub const SUPABASE_URL: &str = match option_env!("SUPABASE_URL") {
    Some(url) => url,
    None => "http://localhost:54321",
};

/// Supabase publishable (anon) key
pub const SUPABASE_ANON_KEY: &str = match option_env!("SUPABASE_ANON_KEY") {
    Some(key) => key,
    None => "",
};

/// Stripe price id of the Basic plan
///
/// Fixed: the server maps exactly this id to "Basic ($9/mo)" and every
/// other id to Pro.
pub const BASIC_PRICE_ID: &str = "price_1SaZfrLXgHZdEVXGEoy3Zuzb";

/// Stripe price id of the Pro plan, set with `PRO_PRICE_ID` at build time
///
/// The fallback is not a real Stripe price; release builds must set it.
pub const PRO_PRICE_ID: &str = match option_env!("PRO_PRICE_ID") {
    Some(id) => id,
    None => "price_pro_monthly",
};

pub const LOGIN_PAGE: &str = "index.html";
pub const DASHBOARD_PAGE: &str = "dashboard.html";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_price_matches_server_mapping() {
        assert_eq!(BASIC_PRICE_ID, saas_payments::BASIC_PRICE_ID);
        assert_eq!(
            saas_payments::Plan::from_price_id(BASIC_PRICE_ID).display_name(),
            "Basic ($9/mo)"
        );
    }

    #[test]
    fn test_pro_price_maps_to_pro() {
        assert_ne!(PRO_PRICE_ID, BASIC_PRICE_ID);
        assert_eq!(
            saas_payments::Plan::from_price_id(PRO_PRICE_ID).display_name(),
            "Pro ($19/mo)"
        );
    }
}
