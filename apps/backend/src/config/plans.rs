//! Subscription plan catalog.
//!
//! Centralized so that quota enforcement, the public `/plans` endpoint and
//! checkout creation all agree on the same numbers.

use serde::Serialize;

pub const FREE_PLAN_CODE: &str = "start";

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub code: &'static str,
    pub name: &'static str,
    /// Price in cents when billed monthly.
    pub monthly_price_cents: i64,
    /// Price in cents for a full year when billed yearly.
    pub yearly_price_cents: i64,
    pub transaction_fee_percent: u8,
    /// Maximum number of offers; `None` is unlimited.
    pub offer_limit: Option<u32>,
    pub features: &'static [&'static str],
}

pub const PLANS: [Plan; 3] = [
    Plan {
        code: "start",
        name: "Começo",
        monthly_price_cents: 0,
        yearly_price_cents: 0,
        transaction_fee_percent: 8,
        offer_limit: Some(3),
        features: &[
            "Até 3 produtos",
            "Checkout transparente",
            "Bio escalável",
            "Analytics básico",
            "Suporte por e-mail",
        ],
    },
    Plan {
        code: "pro",
        name: "Pro",
        monthly_price_cents: 4_900,
        // R$38/month billed yearly
        yearly_price_cents: 45_600,
        transaction_fee_percent: 4,
        offer_limit: Some(10),
        features: &[
            "Até 10 produtos",
            "Sem marca d'água",
            "Bio escalável",
            "Analytics básico",
            "Suporte por e-mail",
            "Domínio personalizado",
            "Temas premium",
        ],
    },
    Plan {
        code: "business",
        name: "Business",
        monthly_price_cents: 9_900,
        // R$87/month billed yearly
        yearly_price_cents: 104_400,
        transaction_fee_percent: 1,
        offer_limit: None,
        features: &[
            "Produtos ilimitados",
            "Suporte VIP",
            "Analytics avançado",
            "Sem marca d'água",
            "Bio escalável",
            "Domínio personalizado",
            "Temas premium",
            "API de integração",
            "Múltiplos membros",
        ],
    },
];

pub fn find_plan(code: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.code == code)
}

/// Offer quota for a plan code. Unknown codes get the free plan's quota.
pub fn offer_limit(code: &str) -> Option<u32> {
    match find_plan(code) {
        Some(plan) => plan.offer_limit,
        None => find_plan(FREE_PLAN_CODE).and_then(|p| p.offer_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_the_three_plans() {
        let codes: Vec<_> = PLANS.iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["start", "pro", "business"]);
    }

    #[test]
    fn find_plan_by_code() {
        assert_eq!(find_plan("pro").unwrap().monthly_price_cents, 4_900);
        assert!(find_plan("enterprise").is_none());
    }

    #[test]
    fn offer_limits() {
        assert_eq!(offer_limit("start"), Some(3));
        assert_eq!(offer_limit("pro"), Some(10));
        assert_eq!(offer_limit("business"), None);
        // unknown plan codes fall back to the free quota
        assert_eq!(offer_limit("bogus"), Some(3));
    }
}
