// Naming-convention linking between cluster entities

use std::collections::BTreeSet;

/// Plausible peer names for a given entity name
///
/// Strips a `-svc`/`-service` suffix to get a base name, then re-adds the
/// common suffixes; the raw and base names are included too. `orders-svc`
/// yields {orders-svc, orders, orders-service, orders-api, orders-app}.
pub fn name_variants(name: &str) -> BTreeSet<String> {
    let base = name
        .strip_suffix("-svc")
        .or_else(|| name.strip_suffix("-service"))
        .unwrap_or(name);

    let mut variants = BTreeSet::new();
    variants.insert(name.to_string());
    variants.insert(base.to_string());
    for suffix in ["-svc", "-service", "-api", "-app"] {
        variants.insert(format!("{}{}", base, suffix));
    }
    variants
}

/// First name in `pool` (in its iteration order) that is a variant of `name`
///
/// First match wins; no ambiguity resolution.
pub fn first_variant_match<'a>(
    name: &str,
    pool: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let candidates = name_variants(name);
    pool.into_iter().find(|p| candidates.contains(*p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_of_suffixed_name() {
        let variants = name_variants("orders-svc");
        assert!(variants.contains("orders-svc"));
        assert!(variants.contains("orders"));
        assert!(variants.contains("orders-service"));
        assert!(variants.contains("orders-api"));
        assert!(variants.contains("orders-app"));
    }

    #[test]
    fn test_variants_of_bare_name() {
        let variants = name_variants("billing");
        assert!(variants.contains("billing"));
        assert!(variants.contains("billing-svc"));
        assert!(variants.contains("billing-api"));
    }

    #[test]
    fn test_service_suffix_is_stripped() {
        let variants = name_variants("cart-service");
        assert!(variants.contains("cart"));
        assert!(variants.contains("cart-app"));
    }

    #[test]
    fn test_first_match_wins() {
        let pool = ["orders-app", "orders-api"];
        let found = first_variant_match("orders-svc", pool);
        assert_eq!(found, Some("orders-app"));
    }

    #[test]
    fn test_exact_name_matches() {
        let pool = ["payments"];
        assert_eq!(first_variant_match("payments", pool), Some("payments"));
    }

    #[test]
    fn test_no_match() {
        let pool = ["inventory", "shipping"];
        assert_eq!(first_variant_match("orders-svc", pool), None);
    }
}
