use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Networks the dashboard knows by name.
static CHAIN_NAMES: Lazy<HashMap<u64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "Ethereum Mainnet"),
        (3, "Ropsten"),
        (4, "Rinkeby"),
        (5, "Goerli"),
        (42, "Kovan"),
        (137, "Polygon"),
        (80001, "Mumbai"),
        (56, "BSC Mainnet"),
        (97, "BSC Testnet"),
    ])
});

/// Human-readable name for a chain id. Unknown ids get a formatted
/// placeholder rather than an error.
pub fn chain_name(chain_id: u64) -> String {
    match CHAIN_NAMES.get(&chain_id) {
        Some(name) => (*name).to_string(),
        None => format!("Unknown Chain ({chain_id})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_chains_resolve_by_name() {
        assert_eq!(chain_name(1), "Ethereum Mainnet");
        assert_eq!(chain_name(137), "Polygon");
        assert_eq!(chain_name(97), "BSC Testnet");
    }

    #[test]
    fn unknown_chain_gets_placeholder() {
        assert_eq!(chain_name(123456), "Unknown Chain (123456)");
    }
}
