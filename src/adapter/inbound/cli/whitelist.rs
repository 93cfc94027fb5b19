//! `airgap whitelist`: print the compiled-in real-money whitelist.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::whitelist::TESTNET_MARKERS;
use crate::domain::Whitelist;

pub fn execute() {
    let whitelist = Whitelist::builtin();
    let mut entries = whitelist.entries().to_vec();
    entries.sort_unstable();

    if output::is_json() {
        output::json_output(json!({
            "type": "whitelist",
            "payload": {
                "connectors": entries,
                "testnet_markers": TESTNET_MARKERS,
            }
        }));
        return;
    }

    output::section("Real-money connectors");
    for entry in entries {
        output::item(entry);
    }
    output::hint(&format!(
        "identifiers containing {} are always demo",
        TESTNET_MARKERS.join(" or ")
    ));
}
