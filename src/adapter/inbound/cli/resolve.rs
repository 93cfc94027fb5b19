//! `airgap resolve`: report which universe a stored entity belongs to.

use serde_json::json;

use super::command::{EntityKind, ResolveArgs};
use crate::adapter::inbound::cli::output;
use crate::application::resolver::EntityRef;
use crate::domain::{FlowId, OrderId, PositionId, WalletId};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_services, IsolationServices};
use crate::infrastructure::config::settings::Config;

fn entity_ref(args: &ResolveArgs) -> EntityRef {
    let id = args.id.trim();
    match args.kind {
        EntityKind::Wallet => EntityRef::Wallet(WalletId::new(id)),
        EntityKind::Flow => EntityRef::Flow(FlowId::new(id)),
        EntityKind::Order => EntityRef::Order(OrderId::new(id)),
        EntityKind::Position => EntityRef::Position(PositionId::new(id)),
    }
}

/// Resolve strictly: an unreachable store fails the command instead of
/// printing the fail-safe default.
pub async fn execute(config: &Config, args: &ResolveArgs) -> Result<()> {
    let services = build_services(config).await?;
    let result = report(&services, &entity_ref(args)).await;
    services.router.close();
    result
}

async fn report(services: &IsolationServices, entity: &EntityRef) -> Result<()> {
    if let EntityRef::Wallet(id) = entity {
        let classification = services.entities.classify_wallet(id).await?;
        if output::is_json() {
            output::json_output(json!({
                "type": "resolution",
                "payload": {
                    "entity": entity.kind(),
                    "id": entity.id(),
                    "mode": classification.mode,
                    "classification": classification,
                }
            }));
            return Ok(());
        }
        output::mode("Mode", classification.mode);
        match classification.found_in {
            Some(store) => output::field("Stored in", store),
            None => output::field("Stored in", "not found"),
        }
        if let Some(definition) = &classification.definition {
            output::field("Definition", definition);
        }
        for signal in &classification.signals {
            output::field("Demo signal", signal);
        }
        return Ok(());
    }

    let mode = services.entities.try_resolve(entity).await?;
    if output::is_json() {
        output::json_output(json!({
            "type": "resolution",
            "payload": {
                "entity": entity.kind(),
                "id": entity.id(),
                "mode": mode,
            }
        }));
    } else {
        output::field("Entity", entity);
        output::mode("Mode", mode);
    }
    Ok(())
}
