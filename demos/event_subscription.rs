//! Contract event subscription walkthrough
//!
//! Demonstrates:
//! - Wiring a `SubscriptionRegistry` to an event source capability
//! - Deduplicated subscribe / unsubscribe per (contract, event) pair
//! - Wildcard subscriptions
//! - Delivering events to the recorded callbacks
//!
//! The loopback source used here keeps attachments in memory so the demo
//! runs without a node; a real integration implements `EventSource` on
//! top of its SDK's event machinery instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tron_sdk::{
    ContractEvent, EventCallback, EventSource, SourceError, SubscriptionHandle,
    SubscriptionRegistry, WILDCARD_EVENT,
};

/// In-memory event source: records attachments and lets the demo emit
/// events into them by hand.
#[derive(Default)]
struct LoopbackSource {
    next_handle: Mutex<u64>,
    attachments: Mutex<HashMap<SubscriptionHandle, (String, String, EventCallback)>>,
}

impl LoopbackSource {
    fn emit(&self, event: ContractEvent) {
        let attachments = self.attachments.lock().unwrap();
        for (contract, name, callback) in attachments.values() {
            let name_matches = name == WILDCARD_EVENT || *name == event.event_name;
            if *contract == event.contract_address && name_matches {
                (**callback)(event.clone());
            }
        }
    }
}

#[async_trait]
impl EventSource for LoopbackSource {
    async fn attach(
        &self,
        contract_address: &str,
        event_name: &str,
        callback: EventCallback,
    ) -> Result<SubscriptionHandle, SourceError> {
        let mut next = self.next_handle.lock().unwrap();
        *next += 1;
        let handle = SubscriptionHandle::new(*next);
        self.attachments.lock().unwrap().insert(
            handle,
            (
                contract_address.to_string(),
                event_name.to_string(),
                callback,
            ),
        );
        Ok(handle)
    }

    async fn detach(&self, handle: SubscriptionHandle) -> Result<(), SourceError> {
        self.attachments.lock().unwrap().remove(&handle);
        Ok(())
    }
}

fn transfer_event(contract: &str, amount: u64) -> ContractEvent {
    ContractEvent {
        contract_address: contract.to_string(),
        event_name: "Transfer".to_string(),
        transaction_id: Some(format!("{:064x}", amount)),
        block_number: Some(61_000_000 + amount),
        data: json!({ "from": "TSender", "to": "TReceiver", "value": amount }),
        timestamp: 1_700_000_000_000 + amount,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = Arc::new(LoopbackSource::default());
    let registry = SubscriptionRegistry::new(Arc::clone(&source) as Arc<dyn EventSource>);

    let contract = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8";

    // 1. Subscribe to a named event.
    println!("1. Subscribing to {}::Transfer...", contract);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: EventCallback = Arc::new(move |event| {
        sink.lock().unwrap().push(event);
    });
    registry.subscribe(contract, "Transfer", callback).await?;
    println!("   subscribed: {}", registry.is_subscribed(contract, "Transfer"));

    // 2. A duplicate subscribe is refused without side effect.
    println!("2. Subscribing to the same pair again...");
    let duplicate: EventCallback = Arc::new(|_| println!("   this callback never runs"));
    match registry.subscribe(contract, "Transfer", duplicate).await {
        Err(e) => println!("   refused as expected: {}", e),
        Ok(()) => println!("   unexpected: duplicate subscription accepted"),
    }

    // 3. Wildcard subscriptions are an independent pair.
    println!("3. Adding a wildcard subscription...");
    let all_events: EventCallback = Arc::new(|event| {
        println!("   wildcard saw {}::{}", event.contract_address, event.event_name);
    });
    registry.subscribe(contract, WILDCARD_EVENT, all_events).await?;
    println!("   live pairs: {}", registry.len());

    // 4. Emit events through the source.
    println!("4. Emitting two Transfer events...");
    source.emit(transfer_event(contract, 100));
    source.emit(transfer_event(contract, 250));
    println!("   named callback saw {} events", seen.lock().unwrap().len());

    // 5. Unsubscribe stops delivery and frees the pair.
    println!("5. Unsubscribing Transfer...");
    registry.unsubscribe(contract, "Transfer").await?;
    source.emit(transfer_event(contract, 999));
    println!(
        "   after unsubscribe the named callback still has {} events",
        seen.lock().unwrap().len()
    );
    println!("   subscribed: {}", registry.is_subscribed(contract, "Transfer"));

    Ok(())
}
