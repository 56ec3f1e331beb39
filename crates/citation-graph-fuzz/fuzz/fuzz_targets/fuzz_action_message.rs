#![no_main]

use citation_graph::models::{ActionMessage, FilterAction, RequestModelAction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Envelope first, then each payload type the server understands
    if let Ok(message) = serde_json::from_slice::<ActionMessage>(data) {
        let _ = message.kind();
        let _ = serde_json::from_value::<FilterAction>(message.action.clone());
        let _ = serde_json::from_value::<RequestModelAction>(message.action);
    }
});
