//! Config command implementation

use crate::output::OutputWriter;
use anyhow::Result;
use lrsgp_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut entries: Vec<_> = config.to_inspection_map().into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    if output.is_json() {
        let data: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(key, (value, source))| {
                (key, serde_json::json!({ "value": value, "source": source }))
            })
            .collect();
        output.result(data)?;
    } else {
        output.section("Configuration");
        for (key, (value, source)) in entries {
            output.kv(key, format!("{} ({:?})", value, source));
        }
    }

    Ok(())
}
