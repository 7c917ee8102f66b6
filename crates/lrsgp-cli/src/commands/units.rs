//! Units command implementation

use crate::output::OutputWriter;
use anyhow::Result;
use lrsgp_core::models::LinearUnitType;

pub fn execute(output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        let units: Vec<_> = LinearUnitType::ALL
            .iter()
            .map(|unit| {
                serde_json::json!({
                    "token": unit.as_str(),
                    "name": unit.constant_name(),
                    "length": unit.is_length(),
                })
            })
            .collect();
        output.result(units)?;
    } else {
        output.section("Linear Units");
        for unit in LinearUnitType::ALL {
            output.kv(unit.constant_name(), unit.as_str());
        }
    }

    Ok(())
}
