//! Handler for the `normalize` command.

use serde_json::json;

use super::command::NormalizeArgs;
use super::output::{self, Tone};
use super::setup;
use crate::application::Normalizer;
use crate::error::Result;

/// Print the canonical form of each input using the configured aliases.
pub fn execute(args: &NormalizeArgs) -> Result<()> {
    let config = setup::load_config(args.config.as_deref())?;
    let normalizer = Normalizer::new(config.alias_table()?);

    let pairs: Vec<(&str, String)> = args
        .text
        .iter()
        .map(|text| (text.as_str(), normalizer.normalize(text)))
        .collect();

    if output::mode().json {
        let items: Vec<_> = pairs
            .iter()
            .map(|(input, normalized)| json!({ "input": input, "normalized": normalized }))
            .collect();
        output::json_output(json!({ "command": "normalize", "results": items }));
        return Ok(());
    }

    for (input, normalized) in &pairs {
        if output::mode().quiet {
            println!("{normalized}");
        } else {
            output::field(input, output::paint(normalized, Tone::Accent));
        }
    }
    Ok(())
}
