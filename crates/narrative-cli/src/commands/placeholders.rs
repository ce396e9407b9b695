//! Placeholders command
//!
//! Prints the placeholder catalog of one template type.

use anyhow::Result;
use narrative_export::model::TemplateType;
use narrative_export::placeholders_for;

/// Execute the placeholders command
pub fn execute(template_type: TemplateType, json: bool) -> Result<()> {
    let placeholders = placeholders_for(template_type);

    if json {
        println!("{}", serde_json::to_string_pretty(&placeholders)?);
        return Ok(());
    }

    let width = placeholders.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for placeholder in &placeholders {
        println!("{:width$}  {}", placeholder.name, placeholder.description);
    }
    Ok(())
}
