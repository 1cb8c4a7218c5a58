//! `parley models` -- list the selectable model catalog.

use console::style;

use parley_core::chat::models::MODELS;
use parley_core::store::prefs::{PrefStore, SELECTED_MODEL_KEY};
use parley_infra::localfile::prefs::LocalFilePrefStore;

/// Print the model catalog, marking the last selected model.
pub async fn list_models(data_dir: &std::path::Path) -> anyhow::Result<()> {
    let prefs = LocalFilePrefStore::new(data_dir);
    let selected = prefs.get(SELECTED_MODEL_KEY).await.unwrap_or(None);

    println!();
    for model in MODELS {
        let marker = if selected.as_deref() == Some(model.value) {
            style("*").green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {marker} {} {}",
            style(format!("{:<22}", model.value)).cyan(),
            style(model.label).dim()
        );
    }
    println!();
    Ok(())
}
