use anyhow::{Result, bail};
use staffdesk_core::search::SearchQuery;

use crate::bootstrap::Context;

pub async fn run(context: &Context, text: &str, json: bool) -> Result<()> {
    let min_len = context.config.search.min_query_len;
    if SearchQuery::parse(text, min_len).is_none() {
        bail!("Search text must be at least {} characters", min_len);
    }

    let session = context.session();
    if !session.initialize().await.is_authenticated() {
        bail!("Not signed in. Run `staffdesk login` first.");
    }

    let search = context.search(session);
    search.on_input(text);
    search.flush().await;
    let view = search.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&view.results)?);
        return Ok(());
    }

    if view.results.is_empty() {
        println!("No results for \"{}\"", text.trim());
        return Ok(());
    }

    for result in &view.results {
        match &result.subtitle {
            Some(subtitle) => println!("[{}] {} ({})  {}", result.kind, result.title, subtitle, result.target_location),
            None => println!("[{}] {}  {}", result.kind, result.title, result.target_location),
        }
    }
    Ok(())
}
