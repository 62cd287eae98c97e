use json_scout::errors::QueryError;
use json_scout::{find, prune, search, SearchOptions};
use serde_json::json;

fn main() -> Result<(), QueryError> {
    let doc = json!({
        "users": [
            {"name": "Ada", "admin": true},
            {"name": "Grace", "admin": false}
        ]
    });

    let nodes = find(&doc, "$.users[*].name")?;
    for node in &nodes {
        println!("{} = {}", node.json_path(), node.value);
    }

    let outcome = search(&doc, &SearchOptions::new("admin"));
    println!("{} matches", outcome.stats.total_matches);
    println!("{}", prune(&doc, &outcome.results));

    Ok(())
}
