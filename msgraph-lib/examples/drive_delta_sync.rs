//! Drive delta sync example (client credentials + managed token).
//!
//! Run with: cargo run --example drive_delta_sync
//!
//! Requires .env file with:
//! - GRAPH_CLIENT_ID
//! - GRAPH_CLIENT_SECRET
//! - GRAPH_TENANT_ID
//! - GRAPH_USER_ID

use std::env;
use std::time::Duration;

use futures::TryStreamExt;
use futures::pin_mut;
use msgraph_lib::GraphClient;
use msgraph_lib::api::DeltaItem;
use msgraph_lib::api::DriveOwner;
use msgraph_lib::api::RequestOptions;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SimpleLogger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());

    let client_id = env::var("GRAPH_CLIENT_ID").expect("GRAPH_CLIENT_ID not set");
    let client_secret = env::var("GRAPH_CLIENT_SECRET").expect("GRAPH_CLIENT_SECRET not set");
    let tenant_id = env::var("GRAPH_TENANT_ID").expect("GRAPH_TENANT_ID not set");
    let user_id = env::var("GRAPH_USER_ID").expect("GRAPH_USER_ID not set");

    let client = GraphClient::builder()
        .token_refresh_interval(1800)
        .logging(true)
        .build()?;

    client
        .manage_token(&client_id, &client_secret, &tenant_id)
        .await?;

    let options = RequestOptions::new();
    let mut state_link = client
        .get_latest_delta_link(DriveOwner::Users, &user_id, &options)
        .await?;

    println!("Watching drive of {} (Ctrl+C to stop)...\n", user_id);

    loop {
        tokio::time::sleep(Duration::from_secs(30)).await;

        let changes = client.list_drive_changes(&state_link, &options);
        pin_mut!(changes);

        while let Some(change) = changes.try_next().await? {
            match change {
                DeltaItem::Item(item) => {
                    println!("changed: {} ({})", item["name"], item["id"]);
                }
                DeltaItem::DeltaLink(link) => state_link = link,
            }
        }
    }
}
