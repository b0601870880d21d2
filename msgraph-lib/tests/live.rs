//! Tests against a real tenant.
//!
//! These tests require an application registered in Azure AD with admin
//! consent for `User.Read.All` and are ignored by default. To run them, create
//! a `.env` file in the msgraph-lib directory with:
//!
//! ```env
//! GRAPH_CLIENT_ID=your-client-id
//! GRAPH_CLIENT_SECRET=your-client-secret
//! GRAPH_TENANT_ID=your-tenant-id
//! ```
//!
//! Then run: `cargo test -p msgraph-lib -- --ignored`

use std::env;

use futures::StreamExt;
use msgraph_lib::GraphClient;
use msgraph_lib::api::RequestOptions;
use msgraph_lib::api::query::ODataQuery;

fn load_env() -> Option<(String, String, String)> {
    let _ = dotenvy::dotenv();

    let client_id = env::var("GRAPH_CLIENT_ID").ok()?;
    let client_secret = env::var("GRAPH_CLIENT_SECRET").ok()?;
    let tenant_id = env::var("GRAPH_TENANT_ID").ok()?;

    Some((client_id, client_secret, tenant_id))
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_acquire_token() {
    let (client_id, client_secret, tenant_id) =
        load_env().expect("Missing required environment variables. See module docs.");

    let client = GraphClient::new().unwrap();
    let (payload, status) = client
        .acquire_token(&client_id, &client_secret, &tenant_id)
        .await
        .expect("Token acquisition failed");

    assert!(status.is_success());
    assert!(!payload.access_token.is_empty());
    println!("Token expires in {:?}s", payload.expires_in);
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_list_users_with_managed_token() {
    let (client_id, client_secret, tenant_id) =
        load_env().expect("Missing required environment variables. See module docs.");

    let client = GraphClient::builder().logging(true).build().unwrap();
    client
        .manage_token(&client_id, &client_secret, &tenant_id)
        .await
        .expect("Token management failed");

    let mut query = ODataQuery::new();
    query.set_top(5);
    query.set_select(["id", "displayName"]).unwrap();
    let options = RequestOptions::new().with_query(query);

    let users: Vec<_> = client.list_all_users(&options).take(12).collect().await;

    assert!(!users.is_empty());
    for user in &users {
        let user = user.as_ref().expect("Listing failed");
        println!("{} {}", user["id"], user["displayName"]);
    }

    client.stop_token_management().await;
}
