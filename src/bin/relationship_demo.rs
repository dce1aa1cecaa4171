use kinship::domain_model::*;
use kinship::logger::*;
use kinship::server::Server;
use kinship::settings::*;

fn profile(name: &str) -> UserProfile {
    UserProfile {
        id: UserId::random(),
        display_name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase()),
        avatar: None,
        last_seen: None,
    }
}

// Runs the full friend-request flow against the memory backend:
// $ cargo run --bin relationship_demo
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    let cli = Cli::parse();
    let settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig {
        filter: settings.log.filter.clone(),
    })?;

    let server = Server::try_new(&settings).await?;
    let directory = server
        .memory_profiles()
        .ok_or_else(|| anyhow::anyhow!("relationship_demo requires store.backend = \"memory\""))?;

    let ana = profile("Ana");
    let ben = profile("Ben");
    directory.upsert(ana.clone());
    directory.upsert(ben.clone());

    let relations = &server.relationship_service;

    relations.send_friend_request(ana.id, ben.id).await?;
    let pending = relations.get_pending_requests(ben.id, false).await?;
    info!(count = pending.len(), "Ben's pending requests");

    relations.accept_friend_request(ana.id, ben.id).await?;
    let friends = relations.get_friends(ana.id, false).await?;
    info!(count = friends.len(), "Ana's friends after accept");
    info!(
        status = ?relations.relationship_status(ben.id, ana.id).await?,
        "Ben's view of Ana"
    );

    relations.remove_friend(ana.id, ben.id).await?;
    let friends = relations.get_friends(ana.id, false).await?;
    info!(count = friends.len(), "Ana's friends after removal");

    server.shutdown().await;
    Ok(())
}
