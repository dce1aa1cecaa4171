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

// Runs the family invitation flow against the memory backend:
// $ cargo run --bin family_demo
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
        .ok_or_else(|| anyhow::anyhow!("family_demo requires store.backend = \"memory\""))?;

    let mai = profile("Mai");
    let huy = profile("Huy");
    directory.upsert(mai.clone());
    directory.upsert(huy.clone());

    let families = &server.family_service;

    let family = families.create_family(mai.id, "Nguyen household").await?;
    families.send_family_invite(family.id, mai.id, huy.id).await?;
    let invites = families.pending_invites(huy.id).await?;
    info!(count = invites.len(), "Huy's pending invites");

    families
        .accept_family_invite(huy.id, family.id, mai.id)
        .await?;
    let members = families.family_members(family.id, false).await?;
    info!(count = members.len(), "members after accept");

    families.leave_family(huy.id, family.id).await?;
    families.leave_family(mai.id, family.id).await?;
    let gone = families.get_family(family.id).await?.is_none();
    info!(deleted = gone, "family after everyone left");

    server.shutdown().await;
    Ok(())
}
